//! Field and whole-form validation for the voucher form.
//!
//! Every validator is total: it returns the normalized value or a single
//! [`ValidationError`] whose `Display` is the message shown under the field.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;

use super::model::{AircraftType, FlightDate, FormField, FormInput, VoucherRecord};

lazy_static! {
    static ref FLIGHT_NUMBER_RE: Regex = Regex::new(r"^[A-Z]{2,}[0-9]{1,4}$").unwrap();
    static ref DATE_RE: Regex = Regex::new(r"^([0-9]{2})-([0-9]{2})-([0-9]{2})$").unwrap();
    static ref ALPHA_RE: Regex = Regex::new(r"[a-zA-Z]").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{} is required", .0.label())]
    Required(FormField),
    #[error("Flight number must have at least 2 letters followed by 1-4 numbers (e.g., GA102)")]
    FlightNumberFormat,
    #[error("Only numerical characters are allowed for the date")]
    DateNotNumeric,
    #[error("Date must be in DD-MM-YY format")]
    DateFormat,
    #[error("Please enter a valid date")]
    DateOutOfRange,
    #[error("Please select an aircraft type")]
    AircraftNotSelected,
}

/// Per-field error map. A field present here is invalid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<FormField, ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: FormField, error: ValidationError) {
        self.errors.insert(field, error);
    }

    pub fn remove(&mut self, field: FormField) -> Option<ValidationError> {
        self.errors.remove(&field)
    }

    pub fn get(&self, field: FormField) -> Option<&ValidationError> {
        self.errors.get(&field)
    }

    pub fn message(&self, field: FormField) -> Option<String> {
        self.get(field).map(ToString::to_string)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &ValidationError)> {
        self.errors.iter().map(|(field, error)| (*field, error))
    }
}

fn required(value: &str, field: FormField) -> Result<&str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(trimmed)
    }
}

pub fn validate_crew_name(value: &str) -> Result<String, ValidationError> {
    required(value, FormField::CrewName).map(str::to_string)
}

pub fn validate_crew_id(value: &str) -> Result<String, ValidationError> {
    required(value, FormField::CrewId).map(str::to_string)
}

/// Accepts two or more uppercase letters followed by 1-4 digits (IATA style, e.g. GA102).
pub fn validate_flight_number(value: &str) -> Result<String, ValidationError> {
    let trimmed = required(value, FormField::FlightNumber)?;
    if !FLIGHT_NUMBER_RE.is_match(trimmed) {
        return Err(ValidationError::FlightNumberFormat);
    }
    Ok(trimmed.to_uppercase())
}

/// Accepts `DD-MM-YY` with day 1-31 and month 1-12.
///
/// Day is not checked against the month's length: `31-02-25` is accepted.
pub fn validate_flight_date(value: &str) -> Result<FlightDate, ValidationError> {
    let trimmed = required(value, FormField::FlightDate)?;
    if ALPHA_RE.is_match(trimmed) {
        return Err(ValidationError::DateNotNumeric);
    }

    let captures = DATE_RE
        .captures(trimmed)
        .ok_or(ValidationError::DateFormat)?;
    let group = |index: usize| -> Result<u32, ValidationError> {
        captures[index]
            .parse()
            .map_err(|_| ValidationError::DateFormat)
    };
    let (day, month, year) = (group(1)?, group(2)?, group(3)?);

    if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
        return Err(ValidationError::DateOutOfRange);
    }

    Ok(FlightDate { day, month, year })
}

/// Parse the aircraft selector's label. The empty placeholder is rejected too.
pub fn parse_aircraft(value: &str) -> Result<AircraftType, ValidationError> {
    value
        .parse()
        .map_err(|_| ValidationError::AircraftNotSelected)
}

/// Field-local check used after each keystroke.
pub fn validate_field(field: FormField, input: &FormInput) -> Result<(), ValidationError> {
    match field {
        FormField::CrewName => validate_crew_name(&input.crew_name).map(drop),
        FormField::CrewId => validate_crew_id(&input.crew_id).map(drop),
        FormField::FlightNumber => validate_flight_number(&input.flight_number).map(drop),
        FormField::FlightDate => validate_flight_date(&input.flight_date).map(drop),
        // The typed selector can only hold a known aircraft.
        FormField::Aircraft => Ok(()),
    }
}

/// Validate every field and collect one error per invalid field.
pub fn validate_form(input: &FormInput) -> Result<VoucherRecord, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let crew_name = validate_crew_name(&input.crew_name)
        .map_err(|e| errors.insert(FormField::CrewName, e))
        .ok();
    let crew_id = validate_crew_id(&input.crew_id)
        .map_err(|e| errors.insert(FormField::CrewId, e))
        .ok();
    let flight_number = validate_flight_number(&input.flight_number)
        .map_err(|e| errors.insert(FormField::FlightNumber, e))
        .ok();
    let flight_date = validate_flight_date(&input.flight_date)
        .map_err(|e| errors.insert(FormField::FlightDate, e))
        .ok();

    match (crew_name, crew_id, flight_number, flight_date) {
        (Some(crew_name), Some(crew_id), Some(flight_number), Some(flight_date)) => {
            Ok(VoucherRecord {
                crew_name,
                crew_id,
                flight_number,
                flight_date,
                aircraft: input.aircraft,
            })
        }
        _ => Err(errors),
    }
}
