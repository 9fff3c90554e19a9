use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AircraftType {
    #[default]
    #[serde(rename = "ATR")]
    Atr,
    #[serde(rename = "Airbus 320")]
    Airbus320,
    #[serde(rename = "Boeing 737 Max")]
    Boeing737Max,
}

impl AircraftType {
    pub const ALL: [AircraftType; 3] = [
        AircraftType::Atr,
        AircraftType::Airbus320,
        AircraftType::Boeing737Max,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AircraftType::Atr => "ATR",
            AircraftType::Airbus320 => "Airbus 320",
            AircraftType::Boeing737Max => "Boeing 737 Max",
        }
    }
}

impl fmt::Display for AircraftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown aircraft type: {0:?}")]
pub struct UnknownAircraft(pub String);

impl FromStr for AircraftType {
    type Err = UnknownAircraft;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AircraftType::ALL
            .into_iter()
            .find(|aircraft| aircraft.label() == s)
            .ok_or_else(|| UnknownAircraft(s.to_string()))
    }
}

/// The five inputs of the voucher form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    CrewName,
    CrewId,
    FlightNumber,
    FlightDate,
    Aircraft,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::CrewName,
        FormField::CrewId,
        FormField::FlightNumber,
        FormField::FlightDate,
        FormField::Aircraft,
    ];

    /// Key used when errors are reported per field.
    pub fn key(&self) -> &'static str {
        match self {
            FormField::CrewName => "crewName",
            FormField::CrewId => "crewId",
            FormField::FlightNumber => "flightNumber",
            FormField::FlightDate => "flightDate",
            FormField::Aircraft => "aircraft",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::CrewName => "Crew name",
            FormField::CrewId => "Crew ID",
            FormField::FlightNumber => "Flight number",
            FormField::FlightDate => "Flight date",
            FormField::Aircraft => "Aircraft type",
        }
    }

    /// Fields whose change invalidates the current voucher snapshot.
    pub fn is_flight_key(&self) -> bool {
        matches!(self, FormField::FlightNumber | FormField::FlightDate)
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Raw form contents as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    pub crew_name: String,
    pub crew_id: String,
    pub flight_number: String,
    pub flight_date: String,
    pub aircraft: AircraftType,
}

impl FormInput {
    /// Raw text of a text field. `None` for the aircraft selector.
    pub fn text(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::CrewName => Some(&self.crew_name),
            FormField::CrewId => Some(&self.crew_id),
            FormField::FlightNumber => Some(&self.flight_number),
            FormField::FlightDate => Some(&self.flight_date),
            FormField::Aircraft => None,
        }
    }

    pub(crate) fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::CrewName => Some(&mut self.crew_name),
            FormField::CrewId => Some(&mut self.crew_id),
            FormField::FlightNumber => Some(&mut self.flight_number),
            FormField::FlightDate => Some(&mut self.flight_date),
            FormField::Aircraft => None,
        }
    }

    /// Normalized flight/date pair, present only when both fields are valid.
    pub fn flight_key(&self) -> Option<FlightKey> {
        let flight_number = super::validation::validate_flight_number(&self.flight_number).ok()?;
        let date = super::validation::validate_flight_date(&self.flight_date).ok()?;
        Some(FlightKey::new(flight_number, date.canonical()))
    }
}

/// A flight date entered as DD-MM-YY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlightDate {
    pub day: u32,
    pub month: u32,
    pub year: u32,
}

impl FlightDate {
    /// YYYY-MM-DD, with two-digit years read as 20YY.
    pub fn canonical(&self) -> String {
        format!("{:04}-{:02}-{:02}", 2000 + self.year, self.month, self.day)
    }
}

impl fmt::Display for FlightDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}-{:02}", self.day, self.month, self.year)
    }
}

/// Identifies a voucher on the server: flight number plus canonical date.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlightKey {
    pub flight_number: String,
    pub date: String,
}

impl FlightKey {
    pub fn new(flight_number: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            flight_number: flight_number.into(),
            date: date.into(),
        }
    }
}

impl fmt::Display for FlightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.flight_number, self.date)
    }
}

/// The three seat codes of a voucher, in server order.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Seats([String; 3]);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected 3 seats, got {0}")]
pub struct SeatCountError(pub usize);

impl Seats {
    pub fn get(&self, position: SeatPosition) -> &str {
        &self.0[position.index()]
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.to_vec()
    }
}

impl TryFrom<Vec<String>> for Seats {
    type Error = SeatCountError;

    fn try_from(seats: Vec<String>) -> Result<Self, Self::Error> {
        let count = seats.len();
        <[String; 3]>::try_from(seats)
            .map(Seats)
            .map_err(|_| SeatCountError(count))
    }
}

impl fmt::Display for Seats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

/// One of the three independently regenerable seat slots.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(into = "u8", try_from = "u8")]
pub enum SeatPosition {
    First,
    Second,
    Third,
}

impl SeatPosition {
    pub fn number(&self) -> u8 {
        match self {
            SeatPosition::First => 1,
            SeatPosition::Second => 2,
            SeatPosition::Third => 3,
        }
    }

    fn index(&self) -> usize {
        usize::from(self.number() - 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid seat position: {0} (must be 1, 2, or 3)")]
pub struct InvalidSeatPosition(pub u8);

impl TryFrom<u8> for SeatPosition {
    type Error = InvalidSeatPosition;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SeatPosition::First),
            2 => Ok(SeatPosition::Second),
            3 => Ok(SeatPosition::Third),
            other => Err(InvalidSeatPosition(other)),
        }
    }
}

impl From<SeatPosition> for u8 {
    fn from(position: SeatPosition) -> Self {
        position.number()
    }
}

impl fmt::Display for SeatPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Last known server truth for a flight/date pair. Only existing vouchers are
/// represented; "no voucher" is the absence of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoucherSnapshot {
    pub key: FlightKey,
    pub seats: Seats,
}

/// User-facing banner. Error and success are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Error(String),
    Success(String),
}

/// Whole-form validation result, ready to be sent to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoucherRecord {
    pub crew_name: String,
    pub crew_id: String,
    pub flight_number: String,
    pub flight_date: FlightDate,
    pub aircraft: AircraftType,
}

impl VoucherRecord {
    pub fn flight_key(&self) -> FlightKey {
        FlightKey::new(self.flight_number.clone(), self.flight_date.canonical())
    }
}
