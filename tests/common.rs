//! Shared test helpers: an in-memory voucher server behind `VoucherApi`.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crew_voucher_form::api::{
    ApiError, CheckVoucherRequest, CheckVoucherResponse, GenerateVoucherRequest,
    GenerateVoucherResponse, GetVoucherRequest, GetVoucherResponse, RegenerateSeatRequest,
    RegenerateSeatResponse, Voucher, VoucherApi,
};
use crew_voucher_form::voucher::{FormField, VoucherForm};
use parking_lot::Mutex;

pub const DEBOUNCE: Duration = Duration::from_millis(500);
/// Long enough for a debounced lookup (and an undelayed response) to land.
pub const SETTLE: Duration = Duration::from_millis(600);

/// Error the mock should answer with instead of a response.
#[derive(Debug, Clone)]
pub struct Failure {
    pub status: u16,
    pub message: String,
}

impl Failure {
    pub fn server_error() -> Self {
        Self {
            status: 500,
            message: "database is locked".to_string(),
        }
    }

    pub fn conflict() -> Self {
        Self {
            status: 409,
            message: "voucher already exists".to_string(),
        }
    }

    fn into_error(self) -> ApiError {
        if self.status == 409 {
            ApiError::Conflict(self.message)
        } else {
            ApiError::Status {
                status: self.status,
                message: self.message,
            }
        }
    }
}

pub fn seats(codes: &[&str]) -> Vec<String> {
    codes.iter().map(|code| code.to_string()).collect()
}

/// Mock voucher server that records every request it receives. Successful
/// generations are stored, so later lookups and checks find them.
pub struct MockVoucherApi {
    vouchers: Mutex<HashMap<(String, String), Vec<String>>>,
    check_override: Mutex<Option<Result<bool, Failure>>>,
    generate_reply: Mutex<Result<GenerateVoucherResponse, Failure>>,
    regenerate_reply: Mutex<Result<RegenerateSeatResponse, Failure>>,
    lookup_failure: Mutex<Option<Failure>>,
    lookup_delay: Mutex<Duration>,
    pub checks: Mutex<Vec<CheckVoucherRequest>>,
    pub generates: Mutex<Vec<GenerateVoucherRequest>>,
    pub lookups: Mutex<Vec<GetVoucherRequest>>,
    pub regenerations: Mutex<Vec<RegenerateSeatRequest>>,
}

impl MockVoucherApi {
    pub fn new() -> Self {
        Self {
            vouchers: Mutex::new(HashMap::new()),
            check_override: Mutex::new(None),
            generate_reply: Mutex::new(Ok(GenerateVoucherResponse {
                success: true,
                seats: seats(&["3B", "7C", "14D"]),
            })),
            regenerate_reply: Mutex::new(Err(Failure::server_error())),
            lookup_failure: Mutex::new(None),
            lookup_delay: Mutex::new(Duration::ZERO),
            checks: Mutex::new(Vec::new()),
            generates: Mutex::new(Vec::new()),
            lookups: Mutex::new(Vec::new()),
            regenerations: Mutex::new(Vec::new()),
        }
    }

    pub fn with_voucher(self, flight_number: &str, date: &str, codes: &[&str]) -> Self {
        self.vouchers
            .lock()
            .insert((flight_number.to_string(), date.to_string()), seats(codes));
        self
    }

    pub fn set_check(&self, result: Result<bool, Failure>) {
        *self.check_override.lock() = Some(result);
    }

    pub fn set_generate(&self, result: Result<GenerateVoucherResponse, Failure>) {
        *self.generate_reply.lock() = result;
    }

    pub fn set_regenerate(&self, result: Result<RegenerateSeatResponse, Failure>) {
        *self.regenerate_reply.lock() = result;
    }

    pub fn fail_lookups(&self, failure: Failure) {
        *self.lookup_failure.lock() = Some(failure);
    }

    pub fn set_lookup_delay(&self, delay: Duration) {
        *self.lookup_delay.lock() = delay;
    }

    pub fn lookup_keys(&self) -> Vec<(String, String)> {
        self.lookups
            .lock()
            .iter()
            .map(|r| (r.flight_number.clone(), r.date.clone()))
            .collect()
    }

    pub fn check_count(&self) -> usize {
        self.checks.lock().len()
    }

    pub fn generate_count(&self) -> usize {
        self.generates.lock().len()
    }

    pub fn regenerate_count(&self) -> usize {
        self.regenerations.lock().len()
    }
}

#[async_trait::async_trait]
impl VoucherApi for MockVoucherApi {
    async fn check_existence(
        &self,
        request: &CheckVoucherRequest,
    ) -> Result<CheckVoucherResponse, ApiError> {
        self.checks.lock().push(request.clone());
        let result = match self.check_override.lock().clone() {
            Some(result) => result,
            None => Ok(self
                .vouchers
                .lock()
                .contains_key(&(request.flight_number.clone(), request.date.clone()))),
        };
        result
            .map(|exists| CheckVoucherResponse { exists })
            .map_err(Failure::into_error)
    }

    async fn generate(
        &self,
        request: &GenerateVoucherRequest,
    ) -> Result<GenerateVoucherResponse, ApiError> {
        self.generates.lock().push(request.clone());
        let reply = self.generate_reply.lock().clone();
        if let Ok(response) = &reply {
            if response.success && response.seats.len() == 3 {
                self.vouchers.lock().insert(
                    (request.flight_number.clone(), request.date.clone()),
                    response.seats.clone(),
                );
            }
        }
        reply.map_err(Failure::into_error)
    }

    async fn get_voucher(
        &self,
        request: &GetVoucherRequest,
    ) -> Result<GetVoucherResponse, ApiError> {
        self.lookups.lock().push(request.clone());

        // The answer reflects the stored vouchers when the request arrived.
        let found = self
            .vouchers
            .lock()
            .get(&(request.flight_number.clone(), request.date.clone()))
            .cloned();

        let delay = *self.lookup_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Some(failure) = self.lookup_failure.lock().clone() {
            return Err(failure.into_error());
        }

        Ok(match found {
            Some(codes) => GetVoucherResponse {
                exists: true,
                voucher: Some(Voucher {
                    id: 1,
                    crew_name: "Jane Roe".to_string(),
                    crew_id: "98765".to_string(),
                    flight_number: request.flight_number.clone(),
                    flight_date: request.date.clone(),
                    aircraft_type: "ATR".to_string(),
                    seat1: codes[0].clone(),
                    seat2: codes[1].clone(),
                    seat3: codes[2].clone(),
                    created_at: "2025-07-01 08:00:00".to_string(),
                }),
            },
            None => GetVoucherResponse {
                exists: false,
                voucher: None,
            },
        })
    }

    async fn regenerate_seat(
        &self,
        request: &RegenerateSeatRequest,
    ) -> Result<RegenerateSeatResponse, ApiError> {
        self.regenerations.lock().push(request.clone());
        self.regenerate_reply
            .lock()
            .clone()
            .map_err(Failure::into_error)
    }
}

pub fn form_with(api: &Arc<MockVoucherApi>) -> VoucherForm {
    VoucherForm::new(api.clone(), DEBOUNCE)
}

/// Type the flight fields of the reference request (GA102 on 09-07-25).
pub fn fill_flight(form: &VoucherForm) {
    form.edit_field(FormField::FlightNumber, "GA102");
    form.edit_field(FormField::FlightDate, "09-07-25");
}

/// Fill every field with the reference request.
pub fn fill_valid_form(form: &VoucherForm) {
    form.edit_field(FormField::CrewName, "John Doe");
    form.edit_field(FormField::CrewId, "12345");
    fill_flight(form);
    form.edit_field(FormField::Aircraft, "Airbus 320");
}
