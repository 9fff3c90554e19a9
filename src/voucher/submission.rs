use log::{error, info, warn};
use std::sync::Arc;

use super::model::{Seats, VoucherSnapshot};
use super::store::{FormStore, LoadingFlag};
use super::validation::{validate_form, ValidationErrors};
use crate::api::{ApiError, CheckVoucherRequest, GenerateVoucherRequest, VoucherApi};

pub const ALREADY_GENERATED_USE_REGENERATE: &str =
    "Vouchers have already been generated for this flight on the selected date. Use regenerate to replace a seat.";
pub const ALREADY_GENERATED: &str =
    "Vouchers have already been generated for this flight on the selected date.";
pub const GENERATED: &str = "Vouchers generated successfully!";
pub const GENERATE_FAILED: &str = "Failed to generate vouchers. Please try again.";
pub const REQUEST_ERROR: &str =
    "An error occurred while processing your request. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Generated(Seats),
    /// A voucher already exists for the flight and date; nothing was created.
    AlreadyGenerated,
    /// Whole-form validation failed; errors are in the store.
    Invalid,
    Failed,
    /// A submission is already in flight.
    Busy,
}

/// Decides between creating a voucher and refusing, then calls `generate`.
pub struct SubmissionController {
    store: Arc<FormStore>,
    api: Arc<dyn VoucherApi>,
}

impl SubmissionController {
    pub fn new(store: Arc<FormStore>, api: Arc<dyn VoucherApi>) -> Self {
        Self { store, api }
    }

    pub async fn submit(&self) -> SubmitOutcome {
        if self.store.state().is_submitting {
            return SubmitOutcome::Busy;
        }

        self.store.clear_messages();

        // Always decide from the freshest state, a lookup may have landed meanwhile.
        let state = self.store.state();
        if state.existing_voucher().is_some() {
            self.store.set_error_message(ALREADY_GENERATED_USE_REGENERATE);
            return SubmitOutcome::AlreadyGenerated;
        }

        let record = match validate_form(&state.input) {
            Ok(record) => {
                self.store.replace_errors(ValidationErrors::new());
                record
            }
            Err(errors) => {
                self.store.replace_errors(errors);
                return SubmitOutcome::Invalid;
            }
        };

        let Some(_loading) = self.store.begin(LoadingFlag::Submitting) else {
            return SubmitOutcome::Busy;
        };

        let key = record.flight_key();
        let check = CheckVoucherRequest {
            flight_number: key.flight_number.clone(),
            date: key.date.clone(),
        };
        match self.api.check_existence(&check).await {
            Ok(response) if response.exists => {
                info!("Voucher for {} was created before submission", key);
                self.store.set_error_message(ALREADY_GENERATED);
                return SubmitOutcome::AlreadyGenerated;
            }
            Ok(_) => {}
            Err(e) => return self.transport_failure("checking voucher existence", e),
        }

        let request = GenerateVoucherRequest {
            name: record.crew_name.clone(),
            id: record.crew_id.clone(),
            flight_number: key.flight_number.clone(),
            date: key.date.clone(),
            aircraft: record.aircraft,
        };
        let response = match self.api.generate(&request).await {
            Ok(response) => response,
            Err(ApiError::Conflict(message)) => {
                info!("Server refused to generate vouchers for {}: {}", key, message);
                self.store.set_error_message(ALREADY_GENERATED);
                return SubmitOutcome::AlreadyGenerated;
            }
            Err(e) => return self.transport_failure("generating vouchers", e),
        };

        if !response.success {
            warn!("Server reported failure generating vouchers for {}", key);
            self.store.set_error_message(GENERATE_FAILED);
            return SubmitOutcome::Failed;
        }

        let seats = match Seats::try_from(response.seats) {
            Ok(seats) => seats,
            Err(e) => {
                warn!("Unusable seats for {}: {}", key, e);
                self.store.set_error_message(GENERATE_FAILED);
                return SubmitOutcome::Failed;
            }
        };

        info!("Generated vouchers for {}: {}", key, seats);
        self.store.publish_voucher(VoucherSnapshot {
            key,
            seats: seats.clone(),
        });
        self.store.set_success_message(GENERATED);
        SubmitOutcome::Generated(seats)
    }

    fn transport_failure(&self, action: &str, e: ApiError) -> SubmitOutcome {
        error!("Error {}: {}", action, e);
        self.store.set_error_message(REQUEST_ERROR);
        SubmitOutcome::Failed
    }
}
