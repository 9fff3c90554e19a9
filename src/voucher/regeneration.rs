use log::{debug, error, info, warn};
use std::sync::Arc;

use super::model::{SeatPosition, Seats};
use super::store::{FormStore, LoadingFlag};
use crate::api::{RegenerateSeatRequest, VoucherApi};

pub const REGENERATE_FAILED: &str = "Failed to regenerate seat. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegenerateOutcome {
    Regenerated {
        position: SeatPosition,
        new_seat: String,
    },
    /// No existing voucher to regenerate from.
    NoVoucher,
    Failed,
    Busy,
}

pub fn regenerated_message(position: SeatPosition, new_seat: &str) -> String {
    format!("Seat {} regenerated successfully. New seat: {}", position, new_seat)
}

/// Replaces one seat of an existing voucher.
pub struct RegenerationController {
    store: Arc<FormStore>,
    api: Arc<dyn VoucherApi>,
}

impl RegenerationController {
    pub fn new(store: Arc<FormStore>, api: Arc<dyn VoucherApi>) -> Self {
        Self { store, api }
    }

    pub async fn regenerate(&self, position: SeatPosition) -> RegenerateOutcome {
        let state = self.store.state();
        if state.is_regenerating {
            return RegenerateOutcome::Busy;
        }
        // The snapshot, not the live input, names the voucher to change.
        let Some(snapshot) = state.snapshot else {
            return RegenerateOutcome::NoVoucher;
        };

        self.store.clear_messages();
        let Some(_loading) = self.store.begin(LoadingFlag::Regenerating) else {
            return RegenerateOutcome::Busy;
        };

        let request = RegenerateSeatRequest {
            flight_number: snapshot.key.flight_number.clone(),
            date: snapshot.key.date.clone(),
            seat_position: position,
        };
        let response = match self.api.regenerate_seat(&request).await {
            Ok(response) => response,
            Err(e) => {
                error!("Error regenerating seat {} for {}: {}", position, snapshot.key, e);
                self.store.set_error_message(REGENERATE_FAILED);
                return RegenerateOutcome::Failed;
            }
        };

        if !response.success {
            warn!("Server reported failure regenerating seat {} for {}", position, snapshot.key);
            self.store.set_error_message(REGENERATE_FAILED);
            return RegenerateOutcome::Failed;
        }

        let seats = match Seats::try_from(response.all_seats) {
            Ok(seats) => seats,
            Err(e) => {
                warn!("Unusable seats after regenerating {}: {}", snapshot.key, e);
                self.store.set_error_message(REGENERATE_FAILED);
                return RegenerateOutcome::Failed;
            }
        };

        info!(
            "Seat {} for {} regenerated: {} -> {}",
            position,
            snapshot.key,
            snapshot.seats.get(position),
            response.new_seat
        );
        if !self.store.replace_seats(&snapshot.key, seats) {
            debug!("Form moved away from {}, seats not displayed", snapshot.key);
        }
        self.store
            .set_success_message(regenerated_message(position, &response.new_seat));
        RegenerateOutcome::Regenerated {
            position,
            new_seat: response.new_seat,
        }
    }
}
