use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use super::format::{format_date, format_flight_number};
use super::lookup::LookupCoordinator;
use super::model::{FormField, SeatPosition};
use super::regeneration::{RegenerateOutcome, RegenerationController};
use super::store::{FormState, FormStore};
use super::submission::{SubmissionController, SubmitOutcome};
use super::validation::{parse_aircraft, validate_field};
use crate::api::VoucherApi;

/// The voucher form: one store plus the components that read and mutate it.
///
/// Must be used from within a tokio runtime; edits to the flight fields spawn
/// the debounced lookup task.
pub struct VoucherForm {
    store: Arc<FormStore>,
    lookup: LookupCoordinator,
    submission: SubmissionController,
    regeneration: RegenerationController,
}

impl VoucherForm {
    pub fn new(api: Arc<dyn VoucherApi>, lookup_debounce: Duration) -> Self {
        let store = Arc::new(FormStore::new());
        Self {
            lookup: LookupCoordinator::new(store.clone(), api.clone(), lookup_debounce),
            submission: SubmissionController::new(store.clone(), api.clone()),
            regeneration: RegenerationController::new(store.clone(), api),
            store,
        }
    }

    pub fn store(&self) -> &Arc<FormStore> {
        &self.store
    }

    pub fn state(&self) -> FormState {
        self.store.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.store.subscribe()
    }

    pub fn updates(&self) -> WatchStream<FormState> {
        self.store.updates()
    }

    pub fn lookup(&self) -> &LookupCoordinator {
        &self.lookup
    }

    /// Apply a keystroke (or a selection, for the aircraft field).
    pub fn edit_field(&self, field: FormField, raw: &str) {
        let value = match field {
            FormField::Aircraft => {
                self.store.record_aircraft(parse_aircraft(raw));
                return;
            }
            FormField::FlightDate => format_date(raw),
            FormField::FlightNumber => format_flight_number(raw),
            FormField::CrewName | FormField::CrewId => raw.to_string(),
        };

        let mut input = self.store.input();
        if let Some(slot) = input.text_mut(field) {
            *slot = value.clone();
        }
        let check = validate_field(field, &input);

        let changed = self.store.record_edit(field, value, check);
        if changed && field.is_flight_key() {
            self.lookup.schedule(self.store.flight_key());
        }
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let outcome = self.submission.submit().await;
        if matches!(outcome, SubmitOutcome::Generated(_)) {
            self.supersede_lookup();
        }
        outcome
    }

    pub async fn regenerate_seat(&self, position: SeatPosition) -> RegenerateOutcome {
        let outcome = self.regeneration.regenerate(position).await;
        if matches!(outcome, RegenerateOutcome::Regenerated { .. }) {
            self.supersede_lookup();
        }
        outcome
    }

    /// A lookup sent before the controller's write would answer with older seats.
    fn supersede_lookup(&self) {
        if let Some(snapshot) = self.store.state().snapshot {
            self.lookup.supersede(&snapshot.key);
        }
    }

    /// Return every field and flag to its default and drop any pending lookup.
    pub fn reset(&self) {
        self.lookup.cancel();
        self.store.reset();
    }
}
