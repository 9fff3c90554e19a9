//! Single source of truth for the voucher form.
//!
//! All state lives in a [`FormState`] published through a `tokio::sync::watch`
//! channel. Components never hold their own copy; they go through the named
//! mutation methods on [`FormStore`], and every mutation notifies subscribers.

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use super::model::{
    AircraftType, FlightKey, FormField, FormInput, Message, Seats, VoucherSnapshot,
};
use super::validation::{ValidationError, ValidationErrors};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub input: FormInput,
    pub errors: ValidationErrors,
    pub snapshot: Option<VoucherSnapshot>,
    /// Seats currently displayed. Mirrors `snapshot` but may be empty while a lookup is pending.
    pub seats: Vec<String>,
    pub is_submitting: bool,
    pub is_regenerating: bool,
    pub message: Option<Message>,
}

impl FormState {
    pub fn error_message(&self) -> Option<&str> {
        match &self.message {
            Some(Message::Error(text)) => Some(text),
            _ => None,
        }
    }

    pub fn success_message(&self) -> Option<&str> {
        match &self.message {
            Some(Message::Success(text)) => Some(text),
            _ => None,
        }
    }

    /// Snapshot for the pair currently in the form, if the server has one.
    pub fn existing_voucher(&self) -> Option<&VoucherSnapshot> {
        let key = self.input.flight_key()?;
        self.snapshot.as_ref().filter(|snapshot| snapshot.key == key)
    }

    fn flag_mut(&mut self, flag: LoadingFlag) -> &mut bool {
        match flag {
            LoadingFlag::Submitting => &mut self.is_submitting,
            LoadingFlag::Regenerating => &mut self.is_regenerating,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingFlag {
    Submitting,
    Regenerating,
}

pub struct FormStore {
    state: watch::Sender<FormState>,
}

impl Default for FormStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FormStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(FormState::default());
        Self { state }
    }

    /// Copy of the current state.
    pub fn state(&self) -> FormState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.state.subscribe()
    }

    pub fn updates(&self) -> WatchStream<FormState> {
        WatchStream::new(self.subscribe())
    }

    pub fn input(&self) -> FormInput {
        self.state.borrow().input.clone()
    }

    pub fn flight_key(&self) -> Option<FlightKey> {
        self.state.borrow().input.flight_key()
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut FormState) -> R) -> R {
        let mut result = None;
        self.state.send_modify(|state| result = Some(f(state)));
        match result {
            Some(value) => value,
            None => unreachable!("send_modify always runs its closure"),
        }
    }

    /// Store a text field's formatted value together with its field-local check.
    ///
    /// Returns whether the stored text actually changed.
    pub fn record_edit(
        &self,
        field: FormField,
        value: String,
        check: Result<(), ValidationError>,
    ) -> bool {
        self.mutate(|state| {
            let changed = match state.input.text_mut(field) {
                Some(slot) if *slot != value => {
                    *slot = value;
                    true
                }
                _ => false,
            };
            match check {
                Ok(()) => {
                    state.errors.remove(field);
                }
                Err(error) => state.errors.insert(field, error),
            }
            changed
        })
    }

    /// Apply an aircraft selection. An unknown selection only records the error.
    pub fn record_aircraft(&self, selection: Result<AircraftType, ValidationError>) {
        self.mutate(|state| match selection {
            Ok(aircraft) => {
                state.input.aircraft = aircraft;
                state.errors.remove(FormField::Aircraft);
            }
            Err(error) => state.errors.insert(FormField::Aircraft, error),
        })
    }

    pub fn replace_errors(&self, errors: ValidationErrors) {
        self.mutate(|state| state.errors = errors);
    }

    pub fn clear_messages(&self) {
        self.mutate(|state| state.message = None);
    }

    pub fn set_error_message(&self, text: impl Into<String>) {
        let text = text.into();
        self.mutate(|state| state.message = Some(Message::Error(text)));
    }

    pub fn set_success_message(&self, text: impl Into<String>) {
        let text = text.into();
        self.mutate(|state| state.message = Some(Message::Success(text)));
    }

    /// Publish a confirmed voucher and mirror its seats into the display list.
    pub fn publish_voucher(&self, snapshot: VoucherSnapshot) {
        self.mutate(|state| {
            state.seats = snapshot.seats.to_vec();
            state.snapshot = Some(snapshot);
        });
    }

    pub fn clear_voucher(&self) {
        self.mutate(|state| {
            state.snapshot = None;
            state.seats.clear();
        });
    }

    /// Clear the snapshot unless it already belongs to `key`.
    pub fn invalidate_voucher_unless(&self, key: &FlightKey) {
        self.mutate(|state| {
            if state.snapshot.as_ref().map(|s| &s.key) != Some(key) {
                state.snapshot = None;
                state.seats.clear();
            }
        });
    }

    /// Apply a lookup result if `key` is still the pair in the form.
    ///
    /// Returns `false` when the result was stale and discarded.
    pub fn apply_lookup(&self, key: &FlightKey, seats: Option<Seats>) -> bool {
        self.mutate(|state| {
            if state.input.flight_key().as_ref() != Some(key) {
                return false;
            }
            match seats {
                Some(seats) => {
                    state.seats = seats.to_vec();
                    state.snapshot = Some(VoucherSnapshot {
                        key: key.clone(),
                        seats,
                    });
                }
                None => {
                    state.snapshot = None;
                    state.seats.clear();
                }
            }
            true
        })
    }

    /// Replace the seats of the voucher for `key` with a server-provided triple.
    ///
    /// Returns `false` when the snapshot moved on to another pair meanwhile.
    pub fn replace_seats(&self, key: &FlightKey, seats: Seats) -> bool {
        self.mutate(|state| match state.snapshot.as_mut() {
            Some(snapshot) if snapshot.key == *key => {
                state.seats = seats.to_vec();
                snapshot.seats = seats;
                true
            }
            _ => false,
        })
    }

    /// Set a loading flag for the lifetime of the returned guard.
    ///
    /// Returns `None` if the flag is already set.
    pub fn begin(&self, flag: LoadingFlag) -> Option<LoadingGuard<'_>> {
        let acquired = self.mutate(|state| {
            let slot = state.flag_mut(flag);
            if *slot {
                false
            } else {
                *slot = true;
                true
            }
        });
        acquired.then_some(LoadingGuard { store: self, flag })
    }

    pub fn reset(&self) {
        self.mutate(|state| *state = FormState::default());
    }
}

/// Clears its loading flag when dropped, whichever way the action exits.
#[must_use]
pub struct LoadingGuard<'a> {
    store: &'a FormStore,
    flag: LoadingFlag,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let flag = self.flag;
        self.store.mutate(|state| *state.flag_mut(flag) = false);
    }
}
