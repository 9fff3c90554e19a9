//! Debounced existing-voucher lookup.
//!
//! Each change of the flight/date pair replaces the pending lookup: the old
//! task is aborted and a new one sleeps through the quiet period before asking
//! the server. Only the generation that is still current when the response
//! arrives, and only while the form still shows the same pair, may touch the
//! store.

use log::{debug, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use super::model::{FlightKey, Seats};
use super::store::FormStore;
use crate::api::{GetVoucherRequest, VoucherApi};

struct PendingLookup {
    key: FlightKey,
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct LookupSlot {
    generation: u64,
    pending: Option<PendingLookup>,
}

pub struct LookupCoordinator {
    store: Arc<FormStore>,
    api: Arc<dyn VoucherApi>,
    quiet_period: Duration,
    slot: Arc<Mutex<LookupSlot>>,
}

impl LookupCoordinator {
    pub fn new(store: Arc<FormStore>, api: Arc<dyn VoucherApi>, quiet_period: Duration) -> Self {
        Self {
            store,
            api,
            quiet_period,
            slot: Arc::new(Mutex::new(LookupSlot::default())),
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Key of the lookup currently waiting or in flight.
    pub fn pending_key(&self) -> Option<FlightKey> {
        self.slot.lock().pending.as_ref().map(|p| p.key.clone())
    }

    /// React to a change of the flight/date pair.
    ///
    /// `None` means the pair is incomplete; the snapshot is cleared right away
    /// and nothing is scheduled.
    pub fn schedule(&self, key: Option<FlightKey>) {
        let mut slot = self.slot.lock();
        slot.generation += 1;
        if let Some(previous) = slot.pending.take() {
            debug!("Cancelling pending voucher lookup for {}", previous.key);
            previous.handle.abort();
        }

        let Some(key) = key else {
            self.store.clear_voucher();
            return;
        };

        self.store.invalidate_voucher_unless(&key);

        let generation = slot.generation;
        let handle = tokio::spawn(run_lookup(
            self.store.clone(),
            self.api.clone(),
            self.slot.clone(),
            key.clone(),
            generation,
            self.quiet_period,
        ));
        slot.pending = Some(PendingLookup {
            key,
            generation,
            handle,
        });
    }

    /// Discard the pending lookup for `key` after newer seats for it were stored.
    ///
    /// A lookup for another pair is left running.
    pub fn supersede(&self, key: &FlightKey) {
        let mut slot = self.slot.lock();
        if slot.pending.as_ref().map(|p| &p.key) != Some(key) {
            return;
        }
        slot.generation += 1;
        if let Some(previous) = slot.pending.take() {
            debug!("Voucher for {} updated locally, dropping pending lookup", previous.key);
            previous.handle.abort();
        }
    }

    /// Drop any scheduled lookup without touching the store.
    pub fn cancel(&self) {
        let mut slot = self.slot.lock();
        slot.generation += 1;
        if let Some(previous) = slot.pending.take() {
            previous.handle.abort();
        }
    }
}

impl Drop for LookupCoordinator {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run_lookup(
    store: Arc<FormStore>,
    api: Arc<dyn VoucherApi>,
    slot: Arc<Mutex<LookupSlot>>,
    key: FlightKey,
    generation: u64,
    quiet_period: Duration,
) {
    tokio::time::sleep(quiet_period).await;

    debug!("Looking up existing voucher for {}", key);
    let request = GetVoucherRequest {
        flight_number: key.flight_number.clone(),
        date: key.date.clone(),
    };

    // Failures mean "not created yet": they must never block a submission.
    let seats = match api.get_voucher(&request).await {
        Ok(response) if response.exists => match response.voucher {
            Some(voucher) => match Seats::try_from(voucher.seats()) {
                Ok(seats) => Some(seats),
                Err(e) => {
                    warn!("Ignoring voucher for {}: {}", key, e);
                    None
                }
            },
            None => {
                warn!("Server reported a voucher for {} without its seats", key);
                None
            }
        },
        Ok(_) => None,
        Err(e) => {
            warn!("Voucher lookup for {} failed, assuming none exists: {}", key, e);
            None
        }
    };

    let mut slot = slot.lock();
    if slot.generation != generation {
        debug!("Discarding superseded voucher lookup for {}", key);
        return;
    }
    slot.pending = None;

    if store.apply_lookup(&key, seats) {
        debug!("Voucher lookup for {} applied", key);
    } else {
        debug!("Discarding stale voucher lookup for {}", key);
    }
}
