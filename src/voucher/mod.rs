//! Voucher form engine.
//!
//! - `model` - form fields, aircraft types, seats and snapshots
//! - `format` - keystroke formatters and date conversion
//! - `validation` - field and whole-form validation
//! - `store` - the form state store
//! - `lookup` - debounced existing-voucher lookup
//! - `submission` / `regeneration` - the two user actions
//! - `session` - `VoucherForm`, wiring all of the above

pub mod format;
pub mod lookup;
pub mod model;
pub mod regeneration;
pub mod session;
pub mod store;
pub mod submission;
pub mod validation;


pub use lookup::LookupCoordinator;
pub use model::{
    AircraftType, FlightDate, FlightKey, FormField, FormInput, Message, SeatPosition, Seats,
    VoucherRecord, VoucherSnapshot,
};
pub use regeneration::{RegenerateOutcome, RegenerationController};
pub use session::VoucherForm;
pub use store::{FormState, FormStore, LoadingFlag, LoadingGuard};
pub use submission::{SubmissionController, SubmitOutcome};
pub use validation::{validate_form, ValidationError, ValidationErrors};
