//! Domain layer: strong types with validation and invariants (no I/O).

mod phone;
mod request;
mod response;
mod validation;
mod value;

pub use phone::{CanonicalPhone, MobileNumber, NumberPattern, PhoneForm};
pub use request::{MessageVariants, SendOptions, Variant};
pub use response::{
    AttemptOutcome, DispatchAttempt, DispatchErrorKind, DispatchResult, GatewayResponse,
};
pub use validation::ValidationError;
pub use value::{
    ApiId, ApiPassword, GatewayOutcome, KnownStatusCode, MessageText, SmsId, StatusCode,
    UnixTimestamp,
};
