//! Applicant SMS dispatch pipeline.
//!
//! Takes a scraped phone candidate and two interchangeable message texts, normalizes the number
//! into the gateway's domestic format, picks a text (alternating on rapid repeats to the same
//! number), posts it to the SMS gateway and, when the gateway rejects the number with 560,
//! retries exactly once in `81` form. Every path ends in a [`DispatchResult`].
//!
//! The crate is layered the usual way: a domain layer of strong types, a transport layer for
//! the gateway's form quirks, a client layer making single HTTP calls, and a dispatch layer
//! composing them.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use smsdispatch::{
//!     Credentials, DispatchCoordinator, GatewayClient, MessageText, MessageVariants,
//!     SendDedupCache,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = Credentials::from_env()?;
//!     let client = GatewayClient::new(credentials)?;
//!     let coordinator = DispatchCoordinator::new(client, Arc::new(SendDedupCache::default()));
//!     let variants = MessageVariants::new(
//!         MessageText::new("Thanks for applying!")?,
//!         MessageText::new("Thank you for your application!")?,
//!     );
//!     let result = coordinator.dispatch("+81 90 1234 5678", &variants, false).await;
//!     println!("sent: {}", result.success);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod dispatch;
pub mod domain;
mod transport;

#[cfg(test)]
mod testing;

pub use client::{Credentials, GatewayClient, GatewayClientBuilder, GatewayError};
pub use config::{ConfigError, DispatchSettings};
pub use dispatch::{
    BatchReport, Clock, DispatchCoordinator, DispatchItem, RetryDecision, RetryPolicy,
    SendCacheEntry, SendDedupCache, SystemClock,
};
pub use domain::{
    AttemptOutcome, CanonicalPhone, DispatchAttempt, DispatchErrorKind, DispatchResult,
    GatewayOutcome, GatewayResponse, KnownStatusCode, MessageText, MessageVariants, MobileNumber,
    NumberPattern, PhoneForm, SendOptions, SmsId, StatusCode, UnixTimestamp, ValidationError,
    Variant,
};
