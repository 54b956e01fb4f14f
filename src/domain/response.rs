use serde::Serialize;

use crate::domain::phone::{CanonicalPhone, MobileNumber};
use crate::domain::request::Variant;
use crate::domain::validation::ValidationError;
use crate::domain::value::{GatewayOutcome, StatusCode, UnixTimestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Raw gateway reply to one send call.
pub struct GatewayResponse {
    pub status: StatusCode,
    pub body: String,
}

impl GatewayResponse {
    pub fn outcome(&self) -> GatewayOutcome {
        self.status.outcome()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Response(GatewayResponse),
    TransportFailed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// One call made to the gateway during a dispatch.
pub struct DispatchAttempt {
    pub number: MobileNumber,
    pub outcome: AttemptOutcome,
    pub at: UnixTimestamp,
}

impl DispatchAttempt {
    /// Status code of the reply, if the call produced one.
    pub fn status(&self) -> Option<StatusCode> {
        match &self.outcome {
            AttemptOutcome::Response(response) => Some(response.status),
            AttemptOutcome::TransportFailed { .. } => None,
        }
    }

    /// Classification of the reply; `None` when the call itself failed.
    pub fn gateway_outcome(&self) -> Option<GatewayOutcome> {
        self.status().map(StatusCode::outcome)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
/// Why a dispatch did not succeed.
pub enum DispatchErrorKind {
    /// The phone candidate matched no accepted numbering pattern; nothing was sent.
    InvalidPhone,
    /// 401: credentials are wrong; a batch should stop sending.
    GatewayAuthFailure,
    /// 402/405/503/555/666: the caller may back off before the next dispatch.
    GatewayRateLimited,
    /// 585: the message text itself was refused.
    GatewayContentRejected,
    /// 560 on the final attempt.
    GatewayInvalidNumber,
    /// Any other non-200 code.
    GatewayUnknown,
    /// The call did not complete (timeout, connection, TLS).
    TransportError,
}

impl DispatchErrorKind {
    /// Error kind for a terminal gateway outcome; `None` for success.
    pub fn from_outcome(outcome: GatewayOutcome) -> Option<Self> {
        Some(match outcome {
            GatewayOutcome::Success => return None,
            GatewayOutcome::InvalidNumber => Self::GatewayInvalidNumber,
            GatewayOutcome::RateLimited(_) => Self::GatewayRateLimited,
            GatewayOutcome::AuthFailure => Self::GatewayAuthFailure,
            GatewayOutcome::ContentRejected => Self::GatewayContentRejected,
            GatewayOutcome::Other(_) => Self::GatewayUnknown,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Outcome of one dispatch: every attempt made, and how it ended.
pub struct DispatchResult {
    pub success: bool,
    pub final_status: Option<StatusCode>,
    pub attempts: Vec<DispatchAttempt>,
    pub error_kind: Option<DispatchErrorKind>,
    pub phone: Option<CanonicalPhone>,
    pub variant: Option<Variant>,
    pub validation_error: Option<ValidationError>,
}

impl DispatchResult {
    /// Result for a phone candidate that failed normalization.
    pub fn invalid_phone(error: ValidationError) -> Self {
        Self {
            success: false,
            final_status: None,
            attempts: Vec::new(),
            error_kind: Some(DispatchErrorKind::InvalidPhone),
            phone: None,
            variant: None,
            validation_error: Some(error),
        }
    }

    /// Build a result from the attempts made; the last attempt decides success.
    pub fn from_attempts(
        phone: CanonicalPhone,
        variant: Variant,
        attempts: Vec<DispatchAttempt>,
    ) -> Self {
        let last = attempts.last();
        let final_status = last.and_then(DispatchAttempt::status);
        let error_kind = match last.map(|attempt| &attempt.outcome) {
            Some(AttemptOutcome::Response(response)) => {
                DispatchErrorKind::from_outcome(response.outcome())
            }
            Some(AttemptOutcome::TransportFailed { .. }) | None => {
                Some(DispatchErrorKind::TransportError)
            }
        };

        Self {
            success: final_status.is_some_and(StatusCode::is_success),
            final_status,
            attempts,
            error_kind,
            phone: Some(phone),
            variant: Some(variant),
            validation_error: None,
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        self.error_kind == Some(DispatchErrorKind::GatewayAuthFailure)
    }
}
