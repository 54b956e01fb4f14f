use std::time::{SystemTime, UNIX_EPOCH};

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Gateway API user id (the Basic-auth user name).
///
/// Invariant: non-empty after trimming.
pub struct ApiId(String);

impl ApiId {
    /// Configuration key for the API id.
    pub const FIELD: &'static str = "api_id";

    /// Create a validated [`ApiId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
/// Gateway API password (the Basic-auth password).
///
/// Invariant: must not be empty (whitespace is preserved and allowed). The value is
/// redacted from `Debug` output.
pub struct ApiPassword(SecretString);

impl ApiPassword {
    /// Configuration key for the API password.
    pub const FIELD: &'static str = "api_password";

    /// Create a validated [`ApiPassword`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(SecretString::from(value)))
    }

    /// Expose the password for building the `Authorization` header.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
/// SMS body text (`smstext`).
///
/// Invariant: non-empty after trimming. The original value (including whitespace) is preserved;
/// wire-level substitutions happen in the transport layer.
pub struct MessageText(String);

impl MessageText {
    /// Form field name used by the gateway (`smstext`).
    pub const FIELD: &'static str = "smstext";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
/// Caller-chosen request id (`smsid`) used to correlate delivery reports.
///
/// Invariant: ASCII alphanumeric only, 1..=50 characters.
pub struct SmsId(String);

impl SmsId {
    /// Form field name used by the gateway (`smsid`).
    pub const FIELD: &'static str = "smsid";

    /// Maximum length accepted by the gateway.
    pub const MAX_LEN: usize = 50;

    /// Prefix used by [`SmsId::from_timestamp`].
    pub const DEFAULT_PREFIX: &'static str = "REQ";

    /// Create a validated [`SmsId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if value.len() > Self::MAX_LEN || !value.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ValidationError::InvalidSmsId { input: value });
        }
        Ok(Self(value))
    }

    /// Build `REQ<unix seconds>`.
    pub fn from_timestamp(at: UnixTimestamp) -> Self {
        Self(format!("{}{}", Self::DEFAULT_PREFIX, at.value()))
    }

    /// Borrow the validated id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
/// Unix timestamp in seconds.
pub struct UnixTimestamp(u64);

impl UnixTimestamp {
    /// Create a timestamp value (no range validation is performed).
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Current wall-clock time. A clock set before the epoch reads as `0`.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        Self(secs)
    }

    /// Get the underlying timestamp in seconds.
    pub fn value(self) -> u64 {
        self.0
    }

    /// Seconds elapsed since `earlier`, saturating at zero.
    pub fn seconds_since(self, earlier: UnixTimestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
/// Gateway status code (the HTTP status of the send call).
///
/// This value is preserved as-is even when the code is unknown to this crate.
pub struct StatusCode(u16);

impl StatusCode {
    pub const SUCCESS: Self = Self(200);
    pub const INVALID_NUMBER: Self = Self(560);

    /// Construct a status code from its integer representation.
    pub fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the integer code as returned by the gateway.
    pub fn as_u16(self) -> u16 {
        self.0
    }

    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }

    /// Classify this code into the outcome the dispatch pipeline acts on.
    pub fn outcome(self) -> GatewayOutcome {
        match self.0 {
            200 => GatewayOutcome::Success,
            560 => GatewayOutcome::InvalidNumber,
            402 | 405 | 503 | 555 | 666 => GatewayOutcome::RateLimited(self),
            401 => GatewayOutcome::AuthFailure,
            585 => GatewayOutcome::ContentRejected,
            _ => GatewayOutcome::Other(self),
        }
    }

    /// Map this code to a known status code variant, if one exists.
    pub fn known(self) -> Option<KnownStatusCode> {
        KnownStatusCode::from_code(self.0)
    }

    /// Human-readable meaning of the code, for log lines.
    pub fn description(self) -> &'static str {
        self.known()
            .map(KnownStatusCode::description)
            .unwrap_or("unknown status")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "outcome", content = "code", rename_all = "snake_case")]
/// Classification of a gateway response.
///
/// Only [`GatewayOutcome::Success`] and [`GatewayOutcome::InvalidNumber`] drive control flow;
/// the rest are terminal and reported as-is.
pub enum GatewayOutcome {
    Success,
    InvalidNumber,
    RateLimited(StatusCode),
    AuthFailure,
    ContentRejected,
    Other(StatusCode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Status codes published by the gateway.
///
/// Codes that come in numbered families (alternate URLs, short-URL codes, memo slots) carry
/// their 1-based slot number.
pub enum KnownStatusCode {
    Success,
    AuthorizationRequired,
    Overlimit,
    MethodNotAllowed,
    UriTooLong,
    InternalServerError,
    BadGateway,
    ServiceUnavailable,
    Failure,
    IpBanned,
    ForbiddenIp,
    InvalidMobileNumber,
    InvalidSendDate,
    InvalidAuTitle,
    InvalidSoftbankTitle,
    InvalidSmsTextId,
    InvalidSendAttempts,
    InvalidResendInterval,
    InvalidStatus,
    InvalidSmsId,
    InvalidDocomo,
    InvalidAu,
    InvalidSoftbank,
    InvalidSim,
    InvalidGateway,
    InvalidSmsTitle,
    InvalidSmsText,
    SmsIdNotUnique,
    InvalidOriginalUrl(u8),
    InvalidSmsTextType,
    InvalidTimeOrPermission,
    InvalidDocomoTitle,
    InvalidResendFeature,
    InvalidTitleFeature,
    InvalidType,
    ApiDisabled,
    InvalidRegistrationDate,
    InvalidHlrFeature,
    InvalidJson,
    InvalidMemoFeature,
    DuplicateSmsId,
    ResendParametersImmutable,
    InvalidRakutenTitle,
    InvalidRakutenText,
    RakutenTextTooLong,
    RakutenReminderTextTooLong,
    InvalidRakutenSettings,
    InvalidShortUrlFeature,
    InvalidShortUrlCode(u8),
    InvalidMemoTemplateFeature,
    InvalidMemoTemplateId(u8),
    MainTextShortUrlSplitError,
    DocomoTextShortUrlSplitError,
    AuTextShortUrlSplitError,
    SoftbankTextShortUrlSplitError,
    RakutenTextShortUrlSplitError,
    MainTextDocomoSplitError,
    MainTextAuSplitError,
    MainTextSoftbankSplitError,
    ReminderShortUrlSplitError,
    ReminderDocomoSplitError,
    ReminderAuSplitError,
    ReminderSoftbankSplitError,
    TemplateConflictsWithParameters,
    InvalidRcsImage,
    IpBanImminent,
    InvalidRcsVideo,
    InvalidRcsAudio,
    InvalidMemoValue(u8),
}

impl KnownStatusCode {
    /// Convert a raw gateway status code into a known variant.
    pub fn from_code(code: u16) -> Option<Self> {
        Some(match code {
            200 => Self::Success,
            401 => Self::AuthorizationRequired,
            402 => Self::Overlimit,
            405 => Self::MethodNotAllowed,
            414 => Self::UriTooLong,
            500 => Self::InternalServerError,
            502 => Self::BadGateway,
            503 => Self::ServiceUnavailable,
            550 => Self::Failure,
            555 => Self::IpBanned,
            557 => Self::ForbiddenIp,
            560 => Self::InvalidMobileNumber,
            562 => Self::InvalidSendDate,
            568 => Self::InvalidAuTitle,
            569 => Self::InvalidSoftbankTitle,
            570 => Self::InvalidSmsTextId,
            571 => Self::InvalidSendAttempts,
            572 => Self::InvalidResendInterval,
            573 => Self::InvalidStatus,
            574 => Self::InvalidSmsId,
            575 => Self::InvalidDocomo,
            576 => Self::InvalidAu,
            577 => Self::InvalidSoftbank,
            578 => Self::InvalidSim,
            579 => Self::InvalidGateway,
            580 => Self::InvalidSmsTitle,
            585 => Self::InvalidSmsText,
            587 => Self::SmsIdNotUnique,
            590 => Self::InvalidOriginalUrl(1),
            591 => Self::InvalidSmsTextType,
            592 => Self::InvalidTimeOrPermission,
            598 => Self::InvalidDocomoTitle,
            599 => Self::InvalidResendFeature,
            601 => Self::InvalidTitleFeature,
            605 => Self::InvalidType,
            606 => Self::ApiDisabled,
            608 => Self::InvalidRegistrationDate,
            610 => Self::InvalidHlrFeature,
            612 => Self::InvalidOriginalUrl(2),
            613 => Self::InvalidOriginalUrl(3),
            614 => Self::InvalidOriginalUrl(4),
            615 => Self::InvalidJson,
            617 => Self::InvalidMemoFeature,
            624 => Self::DuplicateSmsId,
            631 => Self::ResendParametersImmutable,
            632 => Self::InvalidRakutenTitle,
            633 => Self::InvalidRakutenText,
            634 => Self::RakutenTextTooLong,
            635 => Self::RakutenReminderTextTooLong,
            636 => Self::InvalidRakutenSettings,
            639 => Self::InvalidShortUrlFeature,
            640 => Self::InvalidShortUrlCode(1),
            641 => Self::InvalidShortUrlCode(2),
            642 => Self::InvalidShortUrlCode(3),
            643 => Self::InvalidShortUrlCode(4),
            644 => Self::InvalidMemoTemplateFeature,
            645..=649 => Self::InvalidMemoTemplateId((code - 644) as u8),
            650 => Self::MainTextShortUrlSplitError,
            651 => Self::DocomoTextShortUrlSplitError,
            652 => Self::AuTextShortUrlSplitError,
            653 => Self::SoftbankTextShortUrlSplitError,
            654 => Self::RakutenTextShortUrlSplitError,
            655 => Self::MainTextDocomoSplitError,
            656 => Self::MainTextAuSplitError,
            657 => Self::MainTextSoftbankSplitError,
            659 => Self::ReminderShortUrlSplitError,
            660 => Self::ReminderDocomoSplitError,
            661 => Self::ReminderAuSplitError,
            662 => Self::ReminderSoftbankSplitError,
            664 => Self::TemplateConflictsWithParameters,
            665 => Self::InvalidRcsImage,
            666 => Self::IpBanImminent,
            667 => Self::InvalidRcsVideo,
            668 => Self::InvalidRcsAudio,
            669..=673 => Self::InvalidMemoValue((code - 668) as u8),
            _ => return None,
        })
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::AuthorizationRequired => "authentication error (Authorization Required)",
            Self::Overlimit => "send limit reached (Overlimit)",
            Self::MethodNotAllowed => "method not allowed or send limit reached",
            Self::UriTooLong => "URL too long",
            Self::InternalServerError => "internal server error",
            Self::BadGateway => "bad gateway",
            Self::ServiceUnavailable => "temporarily unavailable or throttled",
            Self::Failure => "failure",
            Self::IpBanned => "IP address banned",
            Self::ForbiddenIp => "IP address not allowed",
            Self::InvalidMobileNumber => "invalid mobile number",
            Self::InvalidSendDate => "invalid send date",
            Self::InvalidAuTitle => "invalid au SMS title",
            Self::InvalidSoftbankTitle => "invalid SoftBank SMS title",
            Self::InvalidSmsTextId => "invalid SMS text id",
            Self::InvalidSendAttempts => "invalid send attempt count",
            Self::InvalidResendInterval => "invalid resend interval",
            Self::InvalidStatus => "invalid status",
            Self::InvalidSmsId => "invalid sms id",
            Self::InvalidDocomo => "invalid docomo parameter",
            Self::InvalidAu => "invalid au parameter",
            Self::InvalidSoftbank => "invalid SoftBank parameter",
            Self::InvalidSim => "invalid SIM parameter",
            Self::InvalidGateway => "invalid gateway parameter",
            Self::InvalidSmsTitle => "invalid SMS title",
            Self::InvalidSmsText => "invalid SMS text (content rejected)",
            Self::SmsIdNotUnique => "sms id not unique",
            Self::InvalidOriginalUrl(_) => "invalid original URL",
            Self::InvalidSmsTextType => "invalid SMS text type",
            Self::InvalidTimeOrPermission => "invalid time or send permission exceeded",
            Self::InvalidDocomoTitle => "invalid docomo SMS title",
            Self::InvalidResendFeature => "resend feature not enabled",
            Self::InvalidTitleFeature => "SMS title feature not enabled",
            Self::InvalidType => "invalid type",
            Self::ApiDisabled => "API disabled",
            Self::InvalidRegistrationDate => "invalid registration date",
            Self::InvalidHlrFeature => "HLR feature not enabled",
            Self::InvalidJson => "malformed JSON",
            Self::InvalidMemoFeature => "memo feature not enabled",
            Self::DuplicateSmsId => "duplicate sms id",
            Self::ResendParametersImmutable => "resend parameters cannot be changed",
            Self::InvalidRakutenTitle => "invalid Rakuten SMS title",
            Self::InvalidRakutenText => "invalid Rakuten SMS text",
            Self::RakutenTextTooLong => "Rakuten SMS text too long",
            Self::RakutenReminderTextTooLong => "Rakuten reminder SMS text too long",
            Self::InvalidRakutenSettings => "invalid Rakuten settings",
            Self::InvalidShortUrlFeature => "short URL feature not enabled",
            Self::InvalidShortUrlCode(_) => "invalid short URL code",
            Self::InvalidMemoTemplateFeature => "memo template feature not enabled",
            Self::InvalidMemoTemplateId(_) => "invalid memo template id",
            Self::MainTextShortUrlSplitError => "main text short URL split error",
            Self::DocomoTextShortUrlSplitError => "docomo text short URL split error",
            Self::AuTextShortUrlSplitError => "au text short URL split error",
            Self::SoftbankTextShortUrlSplitError => "SoftBank text short URL split error",
            Self::RakutenTextShortUrlSplitError => "Rakuten text short URL split error",
            Self::MainTextDocomoSplitError => "main text docomo split error",
            Self::MainTextAuSplitError => "main text au split error",
            Self::MainTextSoftbankSplitError => "main text SoftBank split error",
            Self::ReminderShortUrlSplitError => "reminder text short URL split error",
            Self::ReminderDocomoSplitError => "reminder text docomo split error",
            Self::ReminderAuSplitError => "reminder text au split error",
            Self::ReminderSoftbankSplitError => "reminder text SoftBank split error",
            Self::TemplateConflictsWithParameters => "template conflicts with SMS parameters",
            Self::InvalidRcsImage => "invalid RCS image",
            Self::IpBanImminent => "IP ban imminent after repeated authentication errors",
            Self::InvalidRcsVideo => "invalid RCS video",
            Self::InvalidRcsAudio => "invalid RCS audio",
            Self::InvalidMemoValue(_) => "invalid memo value",
        }
    }
}
