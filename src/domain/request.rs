use serde::Serialize;

use crate::domain::value::{MessageText, SmsId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
/// Which of the two message texts was sent.
pub enum Variant {
    A,
    B,
}

impl Variant {
    /// The other variant.
    pub fn flip(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Two interchangeable texts for the same notification.
///
/// Repeat sends to one number within the cooldown window alternate between them.
pub struct MessageVariants {
    a: MessageText,
    b: MessageText,
}

impl MessageVariants {
    pub fn new(a: MessageText, b: MessageText) -> Self {
        Self { a, b }
    }

    /// Use the same text for both variants (alternation becomes a no-op).
    pub fn single(text: MessageText) -> Self {
        Self {
            a: text.clone(),
            b: text,
        }
    }

    pub fn get(&self, variant: Variant) -> &MessageText {
        match variant {
            Variant::A => &self.a,
            Variant::B => &self.b,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Per-attempt send options.
pub struct SendOptions {
    /// Ask the gateway for a delivery report correlated by this id (`status=1` + `smsid`).
    pub delivery_report: Option<SmsId>,
}

impl SendOptions {
    pub fn with_delivery_report(sms_id: SmsId) -> Self {
        Self {
            delivery_report: Some(sms_id),
        }
    }
}
