//! Transport layer: wire-format details of the gateway's form body.

mod send_sms;

pub use send_sms::encode_send_sms_form;
