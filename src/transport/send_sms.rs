use crate::domain::{MessageText, MobileNumber, SendOptions, SmsId};

/// Full-width ampersand; the gateway splits form fields on a literal `&` even when encoded.
const FULLWIDTH_AMPERSAND: &str = "\u{FF06}";

const STATUS_FIELD: &str = "status";

pub fn encode_send_sms_form(
    number: &MobileNumber,
    text: &MessageText,
    options: &SendOptions,
) -> Vec<(String, String)> {
    let mut params = vec![
        (MobileNumber::FIELD.to_owned(), number.as_str().to_owned()),
        (MessageText::FIELD.to_owned(), escape_sms_text(text.as_str())),
    ];
    push_options(&mut params, options);
    params
}

fn escape_sms_text(text: &str) -> String {
    text.replace('&', FULLWIDTH_AMPERSAND)
}

fn push_options(params: &mut Vec<(String, String)>, options: &SendOptions) {
    if let Some(sms_id) = options.delivery_report.as_ref() {
        params.push((STATUS_FIELD.to_owned(), "1".to_owned()));
        params.push((SmsId::FIELD.to_owned(), sms_id.as_str().to_owned()));
    }
}
