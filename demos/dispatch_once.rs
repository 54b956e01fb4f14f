use std::io;

use smsdispatch::{Credentials, DispatchSettings, MessageText, MessageVariants};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let credentials = Credentials::from_env()?;
    let settings = DispatchSettings::from_env()?;

    let phone = std::env::var("SMS_PHONE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMS_PHONE environment variable is required",
        )
    })?;
    let text_a = std::env::var("SMS_TEXT_A")
        .unwrap_or_else(|_| "Thank you for applying. We will be in touch shortly.".to_owned());
    let text_b = std::env::var("SMS_TEXT_B")
        .unwrap_or_else(|_| "Thanks for your application. We will contact you soon.".to_owned());
    let variants = MessageVariants::new(MessageText::new(text_a)?, MessageText::new(text_b)?);

    let coordinator = settings.coordinator(credentials)?;
    let result = coordinator
        .dispatch(&phone, &variants, settings.use_delivery_report)
        .await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
