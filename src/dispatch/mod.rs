//! Dispatch layer: normalize, pick a text, send, and retry once in `81` form on a 560.

mod cache;
mod clock;
mod retry;

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

pub use cache::{DEFAULT_COOLDOWN, DEFAULT_RETENTION_WINDOWS, SendCacheEntry, SendDedupCache};
pub use clock::{Clock, SystemClock};
pub use retry::{RetryDecision, RetryPolicy};

use crate::client::GatewayClient;
use crate::domain::{
    AttemptOutcome, CanonicalPhone, DispatchAttempt, DispatchErrorKind, DispatchResult,
    GatewayResponse, MessageText, MessageVariants, MobileNumber, SendOptions, SmsId, Variant,
};

/// Response bodies are cut to this many characters in log lines.
const LOG_BODY_MAX_CHARS: usize = 500;

#[derive(Debug, Clone)]
/// One phone candidate and its texts, as handed over by the scraping side.
pub struct DispatchItem {
    pub raw_phone: String,
    pub variants: MessageVariants,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// One result per dispatched item, in input order.
    pub results: Vec<DispatchResult>,
    /// Items not attempted because the batch halted.
    pub skipped: usize,
    pub halted_by: Option<DispatchErrorKind>,
}

#[derive(Clone)]
/// Sends one message to one phone candidate.
///
/// Owns nothing global: the gateway client (and its credentials), the dedup cache and the clock
/// are all injected, so independent coordinators do not share state unless they share an `Arc`.
pub struct DispatchCoordinator {
    client: GatewayClient,
    cache: Arc<SendDedupCache>,
    retry: RetryPolicy,
    clock: Arc<dyn Clock>,
}

impl DispatchCoordinator {
    pub fn new(client: GatewayClient, cache: Arc<SendDedupCache>) -> Self {
        Self {
            client,
            cache,
            retry: RetryPolicy::default(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn cache(&self) -> &Arc<SendDedupCache> {
        &self.cache
    }

    /// Send one of `variants` to `raw_phone`.
    ///
    /// Makes no gateway call when the number does not normalize, one call normally, and two
    /// when the first is rejected with 560. `success` reflects the last call only.
    pub async fn dispatch(
        &self,
        raw_phone: &str,
        variants: &MessageVariants,
        use_delivery_report: bool,
    ) -> DispatchResult {
        let phone = match CanonicalPhone::normalize(raw_phone) {
            Ok(phone) => phone,
            Err(err) => {
                warn!(raw_phone, error = %err, "phone number rejected; nothing sent");
                return DispatchResult::invalid_phone(err);
            }
        };

        let (text, entry) = self.cache.choose_variant(&phone, self.clock.now(), variants);
        if entry.last_variant == Variant::B {
            info!(phone = %phone, "repeat send within cooldown; using variant B");
        }

        let mut attempts = Vec::with_capacity(RetryPolicy::MAX_ATTEMPTS as usize);

        let first = self
            .send_once(&phone.to_domestic(), text, use_delivery_report)
            .await;
        let decision = first
            .gateway_outcome()
            .map_or(RetryDecision::Stop, |outcome| {
                self.retry.should_retry(outcome, 1)
            });
        attempts.push(first);

        if let RetryDecision::RetryAs(form) = decision {
            let alternate = phone.in_form(form);
            warn!(
                phone = %phone,
                alternate = %alternate,
                "gateway rejected the number (560); retrying in 81 form"
            );
            attempts.push(self.send_once(&alternate, text, use_delivery_report).await);
        }

        let result = DispatchResult::from_attempts(phone, entry.last_variant, attempts);
        info!(
            success = result.success,
            final_status = ?result.final_status.map(|status| status.as_u16()),
            attempts = result.attempts.len(),
            error_kind = ?result.error_kind,
            "dispatch finished"
        );
        result
    }

    /// Dispatch `items` in order, stopping at the first authentication failure.
    ///
    /// Idle cache entries are pruned once before the batch starts.
    pub async fn dispatch_batch(
        &self,
        items: impl IntoIterator<Item = DispatchItem>,
        use_delivery_report: bool,
    ) -> BatchReport {
        let pruned = self.cache.prune(self.clock.now());
        if pruned > 0 {
            info!(pruned, "dropped idle send cache entries");
        }

        let mut report = BatchReport {
            results: Vec::new(),
            skipped: 0,
            halted_by: None,
        };

        for item in items {
            if report.halted_by.is_some() {
                report.skipped += 1;
                continue;
            }

            let result = self
                .dispatch(&item.raw_phone, &item.variants, use_delivery_report)
                .await;
            if result.is_auth_failure() {
                error!("gateway rejected the credentials (401); halting batch");
                report.halted_by = Some(DispatchErrorKind::GatewayAuthFailure);
            }
            report.results.push(result);
        }

        if report.skipped > 0 {
            warn!(skipped = report.skipped, "batch halted before all items were sent");
        }
        report
    }

    async fn send_once(
        &self,
        number: &MobileNumber,
        text: &MessageText,
        use_delivery_report: bool,
    ) -> DispatchAttempt {
        let at = self.clock.now();
        let options = if use_delivery_report {
            SendOptions::with_delivery_report(SmsId::from_timestamp(at))
        } else {
            SendOptions::default()
        };

        let outcome = match self.client.attempt_send(number, text, &options).await {
            Ok(response) => {
                log_response(number, &response);
                AttemptOutcome::Response(response)
            }
            Err(err) => {
                warn!(mobilenumber = %number, error = %err, "gateway call failed");
                AttemptOutcome::TransportFailed {
                    message: err.to_string(),
                }
            }
        };

        DispatchAttempt {
            number: number.clone(),
            outcome,
            at,
        }
    }
}

fn log_response(number: &MobileNumber, response: &GatewayResponse) {
    let status = response.status.as_u16();
    let meaning = response.status.description();
    let body = truncate_chars(response.body.trim(), LOG_BODY_MAX_CHARS);
    if response.status.is_success() {
        info!(status, meaning, mobilenumber = %number, body, "gateway accepted SMS");
    } else {
        warn!(status, meaning, mobilenumber = %number, body, "gateway refused SMS");
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
