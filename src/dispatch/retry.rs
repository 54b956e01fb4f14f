use crate::domain::{GatewayOutcome, PhoneForm};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Report the attempt as final.
    Stop,
    /// Send once more, with the number rewritten into this form.
    RetryAs(PhoneForm),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Decides whether a rejected first attempt gets a second one.
///
/// The only recovery is a single resend in `81` form after a 560 (invalid number). Every other
/// outcome, and anything after the second attempt, is terminal.
pub struct RetryPolicy {
    international_fallback: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            international_fallback: true,
        }
    }
}

impl RetryPolicy {
    /// Upper bound on gateway calls per dispatch.
    pub const MAX_ATTEMPTS: u32 = 2;

    /// A policy that never retries.
    pub fn disabled() -> Self {
        Self {
            international_fallback: false,
        }
    }

    /// `attempt_number` is 1-based: the attempt whose outcome is being judged.
    pub fn should_retry(&self, outcome: GatewayOutcome, attempt_number: u32) -> RetryDecision {
        if !self.international_fallback || attempt_number >= Self::MAX_ATTEMPTS {
            return RetryDecision::Stop;
        }
        match outcome {
            GatewayOutcome::InvalidNumber => RetryDecision::RetryAs(PhoneForm::International),
            GatewayOutcome::Success
            | GatewayOutcome::RateLimited(_)
            | GatewayOutcome::AuthFailure
            | GatewayOutcome::ContentRejected
            | GatewayOutcome::Other(_) => RetryDecision::Stop,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::StatusCode;

    use super::*;

    #[test]
    fn invalid_number_on_first_attempt_retries_in_international_form() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.should_retry(GatewayOutcome::InvalidNumber, 1),
            RetryDecision::RetryAs(PhoneForm::International)
        );
    }

    #[test]
    fn invalid_number_on_second_attempt_is_terminal() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.should_retry(GatewayOutcome::InvalidNumber, 2),
            RetryDecision::Stop
        );
        assert_eq!(
            policy.should_retry(GatewayOutcome::InvalidNumber, 3),
            RetryDecision::Stop
        );
    }

    #[test]
    fn every_other_outcome_is_terminal() {
        let policy = RetryPolicy::default();
        for code in [200, 401, 402, 405, 503, 555, 585, 606, 666, 999] {
            assert_eq!(
                policy.should_retry(StatusCode::new(code).outcome(), 1),
                RetryDecision::Stop,
                "code {code} must not retry"
            );
        }
    }

    #[test]
    fn disabled_policy_never_retries() {
        assert_eq!(
            RetryPolicy::disabled().should_retry(GatewayOutcome::InvalidNumber, 1),
            RetryDecision::Stop
        );
    }
}
