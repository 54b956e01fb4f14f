use crate::domain::UnixTimestamp;

/// Source of "now" for cache decisions, attempt timestamps and `smsid` generation.
pub trait Clock: Send + Sync {
    fn now(&self) -> UnixTimestamp;
}

#[derive(Debug, Clone, Copy, Default)]
/// Wall-clock time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> UnixTimestamp {
        UnixTimestamp::now()
    }
}
