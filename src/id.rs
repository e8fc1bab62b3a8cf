// Id and time sources injected into the list store

use crate::models::now_ms;

/// Source of fresh item ids
pub trait IdGenerator {
    /// Return an id that has not been returned before
    fn next_id(&mut self) -> String;
}

/// Source of the current time in milliseconds since epoch
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// Time-ordered UUIDv7 ids
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> String {
        uuid::Uuid::now_v7().simple().to_string()
    }
}

/// Wall-clock time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        now_ms()
    }
}

/// Deterministic ids: `{prefix}{n}` counting up from 1
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// Clock that advances by a fixed step on every read
#[derive(Debug)]
pub struct SteppingClock {
    now: std::cell::Cell<i64>,
    step: i64,
}

impl SteppingClock {
    pub fn new(start: i64, step: i64) -> Self {
        Self {
            now: std::cell::Cell::new(start),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn now_ms(&self) -> i64 {
        let now = self.now.get();
        self.now.set(now + self.step);
        now
    }
}
