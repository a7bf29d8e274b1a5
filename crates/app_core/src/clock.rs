//! Time source used for upload timestamps

use chrono::{Local, NaiveDateTime};

/// Source of "now" for new records
pub trait TimeSource: std::fmt::Debug {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl TimeSource for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock that starts at a fixed instant and moves one second per reading.
/// Clones share the same position.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct SteppingClock {
    next: std::rc::Rc<std::cell::Cell<NaiveDateTime>>,
}

#[cfg(test)]
impl SteppingClock {
    pub fn starting_at(start: NaiveDateTime) -> Self {
        Self {
            next: std::rc::Rc::new(std::cell::Cell::new(start)),
        }
    }

    pub fn set(&self, at: NaiveDateTime) {
        self.next.set(at);
    }
}

#[cfg(test)]
impl TimeSource for SteppingClock {
    fn now(&self) -> NaiveDateTime {
        let now = self.next.get();
        self.next.set(now + chrono::Duration::seconds(1));
        now
    }
}
