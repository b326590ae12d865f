use crate::hal::time::{self, Microseconds, Milliseconds};
use std::{cell::Cell, vec::Vec};

#[derive(Copy, Clone, Debug)]
pub struct MockInstant {
    pub milliseconds: u32,
}

impl time::Instant for MockInstant {}

impl core::ops::Sub for MockInstant {
    type Output = Milliseconds;
    fn sub(self, rhs: Self) -> Self::Output { Milliseconds(self.milliseconds - rhs.milliseconds) }
}

impl core::ops::Add<Milliseconds> for MockInstant {
    type Output = Self;
    fn add(self, rhs: Milliseconds) -> Self { Self { milliseconds: self.milliseconds + rhs.0 } }
}

/// Tick source double. The mock clock advances a fixed step on every
/// `now()` call, so polling loops observe time passing.
pub struct MockSysTick {
    counter: Cell<u32>,
    pub step: Milliseconds,
}

impl MockSysTick {
    pub fn new(step: Milliseconds) -> Self { Self { counter: Cell::new(0), step } }
}

impl time::Now for MockSysTick {
    type I = MockInstant;
    fn now(&self) -> MockInstant {
        let instant = MockInstant { milliseconds: self.counter.get() };
        self.counter.set(self.counter.get() + self.step.0);
        instant
    }
}

/// Delay double. Records each requested pause without sleeping.
#[derive(Debug, Default)]
pub struct MockDelay {
    pub pauses: Vec<Microseconds>,
}

impl time::DelayUs for MockDelay {
    fn delay_us(&mut self, duration: Microseconds) { self.pauses.push(duration); }
}
