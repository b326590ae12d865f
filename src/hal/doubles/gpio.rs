use crate::hal::gpio::{InputPin, OutputPin};
use std::{cell::RefCell, collections::VecDeque, vec::Vec};

/// Output line double. Records every level change.
#[derive(Clone, Debug, Default)]
pub struct MockPin {
    pub state: bool,
    pub changes: Vec<bool>,
}

impl MockPin {
    pub fn is_high(&self) -> bool { self.state }
    pub fn is_low(&self) -> bool { !self.state }
}

impl OutputPin for MockPin {
    fn set_low(&mut self) {
        self.state = false;
        self.changes.push(self.state);
    }

    fn set_high(&mut self) {
        self.state = true;
        self.changes.push(self.state);
    }
}

/// Input line double fed from a script of sampled levels (`true` is
/// electrical high). Each read consumes one sample; the resting level
/// is reported once the script runs out.
#[derive(Debug)]
pub struct MockInputPin {
    pub levels: RefCell<VecDeque<bool>>,
    pub resting: bool,
}

impl Default for MockInputPin {
    // An undriven handshake line sits high on its pull-up.
    fn default() -> Self { Self { levels: RefCell::new(VecDeque::new()), resting: true } }
}

impl MockInputPin {
    pub fn script(&self, samples: &[bool]) {
        self.levels.borrow_mut().extend(samples.iter().copied());
    }

    pub fn is_exhausted(&self) -> bool { self.levels.borrow().is_empty() }
}

impl InputPin for MockInputPin {
    fn is_high(&self) -> bool {
        self.levels.borrow_mut().pop_front().unwrap_or(self.resting)
    }

    fn is_low(&self) -> bool { !self.is_high() }
}
