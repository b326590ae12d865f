use crate::hal::spi::{Config, Configure, FullDuplex};
use std::collections::VecDeque;

/// Serial engine double. Words clocked out are recorded in `sent`;
/// words clocked back in are drawn from `to_receive`, defaulting to
/// zero once that drains.
pub struct MockSpi<WORD> {
    /// Mock values to be received
    pub to_receive: VecDeque<WORD>,
    /// Mock values sent
    pub sent: VecDeque<WORD>,
    /// Configuration applied through the `Configure` lifecycle
    pub config: Option<Config>,
    pub enabled: bool,
    awaiting_receive: bool,
}

impl<WORD> MockSpi<WORD> {
    pub fn new() -> Self {
        Self {
            to_receive: VecDeque::new(),
            sent: VecDeque::new(),
            config: None,
            enabled: false,
            awaiting_receive: false,
        }
    }
}

impl<WORD: Default> FullDuplex<WORD> for MockSpi<WORD> {
    type Error = ();
    fn transmit(&mut self, word: Option<WORD>) -> nb::Result<(), Self::Error> {
        if self.awaiting_receive {
            Err(nb::Error::Other(()))
        } else {
            self.awaiting_receive = true;
            if let Some(word) = word {
                self.sent.push_back(word)
            }
            Ok(())
        }
    }

    fn receive(&mut self) -> nb::Result<WORD, Self::Error> {
        if !self.awaiting_receive {
            Err(nb::Error::Other(()))
        } else {
            self.awaiting_receive = false;
            Ok(self.to_receive.pop_front().unwrap_or_default())
        }
    }
}

impl<WORD> Configure for MockSpi<WORD> {
    type Error = ();

    fn enable(&mut self, config: Config) -> Result<(), Self::Error> {
        self.config = Some(config);
        self.enabled = true;
        Ok(())
    }

    fn disable(&mut self) { self.enabled = false; }
}
