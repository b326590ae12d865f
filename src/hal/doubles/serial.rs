use crate::hal::serial::Write;
use std::vec::Vec;

/// Serial write double that records everything written through it.
#[derive(Debug, Default)]
pub struct MockSerial {
    pub write_record: Vec<u8>,
}

impl Write<u8> for MockSerial {
    type Error = ();

    fn write(&mut self, word: u8) -> nb::Result<(), Self::Error> {
        self.write_record.push(word);
        Ok(())
    }
}
