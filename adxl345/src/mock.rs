// A recording SPI bus and chip select pin, for driver tests.

use core::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::digital;
use embedded_hal::spi;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Chip select driven high (true) or low (false).
    Cs(bool),
    Write(Vec<u8>),
    Read(usize),
    Flush,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fail {
    Write,
    Read,
    Pin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Error;

impl spi::Error for Error {
    fn kind(&self) -> spi::ErrorKind {
        spi::ErrorKind::Other
    }
}

impl digital::Error for Error {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

#[derive(Debug, Default)]
struct State {
    ops: Vec<Op>,
    responses: VecDeque<u8>,
    fail: Option<Fail>,
}

/// Shared state behind a [Bus] and [Pin] pair. Failed operations are
/// not logged.
#[derive(Debug, Clone, Default)]
pub struct Wire {
    state: Rc<RefCell<State>>,
}

impl Wire {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bus(&self) -> Bus {
        Bus { wire: self.clone() }
    }

    pub fn pin(&self) -> Pin {
        Pin { wire: self.clone() }
    }

    pub fn ops(&self) -> Vec<Op> {
        self.state.borrow().ops.clone()
    }

    pub fn clear(&self) {
        self.state.borrow_mut().ops.clear();
    }

    /// Queue bytes to be clocked in by later reads.
    pub fn respond(&self, bytes: &[u8]) {
        self.state.borrow_mut().responses.extend(bytes);
    }

    pub fn fail(&self, fail: Fail) {
        self.state.borrow_mut().fail = Some(fail);
    }

    pub fn heal(&self) {
        self.state.borrow_mut().fail = None;
    }

    fn record(&self, op: Op, fail: Fail) -> Result<(), Error> {
        let mut state = self.state.borrow_mut();
        if state.fail == Some(fail) {
            return Err(Error);
        }
        state.ops.push(op);
        Ok(())
    }
}

#[derive(Debug)]
pub struct Bus {
    wire: Wire,
}

impl spi::ErrorType for Bus {
    type Error = Error;
}

impl spi::SpiBus<u8> for Bus {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.wire.record(Op::Read(words.len()), Fail::Read)?;
        let mut state = self.wire.state.borrow_mut();
        for w in words.iter_mut() {
            *w = state.responses.pop_front().unwrap_or(0);
        }
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        self.wire.record(Op::Write(words.to_vec()), Fail::Write)
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        self.write(write)?;
        self.read(read)
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.write(words)?;
        self.read(words)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.state_push(Op::Flush);
        Ok(())
    }
}

impl Bus {
    fn state_push(&self, op: Op) {
        self.wire.state.borrow_mut().ops.push(op);
    }
}

#[derive(Debug)]
pub struct Pin {
    wire: Wire,
}

impl digital::ErrorType for Pin {
    type Error = Error;
}

impl digital::OutputPin for Pin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.wire.record(Op::Cs(false), Fail::Pin)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.wire.record(Op::Cs(true), Fail::Pin)
    }
}
