// A register-level ADXL345 for the simulated SPI bus.

use core::cell::RefCell;
use std::rc::Rc;

use crate::adxl345::{DATA_START, DEVICE_ID};
use crate::hal::sim::Slave;

#[derive(Debug)]
struct State {
    registers: [u8; 64],
    // address and direction, once the command byte is in
    command: Option<(u8, bool, bool)>,
}

/// Cloning shares the register file, so a test can keep a handle
/// after attaching the model.
#[derive(Debug, Clone)]
pub struct Model {
    state: Rc<RefCell<State>>,
}

impl Model {
    pub fn new() -> Self {
        let mut registers = [0; 64];
        registers[0] = DEVICE_ID;
        Self {
            state: Rc::new(RefCell::new(State {
                registers,
                command: None,
            })),
        }
    }

    pub fn register(&self, address: u8) -> u8 {
        self.state.borrow().registers[address as usize]
    }

    pub fn set_register(&self, address: u8, value: u8) {
        self.state.borrow_mut().registers[address as usize] = value;
    }

    pub fn set_axes(&self, x: i16, y: i16, z: i16) {
        let mut state = self.state.borrow_mut();
        let start = DATA_START as usize;
        for (i, v) in [x, y, z].into_iter().enumerate() {
            state.registers[start + 2 * i..start + 2 * i + 2].copy_from_slice(&v.to_le_bytes());
        }
    }
}

impl Slave for Model {
    fn select(&mut self) {
        self.state.borrow_mut().command = None;
    }

    fn exchange(&mut self, mosi: u16) -> u16 {
        let mut state = self.state.borrow_mut();
        let byte = mosi as u8;
        let Some((address, read, multi)) = state.command else {
            state.command = Some((byte & 0x3f, byte & 0x80 != 0, byte & 0x40 != 0));
            return 0;
        };

        let reply = if read {
            state.registers[address as usize]
        } else {
            state.registers[address as usize] = byte;
            0
        };
        if multi {
            state.command = Some(((address + 1) & 0x3f, read, multi));
        }
        reply as u16
    }
}
