#![allow(dead_code)]

use std::cell::RefCell;
use std::io::ErrorKind;
use std::rc::Rc;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal_mock::i2c::{Mock as I2cMock, Transaction};
use embedded_hal_mock::MockError;
use imx258_i2c::{
    CaptureMode, Config, FlipMode, Imx258, ModeRegistry, DEFAULT_I2C_ADDRESS,
};

pub const ADDR: u8 = DEFAULT_I2C_ADDRESS;

/// Delay that records every requested wait
#[derive(Clone, Default)]
pub struct RecordingDelay(Rc<RefCell<Vec<u32>>>);

impl RecordingDelay {
    pub fn waits(&self) -> Vec<u32> {
        self.0.borrow().clone()
    }
}

impl DelayMs<u32> for RecordingDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().push(ms);
    }
}

pub fn io_error() -> MockError {
    MockError::Io(ErrorKind::Other)
}

/// Expect a single-byte register write
pub fn w(reg: u16, val: u8) -> Transaction {
    let [hi, lo] = reg.to_be_bytes();
    Transaction::write(ADDR, vec![hi, lo, val])
}

/// Expect a single-byte register read returning `val`
pub fn r(reg: u16, val: u8) -> Transaction {
    Transaction::write_read(ADDR, reg.to_be_bytes().to_vec(), vec![val])
}

/// Expect the bus traffic of `start_streaming` with nothing pending
pub fn stream_start(vts: u16) -> Vec<Transaction> {
    vec![
        r(0x0340, (vts >> 8) as u8),
        r(0x0341, (vts & 0xff) as u8),
        w(0x0100, 0x01),
    ]
}

/// Expected writes for loading `mode`, with the orientation register set to
/// `orientation` when given
pub fn mode_load(
    mode: &CaptureMode,
    orientation: Option<u8>,
) -> Vec<Transaction> {
    mode.registers()
        .iter()
        .map(|e| match orientation {
            Some(o) if e.address == 0x0101 => w(e.address, o),
            _ => w(e.address, e.value as u8),
        })
        .collect()
}

pub fn driver<'a>(
    i2c: &I2cMock,
    delay: &RecordingDelay,
    registry: &'a ModeRegistry,
    flip_mode: FlipMode,
) -> Imx258<'a, I2cMock, RecordingDelay> {
    let config = Config {
        flip_mode,
        ..Config::default()
    };
    Imx258::new(i2c.clone(), delay.clone(), registry, config)
}
