mod common;

use common::*;
use embedded_hal_mock::i2c::Mock as I2cMock;
use imx258_i2c::{Error, FlipMode, ModeRegistry};

#[test]
fn matching_chip_id_is_accepted() {
    let registry = ModeRegistry::new();
    let mut i2c = I2cMock::new(&[r(0x0016, 0x02), r(0x0017, 0x58)]);
    let delay = RecordingDelay::default();
    let mut cam = driver(&i2c, &delay, &registry, FlipMode::Unset);

    assert!(cam.verify_identity().is_ok());
    i2c.done();
}

#[test]
fn wrong_chip_id_reports_expected_and_observed() {
    let registry = ModeRegistry::new();
    let mut i2c = I2cMock::new(&[r(0x0016, 0x02), r(0x0017, 0x19)]);
    let delay = RecordingDelay::default();
    let mut cam = driver(&i2c, &delay, &registry, FlipMode::Unset);

    match cam.verify_identity() {
        Err(Error::DeviceMismatch { expected, observed }) => {
            assert_eq!(expected, 0x0258);
            assert_eq!(observed, 0x0219);
        }
        other => panic!("unexpected result: {:?}", other),
    }
    i2c.done();
}

#[test]
fn swapped_id_bytes_do_not_match() {
    let registry = ModeRegistry::new();
    let mut i2c = I2cMock::new(&[r(0x0016, 0x58), r(0x0017, 0x02)]);
    let delay = RecordingDelay::default();
    let mut cam = driver(&i2c, &delay, &registry, FlipMode::Unset);

    assert!(matches!(
        cam.verify_identity(),
        Err(Error::DeviceMismatch { observed: 0x5802, .. })
    ));
    i2c.done();
}

#[test]
fn read_failure_is_not_a_mismatch() {
    let registry = ModeRegistry::new();
    // the low byte is never read once the high byte fails
    let mut i2c = I2cMock::new(&[r(0x0016, 0x00).with_error(io_error())]);
    let delay = RecordingDelay::default();
    let mut cam = driver(&i2c, &delay, &registry, FlipMode::Unset);

    assert!(matches!(
        cam.verify_identity(),
        Err(Error::RegisterIo {
            reg: 0x0016,
            value: None,
            ..
        })
    ));
    i2c.done();
}

#[test]
fn u16_read_at_top_of_address_space_wraps() {
    let registry = ModeRegistry::new();
    let mut i2c = I2cMock::new(&[r(0xffff, 0x12), r(0x0000, 0x34)]);
    let delay = RecordingDelay::default();
    let mut cam = driver(&i2c, &delay, &registry, FlipMode::Unset);

    assert_eq!(cam.read_reg_u16(0xffff).unwrap(), 0x1234);
    i2c.done();
}
