/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

//! Register map for the IMX258.
//! Multi-byte registers are big-endian: the lower address holds bits [15:8].

/// Registers this driver reads, writes, or interprets inside mode tables
#[repr(u16)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    ChipIdHigh = 0x0016,
    ChipIdLow = 0x0017,
    ModeSelect = 0x0100,
    /// Bit 0: horizontal mirror, bit 1: vertical flip
    ImageOrientation = 0x0101,
    /// Coarse integration time [15:8]
    ExposureHigh = 0x0202,
    /// Coarse integration time [7:0]
    ExposureLow = 0x0203,
    /// Global analog gain [8]
    AnalogGainHigh = 0x0204,
    /// Global analog gain [7:0]
    AnalogGainLow = 0x0205,
    FrameLengthHigh = 0x0340,
    FrameLengthLow = 0x0341,
    LineLengthHigh = 0x0342,
    LineLengthLow = 0x0343,
    XAddrStartHigh = 0x0344,
    XAddrStartLow = 0x0345,
    YAddrStartHigh = 0x0346,
    YAddrStartLow = 0x0347,
    XAddrEndHigh = 0x0348,
    XAddrEndLow = 0x0349,
    YAddrEndHigh = 0x034a,
    YAddrEndLow = 0x034b,
    XOutputSizeHigh = 0x034c,
    XOutputSizeLow = 0x034d,
    YOutputSizeHigh = 0x034e,
    YOutputSizeLow = 0x034f,
    /// X odd increment, drives horizontal binning
    XOddInc = 0x0383,
    /// Y odd increment, drives vertical binning
    YOddInc = 0x0387,
}

impl Register {
    pub const fn addr(self) -> u16 {
        self as u16
    }

    /// Map a raw register address back to a known register, if any
    pub fn from_addr(addr: u16) -> Option<Self> {
        use Register::*;
        let reg = match addr {
            0x0016 => ChipIdHigh,
            0x0017 => ChipIdLow,
            0x0100 => ModeSelect,
            0x0101 => ImageOrientation,
            0x0202 => ExposureHigh,
            0x0203 => ExposureLow,
            0x0204 => AnalogGainHigh,
            0x0205 => AnalogGainLow,
            0x0340 => FrameLengthHigh,
            0x0341 => FrameLengthLow,
            0x0342 => LineLengthHigh,
            0x0343 => LineLengthLow,
            0x0344 => XAddrStartHigh,
            0x0345 => XAddrStartLow,
            0x0346 => YAddrStartHigh,
            0x0347 => YAddrStartLow,
            0x0348 => XAddrEndHigh,
            0x0349 => XAddrEndLow,
            0x034a => YAddrEndHigh,
            0x034b => YAddrEndLow,
            0x034c => XOutputSizeHigh,
            0x034d => XOutputSizeLow,
            0x034e => YOutputSizeHigh,
            0x034f => YOutputSizeLow,
            0x0383 => XOddInc,
            0x0387 => YOddInc,
            _ => return None,
        };
        Some(reg)
    }
}

/// Values for [`Register::ModeSelect`]
#[repr(u8)]
pub enum ModeSelect {
    Standby = 0x00,
    Streaming = 0x01,
}

/// Expected contents of the chip id registers
pub const CHIP_ID: u16 = 0x0258;

/// Hardware ceiling for the analog gain code
pub const MAX_ANALOG_GAIN: u32 = 480;

/// Integration time bounds, in lines
pub const COARSE_INTG_TIME_MIN: u32 = 16;
pub const COARSE_INTG_TIME_MAX_MARGIN: u32 = 4;
/// Longest exposure whose frame length still fits the 16-bit VTS register
pub const MAX_EXPOSURE_LINES: u32 = 0xffff - COARSE_INTG_TIME_MAX_MARGIN;
/// This sensor family does not use fine integration time
pub const FINE_INTG_TIME_MIN: u32 = 0;
pub const FINE_INTG_TIME_MAX_MARGIN: u32 = 0;

/// Settle time after toggling [`Register::ModeSelect`], in milliseconds
pub const STREAM_SETTLE_MS: u32 = 25;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_addr_round_trips_known_registers() {
        for reg in [
            Register::ChipIdHigh,
            Register::ImageOrientation,
            Register::FrameLengthLow,
            Register::YOddInc,
        ]
        .iter()
        {
            assert_eq!(Register::from_addr(reg.addr()), Some(*reg));
        }
    }

    #[test]
    fn unknown_addresses_are_not_registers() {
        assert_eq!(Register::from_addr(0x0136), None);
        assert_eq!(Register::from_addr(0x0381), None);
    }
}
