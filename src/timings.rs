/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

//! Sensor timings derived from a mode's register table

use crate::registers::{
    Register, COARSE_INTG_TIME_MAX_MARGIN, COARSE_INTG_TIME_MIN,
    FINE_INTG_TIME_MAX_MARGIN, FINE_INTG_TIME_MIN,
};
use crate::table::{RegisterEntry, RegisterKind};

/// Frame geometry and timing a mode programs into the sensor
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timings {
    /// HTS: total line length in pixel clocks
    pub line_length_pck: u32,
    /// VTS: total frame length in lines
    pub frame_length_lines: u32,
    pub binning_factor_x: u32,
    pub binning_factor_y: u32,
    pub crop_horizontal_start: u32,
    pub crop_horizontal_end: u32,
    pub crop_vertical_start: u32,
    pub crop_vertical_end: u32,
    pub sensor_output_width: u32,
    pub sensor_output_height: u32,
    pub vt_pix_clk_freq_hz: u64,
    pub coarse_integration_time_min: u32,
    pub coarse_integration_time_max_margin: u32,
    pub fine_integration_time_min: u32,
    pub fine_integration_time_max_margin: u32,
}

/// Video timing pixel clock implied by a frame rate and frame size
pub fn pixel_clock_hz(
    frame_rate_denominator: u32,
    frame_length_lines: u32,
    line_length_pck: u32,
) -> u64 {
    u64::from(frame_rate_denominator)
        * u64::from(frame_length_lines)
        * u64::from(line_length_pck)
}

/// Binning factor encoded by an odd-increment register.
/// Never less than 1, even for a zero increment.
pub fn binning_factor(raw_increment: u16) -> u32 {
    let factor = ((u32::from(raw_increment) >> 4) + 1) / 2;
    factor.max(1)
}

fn set_high(acc: &mut u32, value: u16) {
    *acc = u32::from(value & 0xff) << 8;
}

fn or_low(acc: &mut u32, value: u16) {
    *acc |= u32::from(value & 0xff);
}

fn accumulate(mut t: Timings, entry: &RegisterEntry) -> Timings {
    if entry.kind != RegisterKind::Data {
        return t;
    }
    let val = entry.value;
    // high bytes precede their low bytes in every authored table
    match Register::from_addr(entry.address) {
        Some(Register::FrameLengthHigh) => {
            set_high(&mut t.frame_length_lines, val)
        }
        Some(Register::FrameLengthLow) => {
            or_low(&mut t.frame_length_lines, val)
        }
        Some(Register::LineLengthHigh) => set_high(&mut t.line_length_pck, val),
        Some(Register::LineLengthLow) => or_low(&mut t.line_length_pck, val),
        Some(Register::XOddInc) => t.binning_factor_x = binning_factor(val),
        Some(Register::YOddInc) => t.binning_factor_y = binning_factor(val),
        Some(Register::XAddrStartHigh) => {
            set_high(&mut t.crop_horizontal_start, val)
        }
        Some(Register::XAddrStartLow) => {
            or_low(&mut t.crop_horizontal_start, val)
        }
        Some(Register::YAddrStartHigh) => {
            set_high(&mut t.crop_vertical_start, val)
        }
        Some(Register::YAddrStartLow) => {
            or_low(&mut t.crop_vertical_start, val)
        }
        Some(Register::XAddrEndHigh) => {
            set_high(&mut t.crop_horizontal_end, val)
        }
        Some(Register::XAddrEndLow) => or_low(&mut t.crop_horizontal_end, val),
        Some(Register::YAddrEndHigh) => set_high(&mut t.crop_vertical_end, val),
        Some(Register::YAddrEndLow) => or_low(&mut t.crop_vertical_end, val),
        Some(Register::XOutputSizeHigh) => {
            set_high(&mut t.sensor_output_width, val)
        }
        Some(Register::XOutputSizeLow) => {
            or_low(&mut t.sensor_output_width, val)
        }
        Some(Register::YOutputSizeHigh) => {
            set_high(&mut t.sensor_output_height, val)
        }
        Some(Register::YOutputSizeLow) => {
            or_low(&mut t.sensor_output_height, val)
        }
        _ => {}
    }
    t
}

/// Scan a register table once, in order, and derive the timings it programs.
///
/// `frame_rate_denominator` is the denominator of the mode's frame interval
/// (the frame rate, for a numerator of 1) and sets the pixel clock.
pub fn derive_timings(
    table: &[RegisterEntry],
    frame_rate_denominator: u32,
) -> Timings {
    let start = Timings {
        binning_factor_x: 1,
        binning_factor_y: 1,
        ..Timings::default()
    };
    let scanned = table.iter().fold(start, accumulate);

    Timings {
        vt_pix_clk_freq_hz: pixel_clock_hz(
            frame_rate_denominator,
            scanned.frame_length_lines,
            scanned.line_length_pck,
        ),
        coarse_integration_time_min: COARSE_INTG_TIME_MIN,
        coarse_integration_time_max_margin: COARSE_INTG_TIME_MAX_MARGIN,
        fine_integration_time_min: FINE_INTG_TIME_MIN,
        fine_integration_time_max_margin: FINE_INTG_TIME_MAX_MARGIN,
        ..scanned
    }
}
