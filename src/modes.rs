/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

//! Capture modes supported by this driver

use crate::table::{
    RegisterEntry, RegisterTable, INIT_TAB_3264_1836_30FPS,
    INIT_TAB_3264_2448_24FPS,
};
use crate::timings::{derive_timings, Timings};

/// External clock feeding the sensor PLL
pub const EXT_CLK_HZ: u32 = 24_000_000;

/// Number of modes in [`ModeRegistry`]
pub const NUM_MODES: usize = 2;

/// Frame interval as a fraction of a second
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameInterval {
    pub numerator: u32,
    pub denominator: u32,
}

impl FrameInterval {
    pub const fn fps(frames_per_second: u32) -> Self {
        Self {
            numerator: 1,
            denominator: frames_per_second,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelFormat {
    /// Bayer RGGB, 10 bits per sample
    Srggb10,
}

/// MIPI CSI-2 link parameters for a mode
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MipiConfig {
    pub virtual_channel: u8,
    pub lanes: u8,
    pub mbps_per_lane: u32,
    pub ext_clk_hz: u32,
}

const MIPI_4LANE_798: MipiConfig = MipiConfig {
    virtual_channel: 0,
    lanes: 4,
    mbps_per_lane: 798,
    ext_clk_hz: EXT_CLK_HZ,
};

/// One capture mode: output format plus the register table that programs it
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CaptureMode {
    pub name: &'static str,
    pub frame_width: u32,
    pub frame_height: u32,
    pub pixel_format: PixelFormat,
    pub frame_interval: FrameInterval,
    pub auto_exposure_enabled: bool,
    pub auto_gain_enabled: bool,
    pub auto_wb_enabled: bool,
    pub vertical_blanking_budget_us: u32,
    pub interface_config: MipiConfig,
    registers: &'static [RegisterEntry],
    timings: Timings,
}

impl CaptureMode {
    fn new(
        name: &'static str,
        frame_width: u32,
        frame_height: u32,
        frame_interval: FrameInterval,
        registers: &'static [RegisterEntry],
    ) -> Self {
        Self {
            name,
            frame_width,
            frame_height,
            pixel_format: PixelFormat::Srggb10,
            frame_interval,
            auto_exposure_enabled: false,
            auto_gain_enabled: false,
            auto_wb_enabled: false,
            vertical_blanking_budget_us: 5000,
            interface_config: MIPI_4LANE_798,
            registers,
            timings: derive_timings(registers, frame_interval.denominator),
        }
    }

    /// The mode's pristine register table
    pub fn registers(&self) -> &'static [RegisterEntry] {
        self.registers
    }

    /// A mutable copy of the register table, safe to patch before sending
    pub fn register_table(&self) -> RegisterTable {
        // every table is checked against the capacity at compile time
        self.registers.iter().copied().collect()
    }

    /// Timings derived from the register table when the registry was built
    pub fn timings(&self) -> &Timings {
        &self.timings
    }
}

/// Fixed, immutable catalog of capture modes
#[derive(Clone, Debug)]
pub struct ModeRegistry {
    modes: [CaptureMode; NUM_MODES],
}

impl ModeRegistry {
    /// Build the catalog, deriving each mode's timings once
    pub fn new() -> Self {
        Self {
            modes: [
                CaptureMode::new(
                    "3264x1836_30fps",
                    3264,
                    1836,
                    FrameInterval::fps(30),
                    INIT_TAB_3264_1836_30FPS,
                ),
                CaptureMode::new(
                    "3264x2448_24fps",
                    3264,
                    2448,
                    FrameInterval::fps(24),
                    INIT_TAB_3264_2448_24FPS,
                ),
            ],
        }
    }

    pub fn modes(&self) -> &[CaptureMode] {
        &self.modes
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CaptureMode> {
        self.modes.get(index)
    }

    pub fn find(&self, name: &str) -> Option<(usize, &CaptureMode)> {
        self.modes.iter().enumerate().find(|(_, m)| m.name == name)
    }

    /// The mode used until the host selects another one
    pub fn default_mode(&self) -> &CaptureMode {
        &self.modes[0]
    }
}

impl Default for ModeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// an empty catalog is a build misconfiguration
const _: () = assert!(NUM_MODES > 0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_lists_both_modes_in_order() {
        let registry = ModeRegistry::new();
        let names: heapless::Vec<&str, NUM_MODES> =
            registry.modes().iter().map(|m| m.name).collect();
        assert_eq!(names.as_slice(), &["3264x1836_30fps", "3264x2448_24fps"]);
    }

    #[test]
    fn timings_are_cached_per_mode() {
        let registry = ModeRegistry::new();
        let m = registry.get(1).unwrap();
        assert_eq!(m.timings().frame_length_lines, 2480);
        assert_eq!(m.timings().vt_pix_clk_freq_hz, 24 * 2480 * 5352);
        assert_eq!(m.frame_interval, FrameInterval::fps(24));
    }

    #[test]
    fn lookup_by_name() {
        let registry = ModeRegistry::new();
        let (index, mode) = registry.find("3264x2448_24fps").unwrap();
        assert_eq!(index, 1);
        assert_eq!(mode.frame_height, 2448);
        assert!(registry.find("640x480_90fps").is_none());
        assert!(registry.get(NUM_MODES).is_none());
    }

    #[test]
    fn table_copy_matches_pristine_table() {
        let registry = ModeRegistry::new();
        let mode = registry.default_mode();
        let copy = mode.register_table();
        assert_eq!(copy.as_slice(), mode.registers());
    }
}
