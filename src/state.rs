/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

//! Per-device runtime state

use crate::modes::{CaptureMode, FrameInterval};

/// Power / streaming state of the sensor
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    /// Unpowered, registers unreachable
    Off,
    /// Powered, registers writable, not capturing
    SwStandby,
    Streaming,
}

impl DeviceState {
    /// Whether exposure and gain registers may be written in this state
    pub fn is_writable(self) -> bool {
        match self {
            DeviceState::SwStandby | DeviceState::Streaming => true,
            DeviceState::Off => false,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashMode {
    None,
    Flash,
    Torch,
}

impl FlashMode {
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(FlashMode::None),
            1 => Some(FlashMode::Flash),
            2 => Some(FlashMode::Torch),
            _ => None,
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            FlashMode::None => 0,
            FlashMode::Flash => 1,
            FlashMode::Torch => 2,
        }
    }
}

/// Everything the driver tracks about one physical sensor
#[derive(Clone, Debug)]
pub struct DeviceRuntimeState<'a> {
    pub state: DeviceState,
    pub active_mode: Option<&'a CaptureMode>,
    /// Frame length floor for auto frame rate: the mode's own frame length
    /// once selected, then the value read back at stream start
    pub vts_minimum: u32,
    /// Frame length last written, 0 until streaming has begun
    pub vts_current: u32,
    /// Coarse integration time, in lines
    pub exposure_time: u32,
    /// Requested analog gain code, before scaling
    pub gain: u32,
    pub gain_percent: u32,
    pub flash_mode: FlashMode,
    pub auto_adjust_fps: bool,
    pub frame_interval_override: Option<FrameInterval>,
    /// Exposure/gain have been set by the host at least once
    pub aec_requested: bool,
    /// Exposure/gain must be written again at the next stream start
    pub aec_pending: bool,
}

impl<'a> DeviceRuntimeState<'a> {
    pub fn new(auto_adjust_fps: bool) -> Self {
        Self {
            state: DeviceState::Off,
            active_mode: None,
            vts_minimum: 0,
            vts_current: 0,
            exposure_time: 0,
            gain: 0,
            gain_percent: 100,
            flash_mode: FlashMode::None,
            auto_adjust_fps,
            frame_interval_override: None,
            aec_requested: false,
            aec_pending: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_powered_states_are_writable() {
        assert!(!DeviceState::Off.is_writable());
        assert!(DeviceState::SwStandby.is_writable());
        assert!(DeviceState::Streaming.is_writable());
    }

    #[test]
    fn new_state_starts_off_without_mode() {
        let s = DeviceRuntimeState::new(true);
        assert_eq!(s.state, DeviceState::Off);
        assert!(s.active_mode.is_none());
        assert_eq!(s.gain_percent, 100);
        assert_eq!(s.vts_current, 0);
        assert!(!s.aec_requested && !s.aec_pending);
    }

    #[test]
    fn flash_mode_raw_values() {
        assert_eq!(FlashMode::from_raw(2), Some(FlashMode::Torch));
        assert_eq!(FlashMode::from_raw(7), None);
        assert_eq!(FlashMode::Flash.raw(), 1);
    }
}
