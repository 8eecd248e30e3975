/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

//! Exposure, gain and frame length control

#[cfg(feature = "rttdebug")]
use panic_rtt_core::rprintln;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c;

use crate::registers::{
    Register, COARSE_INTG_TIME_MAX_MARGIN, MAX_ANALOG_GAIN, MAX_EXPOSURE_LINES,
};
use crate::state::FlashMode;
use crate::{Error, Imx258, Result};

/// Host control ids (V4L2 numbering)
pub const CID_EXPOSURE: u32 = 0x0098_0911;
pub const CID_GAIN: u32 = 0x0098_0913;
pub const CID_FLASH_LED_MODE: u32 = 0x009c_0901;

/// Controls the host may address
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlId {
    Gain,
    Exposure,
    FlashMode,
    Unsupported(u32),
}

impl ControlId {
    pub fn from_raw(id: u32) -> Self {
        match id {
            CID_GAIN => ControlId::Gain,
            CID_EXPOSURE => ControlId::Exposure,
            CID_FLASH_LED_MODE => ControlId::FlashMode,
            other => ControlId::Unsupported(other),
        }
    }
}

/// A control together with its new value
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Control {
    Gain(u32),
    /// Coarse integration time, in lines
    Exposure(u32),
    FlashMode(FlashMode),
}

impl Control {
    pub fn id(&self) -> ControlId {
        match self {
            Control::Gain(_) => ControlId::Gain,
            Control::Exposure(_) => ControlId::Exposure,
            Control::FlashMode(_) => ControlId::FlashMode,
        }
    }
}

/// Analog gain code actually programmed: `gain` scaled by `gain_percent`,
/// capped at the hardware maximum
pub fn effective_gain(gain: u32, gain_percent: u32) -> u32 {
    let scaled = u64::from(gain) * u64::from(gain_percent) / 100;
    scaled.min(u64::from(MAX_ANALOG_GAIN)) as u32
}

/// Frame length needed to fit `exposure_time`, never below `vts_minimum`
pub fn frame_length_for(exposure_time: u32, vts_minimum: u32) -> u32 {
    exposure_time
        .saturating_add(COARSE_INTG_TIME_MAX_MARGIN)
        .max(vts_minimum)
}

/// Exposures whose frame length would not fit the VTS register are refused
fn check_exposure<CommE>(exposure_time: u32) -> Result<(), CommE> {
    if exposure_time > MAX_EXPOSURE_LINES {
        return Err(Error::InvalidRequest);
    }
    Ok(())
}

impl<'a, I2C, D, CommE> Imx258<'a, I2C, D>
where
    I2C: i2c::Write<Error = CommE>
        + i2c::Read<Error = CommE>
        + i2c::WriteRead<Error = CommE>,
    D: DelayMs<u32>,
{
    /// Frame length (VTS) currently programmed in the sensor
    pub fn get_current_vts(&mut self) -> Result<u32, CommE> {
        let vts = self.read_reg_u16(Register::FrameLengthHigh.addr())?;
        Ok(u32::from(vts))
    }

    /// Stretch the frame length so `exposure_time` fits, without going below
    /// the active mode's floor.
    /// Stops at the first failed write and leaves `vts_current` unchanged.
    pub fn auto_adjust_frame_length(
        &mut self,
        exposure_time: u32,
    ) -> Result<u32, CommE> {
        check_exposure(exposure_time)?;
        let vts = frame_length_for(exposure_time, self.state.vts_minimum);
        let [hi, lo] = (vts as u16).to_be_bytes();

        self.write_reg_u8(Register::FrameLengthLow.addr(), lo)?;
        self.write_reg_u8(Register::FrameLengthHigh.addr(), hi)?;

        self.state.vts_current = vts;
        Ok(vts)
    }

    /// Request a new exposure and gain.
    ///
    /// With the sensor off the values are kept and written at the next
    /// stream start; the call succeeds without touching the bus.
    /// Otherwise every register write is attempted even if an earlier one
    /// failed, and the first failure is returned.
    pub fn apply_exposure_and_gain(
        &mut self,
        exposure_time: u32,
        gain: u32,
        gain_percent: u32,
        auto_adjust_fps: bool,
    ) -> Result<(), CommE> {
        check_exposure(exposure_time)?;
        self.state.exposure_time = exposure_time;
        self.state.gain = gain;
        self.state.gain_percent = gain_percent;
        self.state.auto_adjust_fps = auto_adjust_fps;
        self.write_aec()
    }

    /// Write the stored exposure and gain. The values stay pending until
    /// every write has gone through.
    pub(crate) fn write_aec(&mut self) -> Result<(), CommE> {
        self.state.aec_requested = true;
        self.state.aec_pending = true;
        if !self.state.state.is_writable() {
            return Ok(());
        }

        let gain = effective_gain(self.state.gain, self.state.gain_percent);
        let exposure_time = self.state.exposure_time;
        let mut first_err = None;

        // frame length first, so it already fits the new exposure
        if self.state.auto_adjust_fps {
            if let Err(err) = self.auto_adjust_frame_length(exposure_time) {
                first_err = Some(err);
            }
        }

        let [exp_hi, exp_lo] = (exposure_time as u16).to_be_bytes();
        let writes = [
            (Register::AnalogGainHigh, ((gain >> 8) & 0x01) as u8),
            (Register::AnalogGainLow, (gain & 0xff) as u8),
            (Register::ExposureHigh, exp_hi),
            (Register::ExposureLow, exp_lo),
        ];
        for &(reg, val) in writes.iter() {
            if let Err(err) = self.write_reg_u8(reg.addr(), val) {
                #[cfg(feature = "rttdebug")]
                rprintln!(
                    "imx258 aec write 0x{:04x}=0x{:02x} failed",
                    reg.addr(),
                    val
                );
                if first_err.is_none() {
                    first_err = Some(err);
                }
            }
        }

        match first_err {
            Some(err) => Err(err),
            None => {
                self.state.aec_pending = false;
                Ok(())
            }
        }
    }

    pub fn set_gain_percent(&mut self, gain_percent: u32) {
        self.state.gain_percent = gain_percent;
    }

    pub fn set_auto_adjust_fps(&mut self, enabled: bool) {
        self.state.auto_adjust_fps = enabled;
    }

    /// Current value of a control
    pub fn get_control(&self, id: ControlId) -> Result<u32, CommE> {
        match id {
            ControlId::Gain => Ok(self.state.gain),
            ControlId::Exposure => Ok(self.state.exposure_time),
            ControlId::FlashMode => Ok(self.state.flash_mode.raw()),
            ControlId::Unsupported(_) => Err(Error::InvalidRequest),
        }
    }

    /// Set a single control. Gain and exposure take effect immediately;
    /// flash mode can only travel in a batch with them.
    pub fn set_control(&mut self, control: Control) -> Result<(), CommE> {
        match control {
            Control::Gain(gain) => self.state.gain = gain,
            Control::Exposure(exposure_time) => {
                check_exposure(exposure_time)?;
                self.state.exposure_time = exposure_time;
            }
            Control::FlashMode(_) => return Err(Error::InvalidRequest),
        }
        self.write_aec()
    }

    /// Set a batch of controls and apply exposure and gain once.
    /// The batch must lead with gain or exposure.
    pub fn set_ext_controls(
        &mut self,
        controls: &[Control],
    ) -> Result<(), CommE> {
        match controls.first().map(Control::id) {
            Some(ControlId::Gain) | Some(ControlId::Exposure) => {}
            _ => return Err(Error::InvalidRequest),
        }
        for control in controls {
            if let Control::Exposure(exposure_time) = *control {
                check_exposure(exposure_time)?;
            }
        }

        for control in controls {
            match *control {
                Control::Gain(gain) => self.state.gain = gain,
                Control::Exposure(exposure_time) => {
                    self.state.exposure_time = exposure_time
                }
                Control::FlashMode(mode) => self.state.flash_mode = mode,
            }
        }
        self.write_aec()
    }
}
