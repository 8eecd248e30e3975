/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/
#![cfg_attr(not(test), no_std)]

//! Configuration driver for the Sony IMX258 image sensor
//! This imaging sensor has multiple interfaces:
//! - Two-wire CCI (i2c) for configuration registers
//! - MIPI CSI-2 pixel data out (up to four lanes)
//! This driver is concerned only with the i2c interface: selecting a capture
//! mode, loading its register table, and controlling exposure, gain and
//! frame length while the sensor streams.

#[cfg(feature = "rttdebug")]
use panic_rtt_core::rprintln;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c;

pub mod control;
pub mod modes;
pub mod orientation;
pub mod registers;
pub mod state;
pub mod table;
pub mod timings;

pub use control::{effective_gain, Control, ControlId};
pub use modes::{
    CaptureMode, FrameInterval, MipiConfig, ModeRegistry, PixelFormat,
};
pub use orientation::{set_orientation, FlipMode, Orientation};
pub use registers::Register;
pub use state::{DeviceRuntimeState, DeviceState, FlashMode};
pub use table::{RegisterEntry, RegisterKind, RegisterTable};
pub use timings::{derive_timings, Timings};

use registers::{ModeSelect, CHIP_ID, STREAM_SETTLE_MS};

/// Errors in this crate
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<CommE> {
    /// Sensor communication error on a register access.
    /// `value` is the byte being written, `None` for reads.
    RegisterIo {
        reg: u16,
        value: Option<u8>,
        cause: CommE,
    },

    /// The chip id registers did not hold the expected id
    DeviceMismatch { expected: u16, observed: u16 },

    /// Unsupported control, malformed control batch, or a request the
    /// current device state does not allow
    InvalidRequest,

    /// No capture mode has been selected
    NoActiveMode,
}

pub type Result<T, CommE> = core::result::Result<T, Error<CommE>>;

/// Default 7-bit bus address (SLASEL low)
pub const DEFAULT_I2C_ADDRESS: u8 = 0x1A;
/// Alternate 7-bit bus address (SLASEL high)
pub const ALT_I2C_ADDRESS: u8 = 0x10;

/// Board-level configuration
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub address: u8,
    pub flip_mode: FlipMode,
    /// Stretch the frame length to fit long exposures
    pub auto_adjust_fps: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_I2C_ADDRESS,
            flip_mode: FlipMode::Unset,
            auto_adjust_fps: true,
        }
    }
}

/// Main driver struct
pub struct Imx258<'a, I2C, D> {
    base_address: u8,
    i2c: I2C,
    delay: D,
    flip_mode: FlipMode,
    registry: &'a ModeRegistry,
    state: DeviceRuntimeState<'a>,
}

impl<'a, I2C, D, CommE> Imx258<'a, I2C, D>
where
    I2C: i2c::Write<Error = CommE>
        + i2c::Read<Error = CommE>
        + i2c::WriteRead<Error = CommE>,
    D: DelayMs<u32>,
{
    /// Create a new instance for a sensor that is still powered off.
    /// The registry is shared and must outlive the driver.
    pub fn new(
        i2c: I2C,
        delay: D,
        registry: &'a ModeRegistry,
        config: Config,
    ) -> Self {
        Self {
            base_address: config.address,
            i2c,
            delay,
            flip_mode: config.flip_mode,
            registry,
            state: DeviceRuntimeState::new(config.auto_adjust_fps),
        }
    }

    pub fn default(i2c: I2C, delay: D, registry: &'a ModeRegistry) -> Self {
        Self::new(i2c, delay, registry, Config::default())
    }

    /// Give back the bus and delay
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    pub fn state(&self) -> &DeviceRuntimeState<'a> {
        &self.state
    }

    pub fn registry(&self) -> &'a ModeRegistry {
        self.registry
    }

    /// Read the chip id registers and compare against the IMX258 id.
    /// A read failure (often: sensor unpowered) is reported as such,
    /// distinct from a wrong id.
    pub fn verify_identity(&mut self) -> Result<(), CommE> {
        let high = self.read_reg_u8(Register::ChipIdHigh.addr())?;
        let low = self.read_reg_u8(Register::ChipIdLow.addr())?;
        let observed = u16::from(high) << 8 | u16::from(low);

        if observed != CHIP_ID {
            #[cfg(feature = "rttdebug")]
            rprintln!(
                "imx258 wrong camera id, expected 0x{:04x}, detected 0x{:04x}",
                CHIP_ID,
                observed
            );
            return Err(Error::DeviceMismatch {
                expected: CHIP_ID,
                observed,
            });
        }

        #[cfg(feature = "rttdebug")]
        rprintln!("imx258 detected camera id 0x{:04x}", observed);
        Ok(())
    }

    /// Off -> SW standby. Power sequencing itself is up to the board.
    pub fn power_on(&mut self) -> Result<(), CommE> {
        match self.state.state {
            DeviceState::Off => {
                self.state.state = DeviceState::SwStandby;
                Ok(())
            }
            DeviceState::SwStandby => Ok(()),
            DeviceState::Streaming => Err(Error::InvalidRequest),
        }
    }

    /// SW standby -> Off. Streaming must be stopped first.
    pub fn power_off(&mut self) -> Result<(), CommE> {
        match self.state.state {
            DeviceState::Streaming => Err(Error::InvalidRequest),
            _ => {
                self.state.state = DeviceState::Off;
                self.state.vts_current = 0;
                Ok(())
            }
        }
    }

    /// Make a mode from the registry the active one. Its timings are ready
    /// for [`Self::get_timings`]; nothing is written to the sensor until
    /// [`Self::load_active_mode`].
    pub fn select_mode(
        &mut self,
        index: usize,
    ) -> Result<&'a CaptureMode, CommE> {
        if self.state.state == DeviceState::Streaming {
            return Err(Error::InvalidRequest);
        }
        let registry: &'a ModeRegistry = self.registry;
        let mode = registry.get(index).ok_or(Error::InvalidRequest)?;
        self.state.active_mode = Some(mode);
        // the new mode's own frame length is the floor until read back
        self.state.vts_minimum = mode.timings().frame_length_lines;
        self.state.vts_current = 0;
        self.state.frame_interval_override = None;
        Ok(mode)
    }

    pub fn select_mode_by_name(
        &mut self,
        name: &str,
    ) -> Result<&'a CaptureMode, CommE> {
        let (index, _) =
            self.registry.find(name).ok_or(Error::InvalidRequest)?;
        self.select_mode(index)
    }

    pub fn active_mode(&self) -> Option<&'a CaptureMode> {
        self.state.active_mode
    }

    /// Override the frame interval reported through [`Self::get_timings`]
    pub fn set_frame_interval(
        &mut self,
        interval: FrameInterval,
    ) -> Result<(), CommE> {
        if interval.denominator == 0 || interval.numerator == 0 {
            return Err(Error::InvalidRequest);
        }
        self.state.frame_interval_override = Some(interval);
        Ok(())
    }

    pub fn frame_interval(&self) -> Option<FrameInterval> {
        self.state
            .frame_interval_override
            .or_else(|| self.state.active_mode.map(|m| m.frame_interval))
    }

    /// Timings of the active mode, with the pixel clock recomputed from the
    /// frame length currently programmed once streaming has begun
    pub fn get_timings(&self) -> Result<Timings, CommE> {
        let mode = self.state.active_mode.ok_or(Error::NoActiveMode)?;
        let mut t = *mode.timings();

        let vts = if self.state.vts_current == 0 {
            t.frame_length_lines
        } else {
            self.state.vts_current
        };
        let interval = self
            .state
            .frame_interval_override
            .unwrap_or(mode.frame_interval);
        t.vt_pix_clk_freq_hz = timings::pixel_clock_hz(
            interval.denominator,
            vts,
            t.line_length_pck,
        );
        Ok(t)
    }

    /// Send the active mode's register table to the sensor, with the
    /// orientation patched per the configured flip policy.
    /// The shared catalog entry is never modified. The table carries its
    /// own exposure and gain, so host values are queued for stream start.
    pub fn load_active_mode(&mut self) -> Result<(), CommE> {
        let mode = self.state.active_mode.ok_or(Error::NoActiveMode)?;
        if self.state.state != DeviceState::SwStandby {
            return Err(Error::InvalidRequest);
        }

        let mut table = mode.register_table();
        let _orientation = set_orientation(&mut table, self.flip_mode);
        #[cfg(feature = "rttdebug")]
        rprintln!("imx258 {} orientation {:?}", mode.name, _orientation);
        self.write_register_table(&table)?;
        self.state.vts_current = 0;
        self.state.aec_pending = self.state.aec_requested;
        Ok(())
    }

    /// Replay a register table in order, stopping at the first failure
    pub fn write_register_table(
        &mut self,
        table: &[RegisterEntry],
    ) -> Result<(), CommE> {
        for entry in table {
            match entry.kind {
                RegisterKind::Data => {
                    let val = (entry.value & 0xff) as u8;
                    self.write_reg_u8(entry.address, val)?
                }
                RegisterKind::Delay => {
                    self.delay.delay_ms(u32::from(entry.value))
                }
            }
        }
        Ok(())
    }

    /// SW standby -> streaming.
    /// The frame length programmed by the mode becomes the floor for auto
    /// frame rate, and pending exposure/gain are applied.
    pub fn start_streaming(&mut self) -> Result<(), CommE> {
        if self.state.active_mode.is_none() {
            return Err(Error::NoActiveMode);
        }
        if self.state.state != DeviceState::SwStandby {
            return Err(Error::InvalidRequest);
        }

        #[cfg(feature = "rttdebug")]
        rprintln!(
            "imx258 active config={}",
            self.state.active_mode.map_or("", |m| m.name)
        );

        let vts = self.get_current_vts()?;
        self.state.vts_minimum = vts;
        self.state.vts_current = vts;

        if self.state.aec_pending {
            self.write_aec()?;
        }

        self.write_reg_u8(
            Register::ModeSelect.addr(),
            ModeSelect::Streaming as u8,
        )?;
        self.delay.delay_ms(STREAM_SETTLE_MS);
        self.state.state = DeviceState::Streaming;
        Ok(())
    }

    /// Streaming -> SW standby
    pub fn stop_streaming(&mut self) -> Result<(), CommE> {
        if self.state.state != DeviceState::Streaming {
            return Err(Error::InvalidRequest);
        }

        #[cfg(feature = "rttdebug")]
        rprintln!("imx258 stop streaming");

        self.write_reg_u8(
            Register::ModeSelect.addr(),
            ModeSelect::Standby as u8,
        )?;
        self.delay.delay_ms(STREAM_SETTLE_MS);
        self.state.state = DeviceState::SwStandby;
        Ok(())
    }

    /// Read a u8 from a 16-bit register address
    pub fn read_reg_u8(&mut self, reg: u16) -> Result<u8, CommE> {
        let cmd_buf = reg.to_be_bytes();
        let mut recv_buf = [0u8];
        self.i2c
            .write_read(self.base_address, &cmd_buf, &mut recv_buf)
            .map_err(|cause| Error::RegisterIo {
                reg,
                value: None,
                cause,
            })?;
        Ok(recv_buf[0])
    }

    /// Read a big-endian u16 spread over `reg` and the address after it
    pub fn read_reg_u16(&mut self, reg: u16) -> Result<u16, CommE> {
        let upper = u16::from(self.read_reg_u8(reg)?) << 8;
        let lower = u16::from(self.read_reg_u8(reg.wrapping_add(1))?);
        Ok(upper | lower)
    }

    /// Write a u8 to a 16-bit register address
    pub fn write_reg_u8(&mut self, reg: u16, val: u8) -> Result<(), CommE> {
        let [hi, lo] = reg.to_be_bytes();
        let write_buf = [hi, lo, val];
        self.i2c
            .write(self.base_address, &write_buf)
            .map_err(|cause| Error::RegisterIo {
                reg,
                value: Some(val),
                cause,
            })
    }
}
