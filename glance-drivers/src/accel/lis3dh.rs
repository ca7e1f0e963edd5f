//! LIS3DH 3-axis accelerometer (I2C)
//!
//! Runs in high-resolution mode at ±2g, where one LSB of the left-justified
//! 12-bit output is 1 milli-g. Samples queue in the 32-deep hardware FIFO
//! (stream mode) and are drained into batches of the configured size.
//!
//! # Register access
//!
//! Multi-byte reads set bit 7 of the register address to auto-increment.

use embedded_hal_async::i2c::I2c;
use glance_core::gesture::Sample;
use glance_core::settings::SAMPLES_RANGE;
use heapless::Vec;

use super::AccelError;

/// LIS3DH register addresses
pub mod reg {
    pub const WHO_AM_I: u8 = 0x0F;
    pub const CTRL_REG1: u8 = 0x20;
    pub const CTRL_REG4: u8 = 0x23;
    pub const CTRL_REG5: u8 = 0x24;
    pub const OUT_X_L: u8 = 0x28;
    pub const FIFO_CTRL_REG: u8 = 0x2E;
    pub const FIFO_SRC_REG: u8 = 0x2F;
}

/// Expected WHO_AM_I value
pub const DEVICE_ID: u8 = 0x33;

/// I2C address with SA0 low
pub const DEFAULT_ADDRESS: u8 = 0x18;

/// Largest batch the worker can ask for
pub const MAX_BATCH: usize = *SAMPLES_RANGE.end() as usize;

const AUTO_INCREMENT: u8 = 0x80;
const AXES_ENABLED: u8 = 0b0000_0111;
/// Block data update, high-resolution, ±2g
const CTRL4_BDU_HR: u8 = 0b1000_1000;
const CTRL5_FIFO_EN: u8 = 0b0100_0000;
const FIFO_MODE_STREAM: u8 = 0b1000_0000;
const FIFO_SRC_OVRN: u8 = 0b0100_0000;
const FIFO_SRC_FSS: u8 = 0b0001_1111;
const FIFO_DEPTH: usize = 32;

/// Output data rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataRate {
    Hz1,
    #[default]
    Hz10,
    Hz25,
    Hz50,
    Hz100,
}

impl DataRate {
    /// ODR field of CTRL_REG1
    fn odr_bits(self) -> u8 {
        let odr = match self {
            DataRate::Hz1 => 0b0001,
            DataRate::Hz10 => 0b0010,
            DataRate::Hz25 => 0b0011,
            DataRate::Hz50 => 0b0100,
            DataRate::Hz100 => 0b0101,
        };
        odr << 4
    }

    /// Time between samples (ms)
    pub fn period_ms(self) -> u64 {
        match self {
            DataRate::Hz1 => 1000,
            DataRate::Hz10 => 100,
            DataRate::Hz25 => 40,
            DataRate::Hz50 => 20,
            DataRate::Hz100 => 10,
        }
    }
}

/// How the sensor is mounted relative to the display
///
/// The gesture envelope expects x across the display and y along it, with
/// y negative when the top edge tilts towards the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Orientation {
    pub swap_xy: bool,
    pub invert_x: bool,
    pub invert_y: bool,
    pub invert_z: bool,
}

impl Orientation {
    fn apply(&self, x: i16, y: i16, z: i16) -> Sample {
        let (x, y) = if self.swap_xy { (y, x) } else { (x, y) };
        let flip = |v: i16, invert: bool| if invert { v.saturating_neg() } else { v };
        Sample::new(
            flip(x, self.invert_x),
            flip(y, self.invert_y),
            flip(z, self.invert_z),
        )
    }
}

/// Decode one left-justified 12-bit axis reading to milli-g
fn axis_mg(lo: u8, hi: u8) -> i16 {
    i16::from_le_bytes([lo, hi]) >> 4
}

/// LIS3DH driver
pub struct Lis3dh<I> {
    i2c: I,
    address: u8,
    orientation: Orientation,
}

impl<I: I2c> Lis3dh<I> {
    pub fn new(i2c: I, address: u8, orientation: Orientation) -> Self {
        Self {
            i2c,
            address,
            orientation,
        }
    }

    /// Release the bus
    pub fn release(self) -> I {
        self.i2c
    }

    async fn read_reg(&mut self, reg: u8) -> Result<u8, AccelError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .await
            .map_err(|_| AccelError::Bus)?;
        Ok(buf[0])
    }

    async fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), AccelError> {
        self.i2c
            .write(self.address, &[reg, value])
            .await
            .map_err(|_| AccelError::Bus)
    }

    /// Probe the device and start sampling into the FIFO
    pub async fn init(&mut self, rate: DataRate) -> Result<(), AccelError> {
        if self.read_reg(reg::WHO_AM_I).await? != DEVICE_ID {
            return Err(AccelError::WrongDevice);
        }
        self.write_reg(reg::CTRL_REG1, rate.odr_bits() | AXES_ENABLED)
            .await?;
        self.write_reg(reg::CTRL_REG4, CTRL4_BDU_HR).await?;
        self.write_reg(reg::CTRL_REG5, CTRL5_FIFO_EN).await?;
        self.write_reg(reg::FIFO_CTRL_REG, FIFO_MODE_STREAM).await
    }

    /// Stop sampling (power-down mode)
    pub async fn power_down(&mut self) -> Result<(), AccelError> {
        self.write_reg(reg::CTRL_REG1, 0).await
    }

    /// Number of unread samples in the FIFO
    pub async fn available(&mut self) -> Result<usize, AccelError> {
        let src = self.read_reg(reg::FIFO_SRC_REG).await?;
        if src & FIFO_SRC_OVRN != 0 {
            Ok(FIFO_DEPTH)
        } else {
            Ok((src & FIFO_SRC_FSS) as usize)
        }
    }

    /// Read the oldest sample
    pub async fn read_sample(&mut self) -> Result<Sample, AccelError> {
        let mut raw = [0u8; 6];
        self.i2c
            .write_read(self.address, &[reg::OUT_X_L | AUTO_INCREMENT], &mut raw)
            .await
            .map_err(|_| AccelError::Bus)?;
        Ok(self.orientation.apply(
            axis_mg(raw[0], raw[1]),
            axis_mg(raw[2], raw[3]),
            axis_mg(raw[4], raw[5]),
        ))
    }

    /// Drain the FIFO into `batch` until it holds `target` samples
    ///
    /// Returns `true` once the batch is complete. A batch larger than the
    /// FIFO fills over several calls.
    pub async fn fill_batch(
        &mut self,
        batch: &mut Vec<Sample, MAX_BATCH>,
        target: usize,
    ) -> Result<bool, AccelError> {
        let target = target.clamp(1, MAX_BATCH);
        let wanted = target.saturating_sub(batch.len());
        let count = self.available().await?.min(wanted);
        for _ in 0..count {
            let sample = self.read_sample().await?;
            // Capacity is MAX_BATCH and target never exceeds it
            let _ = batch.push(sample);
        }
        Ok(batch.len() >= target)
    }
}
