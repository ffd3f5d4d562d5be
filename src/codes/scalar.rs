/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Fixed-width big-endian integers, fixed-point numbers and IEEE floats.
//!
//! Multi-byte values are always stored most-significant byte first, which is
//! the byte order of ISO base media files, independently of the endianness of
//! the host.
//!
//! # Fixed-point numbers
//!
//! Two fixed-point formats are used in box headers (for instance, for
//! playback rate, volume and track dimensions):
//!
//! - 8.8: an unsigned byte of integer part followed by an unsigned byte of
//!   fractional part in units of 1/256;
//! - 16.16: a big-endian `u16` of integer part followed by a big-endian `u16`
//!   of fractional part in units of 1/65536.
//!
//! Writing truncates the fractional part to the representable precision.
//! Values that are negative, NaN, or whose integer part does not fit are
//! rejected with [`ErrorKind::OutOfRange`](crate::error::ErrorKind::OutOfRange).

use crate::error::{Error, Result};
use crate::traits::*;
use num_traits::ToPrimitive;

/// The widths in bytes accepted by [`ScalarRead::read_uint`] and
/// [`ScalarWrite::write_uint`].
pub const UINT_WIDTHS: [usize; 5] = [1, 2, 3, 4, 8];

/// Trait for reading big-endian scalars.
pub trait ScalarRead: ByteRead {
    #[inline]
    fn read_u8(&mut self) -> Result<u8> {
        let mut data = [0_u8; 1];
        self.read_bytes(&mut data)?;
        Ok(data[0])
    }

    #[inline]
    fn read_u16(&mut self) -> Result<u16> {
        let mut data = [0_u8; 2];
        self.read_bytes(&mut data)?;
        Ok(u16::from_be_bytes(data))
    }

    #[inline]
    fn read_u24(&mut self) -> Result<u32> {
        let mut data = [0_u8; 3];
        self.read_bytes(&mut data)?;
        Ok((data[0] as u32) << 16 | (data[1] as u32) << 8 | data[2] as u32)
    }

    #[inline]
    fn read_u32(&mut self) -> Result<u32> {
        let mut data = [0_u8; 4];
        self.read_bytes(&mut data)?;
        Ok(u32::from_be_bytes(data))
    }

    #[inline]
    fn read_u64(&mut self) -> Result<u64> {
        let mut data = [0_u8; 8];
        self.read_bytes(&mut data)?;
        Ok(data
            .iter()
            .fold(0_u64, |value, &byte| value << 8 | byte as u64))
    }

    /// Read an unsigned integer of `width` bytes, which must be one of
    /// [`UINT_WIDTHS`].
    fn read_uint(&mut self, width: usize) -> Result<u64> {
        match width {
            1 => self.read_u8().map(u64::from),
            2 => self.read_u16().map(u64::from),
            3 => self.read_u24().map(u64::from),
            4 => self.read_u32().map(u64::from),
            8 => self.read_u64(),
            _ => Err(Error::precondition("read_uint")
                .with_msg(format!("unsupported integer width {}", width))),
        }
    }

    /// Read an 8.8 fixed-point number.
    fn read_fixed_8_8(&mut self) -> Result<f32> {
        let int = self.read_u8()?;
        let frac = self.read_u8()?;
        Ok(f32::from(int) + f32::from(frac) / 256.0)
    }

    /// Read a 16.16 fixed-point number.
    fn read_fixed_16_16(&mut self) -> Result<f32> {
        let int = self.read_u16()?;
        let frac = self.read_u16()?;
        Ok(f32::from(int) + f32::from(frac) / 65536.0)
    }

    /// Read an IEEE-754 single-precision float, bit for bit.
    #[inline]
    fn read_float32(&mut self) -> Result<f32> {
        self.read_u32().map(f32::from_bits)
    }
}

/// Trait for writing big-endian scalars.
pub trait ScalarWrite: ByteWrite {
    #[inline]
    fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_bytes(&[value])
    }

    #[inline]
    fn write_u16(&mut self, value: u16) -> Result<()> {
        self.write_bytes(&value.to_be_bytes())
    }

    /// Write the lowest 24 bits of `value`.
    #[inline]
    fn write_u24(&mut self, value: u32) -> Result<()> {
        self.write_bytes(&[(value >> 16) as u8, (value >> 8) as u8, value as u8])
    }

    #[inline]
    fn write_u32(&mut self, value: u32) -> Result<()> {
        self.write_bytes(&value.to_be_bytes())
    }

    #[inline]
    fn write_u64(&mut self, value: u64) -> Result<()> {
        let mut data = [0_u8; 8];
        for (i, byte) in data.iter_mut().enumerate() {
            *byte = (value >> ((7 - i) * 8)) as u8;
        }
        self.write_bytes(&data)
    }

    /// Write `value` as an unsigned integer of `width` bytes, which must be
    /// one of [`UINT_WIDTHS`]. Values that do not fit are rejected.
    fn write_uint(&mut self, value: u64, width: usize) -> Result<()> {
        const OP: &str = "write_uint";
        if !UINT_WIDTHS.contains(&width) {
            return Err(
                Error::precondition(OP).with_msg(format!("unsupported integer width {}", width))
            );
        }
        if width < 8 && value >> (8 * width) != 0 {
            return Err(Error::out_of_range(OP)
                .with_msg(format!("{} does not fit in {} bytes", value, width)));
        }
        self.write_bytes(&value.to_be_bytes()[8 - width..])
    }

    /// Write an 8.8 fixed-point number; `value` must be in [0..256).
    fn write_fixed_8_8(&mut self, value: f32) -> Result<()> {
        let int = value
            .to_u8()
            .filter(|_| value >= 0.0)
            .ok_or_else(|| Error::out_of_range("write_fixed_8_8").with_msg(format!("{}", value)))?;
        let frac = ((value - f32::from(int)) * 256.0) as u8;
        self.write_bytes(&[int, frac])
    }

    /// Write a 16.16 fixed-point number; `value` must be in [0..65536).
    fn write_fixed_16_16(&mut self, value: f32) -> Result<()> {
        let int = value.to_u16().filter(|_| value >= 0.0).ok_or_else(|| {
            Error::out_of_range("write_fixed_16_16").with_msg(format!("{}", value))
        })?;
        let frac = ((value - f32::from(int)) * 65536.0) as u16;
        self.write_u16(int)?;
        self.write_u16(frac)
    }

    /// Write an IEEE-754 single-precision float, bit for bit.
    #[inline]
    fn write_float32(&mut self, value: f32) -> Result<()> {
        self.write_u32(value.to_bits())
    }
}

impl<B: ByteRead + ?Sized> ScalarRead for B {}
impl<B: ByteWrite + ?Sized> ScalarWrite for B {}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;
    use crate::impls::MemBuffer;

    fn written(mem: MemBuffer) -> Vec<u8> {
        let (data, used) = mem.into_inner();
        data.as_slice()[..used].to_vec()
    }

    #[test]
    fn test_big_endian_layout() {
        let mut mem = MemBuffer::from_vec(Vec::new());
        mem.write_u16(0x0102).unwrap();
        mem.write_u24(0x030405).unwrap();
        mem.write_u32(0x06070809).unwrap();
        mem.write_u64(0x0A0B0C0D0E0F1011).unwrap();
        assert_eq!(written(mem), (1..=0x11).collect::<Vec<u8>>());
    }

    #[test]
    fn test_uint_widths() {
        let values = [0xAB, 0xABCD, 0xABCDEF, 0xABCDEF01, 0xABCDEF0123456789];
        let mut mem = MemBuffer::from_vec(Vec::new());
        for (&width, &value) in UINT_WIDTHS.iter().zip(values.iter()) {
            mem.write_uint(value, width).unwrap();
        }
        mem.set_byte_pos(0).unwrap();
        for (&width, &value) in UINT_WIDTHS.iter().zip(values.iter()) {
            assert_eq!(mem.read_uint(width).unwrap(), value);
        }
        for width in [0, 5, 6, 7, 9] {
            assert_eq!(
                mem.read_uint(width).unwrap_err().kind(),
                ErrorKind::Precondition
            );
            assert_eq!(
                mem.write_uint(0, width).unwrap_err().kind(),
                ErrorKind::Precondition
            );
        }
        assert_eq!(
            mem.write_uint(0x1_0000, 2).unwrap_err().kind(),
            ErrorKind::OutOfRange
        );
    }

    #[test]
    fn test_fixed_8_8() {
        let mut mem = MemBuffer::from_vec(Vec::new());
        mem.write_fixed_8_8(1.5).unwrap();
        mem.write_fixed_8_8(255.99609375).unwrap();
        for value in [256.0, 1000.0, -1.0, -0.5, f32::NAN, f32::INFINITY] {
            assert_eq!(
                mem.write_fixed_8_8(value).unwrap_err().kind(),
                ErrorKind::OutOfRange
            );
        }
        assert_eq!(written(mem), [0x01, 0x80, 0xFF, 0xFF]);
    }

    #[test]
    fn test_fixed_16_16() {
        let mut mem = MemBuffer::from_vec(Vec::new());
        mem.write_fixed_16_16(1.0).unwrap();
        mem.write_fixed_16_16(320.25).unwrap();
        assert_eq!(
            mem.write_fixed_16_16(65536.0).unwrap_err().kind(),
            ErrorKind::OutOfRange
        );
        mem.set_byte_pos(0).unwrap();
        assert_eq!(mem.read_fixed_16_16().unwrap(), 1.0);
        assert_eq!(mem.read_fixed_16_16().unwrap(), 320.25);
        assert_eq!(
            written(mem),
            [0x00, 0x01, 0x00, 0x00, 0x01, 0x40, 0x40, 0x00]
        );
    }

    #[test]
    fn test_float32_bits() {
        let patterns = [
            0x3F80_0000_u32, // 1.0
            0x8000_0000,     // -0.0
            0x0000_0001,     // smallest denormal
            0x7FC0_0001,     // quiet NaN with payload
            0x7F80_0001,     // signaling NaN
            0xFF80_0000,     // -inf
        ];
        let mut mem = MemBuffer::from_vec(Vec::new());
        for &bits in &patterns {
            mem.write_float32(f32::from_bits(bits)).unwrap();
        }
        mem.set_byte_pos(0).unwrap();
        for &bits in &patterns {
            assert_eq!(mem.read_float32().unwrap().to_bits(), bits);
        }
    }
}
