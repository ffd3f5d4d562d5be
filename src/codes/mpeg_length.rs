/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! MPEG-4 descriptor lengths.
//!
//! The length of an MPEG-4 descriptor (e.g., in an `esds` box) is a
//! big-endian sequence of 7-bit groups: every byte but the last has its most
//! significant bit set. At most four bytes are used, so lengths have at most
//! 28 significant bits.
//!
//! A writer can use the minimum number of bytes (_compact_ form) or always
//! four bytes, with leading groups set to zero, as many encoders do.
//!
//! The reader stops after four bytes even if the continuation bit of the
//! fourth byte is set: the additional bytes, if any, are left in the stream.

use crate::error::{Error, Result};
use crate::traits::*;

/// The largest length that can be represented.
pub const MPEG_LENGTH_MAX: u32 = 0x0FFF_FFFF;

const MAX_BYTES: usize = 4;

/// Return the number of bytes of the compact representation of `value`.
///
/// `value` must not exceed [`MPEG_LENGTH_MAX`].
#[must_use]
#[inline(always)]
pub const fn byte_len_mpeg_length(value: u32) -> usize {
    if value < 1 << 7 {
        1
    } else if value < 1 << 14 {
        2
    } else if value < 1 << 21 {
        3
    } else {
        4
    }
}

/// Trait for reading MPEG-4 descriptor lengths.
pub trait MpegLengthRead: ByteRead {
    fn read_mpeg_length(&mut self) -> Result<u32> {
        let mut value = 0_u32;
        for _ in 0..MAX_BYTES {
            let mut byte = [0_u8];
            self.read_bytes(&mut byte)?;
            value = (value << 7) | (byte[0] & 0x7F) as u32;
            if byte[0] & 0x80 == 0 {
                break;
            }
        }
        Ok(value)
    }
}

/// Trait for writing MPEG-4 descriptor lengths.
pub trait MpegLengthWrite: ByteWrite {
    /// Write `value`, in compact form or on four bytes, and return the
    /// number of bytes written.
    fn write_mpeg_length(&mut self, value: u32, compact: bool) -> Result<usize> {
        if value > MPEG_LENGTH_MAX {
            return Err(Error::out_of_range("write_mpeg_length").with_msg(format!(
                "{:#x} > {:#x}",
                value, MPEG_LENGTH_MAX
            )));
        }
        let len = if compact {
            byte_len_mpeg_length(value)
        } else {
            MAX_BYTES
        };
        let mut buf = [0_u8; MAX_BYTES];
        for (i, byte) in buf[..len].iter_mut().enumerate() {
            let shift = 7 * (len - 1 - i);
            *byte = ((value >> shift) & 0x7F) as u8;
            if i != len - 1 {
                *byte |= 0x80;
            }
        }
        self.write_bytes(&buf[..len])?;
        Ok(len)
    }
}

impl<B: ByteRead + ?Sized> MpegLengthRead for B {}
impl<B: ByteWrite + ?Sized> MpegLengthWrite for B {}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;
    use crate::impls::MemBuffer;

    fn encode(value: u32, compact: bool) -> Vec<u8> {
        let mut mem = MemBuffer::from_vec(Vec::new());
        let len = mem.write_mpeg_length(value, compact).unwrap();
        let (data, used) = mem.into_inner();
        assert_eq!(len, used);
        data.as_slice()[..used].to_vec()
    }

    #[test]
    fn test_compact() {
        assert_eq!(encode(0, true), [0x00]);
        assert_eq!(encode(0x7F, true), [0x7F]);
        assert_eq!(encode(200, true), [0x81, 0x48]);
        assert_eq!(encode(0x3FFF, true), [0xFF, 0x7F]);
        assert_eq!(encode(0x4000, true), [0x81, 0x80, 0x00]);
        assert_eq!(encode(MPEG_LENGTH_MAX, true), [0xFF, 0xFF, 0xFF, 0x7F]);

        let mut mem = MemBuffer::from_vec(vec![0x81, 0x48, 0xFF, 0x7F]);
        assert_eq!(mem.read_mpeg_length().unwrap(), 200);
        assert_eq!(mem.read_mpeg_length().unwrap(), 0x3FFF);
    }

    #[test]
    fn test_fixed_width() {
        assert_eq!(encode(0, false), [0x80, 0x80, 0x80, 0x00]);
        assert_eq!(encode(200, false), [0x80, 0x80, 0x81, 0x48]);

        let mut mem = MemBuffer::from_vec(encode(200, false));
        assert_eq!(mem.read_mpeg_length().unwrap(), 200);
        assert_eq!(mem.position(), 4);
    }

    #[test]
    fn test_byte_len() {
        for (value, len) in [
            (0, 1),
            (0x7F, 1),
            (0x80, 2),
            (0x3FFF, 2),
            (0x4000, 3),
            (0x1F_FFFF, 3),
            (0x20_0000, 4),
            (MPEG_LENGTH_MAX, 4),
        ] {
            assert_eq!(byte_len_mpeg_length(value), len);
            assert_eq!(encode(value, true).len(), len);
        }
    }

    #[test]
    fn test_stops_after_four_bytes() {
        let mut mem = MemBuffer::from_vec(vec![0x81, 0x81, 0x81, 0x81, 0x01]);
        assert_eq!(mem.read_mpeg_length().unwrap(), 0x20_4081);
        assert_eq!(mem.position(), 4);
    }

    #[test]
    fn test_too_large() {
        let mut mem = MemBuffer::from_vec(Vec::new());
        assert_eq!(
            mem.write_mpeg_length(MPEG_LENGTH_MAX + 1, true)
                .unwrap_err()
                .kind(),
            ErrorKind::OutOfRange
        );
        assert_eq!(mem.position(), 0);
    }

    #[test]
    fn test_truncated() {
        let mut mem = MemBuffer::from_vec(vec![0x81, 0x81]);
        assert_eq!(
            mem.read_mpeg_length().unwrap_err().kind(),
            ErrorKind::EndOfInput
        );
    }
}
