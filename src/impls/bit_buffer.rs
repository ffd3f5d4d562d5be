/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! One-byte bit buffers sitting between bit-level and byte-level I/O.

use crate::error::{Error, Result};
use crate::traits::*;
#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};

/// The read side of the bit codec: the last byte pulled from the byte stream
/// and the number of its bits not yet consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
#[cfg_attr(feature = "mem_dbg", mem_size(flat))]
pub struct ReadBitBuffer {
    buffer: u8,
    /// Unconsumed low bits of `buffer`, in [0..8).
    bits_in_buffer: u8,
}

impl ReadBitBuffer {
    pub const fn new() -> Self {
        Self {
            buffer: 0,
            bits_in_buffer: 0,
        }
    }

    /// The number of bits read from the byte stream but not yet consumed.
    #[inline(always)]
    pub fn pending(&self) -> usize {
        self.bits_in_buffer as usize
    }

    /// Read `n` bits, MSB first, pulling a byte from `backend` whenever the
    /// buffer is empty.
    pub fn read_bits<R: ByteRead + ?Sized>(&mut self, backend: &mut R, n: usize) -> Result<u64> {
        if n == 0 || n > 64 {
            return Err(Error::precondition("read_bits").with_msg(format!(
                "the number of bits to read has to be in [1, 64] and {} is not",
                n
            )));
        }

        let mut value = 0_u64;
        let mut to_read = n;
        while to_read > 0 {
            if self.bits_in_buffer == 0 {
                let mut byte = [0_u8];
                backend.read_bytes(&mut byte)?;
                self.buffer = byte[0];
                self.bits_in_buffer = 8;
            }
            let chunk = to_read.min(self.bits_in_buffer as usize);
            self.bits_in_buffer -= chunk as u8;
            let bits = (self.buffer >> self.bits_in_buffer) as u64 & ((1 << chunk) - 1);
            value = (value << chunk) | bits;
            to_read -= chunk;
        }
        Ok(value)
    }

    /// Drop the unconsumed bits.
    #[inline(always)]
    pub fn flush(&mut self) {
        self.bits_in_buffer = 0;
    }
}

/// The write side of the bit codec: an accumulator for the next byte and the
/// number of bits already placed in it, from the most significant down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
#[cfg_attr(feature = "mem_dbg", mem_size(flat))]
pub struct WriteBitBuffer {
    buffer: u8,
    /// High bits of `buffer` already written, in [0..8).
    bits_in_buffer: u8,
}

impl WriteBitBuffer {
    pub const fn new() -> Self {
        Self {
            buffer: 0,
            bits_in_buffer: 0,
        }
    }

    /// The number of bits written but not yet emitted to the byte stream.
    #[inline(always)]
    pub fn pending(&self) -> usize {
        self.bits_in_buffer as usize
    }

    /// Write the lowest `n` bits of `value`, MSB first, emitting a byte to
    /// `backend` each time eight bits have accumulated.
    pub fn write_bits<W: ByteWrite + ?Sized>(
        &mut self,
        backend: &mut W,
        value: u64,
        n: usize,
    ) -> Result<usize> {
        if n > 64 {
            return Err(Error::precondition("write_bits").with_msg(format!(
                "the number of bits to write has to be in [0, 64] and {} is not",
                n
            )));
        }

        #[cfg(feature = "checks")]
        if n < 64 && value >> n != 0 {
            return Err(Error::out_of_range("write_bits")
                .with_msg(format!("value {} does not fit in {} bits", value, n)));
        }

        let mut to_write = n;
        while to_write > 0 {
            let space_left = 8 - self.bits_in_buffer as usize;
            let chunk = to_write.min(space_left);
            to_write -= chunk;
            let bits = ((value >> to_write) & ((1 << chunk) - 1)) as u8;
            self.buffer |= bits << (space_left - chunk);
            self.bits_in_buffer += chunk as u8;
            if self.bits_in_buffer == 8 {
                self.emit(backend)?;
            }
        }
        Ok(n)
    }

    /// Complete a partial byte with ones or zeros and emit it.
    pub fn pad<W: ByteWrite + ?Sized>(&mut self, backend: &mut W, fill: bool) -> Result<()> {
        if self.bits_in_buffer == 0 {
            return Ok(());
        }
        let n = 8 - self.bits_in_buffer as usize;
        let value = if fill { (1 << n) - 1 } else { 0 };
        self.write_bits(backend, value, n)?;
        Ok(())
    }

    /// Emit a partial byte as is.
    pub fn flush<W: ByteWrite + ?Sized>(&mut self, backend: &mut W) -> Result<()> {
        if self.bits_in_buffer == 0 {
            return Ok(());
        }
        self.emit(backend)
    }

    /// Write the buffer and empty it, even if the write fails.
    #[inline]
    fn emit<W: ByteWrite + ?Sized>(&mut self, backend: &mut W) -> Result<()> {
        let byte = self.buffer;
        self.buffer = 0;
        self.bits_in_buffer = 0;
        backend.write_bytes(&[byte])
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;
    use crate::impls::MemBuffer;

    #[test]
    fn test_msb_first() {
        let mut mem = MemBuffer::from_vec(Vec::new());
        let mut w = WriteBitBuffer::new();
        w.write_bits(&mut mem, 0b101, 3).unwrap();
        w.write_bits(&mut mem, 0b1_1001_1000_0111, 13).unwrap();
        assert_eq!(w.pending(), 0);
        let (data, used) = mem.into_inner();
        assert_eq!(&data.as_slice()[..used], &[0b1011_1001, 0b1000_0111]);

        let mut mem = MemBuffer::from_vec(vec![0b1011_1001, 0b1000_0111]);
        let mut r = ReadBitBuffer::new();
        assert_eq!(r.read_bits(&mut mem, 3).unwrap(), 0b101);
        assert_eq!(r.pending(), 5);
        assert_eq!(r.read_bits(&mut mem, 13).unwrap(), 0b1_1001_1000_0111);
        assert_eq!(r.pending(), 0);
    }

    #[test]
    fn test_read_bits_width() {
        let mut mem = MemBuffer::from_vec(vec![0xFF; 16]);
        let mut r = ReadBitBuffer::new();
        assert_eq!(
            r.read_bits(&mut mem, 0).unwrap_err().kind(),
            ErrorKind::Precondition
        );
        assert_eq!(
            r.read_bits(&mut mem, 65).unwrap_err().kind(),
            ErrorKind::Precondition
        );
        assert_eq!(r.read_bits(&mut mem, 64).unwrap(), u64::MAX);
    }

    #[test]
    fn test_pad_and_flush() {
        let mut mem = MemBuffer::from_vec(Vec::new());
        let mut w = WriteBitBuffer::new();
        w.write_bits(&mut mem, 0b110, 3).unwrap();
        w.pad(&mut mem, true).unwrap();
        // already aligned
        w.pad(&mut mem, true).unwrap();
        w.write_bits(&mut mem, 0b01, 2).unwrap();
        w.flush(&mut mem).unwrap();
        w.flush(&mut mem).unwrap();
        w.write_bits(&mut mem, 0, 0).unwrap();
        let (data, used) = mem.into_inner();
        assert_eq!(&data.as_slice()[..used], &[0b1101_1111, 0b0100_0000]);
    }

    #[test]
    fn test_pad_with_zeros() {
        let mut mem = MemBuffer::from_vec(Vec::new());
        let mut w = WriteBitBuffer::new();
        w.write_bits(&mut mem, 0b101, 3).unwrap();
        w.pad(&mut mem, false).unwrap();
        assert_eq!(w.pending(), 0);
        assert_eq!(mem.position(), 1);
        w.pad(&mut mem, false).unwrap();
        assert_eq!(mem.position(), 1);
        let (data, used) = mem.into_inner();
        assert_eq!(&data.as_slice()[..used], &[0b1010_0000]);
    }

    #[test]
    fn test_failed_emit_empties_buffer() {
        let mut storage = [0_u8; 1];
        let mut mem = MemBuffer::borrowed(&mut storage);
        let mut w = WriteBitBuffer::new();
        w.write_bits(&mut mem, 0xFF, 8).unwrap();
        assert_eq!(
            w.write_bits(&mut mem, 0xAB, 8).unwrap_err().kind(),
            ErrorKind::OutOfRange
        );
        assert!(w.pending() < 8);
        assert_eq!(w.pending(), 0);
        // nothing left to pad or flush: the failed byte is not retried
        w.pad(&mut mem, false).unwrap();
        w.flush(&mut mem).unwrap();
        assert_eq!(mem.position(), 1);

        // new bits after the failure still report the full buffer
        w.write_bits(&mut mem, 0b1, 1).unwrap();
        assert_eq!(w.pending(), 1);
        assert_eq!(
            w.pad(&mut mem, false).unwrap_err().kind(),
            ErrorKind::OutOfRange
        );
        assert_eq!(w.pending(), 0);
        drop(mem);
        assert_eq!(storage, [0xFF]);
    }
}
