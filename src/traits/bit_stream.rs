/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::error::Result;

/// Sequential, streaming bit-by-bit reads.
///
/// Bits are consumed most-significant first from each byte of the
/// underlying byte stream. Bits are pulled from the byte stream one byte at a
/// time, and only when the current byte is exhausted.
pub trait BitRead {
    /// Read `n` bits and return them in the lowest bits.
    ///
    /// `n` must be in [1..64].
    fn read_bits(&mut self, n: usize) -> Result<u64>;

    /// Discard the unconsumed bits of the current byte, so that the next
    /// read starts at a byte boundary.
    ///
    /// The byte position of the underlying stream does not change, as the
    /// current byte has already been read.
    fn flush_read_bits(&mut self);
}

/// Sequential, streaming bit-by-bit writes.
///
/// Bits are accumulated most-significant first into a one-byte buffer that is
/// written to the underlying byte stream as soon as it is full.
pub trait BitWrite {
    /// Write the lowest `n` bits of `value` to the stream and return the number
    /// of bits written, that is, `n`.
    ///
    /// `n` must be in [0..64]. If the feature `checks` is enabled, the
    /// remaining bits of `value` must be zero.
    fn write_bits(&mut self, value: u64, n: usize) -> Result<usize>;

    /// Complete a partially filled byte with ones (if `fill` is true) or
    /// zeros and write it. Does nothing on a byte boundary.
    fn pad_write_bits(&mut self, fill: bool) -> Result<()>;

    /// Write a partially filled byte as is (unused low bits are zero). Does
    /// nothing on a byte boundary.
    fn flush_write_bits(&mut self) -> Result<()>;
}
