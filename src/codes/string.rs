/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! NUL-terminated and counted strings.
//!
//! Strings are handled as raw bytes: box fields are not guaranteed to be
//! valid UTF-8, and counted strings may use two-byte characters.
//!
//! # Counted strings
//!
//! A counted (Pascal) string is prefixed by its length in characters. The
//! plain form uses a single count byte, so at most 255 characters. The
//! expandable form emits a byte 255 for each full block of 255 characters
//! and then a final byte with the remainder; a reader sums count bytes
//! until it finds one different from 255. For instance, 300 characters are
//! counted as `[0xFF, 45]`. Readers accept at most
//! [`MAX_COUNT_BYTES`] count bytes.
//!
//! A counted string may also be stored in a fixed-size record of
//! `fixed_length` bytes, count byte included: longer strings are truncated
//! to `fixed_length - 1` bytes, shorter ones padded with zeros.

use crate::codes::{ScalarRead, ScalarWrite};
use crate::error::{Error, Result};
use crate::traits::*;

/// The maximum number of count bytes of an expandable counted string.
pub const MAX_COUNT_BYTES: usize = 25;

const INITIAL_STRING_CAPACITY: usize = 64;

/// Trait for reading strings.
pub trait StringRead: ByteRead {
    /// Read bytes up to and including the first zero byte.
    ///
    /// The returned vector contains the terminator.
    fn read_nul_terminated_string(&mut self) -> Result<Vec<u8>> {
        const OP: &str = "read_nul_terminated_string";
        let mut data: Vec<u8> = Vec::new();
        data.try_reserve_exact(INITIAL_STRING_CAPACITY)
            .map_err(|_| Error::out_of_memory(OP))?;
        loop {
            if data.len() == data.capacity() {
                data.try_reserve_exact(data.capacity())
                    .map_err(|_| Error::out_of_memory(OP))?;
            }
            let byte = self.read_u8()?;
            data.push(byte);
            if byte == 0 {
                break;
            }
        }
        data.shrink_to_fit();
        Ok(data)
    }

    /// Read a counted string of characters of `char_width` bytes.
    ///
    /// If `expandable` is true the count may span several bytes (see the
    /// [module documentation](self)). The returned vector holds the string
    /// bytes followed by a zero byte.
    fn read_counted_string(&mut self, char_width: usize, expandable: bool) -> Result<Vec<u8>> {
        const OP: &str = "read_counted_string";
        if char_width == 0 {
            return Err(Error::precondition(OP).with_msg("character width must be positive"));
        }

        let char_len = if expandable {
            let mut char_len = 0_usize;
            let mut count_bytes = 0;
            loop {
                let byte = self.read_u8()?;
                char_len += byte as usize;
                count_bytes += 1;
                if count_bytes > MAX_COUNT_BYTES {
                    return Err(Error::out_of_range(OP).with_msg(format!(
                        "counted string too long (more than {} count bytes)",
                        MAX_COUNT_BYTES
                    )));
                }
                if byte != u8::MAX {
                    break;
                }
            }
            char_len
        } else {
            self.read_u8()? as usize
        };

        let byte_len = char_len
            .checked_mul(char_width)
            .filter(|&len| len < usize::MAX)
            .ok_or_else(|| {
                Error::out_of_range(OP).with_msg(format!(
                    "{} characters of {} bytes do not fit in memory",
                    char_len, char_width
                ))
            })?;
        let mut data = Vec::new();
        data.try_reserve_exact(byte_len + 1)
            .map_err(|_| Error::out_of_memory(OP))?;
        data.resize(byte_len, 0);
        self.read_bytes(&mut data)?;
        data.push(0);
        Ok(data)
    }
}

/// Trait for writing strings.
pub trait StringWrite: ByteWrite {
    /// Write `string` up to its first zero byte, if any, and then a zero
    /// byte. If `string` is `None` only the zero byte is written.
    fn write_nul_terminated_string(&mut self, string: Option<&[u8]>) -> Result<()> {
        if let Some(string) = string {
            let len = string.iter().position(|&b| b == 0).unwrap_or(string.len());
            self.write_bytes(&string[..len])?;
        }
        self.write_u8(0)
    }

    /// Write a counted string of characters of `char_width` bytes.
    ///
    /// `None` is written as the empty string. If `fixed_length` is not zero,
    /// exactly `fixed_length` bytes are written overall (see the [module
    /// documentation](self)). Without `expandable`, strings of more than 255
    /// characters are rejected.
    fn write_counted_string(
        &mut self,
        string: Option<&[u8]>,
        char_width: usize,
        expandable: bool,
        fixed_length: usize,
    ) -> Result<()> {
        const OP: &str = "write_counted_string";
        if char_width == 0 {
            return Err(Error::precondition(OP).with_msg("character width must be positive"));
        }

        let string = string.unwrap_or_default();
        let mut byte_len = string.len();
        if fixed_length != 0 && byte_len >= fixed_length {
            byte_len = fixed_length - 1;
        }
        let mut char_len = byte_len / char_width;

        if expandable {
            while char_len >= u8::MAX as usize {
                self.write_u8(u8::MAX)?;
                char_len -= u8::MAX as usize;
            }
        } else if char_len > u8::MAX as usize {
            return Err(Error::out_of_range(OP)
                .with_msg(format!("length is {}", char_len)));
        }
        self.write_u8(char_len as u8)?;

        self.write_bytes(&string[..byte_len])?;

        if fixed_length != 0 && byte_len < fixed_length - 1 {
            self.write_bytes(&vec![0_u8; fixed_length - 1 - byte_len])?;
        }
        Ok(())
    }
}

impl<B: ByteRead + ?Sized> StringRead for B {}
impl<B: ByteWrite + ?Sized> StringWrite for B {}
