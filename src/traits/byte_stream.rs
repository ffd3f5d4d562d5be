/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::error::Result;

/// Sequential, exact-length byte reads.
pub trait ByteRead {
    /// Fill `buf` completely and advance the current position.
    ///
    /// An empty `buf` is a no-op. If fewer than `buf.len()` bytes are
    /// available the call fails with
    /// [`ErrorKind::EndOfInput`](crate::error::ErrorKind::EndOfInput).
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()>;
}

/// Sequential byte writes.
pub trait ByteWrite {
    /// Write all of `buf` and advance the current position.
    ///
    /// An empty `buf` is a no-op. A short write is an error.
    fn write_bytes(&mut self, buf: &[u8]) -> Result<()>;

    /// Flush the stream.
    fn flush(&mut self) -> Result<()>;
}

/// Seekability for [`ByteRead`] and [`ByteWrite`] streams.
pub trait ByteSeek {
    /// Get the current position in bytes from the start of the stream.
    fn byte_pos(&mut self) -> Result<u64>;

    /// Set the current position in bytes from the start of the stream to `byte_pos`.
    fn set_byte_pos(&mut self, byte_pos: u64) -> Result<()>;
}

/// Peeking, available on every seekable [`ByteRead`].
pub trait BytePeek: ByteRead + ByteSeek {
    /// Fill `buf` without moving the current position.
    ///
    /// This is a read followed by a seek back to the original position, so
    /// it is only meaningful if nothing else touches the stream in between.
    fn peek_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }
        let pos = self.byte_pos()?;
        self.read_bytes(buf)?;
        self.set_byte_pos(pos)
    }
}

impl<T: ByteRead + ByteSeek + ?Sized> BytePeek for T {}

/// A positional byte store: the common contract of every backend.
///
/// This is a trait alias with a blanket implementation, so that backends can
/// be used as `&mut dyn ByteIo`.
pub trait ByteIo: ByteRead + ByteWrite + ByteSeek {}
impl<T: ByteRead + ByteWrite + ByteSeek + ?Sized> ByteIo for T {}
