/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::error::{Error, Result};
use crate::traits::*;

/// Capacity of an owned memory buffer when no size is requested.
pub const DEFAULT_MEMORY_BUFFER_SIZE: usize = 4096;

/// The storage of a [`MemBuffer`].
///
/// An owned buffer grows on demand; a borrowed buffer belongs to the caller,
/// has a fixed capacity, and is never freed by this crate.
#[derive(Debug, PartialEq, Eq)]
pub enum MemoryBuffer<'a> {
    Owned(Vec<u8>),
    Borrowed(&'a mut [u8]),
}

impl MemoryBuffer<'_> {
    /// The addressable bytes of the buffer.
    pub fn as_slice(&self) -> &[u8] {
        match self {
            MemoryBuffer::Owned(v) => v,
            MemoryBuffer::Borrowed(s) => s,
        }
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        match self {
            MemoryBuffer::Owned(v) => v,
            MemoryBuffer::Borrowed(s) => s,
        }
    }

    /// The number of addressable bytes.
    pub fn capacity(&self) -> usize {
        self.as_slice().len()
    }

    /// Return the owned vector, or `None` for a borrowed buffer.
    pub fn into_owned(self) -> Option<Vec<u8>> {
        match self {
            MemoryBuffer::Owned(v) => Some(v),
            MemoryBuffer::Borrowed(_) => None,
        }
    }
}

/// An implementation of [`ByteRead`], [`ByteWrite`], and [`ByteSeek`] for a
/// memory buffer.
///
/// The buffer is either owned, in which case writing past its capacity grows
/// it to twice the old capacity plus the size of the write, or borrowed from
/// the caller, in which case writing past its capacity is an error.
///
/// Reads past the capacity fail without copying anything and without moving
/// the current position.
///
/// # Example
/// ```
/// use bmff_io::prelude::*;
///
/// let mut mem = MemBuffer::with_capacity(4).unwrap();
///
/// assert_eq!(mem.byte_pos().unwrap(), 0);
/// mem.write_bytes(&[1, 2, 3, 4, 5, 6]).unwrap();
/// assert_eq!(mem.byte_pos().unwrap(), 6);
/// // 2 × (4 + 6)
/// assert_eq!(mem.capacity(), 20);
///
/// // you can change position
/// mem.set_byte_pos(1).unwrap();
/// let mut buf = [0; 2];
/// mem.read_bytes(&mut buf).unwrap();
/// assert_eq!(buf, [2, 3]);
///
/// // positions must address existing content
/// assert!(mem.set_byte_pos(20).is_err());
/// assert_eq!(mem.byte_pos().unwrap(), 3);
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct MemBuffer<'a> {
    data: MemoryBuffer<'a>,
    position: usize,
}

impl<'a> MemBuffer<'a> {
    /// Create an owned buffer of `size` zeroed bytes, or of
    /// [`DEFAULT_MEMORY_BUFFER_SIZE`] bytes if `size` is zero.
    pub fn with_capacity(size: usize) -> Result<Self> {
        let size = if size == 0 {
            DEFAULT_MEMORY_BUFFER_SIZE
        } else {
            size
        };
        let mut data = Vec::new();
        data.try_reserve_exact(size)
            .map_err(|_| Error::out_of_memory("enable_memory_buffer"))?;
        data.resize(size, 0);
        Ok(Self {
            data: MemoryBuffer::Owned(data),
            position: 0,
        })
    }

    /// Wrap a caller-supplied buffer, whose length is the fixed capacity.
    pub fn borrowed(data: &'a mut [u8]) -> Self {
        Self {
            data: MemoryBuffer::Borrowed(data),
            position: 0,
        }
    }

    /// Wrap an existing vector, e.g., the contents of a box read in
    /// advance. The buffer is owned, and can grow.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self {
            data: MemoryBuffer::Owned(data),
            position: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    pub fn is_borrowed(&self) -> bool {
        matches!(self.data, MemoryBuffer::Borrowed(_))
    }

    /// Current position as an index into the buffer.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Return the buffer and the current position, which is the number of
    /// bytes written when the buffer has been filled sequentially.
    pub fn into_inner(self) -> (MemoryBuffer<'a>, usize) {
        (self.data, self.position)
    }

    fn grow(&mut self, additional: usize) -> Result<()> {
        const OP: &str = "write_bytes";
        let capacity = self.capacity();
        match &mut self.data {
            MemoryBuffer::Owned(v) => {
                let new_capacity = capacity
                    .checked_add(additional)
                    .and_then(|c| c.checked_mul(2))
                    .ok_or_else(|| {
                        Error::out_of_memory(OP).with_msg("memory buffer capacity overflow")
                    })?;
                v.try_reserve_exact(new_capacity - v.len())
                    .map_err(|_| Error::out_of_memory(OP))?;
                v.resize(new_capacity, 0);
                log::debug!(
                    "Memory buffer grown from {} to {} bytes",
                    capacity,
                    new_capacity
                );
                Ok(())
            }
            MemoryBuffer::Borrowed(_) => Err(Error::out_of_range(OP).with_msg(format!(
                "write of {} bytes at position {} exceeds fixed memory buffer of {} bytes",
                additional, self.position, capacity
            ))),
        }
    }
}

impl ByteRead for MemBuffer<'_> {
    #[inline]
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }
        let end = self.position + buf.len();
        match self.data.as_slice().get(self.position..end) {
            Some(src) => {
                buf.copy_from_slice(src);
                self.position = end;
                Ok(())
            }
            None => Err(Error::end_of_input("read_bytes")
                .with_msg("not enough bytes, reached end of memory")),
        }
    }
}

impl ByteWrite for MemBuffer<'_> {
    #[inline]
    fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }
        let end = self.position + buf.len();
        if end > self.capacity() {
            self.grow(buf.len())?;
        }
        self.data.as_mut_slice()[self.position..end].copy_from_slice(buf);
        self.position = end;
        Ok(())
    }

    #[inline(always)]
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl ByteSeek for MemBuffer<'_> {
    #[inline(always)]
    fn byte_pos(&mut self) -> Result<u64> {
        Ok(self.position as u64)
    }

    #[inline]
    fn set_byte_pos(&mut self, byte_pos: u64) -> Result<()> {
        if byte_pos >= self.capacity() as u64 {
            return Err(Error::out_of_range("set_byte_pos").with_msg(format!(
                "position {} out of range for memory buffer of {} bytes",
                byte_pos,
                self.capacity()
            )));
        }
        self.position = byte_pos as usize;
        Ok(())
    }
}
