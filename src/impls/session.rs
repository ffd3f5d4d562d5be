/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::error::{Error, Result};
use crate::impls::*;
use crate::traits::*;
use std::io::{Read, Seek, Write};

/// Trait alias for the streams accepted by [`Backend::stream`].
pub trait ReadWriteSeek: Read + Write + Seek {}
impl<T: Read + Write + Seek + ?Sized> ReadWriteSeek for T {}

/// The persistent store of a [`Session`].
pub enum Backend<'a> {
    /// An application-provided [`VirtualDevice`].
    Device(DeviceAdapter<Box<dyn VirtualDevice + 'a>>),
    /// A standard seekable stream, such as a buffered file.
    Stream(StreamAdapter<Box<dyn ReadWriteSeek + 'a>>),
}

impl<'a> Backend<'a> {
    pub fn device(device: impl VirtualDevice + 'a) -> Self {
        let device: Box<dyn VirtualDevice + 'a> = Box::new(device);
        Backend::Device(DeviceAdapter::new(device))
    }

    pub fn stream(stream: impl Read + Write + Seek + 'a) -> Self {
        let stream: Box<dyn ReadWriteSeek + 'a> = Box::new(stream);
        Backend::Stream(StreamAdapter::new(stream))
    }

    #[inline(always)]
    fn as_io(&mut self) -> &mut dyn ByteIo {
        match self {
            Backend::Device(device) => device,
            Backend::Stream(stream) => stream,
        }
    }

    fn len(&mut self) -> Result<u64> {
        match self {
            Backend::Device(device) => device.device_len(),
            Backend::Stream(stream) => stream.stream_len(),
        }
    }
}

impl core::fmt::Debug for Backend<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Backend::Device(_) => f.write_str("Backend::Device"),
            Backend::Stream(_) => f.write_str("Backend::Stream"),
        }
    }
}

/// Whether a [`Session`] reads an existing container or writes a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OpenMode {
    /// The size is captured once, when the session is opened.
    Read,
    /// Writers sit at the logical end of the file, so the size is the
    /// current position.
    Write,
}

/// The I/O state of one open container.
///
/// A session owns a [`Backend`], and optionally a [`MemBuffer`] that, while
/// enabled, supersedes the backend for all byte operations. It implements the
/// byte traits [`ByteRead`], [`ByteWrite`], and [`ByteSeek`], and thus all
/// codecs in [`codes`](crate::codes), and the bit traits [`BitRead`] and
/// [`BitWrite`] through two independent one-byte bit buffers.
///
/// Byte-level operations do not look at the bit buffers: before switching
/// from bits to bytes, callers must [flush the read
/// bits](BitRead::flush_read_bits) or [pad](BitWrite::pad_write_bits) /
/// [flush](BitWrite::flush_write_bits) the written ones. A warning is logged
/// when this does not happen.
///
/// # Example
/// ```
/// use bmff_io::prelude::*;
/// use std::io::Cursor;
///
/// let mut session = Session::open_write(Backend::stream(Cursor::new(Vec::new())));
/// session.write_u32(0x0000_0018).unwrap();
/// session.write_bytes(b"ftyp").unwrap();
/// session.write_bits(0b101, 3).unwrap();
/// session.pad_write_bits(false).unwrap();
/// assert_eq!(session.size().unwrap(), 9);
///
/// session.set_byte_pos(0).unwrap();
/// assert_eq!(session.read_u32().unwrap(), 0x18);
/// ```
#[derive(Debug)]
pub struct Session<'a> {
    backend: Backend<'a>,
    memory: Option<MemBuffer<'a>>,
    mode: OpenMode,
    size: u64,
    read_bit_buffer: ReadBitBuffer,
    write_bit_buffer: WriteBitBuffer,
}

/// The byte store currently in use: the memory buffer if enabled, the
/// backend otherwise.
#[inline(always)]
fn active<'s, 'a>(
    memory: &'s mut Option<MemBuffer<'a>>,
    backend: &'s mut Backend<'a>,
) -> &'s mut dyn ByteIo {
    match memory {
        Some(memory) => memory,
        None => backend.as_io(),
    }
}

impl<'a> Session<'a> {
    /// Open a session in the given mode.
    pub fn new(backend: Backend<'a>, mode: OpenMode) -> Result<Self> {
        match mode {
            OpenMode::Read => Self::open_read(backend),
            OpenMode::Write => Ok(Self::open_write(backend)),
        }
    }

    /// Open a session for reading, capturing the size of the backend.
    pub fn open_read(mut backend: Backend<'a>) -> Result<Self> {
        let size = backend.len()?;
        log::debug!("Opened {:?} for reading ({} bytes)", backend, size);
        Ok(Self {
            backend,
            memory: None,
            mode: OpenMode::Read,
            size,
            read_bit_buffer: ReadBitBuffer::new(),
            write_bit_buffer: WriteBitBuffer::new(),
        })
    }

    /// Open a session for writing.
    pub fn open_write(backend: Backend<'a>) -> Self {
        log::debug!("Opened {:?} for writing", backend);
        Self {
            backend,
            memory: None,
            mode: OpenMode::Write,
            size: 0,
            read_bit_buffer: ReadBitBuffer::new(),
            write_bit_buffer: WriteBitBuffer::new(),
        }
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// Return the size of the container.
    ///
    /// In read mode, this is the size captured at open; in write mode, it
    /// is the current position.
    pub fn size(&mut self) -> Result<u64> {
        if self.mode == OpenMode::Write {
            self.size = self.byte_pos()?;
        }
        Ok(self.size)
    }

    pub fn is_memory_buffer_enabled(&self) -> bool {
        self.memory.is_some()
    }

    /// Redirect all byte operations to a memory buffer.
    ///
    /// If `external` is provided, the session borrows it as a fixed-capacity
    /// buffer of `size` bytes (or of the whole slice if `size` is zero).
    /// Otherwise, the session allocates an owned, growable buffer of `size`
    /// bytes, or of [`DEFAULT_MEMORY_BUFFER_SIZE`] bytes if `size` is zero.
    ///
    /// The buffer position starts at zero.
    pub fn enable_memory_buffer(
        &mut self,
        external: Option<&'a mut [u8]>,
        size: usize,
    ) -> Result<()> {
        const OP: &str = "enable_memory_buffer";
        if self.memory.is_some() {
            return Err(Error::precondition(OP).with_msg("memory buffer already enabled"));
        }
        let memory = match external {
            Some(data) => {
                if size > data.len() {
                    return Err(Error::precondition(OP).with_msg(format!(
                        "requested size {} exceeds the {} bytes supplied",
                        size,
                        data.len()
                    )));
                }
                let data = if size == 0 { data } else { &mut data[..size] };
                MemBuffer::borrowed(data)
            }
            None => MemBuffer::with_capacity(size)?,
        };
        log::debug!(
            "Memory buffer enabled ({} bytes, {})",
            memory.capacity(),
            if memory.is_borrowed() {
                "borrowed"
            } else {
                "owned"
            }
        );
        self.memory = Some(memory);
        Ok(())
    }

    /// Stop redirecting byte operations to the memory buffer, returning it
    /// together with the number of bytes used (the buffer position, not its
    /// capacity).
    pub fn disable_memory_buffer(&mut self) -> Result<(MemoryBuffer<'a>, u64)> {
        let memory = self.memory.take().ok_or_else(|| {
            Error::precondition("disable_memory_buffer").with_msg("memory buffer not enabled")
        })?;
        let (buffer, used) = memory.into_inner();
        log::debug!(
            "Memory buffer disabled ({} of {} bytes used)",
            used,
            buffer.capacity()
        );
        Ok((buffer, used as u64))
    }

    /// Close the session, flushing the backend.
    ///
    /// An owned memory buffer still enabled is released; a partial byte
    /// still in the write bit buffer is discarded.
    pub fn close(mut self) -> Result<()> {
        if self.write_bit_buffer.pending() > 0 {
            log::warn!(
                "Closing with {} bits not yet written; pad or flush the bits first",
                self.write_bit_buffer.pending()
            );
        }
        if let Some(memory) = self.memory.take() {
            log::debug!(
                "Releasing memory buffer of {} bytes at close",
                memory.capacity()
            );
        }
        self.backend.as_io().flush()?;
        log::debug!("Closed {:?}", self.backend);
        Ok(())
    }

    /// Return the backend, dropping any enabled memory buffer.
    pub fn into_backend(self) -> Backend<'a> {
        self.backend
    }
}

impl ByteRead for Session<'_> {
    #[inline]
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }
        if self.read_bit_buffer.pending() > 0 {
            log::warn!(
                "Reading {} bytes with {} unconsumed bits in the read bit buffer",
                buf.len(),
                self.read_bit_buffer.pending()
            );
        }
        active(&mut self.memory, &mut self.backend).read_bytes(buf)
    }
}

impl ByteWrite for Session<'_> {
    #[inline]
    fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }
        if self.write_bit_buffer.pending() > 0 {
            log::warn!(
                "Writing {} bytes with {} bits pending in the write bit buffer",
                buf.len(),
                self.write_bit_buffer.pending()
            );
        }
        active(&mut self.memory, &mut self.backend).write_bytes(buf)
    }

    fn flush(&mut self) -> Result<()> {
        active(&mut self.memory, &mut self.backend).flush()
    }
}

impl ByteSeek for Session<'_> {
    #[inline]
    fn byte_pos(&mut self) -> Result<u64> {
        active(&mut self.memory, &mut self.backend).byte_pos()
    }

    #[inline]
    fn set_byte_pos(&mut self, byte_pos: u64) -> Result<()> {
        active(&mut self.memory, &mut self.backend).set_byte_pos(byte_pos)
    }
}

impl BitRead for Session<'_> {
    #[inline]
    fn read_bits(&mut self, n: usize) -> Result<u64> {
        let io = active(&mut self.memory, &mut self.backend);
        self.read_bit_buffer.read_bits(io, n)
    }

    #[inline]
    fn flush_read_bits(&mut self) {
        self.read_bit_buffer.flush();
    }
}

impl BitWrite for Session<'_> {
    #[inline]
    fn write_bits(&mut self, value: u64, n: usize) -> Result<usize> {
        let io = active(&mut self.memory, &mut self.backend);
        self.write_bit_buffer.write_bits(io, value, n)
    }

    fn pad_write_bits(&mut self, fill: bool) -> Result<()> {
        let io = active(&mut self.memory, &mut self.backend);
        self.write_bit_buffer.pad(io, fill)
    }

    fn flush_write_bits(&mut self) -> Result<()> {
        let io = active(&mut self.memory, &mut self.backend);
        self.write_bit_buffer.flush(io)
    }
}
