/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::error::{Error, Result};
use crate::traits::*;
#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};
use std::io::{Read, Seek, SeekFrom, Write};

/// An adapter from [`Read`], [`Write`], and [`Seek`], to [`ByteRead`],
/// [`ByteWrite`], and [`ByteSeek`], respectively.
///
/// Instances of this struct can be created using [`StreamAdapter::new`]. They
/// turn every standard (possibly seekable) source or destination of bytes (such
/// as [`std::fs::File`], [`std::io::BufReader`], [`std::io::Cursor`], etc.)
/// into an external stream backend.
///
/// Reads use [`Read::read_exact`]: hitting the end of the stream is reported
/// as [`ErrorKind::EndOfInput`](crate::error::ErrorKind::EndOfInput), any
/// other failure as [`ErrorKind::Io`](crate::error::ErrorKind::Io).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
pub struct StreamAdapter<B> {
    backend: B,
}

impl<B> StreamAdapter<B> {
    /// Create a new StreamAdapter
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn into_inner(self) -> B {
        self.backend
    }

    pub fn get_ref(&self) -> &B {
        &self.backend
    }
}

impl<B: Seek> StreamAdapter<B> {
    /// Return the length of the stream, leaving the current position
    /// unchanged.
    pub fn stream_len(&mut self) -> Result<u64> {
        const OP: &str = "stream_len";
        let pos = self.backend.stream_position().map_err(|e| Error::io(OP, e))?;
        let len = self
            .backend
            .seek(SeekFrom::End(0))
            .map_err(|e| Error::io(OP, e))?;
        if pos != len {
            self.backend
                .seek(SeekFrom::Start(pos))
                .map_err(|e| Error::io(OP, e))?;
        }
        Ok(len)
    }
}

impl<B: Read> ByteRead for StreamAdapter<B> {
    #[inline]
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }
        self.backend.read_exact(buf).map_err(|e| {
            let err = Error::io("read_bytes", e);
            match err.kind() {
                crate::error::ErrorKind::EndOfInput => {
                    err.with_msg("not enough bytes, reached end of file")
                }
                _ => err,
            }
        })
    }
}

impl<B: Write> ByteWrite for StreamAdapter<B> {
    #[inline]
    fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }
        self.backend
            .write_all(buf)
            .map_err(|e| Error::io("write_bytes", e))
    }

    fn flush(&mut self) -> Result<()> {
        self.backend.flush().map_err(|e| Error::io("flush", e))
    }
}

impl<B: Seek> ByteSeek for StreamAdapter<B> {
    #[inline]
    fn byte_pos(&mut self) -> Result<u64> {
        self.backend
            .stream_position()
            .map_err(|e| Error::io("byte_pos", e))
    }

    #[inline]
    fn set_byte_pos(&mut self, byte_pos: u64) -> Result<()> {
        self.backend
            .seek(SeekFrom::Start(byte_pos))
            .map_err(|e| Error::io("set_byte_pos", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::error::ErrorKind;
    use crate::prelude::*;
    use std::io::Cursor;

    #[test]
    fn test_stream_adapter() {
        let data: Vec<u8> = vec![
            0xa6, 0x03, 0x24, 0x21, 0xc9, 0xd0, 0x1b, 0x28, 0x16, 0x8b, 0x4e, 0xcd,
        ];
        let path = std::env::temp_dir().join("test_bmff_io_stream_adapter");
        {
            let mut writer = StreamAdapter::new(std::fs::File::create(&path).unwrap());
            writer.write_bytes(&data).unwrap();
            writer.write_bytes(&[]).unwrap();
            assert_eq!(writer.byte_pos().unwrap(), data.len() as u64);
            writer.flush().unwrap();
        }
        {
            let mut reader = StreamAdapter::new(std::fs::File::open(&path).unwrap());
            assert_eq!(reader.stream_len().unwrap(), data.len() as u64);
            assert_eq!(reader.byte_pos().unwrap(), 0);
            let mut buf = [0; 12];
            reader.read_bytes(&mut buf).unwrap();
            assert_eq!(&buf[..], &data[..]);
            reader.set_byte_pos(4).unwrap();
            let mut buf = [0; 2];
            reader.peek_bytes(&mut buf).unwrap();
            assert_eq!(buf, [0xc9, 0xd0]);
            assert_eq!(reader.byte_pos().unwrap(), 4);
        }
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_stream_adapter_eof() {
        let mut reader = StreamAdapter::new(Cursor::new(vec![1_u8, 2, 3]));
        let mut buf = [0; 4];
        let err = reader.read_bytes(&mut buf).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EndOfInput);
        assert_eq!(err.op(), "read_bytes");
    }
}
