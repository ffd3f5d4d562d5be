/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::error::{Error, Result};
use crate::traits::*;

/// A pluggable virtual I/O device.
///
/// This is the capability set an application implements to let a
/// [`Session`](crate::impls::Session) work on storage that is neither a
/// standard stream nor memory (a network resource, an encrypted container,
/// a region of a larger file, and so on).
///
/// Unlike [`std::io::Read`], [`read`](VirtualDevice::read) is expected to
/// fill the whole buffer unless the end of the device has been reached: a
/// short count is reported as end of input, not retried.
pub trait VirtualDevice {
    /// Return the current position of the device.
    fn position(&mut self) -> std::io::Result<u64>;

    /// Move to the absolute position `pos`.
    fn set_position(&mut self, pos: u64) -> std::io::Result<()>;

    /// Read into `buf`, returning the number of bytes read.
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize>;

    /// Write `buf`, returning the number of bytes written.
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize>;

    /// Return the total length of the device in bytes.
    fn file_len(&mut self) -> std::io::Result<u64>;
}

impl<D: VirtualDevice + ?Sized> VirtualDevice for Box<D> {
    #[inline(always)]
    fn position(&mut self) -> std::io::Result<u64> {
        (**self).position()
    }
    #[inline(always)]
    fn set_position(&mut self, pos: u64) -> std::io::Result<()> {
        (**self).set_position(pos)
    }
    #[inline(always)]
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        (**self).read(buf)
    }
    #[inline(always)]
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        (**self).write(buf)
    }
    #[inline(always)]
    fn file_len(&mut self) -> std::io::Result<u64> {
        (**self).file_len()
    }
}

impl<D: VirtualDevice + ?Sized> VirtualDevice for &mut D {
    #[inline(always)]
    fn position(&mut self) -> std::io::Result<u64> {
        (**self).position()
    }
    #[inline(always)]
    fn set_position(&mut self, pos: u64) -> std::io::Result<()> {
        (**self).set_position(pos)
    }
    #[inline(always)]
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        (**self).read(buf)
    }
    #[inline(always)]
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        (**self).write(buf)
    }
    #[inline(always)]
    fn file_len(&mut self) -> std::io::Result<u64> {
        (**self).file_len()
    }
}

/// An adapter from a [`VirtualDevice`] to [`ByteRead`], [`ByteWrite`], and
/// [`ByteSeek`].
///
/// Failures of the device are reported as
/// [`ErrorKind::Io`](crate::error::ErrorKind::Io); a short read is reported
/// as [`ErrorKind::EndOfInput`](crate::error::ErrorKind::EndOfInput).
#[derive(Debug, Clone)]
pub struct DeviceAdapter<D> {
    device: D,
}

impl<D: VirtualDevice> DeviceAdapter<D> {
    pub fn new(device: D) -> Self {
        Self { device }
    }

    pub fn into_inner(self) -> D {
        self.device
    }

    /// Return the length of the device.
    pub fn device_len(&mut self) -> Result<u64> {
        self.device
            .file_len()
            .map_err(|e| Error::io("device_len", e).with_msg("getting length via virtual I/O"))
    }
}

impl<D: VirtualDevice> ByteRead for DeviceAdapter<D> {
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        const OP: &str = "read_bytes";
        if buf.is_empty() {
            return Ok(());
        }
        let n = self
            .device
            .read(buf)
            .map_err(|e| Error::io(OP, e).with_msg("reading via virtual I/O"))?;
        if n > buf.len() {
            return Err(Error::new(crate::error::ErrorKind::Io, OP).with_msg(format!(
                "virtual I/O reported {} bytes read into a buffer of {}",
                n,
                buf.len()
            )));
        }
        if n < buf.len() {
            return Err(Error::end_of_input(OP).with_msg(format!(
                "not enough bytes, reached end of file ({} of {} bytes read)",
                n,
                buf.len()
            )));
        }
        Ok(())
    }
}

impl<D: VirtualDevice> ByteWrite for DeviceAdapter<D> {
    fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
        const OP: &str = "write_bytes";
        if buf.is_empty() {
            return Ok(());
        }
        let n = self
            .device
            .write(buf)
            .map_err(|e| Error::io(OP, e).with_msg("writing via virtual I/O"))?;
        if n != buf.len() {
            return Err(Error::new(crate::error::ErrorKind::Io, OP).with_msg(format!(
                "short write via virtual I/O ({} of {} bytes written)",
                n,
                buf.len()
            )));
        }
        Ok(())
    }

    #[inline(always)]
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<D: VirtualDevice> ByteSeek for DeviceAdapter<D> {
    fn byte_pos(&mut self) -> Result<u64> {
        self.device
            .position()
            .map_err(|e| Error::io("byte_pos", e).with_msg("getting position via virtual I/O"))
    }

    fn set_byte_pos(&mut self, byte_pos: u64) -> Result<()> {
        self.device.set_position(byte_pos).map_err(|e| {
            Error::io("set_byte_pos", e).with_msg("setting position via virtual I/O")
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;

    /// A device that returns at most `chunk` bytes per read.
    struct Stingy {
        data: Vec<u8>,
        pos: usize,
        chunk: usize,
    }

    impl VirtualDevice for Stingy {
        fn position(&mut self) -> std::io::Result<u64> {
            Ok(self.pos as u64)
        }
        fn set_position(&mut self, pos: u64) -> std::io::Result<()> {
            self.pos = pos as usize;
            Ok(())
        }
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = buf.len().min(self.chunk).min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied))
        }
        fn file_len(&mut self) -> std::io::Result<u64> {
            Ok(self.data.len() as u64)
        }
    }

    #[test]
    fn test_short_read_is_end_of_input() {
        let mut adapter = DeviceAdapter::new(Stingy {
            data: vec![1, 2, 3, 4],
            pos: 0,
            chunk: 2,
        });
        let mut buf = [0; 2];
        adapter.read_bytes(&mut buf).unwrap();
        assert_eq!(buf, [1, 2]);
        let mut buf = [0; 3];
        let err = adapter.read_bytes(&mut buf).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EndOfInput);
        assert_eq!(adapter.device_len().unwrap(), 4);
    }

    #[test]
    fn test_device_failure_is_io() {
        let mut adapter = DeviceAdapter::new(Stingy {
            data: vec![],
            pos: 0,
            chunk: 1,
        });
        let err = adapter.write_bytes(&[0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.op(), "write_bytes");
        // Empty writes never reach the device
        adapter.write_bytes(&[]).unwrap();
    }

    /// A device that claims to read one byte more than requested.
    struct Boastful;

    impl VirtualDevice for Boastful {
        fn position(&mut self) -> std::io::Result<u64> {
            Ok(0)
        }
        fn set_position(&mut self, _pos: u64) -> std::io::Result<()> {
            Ok(())
        }
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            Ok(buf.len() + 1)
        }
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            Ok(buf.len())
        }
        fn file_len(&mut self) -> std::io::Result<u64> {
            Ok(0)
        }
    }

    #[test]
    fn test_read_over_count_is_io() {
        let mut adapter = DeviceAdapter::new(Boastful);
        let err = adapter.read_bytes(&mut [0; 4]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.op(), "read_bytes");

        // the logging wrapper does not slice past the buffer
        let mut adapter = DeviceAdapter::new(crate::utils::DbgDevice::new(Boastful));
        let err = adapter.read_bytes(&mut [0; 4]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
