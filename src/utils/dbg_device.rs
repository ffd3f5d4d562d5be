/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::impls::VirtualDevice;

/// A wrapper over a [`VirtualDevice`] that logs at trace level all the
/// calls performed, together with their results.
#[derive(Debug, Clone)]
pub struct DbgDevice<D> {
    device: D,
}

impl<D: VirtualDevice> DbgDevice<D> {
    pub fn new(device: D) -> Self {
        Self { device }
    }

    pub fn into_inner(self) -> D {
        self.device
    }
}

impl<D: VirtualDevice> VirtualDevice for DbgDevice<D> {
    fn position(&mut self) -> std::io::Result<u64> {
        let result = self.device.position();
        log::trace!("position(): {:?}", result);
        result
    }

    fn set_position(&mut self, pos: u64) -> std::io::Result<()> {
        let result = self.device.set_position(pos);
        log::trace!("set_position({}): {:?}", pos, result);
        result
    }

    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let result = self.device.read(buf);
        match &result {
            Ok(n) => log::trace!(
                "read({}): {} {:02x?}",
                buf.len(),
                n,
                &buf[..(*n).min(buf.len())]
            ),
            Err(e) => log::trace!("read({}): {}", buf.len(), e),
        }
        result
    }

    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let result = self.device.write(buf);
        log::trace!("write({:02x?}): {:?}", buf, result);
        result
    }

    fn file_len(&mut self) -> std::io::Result<u64> {
        let result = self.device.file_len();
        log::trace!("file_len(): {:?}", result);
        result
    }
}
