/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Implementations of byte stores and of the session built on them.

A container is read from or written to one of three byte stores:

- an application-defined [`VirtualDevice`], adapted by [`DeviceAdapter`];
- any standard source or destination of bytes implementing [`std::io::Read`],
  [`std::io::Write`], and [`std::io::Seek`] (such as a [`std::fs::File`]
  wrapped in a buffer), adapted by [`StreamAdapter`];
- a [`MemBuffer`], either owned and growable or borrowed from the caller
  with a fixed capacity.

All three implement [`ByteRead`](crate::traits::ByteRead),
[`ByteWrite`](crate::traits::ByteWrite), and
[`ByteSeek`](crate::traits::ByteSeek), so the codecs in
[`codes`](crate::codes) work on each of them directly.

A [`Session`] bundles a device or stream [`Backend`] with an optional memory
buffer that can be switched on and off at runtime, and with the
[`ReadBitBuffer`] and [`WriteBitBuffer`] needed for sub-byte I/O.

*/

mod device;
pub use device::*;

mod stream_adapter;
pub use stream_adapter::*;

mod mem_buffer;
pub use mem_buffer::*;

mod bit_buffer;
pub use bit_buffer::*;

mod session;
pub use session::*;
