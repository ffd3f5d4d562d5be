/*
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Debug helpers.

[`DbgDevice`] logs at trace level all operations performed on a
[`VirtualDevice`](crate::impls::VirtualDevice), which is useful to
follow the traffic of a session on an application-defined device.

*/

mod dbg_device;
pub use dbg_device::*;
