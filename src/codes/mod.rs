/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Traits for reading and writing the encodings of ISO base media files.

Each encoding is implemented as a pair of traits for reading and writing
(e.g., [`ScalarRead`] and [`ScalarWrite`]). The traits for reading depend
on [`ByteRead`](crate::traits::ByteRead), whereas the traits for writing
depend on [`ByteWrite`](crate::traits::ByteWrite); both have blanket
implementations, so it is sufficient to pull them in scope to use them
on any byte store, including a [`Session`](crate::impls::Session).

| Encoding           | Example                  | Bytes                     |
|--------------------|--------------------------|---------------------------|
| `u24`              | `0x030405`               | `03 04 05`                |
| 8.8 fixed point    | `1.5`                    | `01 80`                   |
| 16.16 fixed point  | `320.25`                 | `01 40 40 00`             |
| NUL-terminated     | `"moov"`                 | `6D 6F 6F 76 00`          |
| counted string     | `"hello"`                | `05 68 65 6C 6C 6F`       |
| MPEG length        | `200`                    | `81 48`                   |

Bit fields are handled by [`BitRead`](crate::traits::BitRead) and
[`BitWrite`](crate::traits::BitWrite) instead.

*/

pub mod scalar;
pub use scalar::{ScalarRead, ScalarWrite, UINT_WIDTHS};

pub mod string;
pub use string::{StringRead, StringWrite, MAX_COUNT_BYTES};

pub mod mpeg_length;
pub use mpeg_length::{byte_len_mpeg_length, MpegLengthRead, MpegLengthWrite, MPEG_LENGTH_MAX};
