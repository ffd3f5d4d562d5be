/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The error type shared by backends and codecs.

use core::fmt::{Display, Formatter};
use std::borrow::Cow;

/// The category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// Not enough bytes were available to satisfy a read.
    EndOfInput,
    /// The device or stream failed for a reason unrelated to end of input.
    Io,
    /// A value cannot be represented in the requested encoding, or a
    /// position lies outside of a memory buffer.
    OutOfRange,
    /// The caller broke the contract of the operation (unsupported width,
    /// memory buffer already enabled, and so on).
    Precondition,
    /// Allocating or growing a buffer failed.
    OutOfMemory,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            ErrorKind::EndOfInput => "end of input",
            ErrorKind::Io => "I/O failure",
            ErrorKind::OutOfRange => "value out of range",
            ErrorKind::Precondition => "precondition violated",
            ErrorKind::OutOfMemory => "out of memory",
        })
    }
}

/// An error raised by a backend or a codec.
///
/// Every error carries its [`ErrorKind`], the name of the operation that
/// detected it, an optional message and, for device and stream failures, the
/// underlying [`std::io::Error`].
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    op: &'static str,
    msg: Option<Cow<'static, str>>,
    source: Option<std::io::Error>,
}

/// Result type of all fallible operations of this crate.
pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    pub fn new(kind: ErrorKind, op: &'static str) -> Self {
        Self {
            kind,
            op,
            msg: None,
            source: None,
        }
    }

    pub fn end_of_input(op: &'static str) -> Self {
        Self::new(ErrorKind::EndOfInput, op)
    }

    pub fn out_of_range(op: &'static str) -> Self {
        Self::new(ErrorKind::OutOfRange, op)
    }

    pub fn precondition(op: &'static str) -> Self {
        Self::new(ErrorKind::Precondition, op)
    }

    pub fn out_of_memory(op: &'static str) -> Self {
        Self::new(ErrorKind::OutOfMemory, op)
    }

    /// Wrap an [`std::io::Error`]. An
    /// [`UnexpectedEof`](std::io::ErrorKind::UnexpectedEof) becomes
    /// [`ErrorKind::EndOfInput`], anything else [`ErrorKind::Io`].
    pub fn io(op: &'static str, err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::UnexpectedEof => ErrorKind::EndOfInput,
            _ => ErrorKind::Io,
        };
        Self {
            kind,
            op,
            msg: None,
            source: Some(err),
        }
    }

    /// Attach a human-readable message.
    #[must_use]
    pub fn with_msg(mut self, msg: impl Into<Cow<'static, str>>) -> Self {
        self.msg = Some(msg.into());
        self
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The name of the operation that failed.
    #[inline]
    pub fn op(&self) -> &'static str {
        self.op
    }

    pub fn msg(&self) -> Option<&str> {
        self.msg.as_deref()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.op, self.kind)?;
        if let Some(msg) = &self.msg {
            write!(f, " ({})", msg)?;
        }
        if let Some(source) = &self.source {
            write!(f, ": {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_io_eof_maps_to_end_of_input() {
        let err = Error::io(
            "read_bytes",
            std::io::Error::from(std::io::ErrorKind::UnexpectedEof),
        );
        assert_eq!(err.kind(), ErrorKind::EndOfInput);
        assert_eq!(err.op(), "read_bytes");
        assert!(std::error::Error::source(&err).is_some());

        let err = Error::io(
            "write_bytes",
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_display() {
        let err = Error::out_of_range("write_fixed_8_8").with_msg("256 >= 256");
        assert_eq!(
            err.to_string(),
            "write_fixed_8_8: value out of range (256 >= 256)"
        );
        assert_eq!(
            Error::precondition("read_bits").to_string(),
            "read_bits: precondition violated"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_kind() {
        let json = serde_json::to_string(&ErrorKind::EndOfInput).unwrap();
        assert_eq!(json, "\"EndOfInput\"");
        let kind: ErrorKind = serde_json::from_str("\"OutOfRange\"").unwrap();
        assert_eq!(kind, ErrorKind::OutOfRange);
    }
}
