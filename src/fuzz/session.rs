/*
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::prelude::*;
use arbitrary::Arbitrary;
use std::io::Cursor;

#[derive(Arbitrary, Debug)]
pub struct FuzzCase {
    initial_size: u8,
    commands: Vec<RandomCommand>,
}

#[derive(Arbitrary, Debug)]
pub enum RandomCommand {
    Size,
    GetPosition,
    SetPosition(u16),
    ReadBytes(u8),
    WriteBytes(Vec<u8>),
    ReadUint(u8),
    WriteUint(u64, u8),
    MpegLength(u32, bool),
}

/// Run the commands on a session redirected to an owned memory buffer,
/// and on a plain vector that models its expected contents.
pub fn harness(data: FuzzCase) {
    let mut session = Session::open_write(Backend::stream(Cursor::new(Vec::new())));
    session
        .enable_memory_buffer(None, data.initial_size as usize)
        .unwrap();

    let initial_size = match data.initial_size {
        0 => DEFAULT_MEMORY_BUFFER_SIZE,
        n => n as usize,
    };
    let mut buffer = vec![0_u8; initial_size];
    let mut idx = 0;

    for command in data.commands {
        match command {
            RandomCommand::Size => {
                assert_eq!(session.size().unwrap(), idx as u64);
            }
            RandomCommand::GetPosition => {
                assert_eq!(session.byte_pos().unwrap(), idx as u64);
            }
            RandomCommand::SetPosition(pos) => {
                let pos = pos as usize;
                let ok = session.set_byte_pos(pos as u64).is_ok();
                assert_eq!(ok, pos < buffer.len());
                if ok {
                    idx = pos;
                }
            }
            RandomCommand::ReadBytes(len) => {
                let mut buf = vec![0; len as usize];
                let result = session.read_bytes(&mut buf);
                match buffer.get(idx..idx + buf.len()) {
                    Some(expected) => {
                        assert!(result.is_ok());
                        assert_eq!(buf, expected);
                        idx += buf.len();
                    }
                    None => {
                        assert_eq!(result.unwrap_err().kind(), ErrorKind::EndOfInput);
                    }
                }
            }
            RandomCommand::WriteBytes(bytes) => {
                assert!(session.write_bytes(&bytes).is_ok());
                model_write(&mut buffer, &mut idx, &bytes);
            }
            RandomCommand::ReadUint(width) => {
                let width = UINT_WIDTHS[width as usize % UINT_WIDTHS.len()];
                let result = session.read_uint(width);
                match buffer.get(idx..idx + width) {
                    Some(expected) => {
                        let expected = expected
                            .iter()
                            .fold(0_u64, |value, &byte| value << 8 | byte as u64);
                        assert_eq!(result.unwrap(), expected);
                        idx += width;
                    }
                    None => {
                        assert_eq!(result.unwrap_err().kind(), ErrorKind::EndOfInput);
                    }
                }
            }
            RandomCommand::WriteUint(value, width) => {
                let width = UINT_WIDTHS[width as usize % UINT_WIDTHS.len()];
                let result = session.write_uint(value, width);
                if width < 8 && value >> (8 * width) != 0 {
                    assert_eq!(result.unwrap_err().kind(), ErrorKind::OutOfRange);
                } else {
                    assert!(result.is_ok());
                    model_write(&mut buffer, &mut idx, &value.to_be_bytes()[8 - width..]);
                }
            }
            RandomCommand::MpegLength(value, compact) => {
                let result = session.write_mpeg_length(value, compact);
                if value > MPEG_LENGTH_MAX {
                    assert_eq!(result.unwrap_err().kind(), ErrorKind::OutOfRange);
                    continue;
                }
                let len = result.unwrap();
                let mut groups = vec![];
                let mut rest = value;
                loop {
                    groups.push((rest & 0x7F) as u8);
                    rest >>= 7;
                    if rest == 0 && (compact || groups.len() == 4) {
                        break;
                    }
                }
                groups.reverse();
                let last = groups.len() - 1;
                for group in &mut groups[..last] {
                    *group |= 0x80;
                }
                assert_eq!(len, groups.len());
                let start = idx;
                model_write(&mut buffer, &mut idx, &groups);

                session.set_byte_pos(start as u64).unwrap();
                assert_eq!(session.read_mpeg_length().unwrap(), value);
                assert_eq!(session.byte_pos().unwrap(), idx as u64);
            }
        };
    }

    let (memory, used) = session.disable_memory_buffer().unwrap();
    assert_eq!(used, idx as u64);
    assert_eq!(memory.as_slice(), &buffer[..]);
}

/// Write `bytes` at `idx`, growing as an owned memory buffer does.
fn model_write(buffer: &mut Vec<u8>, idx: &mut usize, bytes: &[u8]) {
    if bytes.is_empty() {
        return;
    }
    if *idx + bytes.len() > buffer.len() {
        let new_len = 2 * (buffer.len() + bytes.len());
        buffer.resize(new_len, 0);
    }
    buffer[*idx..*idx + bytes.len()].copy_from_slice(bytes);
    *idx += bytes.len();
}
