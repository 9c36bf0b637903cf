// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

//! Plain-text test vectors.
//!
//! One record per line, either `seq,drop` or `session,seq,drop`, where `drop` is `0`
//! for an accepted and `1` for a dropped sequence number. Blank lines and lines
//! starting with `#` are ignored. Input records for the `check` command use the same
//! layout without the trailing flag.

use crate::error::AntireplayCliError;
use antireplay_window::SessionId;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Packet {
    pub(crate) session: SessionId,
    pub(crate) seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TestVector {
    pub(crate) packet: Packet,
    pub(crate) dropped: bool,
}

fn parse_number(line: usize, field: &str, what: &str) -> Result<u64, AntireplayCliError> {
    field
        .trim()
        .parse()
        .map_err(|err| AntireplayCliError::malformed(line, format!("invalid {what} '{field}': {err}")))
}

fn parse_flag(line: usize, field: &str) -> Result<bool, AntireplayCliError> {
    match field.trim() {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(AntireplayCliError::malformed(
            line,
            format!("the drop flag must be either 0 or 1, got '{other}'"),
        )),
    }
}

pub(crate) fn is_skippable(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

pub(crate) fn parse_packet(line: usize, raw: &str) -> Result<Packet, AntireplayCliError> {
    let fields: Vec<_> = raw.split(',').collect();
    match fields.as_slice() {
        [seq] => Ok(Packet {
            session: 0,
            seq: parse_number(line, seq, "sequence number")?,
        }),
        [session, seq] => Ok(Packet {
            session: parse_number(line, session, "session id")?,
            seq: parse_number(line, seq, "sequence number")?,
        }),
        _ => Err(AntireplayCliError::malformed(
            line,
            format!("expected 'seq' or 'session,seq', got '{raw}'"),
        )),
    }
}

pub(crate) fn parse_vector(line: usize, raw: &str) -> Result<TestVector, AntireplayCliError> {
    let Some((packet, flag)) = raw.rsplit_once(',') else {
        return Err(AntireplayCliError::malformed(
            line,
            format!("expected 'seq,drop' or 'session,seq,drop', got '{raw}'"),
        ));
    };

    Ok(TestVector {
        packet: parse_packet(line, packet)?,
        dropped: parse_flag(line, flag)?,
    })
}

pub(crate) fn read_vectors<R: BufRead>(reader: R) -> Result<Vec<TestVector>, AntireplayCliError> {
    let mut vectors = Vec::new();
    for (idx, raw) in reader.lines().enumerate() {
        let raw = raw.map_err(|source| AntireplayCliError::ReadFailure { source })?;
        if is_skippable(&raw) {
            continue;
        }
        vectors.push(parse_vector(idx + 1, &raw)?);
    }
    Ok(vectors)
}

pub(crate) fn write_vectors<W: Write>(
    mut writer: W,
    header: &str,
    vectors: &[TestVector],
    with_sessions: bool,
) -> Result<(), AntireplayCliError> {
    let map_err = |source| AntireplayCliError::WriteFailure { source };

    for line in header.lines() {
        writeln!(writer, "# {line}").map_err(map_err)?;
    }
    for vector in vectors {
        let flag = u8::from(vector.dropped);
        let written = if with_sessions {
            writeln!(
                writer,
                "{},{},{flag}",
                vector.packet.session, vector.packet.seq
            )
        } else {
            writeln!(writer, "{},{flag}", vector.packet.seq)
        };
        written.map_err(map_err)?;
    }
    writer.flush().map_err(map_err)
}
