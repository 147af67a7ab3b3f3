// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Message frame construction and parsing.
//!
//! The inner frame carries the hidden file and its extension:
//!
//! ```text
//! [4 bytes ] payload length (big-endian, must be > 0)
//! [N bytes ] payload
//! [M bytes ] "." + extension + 0x00
//! ```
//!
//! When encryption is configured the whole inner frame is encrypted and
//! wrapped in an outer envelope:
//!
//! ```text
//! [4 bytes ] ciphertext length (big-endian)
//! [K bytes ] ciphertext
//! ```
//!
//! Whichever frame is embedded starts with a length prefix, which is what
//! lets the extractor know where to stop.

use crate::stego::error::StegoError;

/// Size of every length prefix.
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Largest length a prefix can hold (it is read as a signed 32-bit value).
pub const MAX_FRAME_LEN: usize = i32::MAX as usize;

/// A parsed inner frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerFrame {
    /// The hidden file contents.
    pub payload: Vec<u8>,
    /// File extension without the leading dot (may be empty).
    pub extension: String,
}

impl InnerFrame {
    /// The suffix to append to an output file name: `".ext"`, or `""` when
    /// the original file had no extension.
    pub fn file_suffix(&self) -> String {
        if self.extension.is_empty() {
            String::new()
        } else {
            format!(".{}", self.extension)
        }
    }
}

/// Total inner frame length for a payload and extension label.
pub fn inner_frame_len(payload_len: usize, extension_len: usize) -> usize {
    LENGTH_PREFIX_LEN + payload_len + 1 + extension_len + 1
}

/// Build `len | payload | "." ext NUL`.
pub fn build_inner_frame(payload: &[u8], extension: &str) -> Result<Vec<u8>, StegoError> {
    if payload.is_empty() {
        return Err(StegoError::EmptyPayload);
    }
    if extension.as_bytes().contains(&0) {
        return Err(StegoError::FrameCorrupted("extension label contains a NUL byte"));
    }
    let prefix = length_prefix(payload.len())?;

    let mut frame = Vec::with_capacity(inner_frame_len(payload.len(), extension.len()));
    frame.extend_from_slice(&prefix);
    frame.extend_from_slice(payload);
    frame.push(b'.');
    frame.extend_from_slice(extension.as_bytes());
    frame.push(0);
    Ok(frame)
}

/// Build `len | ciphertext`.
pub fn wrap_encrypted(ciphertext: &[u8]) -> Result<Vec<u8>, StegoError> {
    if ciphertext.is_empty() {
        return Err(StegoError::EmptyPayload);
    }
    let prefix = length_prefix(ciphertext.len())?;

    let mut frame = Vec::with_capacity(LENGTH_PREFIX_LEN + ciphertext.len());
    frame.extend_from_slice(&prefix);
    frame.extend_from_slice(ciphertext);
    Ok(frame)
}

/// Read the big-endian length prefix at the start of `data`.
///
/// Returns [`StegoError::NoHiddenData`] if the value is zero or negative.
pub fn read_length(data: &[u8]) -> Result<usize, StegoError> {
    if data.len() < LENGTH_PREFIX_LEN {
        return Err(StegoError::FrameCorrupted("missing length prefix"));
    }
    let len = i32::from_be_bytes([data[0], data[1], data[2], data[3]]);
    if len <= 0 {
        return Err(StegoError::NoHiddenData);
    }
    Ok(len as usize)
}

/// Split an inner frame into payload and extension.
pub fn parse_inner_frame(data: &[u8]) -> Result<InnerFrame, StegoError> {
    let payload_len = read_length(data)?;
    let payload_end = LENGTH_PREFIX_LEN
        .checked_add(payload_len)
        .filter(|&end| end <= data.len())
        .ok_or(StegoError::FrameCorrupted("payload shorter than its length prefix"))?;

    let trailer = &data[payload_end..];
    let nul = trailer
        .iter()
        .position(|&b| b == 0)
        .ok_or(StegoError::FrameCorrupted("missing extension terminator"))?;
    let label = &trailer[..nul];
    let label = label.strip_prefix(b".").unwrap_or(label);
    let extension = std::str::from_utf8(label)
        .map_err(|_| StegoError::FrameCorrupted("extension is not valid UTF-8"))?
        .to_string();

    Ok(InnerFrame {
        payload: data[LENGTH_PREFIX_LEN..payload_end].to_vec(),
        extension,
    })
}

/// Drop the outer length prefix and return the ciphertext it announces.
pub fn strip_encrypted_length(data: &[u8]) -> Result<&[u8], StegoError> {
    let len = read_length(data)?;
    let end = LENGTH_PREFIX_LEN
        .checked_add(len)
        .filter(|&end| end <= data.len())
        .ok_or(StegoError::FrameCorrupted("ciphertext shorter than its length prefix"))?;
    Ok(&data[LENGTH_PREFIX_LEN..end])
}

fn length_prefix(len: usize) -> Result<[u8; LENGTH_PREFIX_LEN], StegoError> {
    if len > MAX_FRAME_LEN {
        return Err(StegoError::MessageTooLarge { needed: len, available: MAX_FRAME_LEN });
    }
    Ok((len as u32).to_be_bytes())
}
