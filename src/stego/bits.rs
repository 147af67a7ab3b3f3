// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Bit-chunk serialization shared by all embedding strategies.
//!
//! Streams are written MSB-first in chunks of 1 or 4 bits. On extraction,
//! [`StreamCollector`] reassembles bytes and applies the length-prefix stop
//! rule so that only the embedded frame is returned.

use crate::stego::error::StegoError;
use crate::stego::frame::{self, LENGTH_PREFIX_LEN};

/// Split `data` into MSB-first chunks of `width` bits (`width` divides 8).
pub fn chunks(data: &[u8], width: u32) -> impl Iterator<Item = u8> + '_ {
    debug_assert!(width > 0 && 8 % width == 0);
    let per_byte = 8 / width;
    let mask = low_mask(width);
    data.iter()
        .flat_map(move |&byte| (0..per_byte).rev().map(move |i| (byte >> (i * width)) & mask))
}

/// Mask selecting the low `width` bits of a byte.
pub fn low_mask(width: u32) -> u8 {
    ((1u16 << width) - 1) as u8
}

/// Reassembles extracted chunks into the embedded frame.
///
/// After the first four bytes the declared length `L` is known. Collection
/// stops at `4 + L` bytes, or, when an extension trailer follows the
/// payload, at the first zero byte at or beyond `4 + L + 1`.
#[derive(Debug)]
pub struct StreamCollector {
    width: u32,
    has_trailer: bool,
    max_len: usize,
    bytes: Vec<u8>,
    acc: u8,
    filled: u32,
    declared: Option<usize>,
}

impl StreamCollector {
    /// `max_len` is the most bytes the cover can possibly hold; a declared
    /// length beyond it means there is no frame.
    pub fn new(width: u32, has_trailer: bool, max_len: usize) -> Self {
        Self {
            width,
            has_trailer,
            max_len,
            bytes: Vec::new(),
            acc: 0,
            filled: 0,
            declared: None,
        }
    }

    /// Feed one chunk. Returns `Ok(true)` once the frame is complete.
    pub fn push(&mut self, chunk: u8) -> Result<bool, StegoError> {
        self.acc = (self.acc << self.width) | (chunk & low_mask(self.width));
        self.filled += self.width;
        if self.filled < 8 {
            return Ok(false);
        }

        self.bytes.push(self.acc);
        self.acc = 0;
        self.filled = 0;

        if self.bytes.len() == LENGTH_PREFIX_LEN {
            let len = frame::read_length(&self.bytes)?;
            let min_total = LENGTH_PREFIX_LEN + len + usize::from(self.has_trailer);
            if min_total > self.max_len {
                return Err(StegoError::NoHiddenData);
            }
            self.bytes.reserve(min_total - LENGTH_PREFIX_LEN);
            self.declared = Some(len);
            return Ok(false);
        }

        let Some(len) = self.declared else {
            return Ok(false);
        };
        let body_end = LENGTH_PREFIX_LEN + len;
        Ok(if self.has_trailer {
            self.bytes.len() > body_end && self.bytes.last() == Some(&0)
        } else {
            self.bytes.len() >= body_end
        })
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Drive a [`StreamCollector`] over `chunks` until the frame is complete.
pub fn collect<I>(
    chunks: I,
    width: u32,
    has_trailer: bool,
    max_len: usize,
) -> Result<Vec<u8>, StegoError>
where
    I: IntoIterator<Item = u8>,
{
    let mut collector = StreamCollector::new(width, has_trailer, max_len);
    for chunk in chunks {
        if collector.push(chunk)? {
            return Ok(collector.into_bytes());
        }
    }
    if collector.declared.is_none() {
        return Err(StegoError::NoHiddenData);
    }
    Err(StegoError::FrameCorrupted("cover exhausted before the frame terminator"))
}
