// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! LSB embedding with per-pattern inversion.
//!
//! Pixel bytes are grouped by their bits 1-2 (the "pattern class"). After
//! tallying how many bit-0 changes plain LSB1 would cause in each class, any
//! class where changes outnumber unchanged bytes has its embedded bits
//! inverted. The four inversion decisions are stored in bit 0 of the first
//! four buffer bytes.
//!
//! Only blue and green bytes carry message bits: buffer offsets with
//! `offset % 3 == 2` are skipped. The four flag bytes are always used.
//!
//! ```text
//! offset:  0  1  2  3 | 4  5  6  7  8  9 10 11 ...
//! role:    f0 f1 f2 f3| m  -  m  m  -  m  m  -  ...
//! ```
//!
//! Tallying must complete before any byte is rewritten, since every
//! decision depends on totals over the whole range.

use tracing::debug;

use crate::bmp::BitmapImage;
use crate::stego::bits;
use crate::stego::error::StegoError;

/// Number of leading buffer bytes holding inversion flags.
pub const FLAG_BYTES: usize = 4;

/// Number of pattern classes (one per value of bits 1-2).
pub const PATTERN_CLASSES: usize = 4;

/// Inversion flag per pattern class, indexed `00, 01, 10, 11`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InversionFlags(pub [bool; PATTERN_CLASSES]);

impl InversionFlags {
    /// Whether embedded bits of pattern `class` are stored inverted.
    ///
    /// # Panics
    /// If `class >= PATTERN_CLASSES`. Use [`pattern_class`] to obtain one.
    pub fn is_inverted(&self, class: usize) -> bool {
        self.0[class]
    }

    fn bit(&self, class: usize) -> u8 {
        u8::from(self.0[class])
    }
}

/// Bit-0 change counts for one pattern class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatternTally {
    pub changed: usize,
    pub unchanged: usize,
}

impl PatternTally {
    fn record(&mut self, changed: bool) {
        if changed {
            self.changed += 1;
        } else {
            self.unchanged += 1;
        }
    }

    fn merge(mut self, other: Self) -> Self {
        self.changed += other.changed;
        self.unchanged += other.unchanged;
        self
    }

    /// Invert when more bytes would change than stay the same. Ties keep
    /// the plain bits.
    pub fn should_invert(&self) -> bool {
        self.changed > self.unchanged
    }
}

/// Pattern class of a pixel byte: its bits 1-2.
#[inline]
pub fn pattern_class(byte: u8) -> usize {
    ((byte >> 1) & 0b11) as usize
}

/// Whether the buffer byte at `offset` carries a message bit.
#[inline]
pub fn is_eligible(offset: usize) -> bool {
    offset >= FLAG_BYTES && offset % 3 != 2
}

/// Message-carrying offsets of a buffer of `len` bytes, in order.
pub fn eligible_offsets(len: usize) -> impl Iterator<Item = usize> {
    (FLAG_BYTES..len).filter(|&i| is_eligible(i))
}

/// Count of message-carrying bytes in a buffer of `len` bytes.
pub fn eligible_count(len: usize) -> usize {
    if len <= FLAG_BYTES {
        return 0;
    }
    // Offsets below n with i % 3 == 2 number n / 3; one of them (2) is a flag byte.
    (len - FLAG_BYTES) - (len / 3 - FLAG_BYTES / 3)
}

/// Bytes of stream the cover can carry.
pub fn capacity(image: &BitmapImage) -> usize {
    eligible_count(image.pixel_data().len()) / 8
}

/// Embed `stream` and return the stego image with the chosen flags.
pub fn embed(
    stream: &[u8],
    mut cover: BitmapImage,
) -> Result<(BitmapImage, InversionFlags), StegoError> {
    let message_bits: Vec<u8> = bits::chunks(stream, 1).collect();
    let pixels = cover.pixel_data_mut();
    let available = eligible_count(pixels.len());
    if message_bits.len() > available {
        return Err(StegoError::MessageTooLarge {
            needed: message_bits.len(),
            available,
        });
    }

    let offsets: Vec<usize> = eligible_offsets(pixels.len()).take(message_bits.len()).collect();

    let tallies = tally(pixels, &offsets, &message_bits);
    let flags = InversionFlags(std::array::from_fn(|c| tallies[c].should_invert()));
    debug!(?tallies, ?flags, bits = message_bits.len(), "lsbi pattern tallies");

    for (&i, &bit) in offsets.iter().zip(&message_bits) {
        let byte = pixels[i];
        pixels[i] = (byte & 0xFE) | (bit ^ flags.bit(pattern_class(byte)));
    }
    for (class, byte) in pixels[..FLAG_BYTES].iter_mut().enumerate() {
        *byte = (*byte & 0xFE) | flags.bit(class);
    }

    Ok((cover, flags))
}

/// Decode the inversion flags from the first four buffer bytes.
pub fn read_flags(image: &BitmapImage) -> Result<InversionFlags, StegoError> {
    let pixels = image.pixel_data();
    if pixels.len() < FLAG_BYTES {
        return Err(StegoError::NoHiddenData);
    }
    Ok(InversionFlags(std::array::from_fn(|c| pixels[c] & 1 == 1)))
}

/// Read back a length-prefixed stream.
pub fn extract(image: &BitmapImage, has_trailer: bool) -> Result<Vec<u8>, StegoError> {
    let flags = read_flags(image)?;
    debug!(?flags, "lsbi flags");

    let pixels = image.pixel_data();
    let chunks = eligible_offsets(pixels.len()).map(|i| {
        let byte = pixels[i];
        (byte & 1) ^ flags.bit(pattern_class(byte))
    });
    bits::collect(chunks, 1, has_trailer, capacity(image))
}

#[cfg(not(feature = "parallel"))]
fn tally(
    pixels: &[u8],
    offsets: &[usize],
    message_bits: &[u8],
) -> [PatternTally; PATTERN_CLASSES] {
    let mut tallies = [PatternTally::default(); PATTERN_CLASSES];
    for (&i, &bit) in offsets.iter().zip(message_bits) {
        let byte = pixels[i];
        tallies[pattern_class(byte)].record(byte & 1 != bit);
    }
    tallies
}

#[cfg(feature = "parallel")]
fn tally(
    pixels: &[u8],
    offsets: &[usize],
    message_bits: &[u8],
) -> [PatternTally; PATTERN_CLASSES] {
    use rayon::prelude::*;

    let empty = || [PatternTally::default(); PATTERN_CLASSES];
    offsets
        .par_iter()
        .zip(message_bits.par_iter())
        .fold(empty, |mut acc, (&i, &bit)| {
            let byte = pixels[i];
            acc[pattern_class(byte)].record(byte & 1 != bit);
            acc
        })
        .reduce(empty, |a, b| std::array::from_fn(|c| a[c].merge(b[c])))
}
