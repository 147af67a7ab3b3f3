// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Embedding strategy selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bmp::BitmapImage;
use crate::stego::config::ConfigError;
use crate::stego::error::StegoError;
use crate::stego::{lsb, lsbi};

/// The three bit-embedding strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StegMethod {
    /// One bit in every pixel byte.
    Lsb1,
    /// Four bits in every pixel byte.
    Lsb4,
    /// One bit in blue/green bytes with per-pattern inversion.
    Lsbi,
}

impl StegMethod {
    pub const ALL: [StegMethod; 3] = [Self::Lsb1, Self::Lsb4, Self::Lsbi];

    /// Message bits stored per eligible pixel byte.
    pub fn bits_per_byte(self) -> u32 {
        match self {
            Self::Lsb1 | Self::Lsbi => 1,
            Self::Lsb4 => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Lsb1 => "LSB1",
            Self::Lsb4 => "LSB4",
            Self::Lsbi => "LSBI",
        }
    }

    /// Largest embedded stream, in bytes, that `image` can carry.
    pub fn capacity(self, image: &BitmapImage) -> usize {
        match self {
            Self::Lsb1 | Self::Lsb4 => lsb::capacity(image, self.bits_per_byte()),
            Self::Lsbi => lsbi::capacity(image),
        }
    }

    /// Write `stream` into the cover's pixel buffer.
    pub fn embed(self, stream: &[u8], cover: BitmapImage) -> Result<BitmapImage, StegoError> {
        match self {
            Self::Lsb1 | Self::Lsb4 => lsb::embed(stream, cover, self.bits_per_byte()),
            Self::Lsbi => lsbi::embed(stream, cover).map(|(image, _)| image),
        }
    }

    /// Recover the embedded stream.
    ///
    /// `has_trailer` selects the stop rule: with an extension trailer the
    /// stream runs to the first NUL after the declared payload, otherwise it
    /// ends exactly at the declared length.
    pub fn extract(self, image: &BitmapImage, has_trailer: bool) -> Result<Vec<u8>, StegoError> {
        match self {
            Self::Lsb1 | Self::Lsb4 => lsb::extract(image, self.bits_per_byte(), has_trailer),
            Self::Lsbi => lsbi::extract(image, has_trailer),
        }
    }
}

impl FromStr for StegMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LSB1" => Ok(Self::Lsb1),
            "LSB4" => Ok(Self::Lsb4),
            "LSBI" => Ok(Self::Lsbi),
            _ => Err(ConfigError::UnknownMethod(s.to_string())),
        }
    }
}

impl fmt::Display for StegMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<String> for StegMethod {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<StegMethod> for String {
    fn from(m: StegMethod) -> Self {
        m.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip_through_parse() {
        for m in StegMethod::ALL {
            assert_eq!(m.name().parse::<StegMethod>().unwrap(), m);
            assert_eq!(m.to_string().to_lowercase().parse::<StegMethod>().unwrap(), m);
        }
    }

    #[test]
    fn capacities_differ_by_strategy() {
        let img = BitmapImage::new(10, 10).unwrap();
        // Row 32 bytes, 320 total.
        assert_eq!(StegMethod::Lsb1.capacity(&img), 40);
        assert_eq!(StegMethod::Lsb4.capacity(&img), 160);
        assert_eq!(StegMethod::Lsbi.capacity(&img), lsbi::eligible_count(320) / 8);
    }

    #[test]
    fn extract_with_wrong_method_does_not_panic() {
        let stream = crate::stego::frame::build_inner_frame(b"secret", "txt").unwrap();
        let stego = StegMethod::Lsb4.embed(&stream, BitmapImage::new(10, 10).unwrap()).unwrap();
        for m in [StegMethod::Lsb1, StegMethod::Lsbi] {
            let _ = m.extract(&stego, true);
        }
    }
}
