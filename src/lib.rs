// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! # stego-bmp
//!
//! Hides arbitrary files in the least-significant bits of 24-bit BMP images
//! and recovers them, optionally encrypted with a password.
//!
//! - `bmp`: pure-Rust reader/writer for uncompressed 24-bit bitmaps.
//! - `stego`: message framing, encryption and the LSB1, LSB4 and LSBI
//!   embedding methods.
//!
//! The library emits `tracing` events but never installs a subscriber.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use stego_bmp::{embed_file, extract_file, StegoConfig};
//!
//! let config = StegoConfig::from_options("LSBI", Some("AES256"), Some("CBC"), Some("secret"))?;
//! embed_file("notes.pdf", "cover.bmp", "stego.bmp", &config)?;
//! let written = extract_file("stego.bmp", "recovered", &config)?;
//! assert_eq!(written.extension().unwrap(), "pdf");
//! # Ok::<(), stego_bmp::StegoError>(())
//! ```

pub mod bmp;
pub mod stego;

pub use bmp::error::BmpError;
pub use bmp::{BitmapImage, Rgb};
pub use stego::{embed, embed_file, extract, extract_file, max_payload_len};
pub use stego::{Algorithm, ConfigError, EncryptionConfig, Mode, StegMethod, StegoConfig};
pub use stego::{CryptoEngine, CryptoError, ErrorKind, InnerFrame, InversionFlags, StegoError};
