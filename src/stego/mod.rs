// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Steganographic embedding and extraction.
//!
//! Three methods are available:
//!
//! - **LSB1**: one message bit in bit 0 of every pixel byte.
//! - **LSB4**: four message bits in the low nibble of every pixel byte.
//!   Four times the capacity of LSB1, with visible noise on flat areas.
//! - **LSBI**: one bit per blue/green byte, inverting the embedded bits of
//!   any pattern class where that changes fewer cover bits.
//!
//! Payloads can be encrypted first with AES or Triple DES in ECB, CBC, CFB
//! or OFB mode, keyed from a password via PBKDF2.

pub mod error;
pub mod config;
pub mod crypto;
pub mod frame;
pub mod bits;
pub mod lsb;
pub mod lsbi;
pub mod method;
pub mod capacity;
mod pipeline;

pub use error::{ErrorKind, StegoError};
pub use config::{Algorithm, ConfigError, EncryptionConfig, Mode, StegoConfig};
pub use crypto::{CryptoEngine, CryptoError};
pub use frame::InnerFrame;
pub use lsbi::InversionFlags;
pub use method::StegMethod;
pub use capacity::max_payload_len;
pub use pipeline::{embed, embed_file, extract, extract_file};
