// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Embedding configuration: method selector plus optional encryption.
//!
//! Can be built from loose option strings (as a front end would receive
//! them) or deserialized from TOML:
//!
//! ```toml
//! method = "LSBI"
//!
//! [encryption]
//! algorithm = "AES256"
//! mode = "OFB"
//! password = "hunter2"
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stego::method::StegMethod;

/// Default PBKDF2 salt.
pub const DEFAULT_SALT: &str = "salado";

/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 65_536;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown steganography method: {0} (expected LSB1, LSB4 or LSBI)")]
    UnknownMethod(String),
    #[error("unknown encryption algorithm: {0} (expected AES128, AES192, AES256 or DES)")]
    UnknownAlgorithm(String),
    #[error("unknown block cipher mode: {0} (expected ECB, CFB, OFB or CBC)")]
    UnknownMode(String),
    #[error("a password is required when encryption options are given")]
    MissingPassword,
    #[error("PBKDF2 iteration count must be positive")]
    ZeroIterations,
    #[error("failed to read config file: {0}")]
    FileRead(String),
    #[error("failed to parse config file: {0}")]
    Parse(String),
}

/// Block cipher selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Algorithm {
    Aes128,
    Aes192,
    Aes256,
    /// Triple DES, EDE with three independent keys.
    Des,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [Self::Aes128, Self::Aes192, Self::Aes256, Self::Des];

    /// Key length in bytes.
    pub fn key_len(self) -> usize {
        match self {
            Self::Aes128 => 16,
            Self::Aes192 => 24,
            Self::Aes256 => 32,
            Self::Des => 24,
        }
    }

    /// Cipher block length in bytes (also the IV length).
    pub fn block_len(self) -> usize {
        match self {
            Self::Aes128 | Self::Aes192 | Self::Aes256 => 16,
            Self::Des => 8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Aes128 => "AES128",
            Self::Aes192 => "AES192",
            Self::Aes256 => "AES256",
            Self::Des => "DES",
        }
    }
}

/// Block cipher mode of operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Mode {
    Ecb,
    /// 8-bit cipher feedback.
    Cfb,
    Ofb,
    Cbc,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Self::Ecb, Self::Cfb, Self::Ofb, Self::Cbc];

    pub fn uses_iv(self) -> bool {
        !matches!(self, Self::Ecb)
    }

    /// Whether plaintext is PKCS#7-padded to the block size.
    pub fn is_padded(self) -> bool {
        matches!(self, Self::Ecb | Self::Cbc)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Ecb => "ECB",
            Self::Cfb => "CFB",
            Self::Ofb => "OFB",
            Self::Cbc => "CBC",
        }
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AES128" => Ok(Self::Aes128),
            "AES192" => Ok(Self::Aes192),
            "AES256" => Ok(Self::Aes256),
            "DES" => Ok(Self::Des),
            _ => Err(ConfigError::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ECB" => Ok(Self::Ecb),
            "CFB" => Ok(Self::Cfb),
            "OFB" => Ok(Self::Ofb),
            "CBC" => Ok(Self::Cbc),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<String> for Algorithm {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Algorithm> for String {
    fn from(a: Algorithm) -> Self {
        a.name().to_string()
    }
}

impl TryFrom<String> for Mode {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Mode> for String {
    fn from(m: Mode) -> Self {
        m.name().to_string()
    }
}

/// Cipher selection, password and PBKDF2 parameters.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionConfig {
    #[serde(default = "default_algorithm")]
    pub algorithm: Algorithm,
    #[serde(default = "default_mode")]
    pub mode: Mode,
    pub password: String,
    #[serde(default = "default_salt")]
    pub salt: Vec<u8>,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
}

fn default_algorithm() -> Algorithm {
    Algorithm::Aes128
}

fn default_mode() -> Mode {
    Mode::Cbc
}

fn default_salt() -> Vec<u8> {
    DEFAULT_SALT.as_bytes().to_vec()
}

fn default_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

impl EncryptionConfig {
    /// Configuration with the default salt and iteration count.
    pub fn new(algorithm: Algorithm, mode: Mode, password: impl Into<String>) -> Self {
        Self {
            algorithm,
            mode,
            password: password.into(),
            salt: default_salt(),
            iterations: default_iterations(),
        }
    }

    pub fn with_salt(mut self, salt: impl Into<Vec<u8>>) -> Self {
        self.salt = salt.into();
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.password.is_empty() {
            return Err(ConfigError::MissingPassword);
        }
        if self.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        Ok(())
    }
}

// Keeps the password out of logs.
impl fmt::Debug for EncryptionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionConfig")
            .field("algorithm", &self.algorithm)
            .field("mode", &self.mode)
            .field("password", &"<redacted>")
            .field("salt_len", &self.salt.len())
            .field("iterations", &self.iterations)
            .finish()
    }
}

/// Full embed/extract configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StegoConfig {
    pub method: StegMethod,
    #[serde(default)]
    pub encryption: Option<EncryptionConfig>,
}

impl StegoConfig {
    /// Plain (unencrypted) configuration.
    pub fn new(method: StegMethod) -> Self {
        Self { method, encryption: None }
    }

    pub fn with_encryption(mut self, encryption: EncryptionConfig) -> Self {
        self.encryption = Some(encryption);
        self
    }

    /// Build from loose option strings.
    ///
    /// Encryption is enabled as soon as any of `algorithm`, `mode` or
    /// `password` is given, and then a password is mandatory. Missing
    /// algorithm/mode default to AES128 and CBC.
    pub fn from_options(
        method: &str,
        algorithm: Option<&str>,
        mode: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let method: StegMethod = method.parse()?;

        if algorithm.is_none() && mode.is_none() && password.is_none() {
            return Ok(Self::new(method));
        }

        let password = password.ok_or(ConfigError::MissingPassword)?;
        let algorithm = algorithm
            .map(str::parse::<Algorithm>)
            .transpose()?
            .unwrap_or_else(default_algorithm);
        let mode = mode.map(str::parse::<Mode>).transpose()?.unwrap_or_else(default_mode);

        let encryption = EncryptionConfig::new(algorithm, mode, password);
        encryption.validate()?;
        Ok(Self::new(method).with_encryption(encryption))
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead(e.to_string()))?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.encryption {
            Some(enc) => enc.validate(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors_parse_case_insensitively() {
        assert_eq!("aes192".parse::<Algorithm>().unwrap(), Algorithm::Aes192);
        assert_eq!("Des".parse::<Algorithm>().unwrap(), Algorithm::Des);
        assert_eq!("ofb".parse::<Mode>().unwrap(), Mode::Ofb);
        assert_eq!("lsbi".parse::<StegMethod>().unwrap(), StegMethod::Lsbi);
    }

    #[test]
    fn unknown_selectors_rejected() {
        assert_eq!(
            "AES512".parse::<Algorithm>(),
            Err(ConfigError::UnknownAlgorithm("AES512".into()))
        );
        assert_eq!("GCM".parse::<Mode>(), Err(ConfigError::UnknownMode("GCM".into())));
        assert_eq!("LSB2".parse::<StegMethod>(), Err(ConfigError::UnknownMethod("LSB2".into())));
    }

    #[test]
    fn no_crypto_options_means_plain() {
        let cfg = StegoConfig::from_options("LSB1", None, None, None).unwrap();
        assert_eq!(cfg, StegoConfig::new(StegMethod::Lsb1));
    }

    #[test]
    fn password_alone_uses_defaults() {
        let cfg = StegoConfig::from_options("LSB4", None, None, Some("pw")).unwrap();
        let enc = cfg.encryption.unwrap();
        assert_eq!(enc.algorithm, Algorithm::Aes128);
        assert_eq!(enc.mode, Mode::Cbc);
        assert_eq!(enc.salt, b"salado");
        assert_eq!(enc.iterations, 65_536);
    }

    #[test]
    fn crypto_options_without_password_rejected() {
        assert_eq!(
            StegoConfig::from_options("LSBI", Some("aes256"), None, None),
            Err(ConfigError::MissingPassword)
        );
        assert_eq!(
            StegoConfig::from_options("LSBI", None, Some("ecb"), None),
            Err(ConfigError::MissingPassword)
        );
    }

    #[test]
    fn toml_roundtrip() {
        let text = r#"
            method = "LSBI"

            [encryption]
            algorithm = "aes256"
            mode = "OFB"
            password = "hunter2"
            iterations = 1000
        "#;
        let cfg = StegoConfig::from_toml_str(text).unwrap();
        assert_eq!(cfg.method, StegMethod::Lsbi);
        let enc = cfg.encryption.as_ref().unwrap();
        assert_eq!(enc.algorithm, Algorithm::Aes256);
        assert_eq!(enc.mode, Mode::Ofb);
        assert_eq!(enc.iterations, 1000);
        assert_eq!(enc.salt, b"salado");

        let back = StegoConfig::from_toml_str(&toml::to_string(&cfg).unwrap()).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn toml_unknown_method_rejected() {
        let err = StegoConfig::from_toml_str("method = \"LSB8\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn toml_zero_iterations_rejected() {
        let text = "method = \"LSB1\"\n[encryption]\npassword = \"x\"\niterations = 0\n";
        assert_eq!(StegoConfig::from_toml_str(text), Err(ConfigError::ZeroIterations));
    }

    #[test]
    fn debug_redacts_password() {
        let enc = EncryptionConfig::new(Algorithm::Des, Mode::Ecb, "s3cret");
        assert!(!format!("{enc:?}").contains("s3cret"));
    }
}
