// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Password-based payload encryption.
//!
//! A single PBKDF2-HMAC-SHA256 call, sized to `key_len + iv_len`, produces
//! both the cipher key and (for modes that use one) the IV:
//!
//! ```text
//! PBKDF2(password, salt, iterations) = [key_len bytes key][iv_len bytes IV]
//! ```
//!
//! Nothing is random, so two engines built from the same configuration are
//! exact inverses of each other. ECB and CBC use PKCS#7 padding; CFB (8-bit
//! feedback) and OFB are stream-like and leave the length unchanged.

use cipher::block_padding::Pkcs7;
use cipher::{AsyncStreamCipher, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit, StreamCipher};
use sha2::Sha256;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::stego::config::{Algorithm, ConfigError, EncryptionConfig, Mode};

/// Errors from cipher setup and decryption.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Derived key or IV does not match the cipher's requirements.
    #[error("invalid key or IV length for the selected cipher")]
    InvalidKeyLength,
    /// Padded-mode ciphertext is not a whole number of blocks.
    #[error("ciphertext length {len} is not a multiple of the {block} byte block size")]
    CiphertextNotAligned { len: usize, block: usize },
    /// PKCS#7 padding check failed (wrong password or corrupted data).
    #[error("bad padding (wrong password?)")]
    BadPadding,
}

/// Runs `$body` with `$cipher` bound to the block cipher type for `$alg`.
macro_rules! with_block_cipher {
    ($alg:expr, $cipher:ident => $body:block) => {
        match $alg {
            Algorithm::Aes128 => {
                type $cipher = aes::Aes128;
                $body
            }
            Algorithm::Aes192 => {
                type $cipher = aes::Aes192;
                $body
            }
            Algorithm::Aes256 => {
                type $cipher = aes::Aes256;
                $body
            }
            Algorithm::Des => {
                type $cipher = des::TdesEde3;
                $body
            }
        }
    };
}

/// Derive `key_len + iv_len` bytes from the password and split them.
pub fn derive_key_iv(
    password: &str,
    salt: &[u8],
    iterations: u32,
    key_len: usize,
    iv_len: usize,
) -> (Zeroizing<Vec<u8>>, Zeroizing<Vec<u8>>) {
    let mut output = Zeroizing::new(vec![0u8; key_len + iv_len]);
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut output);

    let key = Zeroizing::new(output[..key_len].to_vec());
    let iv = Zeroizing::new(output[key_len..].to_vec());
    (key, iv)
}

/// Ciphertext length produced for `plain_len` bytes of plaintext.
pub fn ciphertext_len(algorithm: Algorithm, mode: Mode, plain_len: usize) -> usize {
    if mode.is_padded() {
        let block = algorithm.block_len();
        (plain_len / block + 1) * block
    } else {
        plain_len
    }
}

/// A configured cipher with its derived key material.
pub struct CryptoEngine {
    algorithm: Algorithm,
    mode: Mode,
    key: Zeroizing<Vec<u8>>,
    iv: Zeroizing<Vec<u8>>,
}

impl CryptoEngine {
    /// Validate the configuration and derive key/IV.
    pub fn new(config: &EncryptionConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let key_len = config.algorithm.key_len();
        let iv_len = if config.mode.uses_iv() { config.algorithm.block_len() } else { 0 };
        let (key, iv) =
            derive_key_iv(&config.password, &config.salt, config.iterations, key_len, iv_len);

        tracing::trace!(
            algorithm = %config.algorithm,
            mode = %config.mode,
            iterations = config.iterations,
            key_bits = key_len * 8,
            iv_bits = iv_len * 8,
            "derived cipher key material"
        );

        Ok(Self {
            algorithm: config.algorithm,
            mode: config.mode,
            key,
            iv,
        })
    }

    /// Ciphertext length this engine produces for `plain_len` bytes.
    pub fn ciphertext_len(&self, plain_len: usize) -> usize {
        ciphertext_len(self.algorithm, self.mode, plain_len)
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let key = self.key.as_slice();
        let iv = self.iv.as_slice();

        with_block_cipher!(self.algorithm, C => {
            match self.mode {
                Mode::Ecb => Ok(ecb::Encryptor::<C>::new_from_slice(key)
                    .map_err(|_| CryptoError::InvalidKeyLength)?
                    .encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
                Mode::Cbc => Ok(cbc::Encryptor::<C>::new_from_slices(key, iv)
                    .map_err(|_| CryptoError::InvalidKeyLength)?
                    .encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
                Mode::Cfb => {
                    let mut buf = plaintext.to_vec();
                    cfb8::Encryptor::<C>::new_from_slices(key, iv)
                        .map_err(|_| CryptoError::InvalidKeyLength)?
                        .encrypt(&mut buf);
                    Ok(buf)
                }
                Mode::Ofb => {
                    let mut buf = plaintext.to_vec();
                    ofb::Ofb::<C>::new_from_slices(key, iv)
                        .map_err(|_| CryptoError::InvalidKeyLength)?
                        .apply_keystream(&mut buf);
                    Ok(buf)
                }
            }
        })
    }

    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let key = self.key.as_slice();
        let iv = self.iv.as_slice();

        if self.mode.is_padded() {
            let block = self.algorithm.block_len();
            if ciphertext.is_empty() || ciphertext.len() % block != 0 {
                return Err(CryptoError::CiphertextNotAligned { len: ciphertext.len(), block });
            }
        }

        with_block_cipher!(self.algorithm, C => {
            match self.mode {
                Mode::Ecb => ecb::Decryptor::<C>::new_from_slice(key)
                    .map_err(|_| CryptoError::InvalidKeyLength)?
                    .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                    .map_err(|_| CryptoError::BadPadding),
                Mode::Cbc => cbc::Decryptor::<C>::new_from_slices(key, iv)
                    .map_err(|_| CryptoError::InvalidKeyLength)?
                    .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                    .map_err(|_| CryptoError::BadPadding),
                Mode::Cfb => {
                    let mut buf = ciphertext.to_vec();
                    cfb8::Decryptor::<C>::new_from_slices(key, iv)
                        .map_err(|_| CryptoError::InvalidKeyLength)?
                        .decrypt(&mut buf);
                    Ok(buf)
                }
                Mode::Ofb => {
                    let mut buf = ciphertext.to_vec();
                    ofb::Ofb::<C>::new_from_slices(key, iv)
                        .map_err(|_| CryptoError::InvalidKeyLength)?
                        .apply_keystream(&mut buf);
                    Ok(buf)
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Keeps the 16-combination tests fast; the default count is covered separately.
    const FAST_ITERATIONS: u32 = 1_000;

    fn engine(algorithm: Algorithm, mode: Mode, password: &str) -> CryptoEngine {
        let cfg = EncryptionConfig::new(algorithm, mode, password).with_iterations(FAST_ITERATIONS);
        CryptoEngine::new(&cfg).unwrap()
    }

    #[test]
    fn pbkdf2_known_answer() {
        // PBKDF2-HMAC-SHA256("password", "salt", 1, 32)
        let (key, iv) = derive_key_iv("password", b"salt", 1, 16, 16);
        let expected: [u8; 32] = [
            0x12, 0x0f, 0xb6, 0xcf, 0xfc, 0xf8, 0xb3, 0x2c, 0x43, 0xe7, 0x22, 0x52, 0x56, 0xc4,
            0xf8, 0x37, 0xa8, 0x65, 0x48, 0xc9, 0x2c, 0xcc, 0x35, 0x48, 0x08, 0x05, 0x98, 0x7c,
            0xb7, 0x0b, 0xe1, 0x7b,
        ];
        assert_eq!(key.as_slice(), &expected[..16]);
        assert_eq!(iv.as_slice(), &expected[16..]);
    }

    #[test]
    fn ecb_derives_no_iv() {
        let e = engine(Algorithm::Aes256, Mode::Ecb, "pw");
        assert_eq!(e.key.len(), 32);
        assert!(e.iv.is_empty());
    }

    #[test]
    fn iv_sized_to_block() {
        assert_eq!(engine(Algorithm::Aes192, Mode::Cbc, "pw").iv.len(), 16);
        let des = engine(Algorithm::Des, Mode::Ofb, "pw");
        assert_eq!(des.key.len(), 24);
        assert_eq!(des.iv.len(), 8);
    }

    #[test]
    fn roundtrip_all_combinations() {
        let msg = b"Hello, World! this message is encrypted and decrypted by every combination";
        for alg in Algorithm::ALL {
            for mode in Mode::ALL {
                let e = engine(alg, mode, "password");
                let ct = e.encrypt(msg).unwrap();
                assert_ne!(&ct[..msg.len().min(ct.len())], &msg[..msg.len().min(ct.len())]);
                assert_eq!(ct.len(), e.ciphertext_len(msg.len()), "{alg}/{mode}");
                let pt = e.decrypt(&ct).unwrap();
                assert_eq!(pt, msg, "{alg}/{mode}");
            }
        }
    }

    #[test]
    fn independent_instances_are_inverse() {
        for alg in Algorithm::ALL {
            for mode in Mode::ALL {
                let a = engine(alg, mode, "shared");
                let b = engine(alg, mode, "shared");
                assert_eq!(a.key, b.key);
                assert_eq!(a.iv, b.iv);
                let ct = a.encrypt(b"payload").unwrap();
                assert_eq!(b.encrypt(b"payload").unwrap(), ct);
                assert_eq!(b.decrypt(&ct).unwrap(), b"payload");
            }
        }
    }

    #[test]
    fn padded_modes_pad_to_block() {
        let e = engine(Algorithm::Des, Mode::Cbc, "pw");
        assert_eq!(e.encrypt(&[0u8; 8]).unwrap().len(), 16);
        assert_eq!(e.encrypt(&[0u8; 7]).unwrap().len(), 8);
        let e = engine(Algorithm::Aes128, Mode::Ecb, "pw");
        assert_eq!(e.encrypt(&[]).unwrap().len(), 16);
    }

    #[test]
    fn stream_modes_keep_length() {
        for mode in [Mode::Cfb, Mode::Ofb] {
            let e = engine(Algorithm::Aes128, mode, "pw");
            assert_eq!(e.encrypt(&[7u8; 13]).unwrap().len(), 13);
        }
    }

    #[test]
    fn ecb_repeats_identical_blocks_cbc_does_not() {
        let pt = [0x41u8; 32];
        let ecb = engine(Algorithm::Aes128, Mode::Ecb, "pw").encrypt(&pt).unwrap();
        assert_eq!(ecb[..16], ecb[16..32]);
        let cbc = engine(Algorithm::Aes128, Mode::Cbc, "pw").encrypt(&pt).unwrap();
        assert_ne!(cbc[..16], cbc[16..32]);
    }

    #[test]
    fn wrong_password_does_not_recover_plaintext() {
        let msg = b"top secret payload bytes";
        let ct = engine(Algorithm::Aes128, Mode::Cbc, "right").encrypt(msg).unwrap();
        match engine(Algorithm::Aes128, Mode::Cbc, "wrong").decrypt(&ct) {
            Ok(pt) => assert_ne!(pt, msg),
            Err(e) => assert_eq!(e, CryptoError::BadPadding),
        }
    }

    #[test]
    fn misaligned_ciphertext_rejected() {
        let e = engine(Algorithm::Aes128, Mode::Ecb, "pw");
        assert_eq!(
            e.decrypt(&[0u8; 15]),
            Err(CryptoError::CiphertextNotAligned { len: 15, block: 16 })
        );
    }

    #[test]
    fn missing_password_rejected() {
        let cfg = EncryptionConfig::new(Algorithm::Aes128, Mode::Cbc, "");
        assert!(matches!(CryptoEngine::new(&cfg), Err(ConfigError::MissingPassword)));
    }

    #[test]
    fn default_iterations_roundtrip() {
        let cfg = EncryptionConfig::new(Algorithm::Aes128, Mode::Cbc, "password");
        let e = CryptoEngine::new(&cfg).unwrap();
        let ct = e.encrypt(b"default parameters").unwrap();
        assert_eq!(e.decrypt(&ct).unwrap(), b"default parameters");
    }

    #[test]
    fn salt_changes_key() {
        let a = EncryptionConfig::new(Algorithm::Aes128, Mode::Cbc, "pw").with_iterations(10);
        let b = a.clone().with_salt(b"pimienta".to_vec());
        assert_ne!(CryptoEngine::new(&a).unwrap().key, CryptoEngine::new(&b).unwrap().key);
    }
}
