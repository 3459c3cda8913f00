// src/hash.rs

//! Digest computation and verification for source archives
//!
//! Formulas pin their source archive with a hex digest. This module parses
//! those digest strings (rejecting malformed ones before anything touches
//! the network) and checks downloaded bytes against them.

use sha2::{Digest, Sha256, Sha512};
use std::fmt;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Read buffer used when hashing streams
const HASH_BUFFER_SIZE: usize = 8192;

/// Supported digest algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashAlgorithm {
    /// SHA-256, the only algorithm Homebrew accepts for `sha256` stanzas
    #[default]
    Sha256,
    /// SHA-512
    Sha512,
}

impl HashAlgorithm {
    /// Digest length in bytes
    pub const fn output_len(&self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }

    /// Digest length as a hex string
    pub const fn hex_len(&self) -> usize {
        self.output_len() * 2
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(Self::Sha256),
            "sha512" | "sha-512" => Ok(Self::Sha512),
            _ => Err(HashError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Malformed digest strings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    #[error("unknown hash algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("invalid hash length: expected {expected} hex characters, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("invalid hex in hash: {0}")]
    InvalidHex(String),
}

/// A validated digest value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hash {
    pub algorithm: HashAlgorithm,
    /// Lowercase hex
    pub value: String,
}

impl Hash {
    /// Validate `value` as a digest for `algorithm`
    ///
    /// Length is checked in characters, so a stray trailing character on an
    /// otherwise valid digest is reported as a length error.
    pub fn new(algorithm: HashAlgorithm, value: impl Into<String>) -> Result<Self, HashError> {
        let value = value.into();
        let got = value.chars().count();
        if got != algorithm.hex_len() {
            return Err(HashError::InvalidLength {
                expected: algorithm.hex_len(),
                got,
            });
        }
        if !value.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(HashError::InvalidHex(value));
        }
        Ok(Self {
            algorithm,
            value: value.to_ascii_lowercase(),
        })
    }

    /// Parse `algo:hex`, or bare hex which is taken as SHA-256
    pub fn parse_prefixed(s: &str) -> Result<Self, HashError> {
        match s.split_once(':') {
            Some((algo, hex)) => Self::new(algo.parse()?, hex),
            None => Self::new(HashAlgorithm::Sha256, s),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn to_prefixed_string(&self) -> String {
        format!("{}:{}", self.algorithm, self.value)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

enum HasherState {
    Sha256(Sha256),
    Sha512(Sha512),
}

/// Incremental hasher
pub struct Hasher {
    algorithm: HashAlgorithm,
    state: HasherState,
}

impl Hasher {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        let state = match algorithm {
            HashAlgorithm::Sha256 => HasherState::Sha256(Sha256::new()),
            HashAlgorithm::Sha512 => HasherState::Sha512(Sha512::new()),
        };
        Self { algorithm, state }
    }

    pub fn update(&mut self, data: &[u8]) {
        match &mut self.state {
            HasherState::Sha256(h) => h.update(data),
            HasherState::Sha512(h) => h.update(data),
        }
    }

    pub fn finalize(self) -> Hash {
        let value = match self.state {
            HasherState::Sha256(h) => format!("{:x}", h.finalize()),
            HasherState::Sha512(h) => format!("{:x}", h.finalize()),
        };
        Hash {
            algorithm: self.algorithm,
            value,
        }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }
}

/// Hash a byte slice
pub fn hash_bytes(algorithm: HashAlgorithm, data: &[u8]) -> Hash {
    let mut hasher = Hasher::new(algorithm);
    hasher.update(data);
    hasher.finalize()
}

/// Hash everything a reader yields
pub fn hash_reader<R: Read + ?Sized>(algorithm: HashAlgorithm, reader: &mut R) -> io::Result<Hash> {
    let mut hasher = Hasher::new(algorithm);
    let mut buffer = [0u8; HASH_BUFFER_SIZE];
    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(hasher.finalize())
}

/// Hash a file without loading it into memory
pub fn hash_file(algorithm: HashAlgorithm, path: &Path) -> io::Result<Hash> {
    let mut file = std::fs::File::open(path)?;
    hash_reader(algorithm, &mut file)
}

/// SHA-256 of a byte slice as lowercase hex
pub fn sha256(data: &[u8]) -> String {
    hash_bytes(HashAlgorithm::Sha256, data).value
}

/// Digest comparison failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{algorithm} mismatch: expected {expected}, got {actual}")]
pub struct VerifyError {
    pub expected: String,
    pub actual: String,
    pub algorithm: HashAlgorithm,
}

fn compare(actual: Hash, expected: &str) -> Result<(), VerifyError> {
    if actual.value.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(VerifyError {
            expected: expected.to_string(),
            actual: actual.value,
            algorithm: actual.algorithm,
        })
    }
}

/// Check bytes against an expected hex digest (case-insensitive)
pub fn verify_bytes(data: &[u8], expected: &str, algorithm: HashAlgorithm) -> Result<(), VerifyError> {
    compare(hash_bytes(algorithm, data), expected)
}

/// Check a file against an expected hex digest, streaming its content
pub fn verify_file(path: &Path, expected: &str, algorithm: HashAlgorithm) -> Result<(), VerifyError> {
    let actual = hash_file(algorithm, path).map_err(|e| VerifyError {
        expected: expected.to_string(),
        actual: format!("<unreadable: {e}>"),
        algorithm,
    })?;
    compare(actual, expected)
}

pub fn verify_file_sha256(path: &Path, expected: &str) -> Result<(), VerifyError> {
    verify_file(path, expected, HashAlgorithm::Sha256)
}
