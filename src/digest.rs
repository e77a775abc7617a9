//! SHA-256 digest newtype for payload verification.
//!
//! Validates that the value is a 64-character lowercase hexadecimal
//! string and provides streaming computation over arbitrary readers.

use crate::error::BundleError;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::io::Read;

/// Expected length of a hex-encoded SHA-256 digest.
const DIGEST_HEX_LEN: usize = 64;

/// A validated hex-encoded SHA-256 digest string.
///
/// # Examples
///
/// ```
/// use selfpack::digest::Sha256Digest;
///
/// let hex = "a".repeat(64);
/// let digest = Sha256Digest::try_from(hex.as_str()).expect("valid digest");
/// assert_eq!(digest.as_str().len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Return the digest as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap hex that is known to be well-formed.
    ///
    /// Only callable from digest computation, where the hasher guarantees
    /// 64 lowercase hex characters.
    fn from_hasher(hex: String) -> Self {
        Self(hex)
    }
}

impl TryFrom<&str> for Sha256Digest {
    type Error = BundleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        validate_sha256(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl AsRef<str> for Sha256Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Compute the SHA-256 digest of everything `reader` yields.
///
/// Reads in fixed-size chunks so payloads never have to fit in memory.
///
/// # Errors
///
/// Returns [`BundleError::Io`] when the reader fails.
pub fn compute_sha256(reader: &mut dyn Read) -> Result<Sha256Digest, BundleError> {
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    Ok(Sha256Digest::from_hasher(format!("{:x}", hasher.finalize())))
}

/// Validate that `value` is a well-formed hex-encoded SHA-256 digest.
fn validate_sha256(value: &str) -> Result<(), BundleError> {
    if value.len() != DIGEST_HEX_LEN {
        return Err(BundleError::InvalidDigest {
            reason: format!(
                "expected {DIGEST_HEX_LEN} hex characters, got {}",
                value.len()
            ),
        });
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !c.is_ascii_hexdigit() || c.is_ascii_uppercase())
    {
        return Err(BundleError::InvalidDigest {
            reason: format!("unexpected character '{bad}'"),
        });
    }
    Ok(())
}
