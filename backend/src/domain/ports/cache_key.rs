//! Content-addressed cache key shared by points cache adapters.
use thiserror::Error;

/// Length of a hex-encoded SHA-256 digest.
pub const CACHE_KEY_LEN: usize = 64;

/// Cache key identifying a points payload by its SHA-256 fingerprint.
///
/// Keys are always 64 lowercase hexadecimal characters. Adapters may add
/// their own namespace prefix when writing to a shared store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PointsCacheKey(String);

impl PointsCacheKey {
    /// Construct a cache key after validating the digest encoding.
    ///
    /// # Examples
    /// ```
    /// use point_relay::domain::ports::PointsCacheKey;
    ///
    /// let key = PointsCacheKey::new("a".repeat(64)).expect("valid key");
    /// assert_eq!(key.as_str().len(), 64);
    /// assert!(PointsCacheKey::new("not-hex").is_err());
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, PointsCacheKeyValidationError> {
        let raw = value.into();
        if raw.len() != CACHE_KEY_LEN {
            return Err(PointsCacheKeyValidationError::InvalidLength {
                expected: CACHE_KEY_LEN,
                actual: raw.len(),
            });
        }
        if !raw
            .bytes()
            .all(|byte| byte.is_ascii_digit() || (b'a'..=b'f').contains(&byte))
        {
            return Err(PointsCacheKeyValidationError::NotLowercaseHex);
        }
        Ok(Self(raw))
    }

    /// Build a key from raw digest bytes.
    pub(crate) fn from_digest(digest: &[u8; 32]) -> Self {
        Self(hex::encode(digest))
    }

    /// Borrow the underlying key as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for PointsCacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for PointsCacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Validation errors returned when constructing [`PointsCacheKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PointsCacheKeyValidationError {
    /// Key does not have the length of a hex-encoded SHA-256 digest.
    #[error("points cache key must be {expected} characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    /// Key contains characters outside `[0-9a-f]`.
    #[error("points cache key must be lowercase hexadecimal")]
    NotLowercaseHex,
}
