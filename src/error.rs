use std::fmt;

/// Unified error type for key generation and export.
#[derive(Debug)]
pub enum KeygenError {
    /// The random source or the RSA primitive could not produce a key.
    Generation(String),
    Serialization(String),
    InvalidKey(String),
    Output(String),
}

impl fmt::Display for KeygenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeygenError::Generation(msg) => write!(f, "Key generation failed: {msg}"),
            KeygenError::Serialization(msg) => write!(f, "Serialization failed: {msg}"),
            KeygenError::InvalidKey(msg) => write!(f, "Invalid key: {msg}"),
            KeygenError::Output(msg) => write!(f, "Output failed: {msg}"),
        }
    }
}

impl std::error::Error for KeygenError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_message() {
        let err = KeygenError::Generation("entropy unavailable".into());
        assert_eq!(err.to_string(), "Key generation failed: entropy unavailable");

        let err = KeygenError::InvalidKey("kty must be RSA".into());
        assert_eq!(err.to_string(), "Invalid key: kty must be RSA");
    }
}
