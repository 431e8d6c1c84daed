use std::io::Write;

use crate::error::KeygenError;

pub const PRIVATE_KEY_LABEL: &str = "### PRIVATE KEY ###";
pub const PUBLIC_KEY_LABEL: &str = "### PUBLIC KEY ###";

/// Write both JWKs, each preceded by a blank line and its label.
pub fn write_report<W: Write>(
    writer: &mut W,
    private_jwk: &str,
    public_jwk: &str,
) -> Result<(), KeygenError> {
    write!(
        writer,
        "\n{PRIVATE_KEY_LABEL}\n{private_jwk}\n\n{PUBLIC_KEY_LABEL}\n{public_jwk}\n"
    )
    .and_then(|()| writer.flush())
    .map_err(|e| KeygenError::Output(format!("Failed to write keys: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_layout() {
        let mut out = Vec::new();
        write_report(&mut out, r#"{"kty":"RSA","d":"x"}"#, r#"{"kty":"RSA"}"#).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "\n### PRIVATE KEY ###\n{\"kty\":\"RSA\",\"d\":\"x\"}\n\n### PUBLIC KEY ###\n{\"kty\":\"RSA\"}\n"
        );
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_reported() {
        let result = write_report(&mut ClosedPipe, "{}", "{}");
        assert!(matches!(result, Err(KeygenError::Output(_))));
    }
}
