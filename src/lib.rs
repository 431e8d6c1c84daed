pub mod error;
pub mod jwk;
pub mod keygen;
pub mod output;

use std::io::Write;

use error::KeygenError;

/// Generate a default key pair and write both JWKs to `writer`.
pub fn run<W: Write>(writer: &mut W) -> Result<(), KeygenError> {
    let pair = keygen::generate()?;
    let private_jwk = keygen::export_private(&pair)?;
    let public_jwk = keygen::export_public(&pair)?;

    output::write_report(writer, &private_jwk, &public_jwk)
}
