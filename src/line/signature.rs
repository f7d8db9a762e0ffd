//! `X-Line-Signature` verification: base64(HMAC-SHA256(channel secret, raw body)).

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::errors::AppError;

pub const SIGNATURE_HEADER: &str = "x-line-signature";

type HmacSha256 = Hmac<Sha256>;

fn mac(secret: &str, body: &[u8]) -> Result<HmacSha256, AppError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::Unexpected(format!("HMAC key rejected: {e}")))?;
    mac.update(body);
    Ok(mac)
}

#[cfg(test)]
pub fn sign(secret: &str, body: &[u8]) -> Result<String, AppError> {
    Ok(STANDARD.encode(mac(secret, body)?.finalize().into_bytes()))
}

/// Constant-time check of `signature` against the body.
pub fn verify(secret: &str, body: &[u8], signature: &str) -> Result<(), AppError> {
    let expected = STANDARD
        .decode(signature.trim())
        .map_err(|_| AppError::InvalidSignature)?;
    mac(secret, body)?
        .verify_slice(&expected)
        .map_err(|_| AppError::InvalidSignature)
}
