use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use rsa::RsaPublicKey;
use rsa::pkcs1v15::{Signature, VerifyingKey};
use sha1::Sha1;
use rsa::sha2::Sha256;
use rsa::signature::Verifier;

use crate::cert::CertificateSource;
use crate::error::VipsptError;

/// Digest used with RSA PKCS#1 v1.5 signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    Sha1,
    Sha256,
}

impl DigestAlgorithm {
    /// Map the gateway's `sign_type`: `RSA` is SHA-1, `RSA2` and anything
    /// else SHA-256.
    pub fn from_sign_type(sign_type: &str) -> Self {
        match sign_type {
            "RSA" => DigestAlgorithm::Sha1,
            _ => DigestAlgorithm::Sha256,
        }
    }
}

/// Verify a base64 RSA signature over `signed_data` with the public key of
/// the certificate in `source`.
///
/// Unreadable certificates, malformed signatures and mismatches are all
/// reported as [`VipsptError::Signature`].
pub fn verify_signature(
    signed_data: &str,
    signature_base64: &str,
    source: &CertificateSource,
    algorithm: DigestAlgorithm,
) -> Result<(), VipsptError> {
    let public_key = source.public_key()?;
    verify_with_key(&public_key, signed_data, signature_base64, algorithm)
}

pub fn verify_with_key(
    public_key: &RsaPublicKey,
    signed_data: &str,
    signature_base64: &str,
    algorithm: DigestAlgorithm,
) -> Result<(), VipsptError> {
    let sig_bytes = BASE64
        .decode(signature_base64.trim())
        .map_err(|e| VipsptError::Signature(format!("base64 decode: {e}")))?;

    let signature = Signature::try_from(sig_bytes.as_slice())
        .map_err(|e| VipsptError::Signature(format!("invalid signature: {e}")))?;

    let outcome = match algorithm {
        DigestAlgorithm::Sha1 => VerifyingKey::<Sha1>::new(public_key.clone())
            .verify(signed_data.as_bytes(), &signature),
        DigestAlgorithm::Sha256 => VerifyingKey::<Sha256>::new(public_key.clone())
            .verify(signed_data.as_bytes(), &signature),
    };

    outcome.map_err(|_| VipsptError::Signature("signature does not match signed data".into()))
}
