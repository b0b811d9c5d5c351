use std::path::PathBuf;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use rsa::RsaPublicKey;
use rsa::pkcs1::DecodeRsaPublicKey;
use x509_cert::Certificate;
use x509_cert::der::{Decode, DecodePem};

use crate::error::VipsptError;

const PEM_ARMOR: &[u8] = b"-----BEGIN";

/// Where the gateway's public-key certificate comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificateSource {
    /// A `.cer`/`.pem` file on disk.
    Path(PathBuf),
    /// Base64 of the certificate file contents (PEM or DER).
    Base64(String),
}

impl CertificateSource {
    /// Pick the source from optional config values. Exactly one must be set.
    pub fn from_parts(path: Option<&str>, data: Option<&str>) -> Result<Self, VipsptError> {
        let path = path.filter(|p| !p.is_empty());
        let data = data.filter(|d| !d.is_empty());
        match (path, data) {
            (Some(p), None) => Ok(CertificateSource::Path(PathBuf::from(p))),
            (None, Some(d)) => Ok(CertificateSource::Base64(d.to_string())),
            (Some(_), Some(_)) => Err(VipsptError::Config(
                "public key path and public key data are mutually exclusive".into(),
            )),
            (None, None) => Err(VipsptError::Config(
                "public key path or public key data is required".into(),
            )),
        }
    }

    /// Read the raw certificate bytes. Blocking when the source is a path.
    pub fn load(&self) -> Result<Vec<u8>, VipsptError> {
        match self {
            CertificateSource::Path(path) => std::fs::read(path).map_err(|e| {
                VipsptError::Signature(format!(
                    "unable to read certificate {}: {e}",
                    path.display()
                ))
            }),
            CertificateSource::Base64(data) => BASE64
                .decode(data.trim())
                .map_err(|e| VipsptError::Signature(format!("certificate base64 decode: {e}"))),
        }
    }

    /// Load the certificate and extract its RSA public key.
    pub fn public_key(&self) -> Result<RsaPublicKey, VipsptError> {
        extract_public_key(&self.load()?)
    }
}

/// Parse a PEM or DER X.509 certificate and return its RSA public key.
pub fn extract_public_key(cert_bytes: &[u8]) -> Result<RsaPublicKey, VipsptError> {
    let parsed = if is_pem(cert_bytes) {
        Certificate::from_pem(cert_bytes)
    } else {
        Certificate::from_der(cert_bytes)
    };
    let cert =
        parsed.map_err(|e| VipsptError::Signature(format!("parse X.509 certificate: {e}")))?;

    let spki_der = cert
        .tbs_certificate
        .subject_public_key_info
        .subject_public_key
        .raw_bytes();

    RsaPublicKey::from_pkcs1_der(spki_der)
        .map_err(|e| VipsptError::Signature(format!("parse RSA public key: {e}")))
}

fn is_pem(bytes: &[u8]) -> bool {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    bytes[start..].starts_with(PEM_ARMOR)
}
