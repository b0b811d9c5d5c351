pub mod source;

pub use source::{CertificateSource, extract_public_key};
