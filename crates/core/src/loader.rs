//! PEM certificate decoding.
//!
//! Blocks before the first `CERTIFICATE` (a private key in a combined
//! key+cert file, for instance) are skipped, the way `openssl x509` reads a
//! bundle. Anything after that first certificate is ignored.

use std::path::Path;

use chrono::DateTime;
use x509_parser::pem::Pem;

use crate::{error::LoadError, types::CertificateRecord};

const CERTIFICATE_LABEL: &str = "CERTIFICATE";

pub fn load_file(path: &Path) -> Result<CertificateRecord, LoadError> {
    let bytes = std::fs::read(path)?;
    load_pem(&bytes)
}

pub fn load_pem(bytes: &[u8]) -> Result<CertificateRecord, LoadError> {
    let mut pem = None;
    for block in Pem::iter_from_buffer(bytes) {
        let block = block.map_err(|e| LoadError::InvalidPem {
            message: e.to_string(),
        })?;
        if block.label == CERTIFICATE_LABEL {
            pem = Some(block);
            break;
        }
    }
    let pem = pem.ok_or(LoadError::NoCertificateBlock)?;

    let cert = pem
        .parse_x509()
        .map_err(|e| LoadError::InvalidCertificate {
            message: e.to_string(),
        })?;

    // Several CN attributes are legal; the last one is the most specific RDN.
    let common_name = cert
        .subject()
        .iter_common_name()
        .last()
        .ok_or(LoadError::MissingCommonName)?
        .as_str()
        .map_err(|e| LoadError::UnreadableCommonName {
            message: e.to_string(),
        })?
        .to_string();

    let timestamp = cert.validity().not_after.timestamp();
    let not_after =
        DateTime::from_timestamp(timestamp, 0).ok_or(LoadError::InvalidTimestamp { timestamp })?;

    Ok(CertificateRecord {
        common_name,
        not_after,
    })
}
