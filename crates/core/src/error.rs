use thiserror::Error;

/// Why a single file could not be turned into a certificate record.
///
/// These never abort a scan; the scanner records them and moves on.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid PEM: {message}")]
    InvalidPem { message: String },

    #[error("no CERTIFICATE block found")]
    NoCertificateBlock,

    #[error("not a valid X.509 certificate: {message}")]
    InvalidCertificate { message: String },

    #[error("certificate subject has no common name")]
    MissingCommonName,

    #[error("certificate common name is not a string: {message}")]
    UnreadableCommonName { message: String },

    #[error("notAfter timestamp {timestamp} is out of range")]
    InvalidTimestamp { timestamp: i64 },
}
