use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::Path;

use rustls::pki_types::CertificateDer;
use time::{Duration, OffsetDateTime};
use x509_parser::extensions::GeneralName;
use x509_parser::parse_x509_certificate;
use x509_parser::pem::parse_x509_pem;

use crate::{CertError, SanSet};

const PEM_CERTIFICATE_LABEL: &str = "CERTIFICATE";

/// A parsed certificate. Every record, freshly generated or loaded from disk,
/// is built by decoding the encoded certificate, so both carry exactly what
/// the DER says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRecord {
    common_name: String,
    not_before: OffsetDateTime,
    not_after: OffsetDateTime,
    sans: SanSet,
    public_key: Vec<u8>,
    cert_der: CertificateDer<'static>,
    cert_pem: String,
}

impl CertificateRecord {
    /// Parses the first `CERTIFICATE` block of `pem`.
    pub fn from_pem(pem: &str) -> Result<Self, CertError> {
        Self::parse_pem(Path::new("<pem>"), pem)
    }

    pub(crate) fn parse_pem(origin: &Path, pem: &str) -> Result<Self, CertError> {
        let (_, block) = parse_x509_pem(pem.as_bytes()).map_err(|error| {
            CertError::parse(origin, format!("invalid certificate PEM: {error}"))
        })?;
        if block.label != PEM_CERTIFICATE_LABEL {
            return Err(CertError::parse(
                origin,
                format!(
                    "expected {PEM_CERTIFICATE_LABEL} block, got {}",
                    block.label
                ),
            ));
        }

        let (rest, cert) = parse_x509_certificate(&block.contents).map_err(|error| {
            CertError::parse(origin, format!("invalid certificate DER: {error}"))
        })?;
        if !rest.is_empty() {
            return Err(CertError::parse(
                origin,
                format!("{} trailing bytes after certificate DER", rest.len()),
            ));
        }

        let common_name = match cert.subject().iter_common_name().next() {
            Some(attribute) => attribute
                .as_str()
                .map_err(|error| {
                    CertError::parse(origin, format!("unreadable subject common name: {error}"))
                })?
                .to_string(),
            None => String::new(),
        };

        let validity = cert.validity();
        let not_before = validity.not_before.to_datetime();
        let not_after = validity.not_after.to_datetime();

        let mut sans = SanSet::new();
        let extension = cert.subject_alternative_name().map_err(|error| {
            CertError::parse(origin, format!("invalid subjectAltName extension: {error}"))
        })?;
        if let Some(extension) = extension {
            for name in &extension.value.general_names {
                match name {
                    GeneralName::DNSName(value) => {
                        sans.insert_dns_name(*value);
                    }
                    GeneralName::IPAddress(bytes) => {
                        let ip = ip_from_san_bytes(bytes).ok_or_else(|| {
                            CertError::parse(
                                origin,
                                format!("subjectAltName IP entry has {} bytes", bytes.len()),
                            )
                        })?;
                        sans.insert_ip(ip);
                    }
                    _ => {}
                }
            }
        }

        let public_key = cert.public_key().subject_public_key.data.to_vec();
        let cert_der = CertificateDer::from(block.contents.clone());

        Ok(Self {
            common_name,
            not_before,
            not_after,
            sans,
            public_key,
            cert_der,
            cert_pem: pem.to_string(),
        })
    }

    pub fn common_name(&self) -> &str {
        &self.common_name
    }

    pub fn not_before(&self) -> OffsetDateTime {
        self.not_before
    }

    pub fn not_after(&self) -> OffsetDateTime {
        self.not_after
    }

    pub fn validity(&self) -> Duration {
        self.not_after - self.not_before
    }

    pub fn sans(&self) -> &SanSet {
        &self.sans
    }

    pub fn cert_der(&self) -> &CertificateDer<'static> {
        &self.cert_der
    }

    pub fn cert_pem(&self) -> &str {
        &self.cert_pem
    }

    pub(crate) fn public_key_raw(&self) -> &[u8] {
        &self.public_key
    }

    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        now >= self.not_after
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(OffsetDateTime::now_utc())
    }
}

fn ip_from_san_bytes(bytes: &[u8]) -> Option<IpAddr> {
    match bytes.len() {
        4 => {
            let octets: [u8; 4] = bytes.try_into().ok()?;
            Some(IpAddr::V4(Ipv4Addr::from(octets)))
        }
        16 => {
            let octets: [u8; 16] = bytes.try_into().ok()?;
            Some(IpAddr::V6(Ipv6Addr::from(octets)))
        }
        _ => None,
    }
}
