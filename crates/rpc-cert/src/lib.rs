//! Self-signed TLS certificate lifecycle for a local RPC listener.
//!
//! A certificate is generated for a set of IP addresses and DNS names,
//! persisted as a PEM pair, reloaded, and checked against the names the
//! service currently wants to advertise. Any difference between the two sets
//! means the certificate is outdated and must be replaced as a whole.

use std::path::Path;

use time::Duration;

mod config;
mod error;
mod generator;
mod key;
mod lifecycle;
mod record;
mod san;
mod server_config;
mod staleness;
mod store;

pub use config::{CertConfig, DEFAULT_CERT_FILE_NAME, DEFAULT_KEY_FILE_NAME, DEFAULT_VALIDITY_DAYS};
pub use error::CertError;
pub use generator::{
    generate, CertIdentity, GeneratedCert, DEFAULT_AUTOGEN_VALIDITY, DEFAULT_COMMON_NAME,
    DEFAULT_ORGANIZATION, END_OF_TIME, NOT_BEFORE_BACKDATE,
};
pub use key::CertKeyPair;
pub use lifecycle::{ensure_cert_pair, EnsureAction, EnsureOutcome, RegenerateReason};
pub use record::CertificateRecord;
pub use san::{SanDrift, SanSet};
pub use server_config::{build_rpc_server_config, RPC_ALPN_PROTOCOLS};
pub use staleness::{is_outdated, san_drift};
pub use store::{load, save};

/// Generates a certificate for `extra_ips` and `extra_dns` and writes the
/// pair to `cert_path` and `key_path`.
pub fn gen_cert_pair<I, D>(
    common_name: &str,
    cert_path: impl AsRef<Path>,
    key_path: impl AsRef<Path>,
    extra_ips: &[I],
    extra_dns: &[D],
    validity: Duration,
) -> Result<(), CertError>
where
    I: AsRef<str>,
    D: AsRef<str>,
{
    let identity = CertIdentity {
        common_name: common_name.to_string(),
        ip_addresses: extra_ips.iter().map(|ip| ip.as_ref().to_string()).collect(),
        dns_names: extra_dns
            .iter()
            .map(|name| name.as_ref().to_string())
            .collect(),
        validity,
        ..CertIdentity::default()
    };
    let generated = generate(&identity)?;
    save(&generated.record, &generated.key_pair, cert_path, key_path)
}

pub fn load_cert(
    cert_path: impl AsRef<Path>,
    key_path: impl AsRef<Path>,
) -> Result<(CertKeyPair, CertificateRecord), CertError> {
    load(cert_path, key_path)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::net::IpAddr;
    use std::path::{Path, PathBuf};

    use tempfile::TempDir;
    use time::{Duration, OffsetDateTime};
    use x509_parser::extensions::GeneralName;
    use x509_parser::parse_x509_certificate;

    use super::{
        build_rpc_server_config, ensure_cert_pair, gen_cert_pair, generate, is_outdated,
        load_cert, san_drift, save, CertConfig, CertError, CertIdentity, CertificateRecord,
        EnsureAction, RegenerateReason, SanSet, DEFAULT_AUTOGEN_VALIDITY, END_OF_TIME,
        NOT_BEFORE_BACKDATE, RPC_ALPN_PROTOCOLS,
    };

    const EXTRA_IPS: [&str; 3] = ["1.1.1.1", "123.123.123.1", "199.189.12.12"];
    const EXTRA_DOMAINS: [&str; 3] = ["home", "and", "away"];

    include!("tests_san_and_staleness.rs");
    include!("tests_generator.rs");
    include!("tests_store_persistence.rs");
    include!("tests_lifecycle.rs");

    fn identity(ips: &[&str], dns: &[&str]) -> CertIdentity {
        CertIdentity {
            common_name: "rpc-cert test".to_string(),
            ip_addresses: ips.iter().map(|ip| ip.to_string()).collect(),
            dns_names: dns.iter().map(|name| name.to_string()).collect(),
            ..CertIdentity::default()
        }
    }

    fn pair_paths(dir: &TempDir) -> (PathBuf, PathBuf) {
        (dir.path().join("tls.cert"), dir.path().join("tls.key"))
    }

    fn test_config(dir: &TempDir) -> CertConfig {
        let (cert_path, key_path) = pair_paths(dir);
        CertConfig {
            cert_path,
            key_path,
            extra_ips: vec!["10.0.0.7".to_string()],
            extra_domains: vec!["node.internal".to_string()],
            ..CertConfig::default()
        }
    }

    fn san_general_names(record: &CertificateRecord) -> (Vec<IpAddr>, Vec<String>) {
        let (_, cert) = parse_x509_certificate(record.cert_der().as_ref()).expect("parse x509");
        let san = cert
            .subject_alternative_name()
            .expect("san extension parse")
            .expect("san extension present");
        let mut ips = Vec::new();
        let mut names = Vec::new();
        for name in &san.value.general_names {
            match name {
                GeneralName::IPAddress(bytes) if bytes.len() == 4 => {
                    let octets: [u8; 4] = (*bytes).try_into().expect("ipv4 octets");
                    ips.push(IpAddr::from(octets));
                }
                GeneralName::IPAddress(bytes) => {
                    let octets: [u8; 16] = (*bytes).try_into().expect("ipv6 octets");
                    ips.push(IpAddr::from(octets));
                }
                GeneralName::DNSName(value) => names.push(value.to_string()),
                _ => {}
            }
        }
        (ips, names)
    }

    fn write_raw_pair(cert_path: &Path, key_path: &Path, cert_pem: &str, key_pem: &str) {
        fs::write(cert_path, cert_pem).expect("write cert");
        fs::write(key_path, key_pem).expect("write key");
    }
}
