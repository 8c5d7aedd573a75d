use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use time::Duration;

use crate::generator::{DEFAULT_COMMON_NAME, DEFAULT_ORGANIZATION};
use crate::san::parse_ip;
use crate::{CertError, CertIdentity};

pub const DEFAULT_CERT_FILE_NAME: &str = "tls.cert";
pub const DEFAULT_KEY_FILE_NAME: &str = "tls.key";
pub const DEFAULT_VALIDITY_DAYS: i64 = 14 * 30;

const LOOPBACK_IPS: [&str; 2] = ["127.0.0.1", "::1"];
const LOOPBACK_DNS_NAMES: [&str; 1] = ["localhost"];
const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CertConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
    pub common_name: String,
    pub organization: String,
    pub extra_ips: Vec<String>,
    pub extra_domains: Vec<String>,
    /// Advertise `127.0.0.1`, `::1` and `localhost` in addition to the
    /// extra entries.
    pub include_loopback: bool,
    pub validity_days: i64,
    pub regenerate_on_expiry: bool,
}

impl Default for CertConfig {
    fn default() -> Self {
        Self {
            cert_path: PathBuf::from(DEFAULT_CERT_FILE_NAME),
            key_path: PathBuf::from(DEFAULT_KEY_FILE_NAME),
            common_name: DEFAULT_COMMON_NAME.to_string(),
            organization: DEFAULT_ORGANIZATION.to_string(),
            extra_ips: Vec::new(),
            extra_domains: Vec::new(),
            include_loopback: true,
            validity_days: DEFAULT_VALIDITY_DAYS,
            regenerate_on_expiry: true,
        }
    }
}

impl CertConfig {
    pub fn validate(&self) -> Result<(), CertError> {
        if self.cert_path.as_os_str().is_empty() || self.key_path.as_os_str().is_empty() {
            return Err(CertError::InvalidConfig(
                "cert_path and key_path must not be empty".to_string(),
            ));
        }
        if self.cert_path == self.key_path {
            return Err(CertError::InvalidConfig(
                "cert_path and key_path must point to different files".to_string(),
            ));
        }
        if self.common_name.trim().is_empty() {
            return Err(CertError::InvalidConfig(
                "common_name must not be empty".to_string(),
            ));
        }
        if self.validity_days <= 0 {
            return Err(CertError::InvalidConfig(format!(
                "validity_days must be greater than zero, got {}",
                self.validity_days
            )));
        }
        if let Some(domain) = self.extra_domains.iter().find(|domain| domain.is_empty()) {
            return Err(CertError::InvalidConfig(format!(
                "extra_domains must not contain empty entries: {domain:?}"
            )));
        }
        for ip in &self.extra_ips {
            parse_ip(ip)?;
        }
        Ok(())
    }

    pub fn validity(&self) -> Duration {
        Duration::seconds(self.validity_days.saturating_mul(SECONDS_PER_DAY))
    }

    pub fn desired_ips(&self) -> Vec<String> {
        let mut ips = Vec::with_capacity(self.extra_ips.len() + LOOPBACK_IPS.len());
        if self.include_loopback {
            ips.extend(LOOPBACK_IPS.iter().map(|ip| ip.to_string()));
        }
        ips.extend(self.extra_ips.iter().cloned());
        ips
    }

    pub fn desired_dns_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.extra_domains.len() + LOOPBACK_DNS_NAMES.len());
        if self.include_loopback {
            names.extend(LOOPBACK_DNS_NAMES.iter().map(|name| name.to_string()));
        }
        names.extend(self.extra_domains.iter().cloned());
        names
    }

    pub fn identity(&self) -> CertIdentity {
        CertIdentity {
            common_name: self.common_name.clone(),
            organization: self.organization.clone(),
            ip_addresses: self.desired_ips(),
            dns_names: self.desired_dns_names(),
            validity: self.validity(),
        }
    }
}
