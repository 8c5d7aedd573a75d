use std::collections::BTreeSet;
use std::fmt;
use std::net::IpAddr;

use crate::CertError;

/// Subject Alternative Names held as two sets, so insertion order and
/// repeated entries never affect equality.
///
/// IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`) are stored in their IPv4
/// form; both spellings name the same endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanSet {
    ip_addresses: BTreeSet<IpAddr>,
    dns_names: BTreeSet<String>,
}

impl SanSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from textual IP literals and DNS names. Fails on the
    /// first entry that is not an IP literal.
    pub fn parse<I, D>(ip_addresses: I, dns_names: D) -> Result<Self, CertError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        let mut set = Self::default();
        for value in ip_addresses {
            set.insert_ip(parse_ip(value.as_ref())?);
        }
        for name in dns_names {
            set.insert_dns_name(name.as_ref());
        }
        Ok(set)
    }

    pub fn insert_ip(&mut self, ip: IpAddr) -> bool {
        self.ip_addresses.insert(ip.to_canonical())
    }

    pub fn insert_dns_name(&mut self, name: impl Into<String>) -> bool {
        self.dns_names.insert(name.into())
    }

    pub fn ip_addresses(&self) -> &BTreeSet<IpAddr> {
        &self.ip_addresses
    }

    pub fn dns_names(&self) -> &BTreeSet<String> {
        &self.dns_names
    }

    pub fn is_empty(&self) -> bool {
        self.ip_addresses.is_empty() && self.dns_names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ip_addresses.len() + self.dns_names.len()
    }

    /// Entries `self` wants that `embedded` lacks, and the reverse.
    pub fn drift_from(&self, embedded: &SanSet) -> SanDrift {
        SanDrift {
            missing_ips: self
                .ip_addresses
                .difference(&embedded.ip_addresses)
                .copied()
                .collect(),
            unexpected_ips: embedded
                .ip_addresses
                .difference(&self.ip_addresses)
                .copied()
                .collect(),
            missing_dns_names: self
                .dns_names
                .difference(&embedded.dns_names)
                .cloned()
                .collect(),
            unexpected_dns_names: embedded
                .dns_names
                .difference(&self.dns_names)
                .cloned()
                .collect(),
        }
    }
}

pub(crate) fn parse_ip(value: &str) -> Result<IpAddr, CertError> {
    value
        .parse::<IpAddr>()
        .map(|ip| ip.to_canonical())
        .map_err(|_| CertError::InvalidAddress {
            value: value.to_string(),
        })
}

/// Difference between a desired SAN set and the one embedded in a
/// certificate. Empty means the certificate is current.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanDrift {
    pub missing_ips: Vec<IpAddr>,
    pub unexpected_ips: Vec<IpAddr>,
    pub missing_dns_names: Vec<String>,
    pub unexpected_dns_names: Vec<String>,
}

impl SanDrift {
    pub fn is_empty(&self) -> bool {
        self.missing_ips.is_empty()
            && self.unexpected_ips.is_empty()
            && self.missing_dns_names.is_empty()
            && self.unexpected_dns_names.is_empty()
    }
}

impl fmt::Display for SanDrift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "no SAN drift");
        }
        let mut parts = Vec::new();
        if !self.missing_ips.is_empty() {
            parts.push(format!("missing ips {}", join_display(&self.missing_ips)));
        }
        if !self.unexpected_ips.is_empty() {
            parts.push(format!(
                "unexpected ips {}",
                join_display(&self.unexpected_ips)
            ));
        }
        if !self.missing_dns_names.is_empty() {
            parts.push(format!(
                "missing dns names {}",
                join_display(&self.missing_dns_names)
            ));
        }
        if !self.unexpected_dns_names.is_empty() {
            parts.push(format!(
                "unexpected dns names {}",
                join_display(&self.unexpected_dns_names)
            ));
        }
        write!(f, "{}", parts.join("; "))
    }
}

fn join_display<T: fmt::Display>(items: &[T]) -> String {
    let rendered: Vec<String> = items.iter().map(ToString::to_string).collect();
    format!("[{}]", rendered.join(", "))
}
