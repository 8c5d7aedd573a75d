use std::path::Path;

use rand::RngCore;
use rcgen::string::Ia5String;
use rcgen::{
    CertificateParams, DistinguishedName, DnType, ExtendedKeyUsagePurpose, IsCa, KeyUsagePurpose,
    SanType, SerialNumber,
};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

use crate::{CertError, CertKeyPair, CertificateRecord, SanSet};

/// How far not-before is pushed into the past to tolerate clock skew between
/// the daemon and its RPC clients.
pub const NOT_BEFORE_BACKDATE: Duration = Duration::hours(24);

/// Validity used for automatically generated certificates: 14 months.
pub const DEFAULT_AUTOGEN_VALIDITY: Duration = Duration::days(14 * 30);

/// Largest instant a GeneralizedTime can carry. Not-after is clamped here.
pub const END_OF_TIME: OffsetDateTime = datetime!(9999-12-31 23:59:59 UTC);

pub const DEFAULT_COMMON_NAME: &str = "rpc autogenerated cert";
pub const DEFAULT_ORGANIZATION: &str = "rpc-cert";

const SERIAL_NUMBER_BYTES: usize = 16;
const GENERATED_ORIGIN: &str = "<generated certificate>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertIdentity {
    pub common_name: String,
    pub organization: String,
    pub ip_addresses: Vec<String>,
    pub dns_names: Vec<String>,
    pub validity: Duration,
}

impl Default for CertIdentity {
    fn default() -> Self {
        Self {
            common_name: DEFAULT_COMMON_NAME.to_string(),
            organization: DEFAULT_ORGANIZATION.to_string(),
            ip_addresses: Vec::new(),
            dns_names: Vec::new(),
            validity: DEFAULT_AUTOGEN_VALIDITY,
        }
    }
}

impl CertIdentity {
    /// The deduplicated SAN set this identity asks for.
    pub fn san_set(&self) -> Result<SanSet, CertError> {
        SanSet::parse(&self.ip_addresses, &self.dns_names)
    }

    fn validate(&self) -> Result<(), CertError> {
        if self.common_name.trim().is_empty() {
            return Err(CertError::InvalidParameter(
                "common name must not be empty".to_string(),
            ));
        }
        // X.509 times have second precision; anything shorter would encode
        // not-after equal to not-before.
        if self.validity < Duration::SECOND {
            return Err(CertError::InvalidParameter(format!(
                "validity must be at least one second, got {}",
                self.validity
            )));
        }
        if self.dns_names.iter().any(|name| name.is_empty()) {
            return Err(CertError::InvalidParameter(
                "dns names must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Output of [`generate`]: the parsed certificate and the key that signed it.
#[derive(Debug)]
pub struct GeneratedCert {
    pub record: CertificateRecord,
    pub key_pair: CertKeyPair,
}

/// Creates a fresh key pair and a self-signed certificate carrying exactly
/// the deduplicated SANs of `identity`.
pub fn generate(identity: &CertIdentity) -> Result<GeneratedCert, CertError> {
    identity.validate()?;
    let sans = identity.san_set()?;

    let now = OffsetDateTime::now_utc();
    let not_before = now.replace_nanosecond(0).unwrap_or(now) - NOT_BEFORE_BACKDATE;
    let not_after = not_before
        .checked_add(identity.validity)
        .filter(|not_after| *not_after <= END_OF_TIME)
        .unwrap_or(END_OF_TIME);

    let params = build_params(identity, &sans, not_before, not_after)?;
    let key_pair = CertKeyPair::generate()?;
    let cert = params.self_signed(key_pair.signing_key())?;
    let record = CertificateRecord::parse_pem(Path::new(GENERATED_ORIGIN), &cert.pem())?;

    tracing::debug!(
        common_name = %identity.common_name,
        ip_count = sans.ip_addresses().len(),
        dns_count = sans.dns_names().len(),
        not_after = %record.not_after(),
        "generated self-signed certificate"
    );

    Ok(GeneratedCert { record, key_pair })
}

fn build_params(
    identity: &CertIdentity,
    sans: &SanSet,
    not_before: OffsetDateTime,
    not_after: OffsetDateTime,
) -> Result<CertificateParams, CertError> {
    let mut params = CertificateParams::default();
    params.is_ca = IsCa::NoCa;
    params.not_before = not_before;
    params.not_after = not_after;
    params.serial_number = Some(random_serial_number());
    params.key_usages = vec![
        KeyUsagePurpose::DigitalSignature,
        KeyUsagePurpose::KeyEncipherment,
    ];
    params.extended_key_usages = vec![ExtendedKeyUsagePurpose::ServerAuth];

    let mut distinguished_name = DistinguishedName::new();
    distinguished_name.push(DnType::CommonName, identity.common_name.clone());
    if !identity.organization.trim().is_empty() {
        distinguished_name.push(DnType::OrganizationName, identity.organization.clone());
    }
    params.distinguished_name = distinguished_name;

    for ip in sans.ip_addresses() {
        params.subject_alt_names.push(SanType::IpAddress(*ip));
    }
    for name in sans.dns_names() {
        let encoded = Ia5String::try_from(name.clone()).map_err(|error| {
            CertError::InvalidParameter(format!("dns name {name:?} is not encodable: {error}"))
        })?;
        params.subject_alt_names.push(SanType::DnsName(encoded));
    }

    Ok(params)
}

fn random_serial_number() -> SerialNumber {
    let mut bytes = [0u8; SERIAL_NUMBER_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    // Positive and non-zero, as RFC 5280 requires.
    bytes[0] &= 0x7f;
    if bytes.iter().all(|byte| *byte == 0) {
        bytes[SERIAL_NUMBER_BYTES - 1] = 1;
    }
    SerialNumber::from_slice(&bytes)
}
