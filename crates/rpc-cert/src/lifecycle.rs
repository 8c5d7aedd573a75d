use std::fmt;

use time::OffsetDateTime;

use crate::{
    generate, is_outdated, load, san_drift, save, CertConfig, CertError, CertKeyPair,
    CertificateRecord, SanDrift, SanSet,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegenerateReason {
    SanDrift(SanDrift),
    Expired { not_after: OffsetDateTime },
    /// A key file was found with no certificate beside it.
    MissingCertificate,
}

impl fmt::Display for RegenerateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SanDrift(drift) => write!(f, "subject alternative names changed: {drift}"),
            Self::Expired { not_after } => write!(f, "certificate expired at {not_after}"),
            Self::MissingCertificate => f.write_str("private key has no certificate"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnsureAction {
    Generated,
    Loaded,
    Regenerated(RegenerateReason),
}

impl EnsureAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generated => "generated",
            Self::Loaded => "loaded",
            Self::Regenerated(_) => "regenerated",
        }
    }
}

#[derive(Debug)]
pub struct EnsureOutcome {
    pub key_pair: CertKeyPair,
    pub record: CertificateRecord,
    pub action: EnsureAction,
}

/// Loads the configured pair, replacing it wholesale when it is missing, no
/// longer advertises the configured names, or has expired.
///
/// A key file without a certificate is replaced as well: a save that failed
/// half way leaves exactly that behind. A certificate without its key is an
/// error, and a pair that fails to parse is reported, not replaced.
pub fn ensure_cert_pair(config: &CertConfig) -> Result<EnsureOutcome, CertError> {
    config.validate()?;

    let cert_exists = config.cert_path.exists();
    let key_exists = config.key_path.exists();
    let outcome = match (cert_exists, key_exists) {
        (false, false) => {
            let (key_pair, record) = regenerate(config)?;
            EnsureOutcome {
                key_pair,
                record,
                action: EnsureAction::Generated,
            }
        }
        (false, true) => {
            tracing::warn!(
                key_path = %config.key_path.display(),
                "replacing private key that has no certificate"
            );
            let (key_pair, record) = regenerate(config)?;
            EnsureOutcome {
                key_pair,
                record,
                action: EnsureAction::Regenerated(RegenerateReason::MissingCertificate),
            }
        }
        (true, true) => {
            let (key_pair, record) = load(&config.cert_path, &config.key_path)?;
            match regenerate_reason(config, &record)? {
                None => EnsureOutcome {
                    key_pair,
                    record,
                    action: EnsureAction::Loaded,
                },
                Some(reason) => {
                    tracing::info!(
                        cert_path = %config.cert_path.display(),
                        %reason,
                        "regenerating TLS certificate"
                    );
                    let (key_pair, record) = regenerate(config)?;
                    EnsureOutcome {
                        key_pair,
                        record,
                        action: EnsureAction::Regenerated(reason),
                    }
                }
            }
        }
        (true, false) => {
            return Err(CertError::InvalidConfig(format!(
                "TLS cert {} has no key at {}; cert and key files must both exist or both be absent",
                config.cert_path.display(),
                config.key_path.display()
            )));
        }
    };

    if outcome.action == EnsureAction::Loaded {
        tracing::debug!(
            cert_path = %config.cert_path.display(),
            action = outcome.action.as_str(),
            "reusing TLS certificate"
        );
    } else {
        tracing::info!(
            cert_path = %config.cert_path.display(),
            action = outcome.action.as_str(),
            not_after = %outcome.record.not_after(),
            "TLS certificate ready"
        );
    }
    Ok(outcome)
}

fn regenerate_reason(
    config: &CertConfig,
    record: &CertificateRecord,
) -> Result<Option<RegenerateReason>, CertError> {
    let desired_ips = config.desired_ips();
    let desired_dns = config.desired_dns_names();
    if is_outdated(record, &desired_ips, &desired_dns)? {
        let desired = SanSet::parse(&desired_ips, &desired_dns)?;
        return Ok(Some(RegenerateReason::SanDrift(san_drift(record, &desired))));
    }
    if config.regenerate_on_expiry && record.is_expired() {
        return Ok(Some(RegenerateReason::Expired {
            not_after: record.not_after(),
        }));
    }
    Ok(None)
}

fn regenerate(config: &CertConfig) -> Result<(CertKeyPair, CertificateRecord), CertError> {
    let generated = generate(&config.identity())?;
    save(
        &generated.record,
        &generated.key_pair,
        &config.cert_path,
        &config.key_path,
    )?;
    Ok((generated.key_pair, generated.record))
}
