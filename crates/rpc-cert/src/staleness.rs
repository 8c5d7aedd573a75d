use crate::{CertError, CertificateRecord, SanDrift, SanSet};

/// Reports whether `record` must be regenerated to advertise exactly
/// `desired_ips` and `desired_dns`.
///
/// Both lists are compared as sets against the certificate's SANs: order and
/// repeated entries are irrelevant, and an entry missing on either side makes
/// the certificate outdated. Fails if any desired IP is not an IP literal.
pub fn is_outdated<I, D>(
    record: &CertificateRecord,
    desired_ips: &[I],
    desired_dns: &[D],
) -> Result<bool, CertError>
where
    I: AsRef<str>,
    D: AsRef<str>,
{
    let desired = SanSet::parse(desired_ips, desired_dns)?;
    Ok(record.sans() != &desired)
}

pub fn san_drift(record: &CertificateRecord, desired: &SanSet) -> SanDrift {
    desired.drift_from(record.sans())
}
