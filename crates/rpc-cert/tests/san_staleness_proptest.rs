use std::collections::BTreeSet;
use std::net::IpAddr;
use std::sync::OnceLock;

use proptest::prelude::*;
use rpc_cert::{generate, is_outdated, load_cert, save, CertIdentity, CertificateRecord};

const IP_POOL: [&str; 6] = [
    "1.1.1.1",
    "123.123.123.1",
    "199.189.12.12",
    "10.0.0.1",
    "::1",
    "fe80::1",
];
const DNS_POOL: [&str; 5] = ["home", "and", "away", "localhost", "rpc.internal"];

// Generated with the first three entries of each pool.
fn shared_record() -> &'static CertificateRecord {
    static RECORD: OnceLock<CertificateRecord> = OnceLock::new();
    RECORD.get_or_init(|| {
        let identity = CertIdentity {
            common_name: "proptest cert".to_string(),
            ip_addresses: IP_POOL[..3].iter().map(|ip| ip.to_string()).collect(),
            dns_names: DNS_POOL[..3].iter().map(|name| name.to_string()).collect(),
            ..CertIdentity::default()
        };
        generate(&identity).expect("generate shared record").record
    })
}

fn entries_from(pool: &'static [&'static str]) -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(pool.to_vec()), 0..12)
}

fn as_ip_set(values: &[&str]) -> BTreeSet<IpAddr> {
    values
        .iter()
        .map(|value| value.parse::<IpAddr>().expect("pool ip"))
        .collect()
}

fn as_name_set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

proptest! {
    #[test]
    fn reordering_and_duplicating_never_changes_the_verdict(
        ips in entries_from(&IP_POOL),
        names in entries_from(&DNS_POOL),
        ip_shuffle_seed in any::<u64>(),
        extra_copies in 0usize..4,
    ) {
        let record = shared_record();
        let baseline = is_outdated(record, &ips, &names).expect("baseline");

        let mut permuted_ips = ips.clone();
        let rotation = if permuted_ips.is_empty() {
            0
        } else {
            (ip_shuffle_seed as usize) % permuted_ips.len()
        };
        permuted_ips.rotate_left(rotation);
        permuted_ips.reverse();
        for _ in 0..extra_copies {
            permuted_ips.extend(ips.iter().copied());
        }
        let mut permuted_names: Vec<&str> = names.iter().rev().copied().collect();
        permuted_names.extend(names.iter().take(extra_copies).copied());

        let permuted = is_outdated(record, &permuted_ips, &permuted_names).expect("permuted");
        prop_assert_eq!(baseline, permuted);
    }

    #[test]
    fn verdict_is_exact_set_inequality(
        ips in entries_from(&IP_POOL),
        names in entries_from(&DNS_POOL),
    ) {
        let record = shared_record();
        let expected = as_ip_set(&ips) != as_ip_set(&IP_POOL[..3])
            || as_name_set(&names) != as_name_set(&DNS_POOL[..3]);
        let outdated = is_outdated(record, &ips, &names).expect("is_outdated");
        prop_assert_eq!(outdated, expected);
    }

    #[test]
    fn malformed_ip_is_always_rejected(
        ips in entries_from(&IP_POOL),
        garbage in "[a-z]{1,8}(\\.[a-z]{1,4})?",
        position in any::<prop::sample::Index>(),
    ) {
        let record = shared_record();
        let mut desired: Vec<&str> = ips.clone();
        let at = position.index(desired.len() + 1);
        desired.insert(at, garbage.as_str());
        let no_names: [&str; 0] = [];
        let result = is_outdated(record, &desired, &no_names);
        prop_assert!(
            matches!(result, Err(rpc_cert::CertError::InvalidAddress { .. })),
            "{:?}",
            result
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn persisted_sans_round_trip_as_sets(
        ips in entries_from(&IP_POOL),
        names in entries_from(&DNS_POOL),
    ) {
        let dir = tempfile::tempdir().expect("temp dir");
        let cert_path = dir.path().join("tls.cert");
        let key_path = dir.path().join("tls.key");
        let identity = CertIdentity {
            common_name: "round trip".to_string(),
            ip_addresses: ips.iter().map(|ip| ip.to_string()).collect(),
            dns_names: names.iter().map(|name| name.to_string()).collect(),
            ..CertIdentity::default()
        };
        let generated = generate(&identity).expect("generate");
        save(&generated.record, &generated.key_pair, &cert_path, &key_path).expect("save");

        let (_, record) = load_cert(&cert_path, &key_path).expect("load");
        prop_assert_eq!(record.sans().ip_addresses(), &as_ip_set(&ips));
        prop_assert_eq!(record.sans().dns_names(), &as_name_set(&names));
        prop_assert!(!is_outdated(&record, &ips, &names).expect("is_outdated"));
    }
}
