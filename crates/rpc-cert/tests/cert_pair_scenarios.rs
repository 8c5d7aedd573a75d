use std::path::PathBuf;

use rpc_cert::{gen_cert_pair, is_outdated, load_cert, CertError, DEFAULT_AUTOGEN_VALIDITY};
use tempfile::TempDir;

const EXTRA_IPS: [&str; 3] = ["1.1.1.1", "123.123.123.1", "199.189.12.12"];
const EXTRA_DOMAINS: [&str; 3] = ["home", "and", "away"];

fn generate_pair(ips: &[&str], domains: &[&str]) -> (TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let cert_path = dir.path().join("tls.cert");
    let key_path = dir.path().join("tls.key");
    gen_cert_pair(
        "rpc autogenerated cert",
        &cert_path,
        &key_path,
        ips,
        domains,
        DEFAULT_AUTOGEN_VALIDITY,
    )
    .expect("generate cert pair");
    (dir, cert_path, key_path)
}

#[test]
fn outdated_unless_ips_and_domains_match_exactly() {
    let (_dir, cert_path, key_path) = generate_pair(&EXTRA_IPS[..2], &EXTRA_DOMAINS[..2]);

    for num_ips in 1..=EXTRA_IPS.len() {
        for num_domains in 1..=EXTRA_DOMAINS.len() {
            let (_, record) = load_cert(&cert_path, &key_path).expect("load cert");
            let outdated = is_outdated(
                &record,
                &EXTRA_IPS[..num_ips],
                &EXTRA_DOMAINS[..num_domains],
            )
            .expect("is_outdated");

            let expected = num_ips != 2 || num_domains != 2;
            assert_eq!(
                outdated, expected,
                "ips={num_ips} domains={num_domains}"
            );
        }
    }
}

#[test]
fn permutations_and_duplicates_are_not_outdated() {
    let (_dir, cert_path, key_path) = generate_pair(&EXTRA_IPS, &EXTRA_DOMAINS);
    let (_, record) = load_cert(&cert_path, &key_path).expect("load cert");

    let duplicated_ips: Vec<&str> = (0..EXTRA_IPS.len() * 2).map(|i| EXTRA_IPS[i / 2]).collect();
    let duplicated_dns: Vec<&str> = (0..EXTRA_DOMAINS.len() * 2)
        .map(|i| EXTRA_DOMAINS[i / 2])
        .collect();
    assert!(
        !is_outdated(&record, &duplicated_ips, &duplicated_dns).expect("duplicates"),
        "duplicate IPs or DNS names must not make the certificate outdated"
    );

    let reversed_ips: Vec<&str> = EXTRA_IPS.iter().rev().copied().collect();
    let reversed_dns: Vec<&str> = EXTRA_DOMAINS.iter().rev().copied().collect();
    assert!(
        !is_outdated(&record, &reversed_ips, &reversed_dns).expect("reversed"),
        "reordered IPs or DNS names must not make the certificate outdated"
    );
}

#[test]
fn malformed_desired_ip_is_reported() {
    let (_dir, cert_path, key_path) = generate_pair(&EXTRA_IPS[..2], &EXTRA_DOMAINS[..2]);
    let (_, record) = load_cert(&cert_path, &key_path).expect("load cert");

    let error = is_outdated(&record, &["1.1.1.1", "123.123.123"], &EXTRA_DOMAINS[..2])
        .expect_err("malformed ip");
    assert!(matches!(error, CertError::InvalidAddress { .. }), "{error}");
}

#[test]
fn gen_cert_pair_rejects_invalid_parameters() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let cert_path = dir.path().join("tls.cert");
    let key_path = dir.path().join("tls.key");

    let error = gen_cert_pair(
        "rpc autogenerated cert",
        &cert_path,
        &key_path,
        &EXTRA_IPS,
        &EXTRA_DOMAINS,
        time::Duration::ZERO,
    )
    .expect_err("zero validity");
    assert!(matches!(error, CertError::InvalidParameter(_)), "{error}");

    let error = gen_cert_pair(
        "rpc autogenerated cert",
        &cert_path,
        &key_path,
        &["1.1.1.1", "nope"],
        &EXTRA_DOMAINS,
        DEFAULT_AUTOGEN_VALIDITY,
    )
    .expect_err("bad ip");
    assert!(matches!(error, CertError::InvalidAddress { .. }), "{error}");

    assert!(!cert_path.exists());
    assert!(!key_path.exists());
}
