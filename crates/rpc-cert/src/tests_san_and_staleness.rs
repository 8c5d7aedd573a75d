    const NO_NAMES: [&str; 0] = [];

    #[test]
    fn san_set_ignores_order_and_duplicates() {
        let forward = SanSet::parse(["1.1.1.1", "::1"], ["home", "and"]).expect("forward");
        let shuffled =
            SanSet::parse(["::1", "1.1.1.1", "::1"], ["and", "home", "and", "home"])
                .expect("shuffled");
        assert_eq!(forward, shuffled);
        assert_eq!(shuffled.len(), 4);
    }

    #[test]
    fn san_set_rejects_malformed_ip_literal() {
        let error = SanSet::parse(["1.1.1.1", "1.1.1.256"], NO_NAMES)
            .expect_err("malformed ip must fail");
        match error {
            CertError::InvalidAddress { value } => assert_eq!(value, "1.1.1.256"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn san_set_treats_ipv4_mapped_ipv6_as_ipv4() {
        let mapped = SanSet::parse(["::ffff:10.1.2.3"], NO_NAMES).expect("mapped");
        let plain = SanSet::parse(["10.1.2.3"], NO_NAMES).expect("plain");
        assert_eq!(mapped, plain);
    }

    #[test]
    fn san_drift_lists_both_directions() {
        let desired = SanSet::parse(["1.1.1.1", "2.2.2.2"], ["home"]).expect("desired");
        let embedded = SanSet::parse(["1.1.1.1", "3.3.3.3"], ["away"]).expect("embedded");
        let drift = desired.drift_from(&embedded);

        assert_eq!(drift.missing_ips, vec!["2.2.2.2".parse::<IpAddr>().unwrap()]);
        assert_eq!(drift.unexpected_ips, vec!["3.3.3.3".parse::<IpAddr>().unwrap()]);
        assert_eq!(drift.missing_dns_names, vec!["home".to_string()]);
        assert_eq!(drift.unexpected_dns_names, vec!["away".to_string()]);
        assert_eq!(
            drift.to_string(),
            "missing ips [2.2.2.2]; unexpected ips [3.3.3.3]; \
             missing dns names [home]; unexpected dns names [away]"
        );
        assert!(desired.drift_from(&desired).is_empty());
    }

    #[test]
    fn is_outdated_requires_exact_set_match() {
        let generated =
            generate(&identity(&EXTRA_IPS[..2], &EXTRA_DOMAINS[..2])).expect("generate");

        for num_ips in 1..=EXTRA_IPS.len() {
            for num_domains in 1..=EXTRA_DOMAINS.len() {
                let outdated = is_outdated(
                    &generated.record,
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
    fn is_outdated_ignores_order_and_duplicates() {
        let generated = generate(&identity(&EXTRA_IPS, &EXTRA_DOMAINS)).expect("generate");

        let duplicated_ips: Vec<&str> = EXTRA_IPS.iter().flat_map(|ip| [*ip, *ip]).collect();
        let duplicated_dns: Vec<&str> = EXTRA_DOMAINS
            .iter()
            .flat_map(|name| [*name, *name])
            .collect();
        assert!(!is_outdated(&generated.record, &duplicated_ips, &duplicated_dns).unwrap());

        let reversed_ips: Vec<&str> = EXTRA_IPS.iter().rev().copied().collect();
        let reversed_dns: Vec<&str> = EXTRA_DOMAINS.iter().rev().copied().collect();
        assert!(!is_outdated(&generated.record, &reversed_ips, &reversed_dns).unwrap());
    }

    #[test]
    fn is_outdated_rejects_malformed_desired_ip() {
        let generated = generate(&identity(&EXTRA_IPS[..2], &EXTRA_DOMAINS[..2])).expect("generate");
        let error = is_outdated(&generated.record, &["1.1.1.1", "not-an-ip"], &EXTRA_DOMAINS[..2])
            .expect_err("malformed ip must fail");
        assert!(matches!(error, CertError::InvalidAddress { ref value } if value == "not-an-ip"));
    }

    #[test]
    fn empty_desired_list_against_embedded_names_is_outdated() {
        let generated = generate(&identity(&EXTRA_IPS[..1], &EXTRA_DOMAINS[..1])).expect("generate");
        assert!(is_outdated(&generated.record, &NO_NAMES, &EXTRA_DOMAINS[..1]).unwrap());
        assert!(is_outdated(&generated.record, &EXTRA_IPS[..1], &NO_NAMES).unwrap());
    }

    #[test]
    fn certificate_without_sans_matches_empty_desired_lists() {
        let generated = generate(&identity(&[], &[])).expect("generate");
        assert!(generated.record.sans().is_empty());
        assert!(!is_outdated(&generated.record, &NO_NAMES, &NO_NAMES).unwrap());
        assert!(is_outdated(&generated.record, &["127.0.0.1"], &NO_NAMES).unwrap());
        assert!(is_outdated(&generated.record, &NO_NAMES, &["localhost"]).unwrap());
    }

    #[test]
    fn san_drift_is_empty_for_current_certificate() {
        let generated = generate(&identity(&EXTRA_IPS, &EXTRA_DOMAINS)).expect("generate");
        let desired = SanSet::parse(EXTRA_IPS.iter().rev(), EXTRA_DOMAINS).expect("desired");
        assert!(san_drift(&generated.record, &desired).is_empty());

        let narrower = SanSet::parse(&EXTRA_IPS[..1], EXTRA_DOMAINS).expect("narrower");
        let drift = san_drift(&generated.record, &narrower);
        assert_eq!(drift.unexpected_ips.len(), 2);
        assert!(drift.missing_ips.is_empty());
    }
