    #[test]
    fn generated_certificate_embeds_requested_identity() {
        let mut requested = identity(&["1.1.1.1", "1.1.1.1", "::1"], &["home", "and", "home"]);
        requested.validity = Duration::days(30);
        let generated = generate(&requested).expect("generate");
        let record = &generated.record;

        assert_eq!(record.common_name(), "rpc-cert test");
        assert_eq!(record.validity(), Duration::days(30));
        assert!(record.not_after() > record.not_before());

        let (mut ips, mut names) = san_general_names(record);
        ips.sort();
        names.sort();
        assert_eq!(
            ips,
            vec![
                "1.1.1.1".parse::<IpAddr>().unwrap(),
                "::1".parse::<IpAddr>().unwrap()
            ]
        );
        assert_eq!(names, vec!["and".to_string(), "home".to_string()]);
    }

    #[test]
    fn generated_not_before_is_backdated_for_clock_skew() {
        let before = OffsetDateTime::now_utc();
        let generated = generate(&identity(&["127.0.0.1"], &["localhost"])).expect("generate");
        let after = OffsetDateTime::now_utc();

        let not_before = generated.record.not_before();
        assert!(not_before <= before - NOT_BEFORE_BACKDATE + Duration::SECOND);
        assert!(not_before >= before - NOT_BEFORE_BACKDATE - Duration::SECOND);
        assert!(not_before < after);
        assert!(!generated.record.is_expired());
    }

    #[test]
    fn default_identity_uses_autogen_validity() {
        let generated = generate(&identity(&["127.0.0.1"], &[])).expect("generate");
        assert_eq!(generated.record.validity(), DEFAULT_AUTOGEN_VALIDITY);
    }

    #[test]
    fn generate_clamps_not_after_to_end_of_time() {
        let mut requested = identity(&["127.0.0.1"], &[]);
        requested.validity = Duration::days(365 * 9_000);
        let generated = generate(&requested).expect("generate");
        assert_eq!(generated.record.not_after(), END_OF_TIME);
    }

    #[test]
    fn generate_rejects_non_positive_validity() {
        for validity in [
            Duration::ZERO,
            Duration::seconds(-1),
            Duration::days(-30),
            Duration::milliseconds(500),
        ] {
            let mut requested = identity(&["127.0.0.1"], &[]);
            requested.validity = validity;
            let error = generate(&requested).expect_err("validity must be rejected");
            assert!(
                matches!(error, CertError::InvalidParameter(_)),
                "{validity}: {error}"
            );
        }
    }

    #[test]
    fn generate_rejects_empty_common_name() {
        let mut requested = identity(&["127.0.0.1"], &[]);
        requested.common_name = "   ".to_string();
        let error = generate(&requested).expect_err("empty common name");
        assert!(error.to_string().contains("common name must not be empty"), "{error}");
    }

    #[test]
    fn generate_rejects_malformed_ip_and_bad_dns_names() {
        let error = generate(&identity(&["300.1.1.1"], &[])).expect_err("bad ip");
        assert!(matches!(error, CertError::InvalidAddress { .. }), "{error}");

        let error = generate(&identity(&[], &[""])).expect_err("empty dns name");
        assert!(matches!(error, CertError::InvalidParameter(_)), "{error}");

        let error = generate(&identity(&[], &["bücher.example"])).expect_err("non-ascii dns");
        assert!(matches!(error, CertError::InvalidParameter(_)), "{error}");
    }

    #[test]
    fn repeated_generation_differs_in_key_but_not_in_sans() {
        let requested = identity(&EXTRA_IPS, &EXTRA_DOMAINS);
        let first = generate(&requested).expect("first");
        let second = generate(&requested).expect("second");

        assert_ne!(first.record.cert_der(), second.record.cert_der());
        assert_ne!(first.key_pair.public_key_raw(), second.key_pair.public_key_raw());
        assert_eq!(first.record.sans(), second.record.sans());
        assert!(!is_outdated(&second.record, &EXTRA_IPS, &EXTRA_DOMAINS).unwrap());
    }

    #[test]
    fn generated_pair_builds_rpc_server_config() {
        let generated = generate(&identity(&["127.0.0.1"], &["localhost"])).expect("generate");
        let server_config =
            build_rpc_server_config(&generated.key_pair, &generated.record).expect("server config");
        let expected: Vec<Vec<u8>> = RPC_ALPN_PROTOCOLS.iter().map(|p| p.to_vec()).collect();
        assert_eq!(server_config.alpn_protocols, expected);
    }

    #[test]
    fn generated_certificate_is_a_server_leaf() {
        let generated = generate(&identity(&["127.0.0.1"], &["localhost"])).expect("generate");
        let (_, cert) =
            parse_x509_certificate(generated.record.cert_der().as_ref()).expect("parse x509");

        let key_usage = cert
            .key_usage()
            .expect("key usage parse")
            .expect("key usage present");
        assert!(key_usage.value.digital_signature());
        assert!(key_usage.value.key_encipherment());
        assert!(!key_usage.value.key_cert_sign());

        let extended = cert
            .extended_key_usage()
            .expect("extended key usage parse")
            .expect("extended key usage present");
        assert!(extended.value.server_auth);

        let is_ca = cert
            .basic_constraints()
            .expect("basic constraints parse")
            .map_or(false, |constraints| constraints.value.ca);
        assert!(!is_ca);
    }
