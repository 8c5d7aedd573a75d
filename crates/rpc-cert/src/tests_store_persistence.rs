    #[test]
    fn reloaded_certificate_matches_requested_names() {
        let dir = tempfile::tempdir().expect("temp dir");
        let (cert_path, key_path) = pair_paths(&dir);
        gen_cert_pair(
            "rpc autogenerated cert",
            &cert_path,
            &key_path,
            &EXTRA_IPS[..2],
            &EXTRA_DOMAINS[..2],
            DEFAULT_AUTOGEN_VALIDITY,
        )
        .expect("gen cert pair");

        let (key_pair, record) = load_cert(&cert_path, &key_path).expect("load cert");
        assert_eq!(record.common_name(), "rpc autogenerated cert");
        assert_eq!(
            record.sans(),
            &SanSet::parse(&EXTRA_IPS[..2], &EXTRA_DOMAINS[..2]).unwrap()
        );
        assert!(!key_pair.public_key_raw().is_empty());

        assert!(!is_outdated(&record, &["1.1.1.1", "123.123.123.1"], &["home", "and"]).unwrap());
        assert!(is_outdated(&record, &["1.1.1.1"], &["home", "and"]).unwrap());
        assert!(!is_outdated(&record, &["1.1.1.1", "123.123.123.1"], &["and", "home"]).unwrap());
        assert!(!is_outdated(
            &record,
            &["1.1.1.1", "1.1.1.1", "123.123.123.1", "123.123.123.1"],
            &["home", "and"]
        )
        .unwrap());
        assert!(matches!(
            is_outdated(&record, &["1.1.1"], &["home", "and"]),
            Err(CertError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn reloaded_record_equals_generated_record() {
        let dir = tempfile::tempdir().expect("temp dir");
        let (cert_path, key_path) = pair_paths(&dir);
        let generated = generate(&identity(&EXTRA_IPS, &EXTRA_DOMAINS)).expect("generate");
        save(&generated.record, &generated.key_pair, &cert_path, &key_path).expect("save");

        let (key_pair, record) = load_cert(&cert_path, &key_path).expect("load");
        assert_eq!(record, generated.record);
        assert_eq!(key_pair.public_key_raw(), generated.key_pair.public_key_raw());
    }

    #[test]
    fn load_reports_missing_artifacts_as_not_found() {
        let dir = tempfile::tempdir().expect("temp dir");
        let (cert_path, key_path) = pair_paths(&dir);

        let error = load_cert(&cert_path, &key_path).expect_err("nothing on disk");
        assert!(error.is_not_found(), "{error}");

        let generated = generate(&identity(&["127.0.0.1"], &[])).expect("generate");
        save(&generated.record, &generated.key_pair, &cert_path, &key_path).expect("save");
        fs::remove_file(&key_path).expect("remove key");

        match load_cert(&cert_path, &key_path) {
            Err(CertError::NotFound { path }) => assert_eq!(path, key_path),
            other => panic!("expected missing key, got {other:?}"),
        }
    }

    #[test]
    fn load_rejects_corrupt_artifacts() {
        let dir = tempfile::tempdir().expect("temp dir");
        let (cert_path, key_path) = pair_paths(&dir);
        let generated = generate(&identity(&["127.0.0.1"], &[])).expect("generate");
        let key_pem = generated.key_pair.private_key_pem();

        write_raw_pair(&cert_path, &key_path, "not a cert", &key_pem);
        let error = load_cert(&cert_path, &key_path).expect_err("corrupt cert");
        assert!(matches!(error, CertError::Parse { .. }), "{error}");

        write_raw_pair(&cert_path, &key_path, generated.record.cert_pem(), "not a key");
        let error = load_cert(&cert_path, &key_path).expect_err("corrupt key");
        assert!(matches!(error, CertError::Parse { .. }), "{error}");

        let swapped = format!("{}{}", key_pem, generated.record.cert_pem());
        write_raw_pair(&cert_path, &key_path, &swapped, &key_pem);
        let error = load_cert(&cert_path, &key_path).expect_err("key block in cert file");
        assert!(matches!(error, CertError::Parse { .. }), "{error}");
    }

    #[test]
    fn load_rejects_key_that_does_not_match_certificate() {
        let dir = tempfile::tempdir().expect("temp dir");
        let (cert_path, key_path) = pair_paths(&dir);
        let first = generate(&identity(&["127.0.0.1"], &[])).expect("first");
        let second = generate(&identity(&["127.0.0.1"], &[])).expect("second");

        save(&first.record, &second.key_pair, &cert_path, &key_path).expect("save");
        let error = load_cert(&cert_path, &key_path).expect_err("mismatched pair");
        match error {
            CertError::Parse { detail, .. } => {
                assert!(detail.contains("does not match"), "{detail}")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn save_creates_parent_directories_and_restricts_key() {
        let dir = tempfile::tempdir().expect("temp dir");
        let cert_path = dir.path().join("nested/tls/tls.cert");
        let key_path = dir.path().join("nested/secret/tls.key");
        let generated = generate(&identity(&["127.0.0.1"], &["localhost"])).expect("generate");

        save(&generated.record, &generated.key_pair, &cert_path, &key_path).expect("save");
        assert!(cert_path.exists());
        assert!(key_path.exists());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&key_path).expect("key metadata").permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn failed_key_write_leaves_no_certificate_behind() {
        let dir = tempfile::tempdir().expect("temp dir");
        let cert_path = dir.path().join("tls.cert");
        let key_path = dir.path().join("key-dir");
        fs::create_dir_all(&key_path).expect("create directory in place of key");
        let generated = generate(&identity(&["127.0.0.1"], &[])).expect("generate");

        let error = save(&generated.record, &generated.key_pair, &cert_path, &key_path)
            .expect_err("key path is a directory");
        match error {
            CertError::Persistence { path, .. } => assert_eq!(path, key_path),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!cert_path.exists());
    }

    #[test]
    fn failed_certificate_write_leaves_no_key_behind() {
        let dir = tempfile::tempdir().expect("temp dir");
        let cert_path = dir.path().join("cert-dir");
        let key_path = dir.path().join("tls.key");
        fs::create_dir_all(&cert_path).expect("create directory in place of cert");
        let generated = generate(&identity(&["127.0.0.1"], &[])).expect("generate");

        let error = save(&generated.record, &generated.key_pair, &cert_path, &key_path)
            .expect_err("cert path is a directory");
        match error {
            CertError::Persistence { path, .. } => assert_eq!(path, cert_path),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!key_path.exists());
        assert!(cert_path.is_dir());
    }

    #[test]
    fn load_rereads_files_on_every_call() {
        let dir = tempfile::tempdir().expect("temp dir");
        let (cert_path, key_path) = pair_paths(&dir);
        gen_cert_pair("first", &cert_path, &key_path, &["127.0.0.1"], &["one"], Duration::days(1))
            .expect("first pair");
        let (_, first) = load_cert(&cert_path, &key_path).expect("first load");

        gen_cert_pair("second", &cert_path, &key_path, &["127.0.0.1"], &["two"], Duration::days(1))
            .expect("second pair");
        let (_, second) = load_cert(&cert_path, &key_path).expect("second load");

        assert_eq!(first.common_name(), "first");
        assert_eq!(second.common_name(), "second");
        assert!(is_outdated(&second, &["127.0.0.1"], &["one"]).unwrap());
        assert!(!is_outdated(&second, &["127.0.0.1"], &["two"]).unwrap());
    }
