#![no_main]

use libfuzzer_sys::fuzz_target;
use rpc_cert::{is_outdated, CertificateRecord};

fuzz_target!(|data: &[u8]| {
    let pem = String::from_utf8_lossy(data);
    if let Ok(record) = CertificateRecord::from_pem(&pem) {
        let ips: Vec<String> = record
            .sans()
            .ip_addresses()
            .iter()
            .map(ToString::to_string)
            .collect();
        let dns: Vec<&String> = record.sans().dns_names().iter().collect();
        assert_eq!(is_outdated(&record, &ips, &dns).ok(), Some(false));
    }
});
