use std::sync::Arc;

use rustls::ServerConfig;

use crate::{CertError, CertKeyPair, CertificateRecord};

pub const RPC_ALPN_PROTOCOLS: &[&[u8]] = &[b"h2"];

/// TLS server config for the RPC listener: the self-signed certificate as a
/// single-entry chain, no client authentication.
pub fn build_rpc_server_config(
    key_pair: &CertKeyPair,
    record: &CertificateRecord,
) -> Result<Arc<ServerConfig>, CertError> {
    let chain = vec![record.cert_der().clone()];
    let mut server_config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(chain, key_pair.private_key_der())?;
    server_config.alpn_protocols = RPC_ALPN_PROTOCOLS
        .iter()
        .map(|protocol| protocol.to_vec())
        .collect();
    Ok(Arc::new(server_config))
}
