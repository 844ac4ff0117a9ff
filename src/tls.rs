//! TLS configuration from a PEM bundle of CA roots.
//!
//! Only used when `CANDLEWICK_CA_PEM` is set; the default connector trusts
//! the webpki roots bundled with `tokio-tungstenite`.

use std::path::Path;

use rustls::ClientConfig;
use tracing::info;

use crate::Result;

/// Builds a [`ClientConfig`] whose root store contains exactly the
/// certificates in `pem`.
///
/// # Errors
///
/// Returns [`CandlewickError::Tls`](crate::CandlewickError::Tls) if the PEM
/// cannot be parsed or contains no usable certificate.
pub fn build_tls_config(pem: &[u8]) -> Result<ClientConfig> {
    let mut root_store = rustls::RootCertStore::empty();

    let certs: Vec<_> = rustls_pemfile::certs(&mut &pem[..])
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| crate::CandlewickError::Tls(format!("failed to parse CA PEM: {e}")))?;

    let (added, ignored) = root_store.add_parsable_certificates(certs);
    if added == 0 {
        return Err(crate::CandlewickError::Tls(
            "CA PEM contains no usable certificates".to_string(),
        ));
    }
    info!(added, ignored, "Loaded CA roots");

    let config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    Ok(config)
}

/// Reads `path` and builds a [`ClientConfig`] from it.
///
/// # Errors
///
/// Returns [`CandlewickError::Io`](crate::CandlewickError::Io) if the file
/// cannot be read, or the errors of [`build_tls_config`].
pub fn load_tls_config(path: &Path) -> Result<ClientConfig> {
    let pem = std::fs::read(path).map_err(|e| {
        crate::CandlewickError::Io(format!("failed to read {}: {e}", path.display()))
    })?;
    build_tls_config(&pem)
}
