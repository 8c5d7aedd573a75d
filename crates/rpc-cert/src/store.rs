use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::{CertError, CertKeyPair, CertificateRecord};

#[cfg(unix)]
const PRIVATE_KEY_FILE_MODE: u32 = 0o600;

/// Writes the certificate PEM to `cert_path` and the private key PEM to
/// `key_path`.
///
/// If the key cannot be written the freshly written certificate is removed,
/// so a later [`load`] sees no pair rather than a mismatched one.
pub fn save(
    record: &CertificateRecord,
    key_pair: &CertKeyPair,
    cert_path: impl AsRef<Path>,
    key_path: impl AsRef<Path>,
) -> Result<(), CertError> {
    let cert_path = cert_path.as_ref();
    let key_path = key_path.as_ref();

    ensure_parent_exists(cert_path)?;
    ensure_parent_exists(key_path)?;

    fs::write(cert_path, record.cert_pem())
        .map_err(|error| CertError::persistence(cert_path, error))?;
    if let Err(error) = write_private_key(key_path, &key_pair.private_key_pem()) {
        discard_partial_certificate(cert_path);
        return Err(CertError::persistence(key_path, error));
    }

    tracing::debug!(
        cert_path = %cert_path.display(),
        key_path = %key_path.display(),
        "persisted certificate pair"
    );
    Ok(())
}

/// Reads and decodes both artifacts. Every call goes to disk.
pub fn load(
    cert_path: impl AsRef<Path>,
    key_path: impl AsRef<Path>,
) -> Result<(CertKeyPair, CertificateRecord), CertError> {
    let cert_path = cert_path.as_ref();
    let key_path = key_path.as_ref();

    let cert_pem = read_pem(cert_path)?;
    let key_pem = read_pem(key_path)?;

    let record = CertificateRecord::parse_pem(cert_path, &cert_pem)?;
    let key_pair = CertKeyPair::parse_pem(key_path, &key_pem)?;
    if key_pair.public_key_raw() != record.public_key_raw() {
        return Err(CertError::parse(
            key_path,
            format!(
                "private key does not match certificate {}",
                cert_path.display()
            ),
        ));
    }

    Ok((key_pair, record))
}

fn read_pem(path: &Path) -> Result<String, CertError> {
    let bytes = fs::read(path).map_err(|error| CertError::from_read(path, error))?;
    String::from_utf8(bytes).map_err(|_| CertError::parse(path, "PEM file is not valid UTF-8"))
}

fn write_private_key(path: &Path, pem: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(PRIVATE_KEY_FILE_MODE);
    }
    let mut file = options.open(path)?;
    // The open mode only applies to new files; tighten a pre-existing one.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(PRIVATE_KEY_FILE_MODE))?;
    }
    file.write_all(pem.as_bytes())?;
    file.sync_all()
}

fn discard_partial_certificate(cert_path: &Path) {
    if let Err(error) = fs::remove_file(cert_path) {
        tracing::warn!(
            cert_path = %cert_path.display(),
            %error,
            "failed to remove certificate after private key write failure"
        );
    }
}

fn ensure_parent_exists(path: &Path) -> Result<(), CertError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|error| CertError::persistence(parent, error))?;
        }
    }
    Ok(())
}
