use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

/// Loads the JWT verification key from `.secret_key`, generating one on
/// first run so local development works without any env setup. Production
/// deployments must provide SECRET_KEY explicitly; strict config enforces
/// that before this fallback is reached.
pub(super) fn load_or_create_secret_key() -> String {
    let path = secret_file_path();

    if let Ok(existing) = fs::read_to_string(&path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut bytes = [0u8; 64];
    OsRng.fill_bytes(&mut bytes);
    let key = URL_SAFE_NO_PAD.encode(bytes);

    match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => {
            use std::io::Write;
            let mut file = file;
            if let Err(err) = file.write_all(key.as_bytes()) {
                tracing::warn!(error = %err, "failed to persist generated secret key");
            }
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Err(err) = fs::set_permissions(&path, fs::Permissions::from_mode(0o600)) {
                    tracing::warn!(error = %err, "failed to restrict secret key permissions");
                }
            }
        }
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            // Another process won the race; use its key.
            if let Ok(existing) = fs::read_to_string(&path) {
                let trimmed = existing.trim();
                if !trimmed.is_empty() {
                    return trimmed.to_string();
                }
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to create secret key file");
        }
    }

    key
}

fn secret_file_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(".secret_key")
}
