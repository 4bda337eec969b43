use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::info;

use crate::error::{ExtratoError, Result};

/// Whether a PDF is password-protected, per `qpdf --is-encrypted`
/// (exit 0 = encrypted, exit 2 = not encrypted).
pub fn is_encrypted(path: &Path) -> Result<bool> {
    let status = Command::new("qpdf")
        .arg("--is-encrypted")
        .arg(path)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;
    match status.code() {
        Some(0) => Ok(true),
        Some(2) => Ok(false),
        _ => Err(ExtratoError::Other(format!(
            "qpdf could not inspect {}",
            path.display()
        ))),
    }
}

/// Decrypt a protected PDF into `out_dir`, returning the decrypted
/// copy's path. A qpdf failure reports as `InvalidPassword`.
pub fn decrypt(path: &Path, password: &str, out_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir)?;
    let out = out_dir.join(format!(
        "decrypted-{}.pdf",
        chrono::Utc::now().timestamp_millis()
    ));

    let output = Command::new("qpdf")
        .arg(format!("--password={password}"))
        .arg("--decrypt")
        .arg(path)
        .arg(&out)
        .output()?;

    if !output.status.success() {
        let _ = std::fs::remove_file(&out);
        return Err(ExtratoError::InvalidPassword);
    }

    info!(path = %out.display(), "decrypted statement written");
    Ok(out)
}
