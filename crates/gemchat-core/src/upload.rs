//! Image upload validation and storage.
//!
//! Uploaded files land in a single flat directory under a timestamp-qualified
//! name and are served back at `/uploads/<name>`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use gemchat_types::error::UploadError;
use tracing::info;

use crate::service::fs::FileSystem;

/// Accepted image extensions, lowercase.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// URL prefix under which stored uploads are served.
pub const UPLOAD_URL_PREFIX: &str = "/uploads/";

/// Fallback when sanitizing leaves nothing usable.
const FALLBACK_FILENAME: &str = "upload";

/// Check a client-supplied filename and return its lowercase extension.
///
/// The extension is the text after the last `.`. A name without a dot has no
/// extension and is rejected, even when the whole name is `png`.
pub fn validate_upload(filename: Option<&str>) -> Result<String, UploadError> {
    let filename = filename.ok_or(UploadError::MissingFile)?;
    if filename.is_empty() {
        return Err(UploadError::EmptyFilename);
    }

    let Some((_, ext)) = filename.rsplit_once('.') else {
        return Err(UploadError::UnsupportedExtension(filename.to_ascii_lowercase()));
    };
    let ext = ext.to_ascii_lowercase();
    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(UploadError::UnsupportedExtension(ext))
    }
}

/// Reduce a client filename to a safe single path component.
///
/// Stem and extension are cleaned separately so the extension survives a
/// stem made entirely of dropped characters (`фото.png` becomes `upload.png`).
pub fn sanitize_filename(name: &str) -> String {
    // Clients on Windows send full paths.
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let (stem, ext) = match base.rsplit_once('.') {
        Some((stem, ext)) => (stem, clean_component(ext)),
        None => (base, String::new()),
    };
    let stem = clean_component(stem);
    let stem = stem.trim_start_matches(['.', '_']);
    let stem = if stem.is_empty() { FALLBACK_FILENAME } else { stem };

    if ext.is_empty() {
        stem.to_string()
    } else {
        format!("{stem}.{}", ext.to_ascii_lowercase())
    }
}

fn clean_component(part: &str) -> String {
    part.chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                Some(c)
            } else {
                None
            }
        })
        .collect()
}

/// Name a sanitized upload is stored under: `<secs>.<micros>_<name>`.
pub fn stored_filename(now: DateTime<Utc>, sanitized: &str) -> String {
    format!(
        "{}.{:06}_{}",
        now.timestamp(),
        now.timestamp_subsec_micros(),
        sanitized
    )
}

/// Writes uploads into a directory and maps their URLs back to paths.
pub struct UploadStore<F: FileSystem> {
    fs: F,
    dir: PathBuf,
}

impl<F: FileSystem> UploadStore<F> {
    pub fn new(fs: F, dir: PathBuf) -> Self {
        Self { fs, dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Validate, sanitize and store an upload. Returns its public URL.
    ///
    /// Nothing is written when validation fails.
    pub async fn save(&self, filename: Option<&str>, bytes: &[u8]) -> Result<String, UploadError> {
        validate_upload(filename)?;
        let sanitized = sanitize_filename(filename.unwrap_or_default());
        let stored = stored_filename(Utc::now(), &sanitized);

        self.fs
            .write_file(&self.dir.join(&stored), bytes)
            .await
            .map_err(|e| UploadError::Io(e.to_string()))?;
        info!(file = %stored, bytes = bytes.len(), "Upload stored");

        Ok(format!("{UPLOAD_URL_PREFIX}{stored}"))
    }

    /// Local path for an `/uploads/...` URL, or `None` for any other URL.
    ///
    /// Only the final path component is used, so the result always stays
    /// inside the upload directory.
    pub fn resolve_url(&self, url: &str) -> Option<PathBuf> {
        let rest = url.strip_prefix(UPLOAD_URL_PREFIX)?;
        let name = Path::new(rest).file_name()?;
        Some(self.dir.join(name))
    }
}
