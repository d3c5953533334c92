//! File upload staging and storage.
//!
//! Multipart parts are streamed to a staging file first. Once the submission
//! checks out, the staged file is moved into the adapter service's upload
//! directory under a fresh UUID name.

use axum::extract::multipart::{Multipart, MultipartError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

/// Multipart field carrying the file
pub const FILE_FIELD: &str = "upload-file";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file was uploaded")]
    NoFile,

    #[error("Upload directory not available from adapter service")]
    UploadDirUnavailable,

    #[error("Failed to save uploaded file: {0}")]
    Save(#[from] std::io::Error),

    #[error("Malformed upload: {0}")]
    Multipart(String),
}

impl UploadError {
    pub fn message_key(&self) -> &'static str {
        match self {
            UploadError::NoFile => "error-no-file",
            UploadError::Multipart(_) => "error-upload-unreadable",
            UploadError::UploadDirUnavailable => "error-upload-dir",
            UploadError::Save(_) => "error-upload-save",
        }
    }
}

impl From<MultipartError> for UploadError {
    fn from(e: MultipartError) -> Self {
        UploadError::Multipart(e.body_text())
    }
}

/// A staged upload. The staging file is removed on drop unless it was moved.
#[derive(Debug)]
pub struct UploadedFile {
    /// File name as sent by the browser (base name only)
    pub name: String,
    pub size: u64,
    pub temp_path: PathBuf,
}

impl Drop for UploadedFile {
    fn drop(&mut self) {
        if self.temp_path.exists() {
            let _ = std::fs::remove_file(&self.temp_path);
        }
    }
}

/// Fields of a submitted upload form
#[derive(Debug, Default)]
pub struct UploadForm {
    pub token: String,
    pub method: String,
    pub file: Option<UploadedFile>,
}

/// Random UUID-v4 name keeping the original extension
pub fn unique_file_name(original: &str) -> String {
    let guid = Uuid::new_v4();
    match file_extension(original) {
        Some(ext) => format!("{}.{}", guid, ext),
        None => guid.to_string(),
    }
}

fn file_extension(original: &str) -> Option<&str> {
    Path::new(base_name(original))
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// Browsers on some platforms send the full client path
fn base_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// Read the upload form, streaming the file part into `staging_dir`.
pub async fn stage_multipart(
    mut multipart: Multipart,
    staging_dir: &Path,
) -> Result<UploadForm, UploadError> {
    let mut form = UploadForm::default();

    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "wpEditToken" => form.token = field.text().await?,
            "wpmethod" => form.method = field.text().await?,
            FILE_FIELD => {
                let original = base_name(field.file_name().unwrap_or_default()).to_string();
                let temp_path = staging_dir.join(format!("eln-upload-{}.part", Uuid::new_v4()));

                let mut staged = UploadedFile {
                    name: original,
                    size: 0,
                    temp_path,
                };

                let mut out = tokio::fs::File::create(&staged.temp_path).await?;
                while let Some(chunk) = field.chunk().await? {
                    out.write_all(&chunk).await?;
                    staged.size += chunk.len() as u64;
                }
                out.flush().await?;

                if staged.name.is_empty() || staged.size == 0 {
                    debug!(name = %staged.name, "Ignoring empty file part");
                } else {
                    form.file = Some(staged);
                }
            }
            other => debug!(field = other, "Ignoring unknown upload field"),
        }
    }

    Ok(form)
}

/// Move a staged file into `upload_dir` under a unique name.
pub async fn store_upload(file: &UploadedFile, upload_dir: &Path) -> Result<PathBuf, UploadError> {
    tokio::fs::create_dir_all(upload_dir).await?;

    let target = upload_dir.join(unique_file_name(&file.name));

    if let Err(e) = tokio::fs::rename(&file.temp_path, &target).await {
        // Staging and upload dirs may sit on different filesystems
        debug!(error = %e, "Rename failed, copying instead");
        tokio::fs::copy(&file.temp_path, &target).await?;
        if let Err(e) = tokio::fs::remove_file(&file.temp_path).await {
            warn!(path = %file.temp_path.display(), error = %e, "Failed to remove staged upload");
        }
    }

    Ok(target)
}
