//! Upload hostel image command
//!
//! Images are stored under `hostel-images/` with a random name that keeps
//! only the original extension.

use mediator::Request;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::Storage;

pub const KEY_PREFIX: &str = "hostel-images";
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadImageCommand {
    pub filename: String,
    #[serde(skip)]
    pub content: Vec<u8>,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadImageResponse {
    pub url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadImageError {
    #[error("No selected file")]
    NoSelectedFile,
    #[error("File type not allowed")]
    FileTypeNotAllowed,
    #[error("Failed to upload file to cloud storage")]
    Storage(#[from] anyhow::Error),
}

impl Request<Result<UploadImageResponse, UploadImageError>> for UploadImageCommand {}

impl crate::cqrs::middleware::Command for UploadImageCommand {}

/// Lowercased extension of `filename` if it is an allowed image type.
///
/// Only the text after the last dot matters, so a bare `.png` is accepted.
pub fn allowed_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Storage key for an upload: `hostel-images/<uuid hex>.<ext>`.
pub fn object_key(ext: &str) -> String {
    format!("{KEY_PREFIX}/{}.{ext}", Uuid::new_v4().simple())
}

impl UploadImageCommand {
    /// Validate and return the normalized extension.
    pub fn validate(&self) -> Result<String, UploadImageError> {
        if self.filename.trim().is_empty() {
            return Err(UploadImageError::NoSelectedFile);
        }
        allowed_extension(self.filename.trim()).ok_or(UploadImageError::FileTypeNotAllowed)
    }
}

#[tracing::instrument(skip(storage, command), fields(filename = %command.filename, size = command.content.len()))]
pub async fn handle(
    storage: Storage,
    command: UploadImageCommand,
) -> Result<UploadImageResponse, UploadImageError> {
    let ext = command.validate()?;
    let key = object_key(&ext);

    let result = storage
        .upload(&key, command.content, command.content_type)
        .await?;

    tracing::info!(key = %result.key, size = result.size, checksum = %result.checksum, "Image uploaded");

    Ok(UploadImageResponse { url: result.url })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(filename: &str) -> UploadImageCommand {
        UploadImageCommand {
            filename: filename.to_string(),
            content: vec![1, 2, 3],
            content_type: Some("image/png".to_string()),
        }
    }

    #[test]
    fn test_allowed_extensions_case_insensitive() {
        assert_eq!(allowed_extension("room.PNG").as_deref(), Some("png"));
        assert_eq!(allowed_extension("a.b.jpeg").as_deref(), Some("jpeg"));
        assert_eq!(allowed_extension("photo.WebP").as_deref(), Some("webp"));
        assert_eq!(allowed_extension("script.exe"), None);
        assert_eq!(allowed_extension("noextension"), None);
        assert_eq!(allowed_extension("photo."), None);
    }

    #[test]
    fn test_dotfile_name_uses_its_extension() {
        assert_eq!(allowed_extension(".png").as_deref(), Some("png"));
        assert_eq!(allowed_extension(".env"), None);
    }

    #[test]
    fn test_validate() {
        assert!(matches!(command("").validate(), Err(UploadImageError::NoSelectedFile)));
        assert!(matches!(
            command("notes.pdf").validate(),
            Err(UploadImageError::FileTypeNotAllowed)
        ));
        assert_eq!(command("Room.JPG").validate().unwrap(), "jpg");
    }

    #[test]
    fn test_object_key_format() {
        let key = object_key("png");
        let name = key.strip_prefix("hostel-images/").unwrap();
        let (hex, ext) = name.split_once('.').unwrap();
        assert_eq!(ext, "png");
        assert_eq!(hex.len(), 32);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(object_key("png"), key);
    }
}
