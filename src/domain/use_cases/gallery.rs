use std::sync::Arc;

use actix_multipart::form::tempfile::TempFile;
use chrono::Utc;

use crate::constants::{ALLOWED_IMAGE_TYPES, MAX_UPLOAD_BYTES};
use crate::entities::image::{ImageRecord, NewImageRecord};
use crate::errors::ApiError;
use crate::repositories::image::ImageRepository;
use crate::repositories::user::UserRepository;
use crate::storage::disk::DiskStorage;

/// Image upload/list/delete. The blob store and the metadata rows are kept
/// consistent with best-effort cleanup; see `upload` and `delete` for the
/// two tolerated inconsistency windows.
pub struct GalleryHandler {
    pub image_repo: Arc<dyn ImageRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub storage: DiskStorage,
}

impl GalleryHandler {
    pub fn new(
        image_repo: Arc<dyn ImageRepository>,
        user_repo: Arc<dyn UserRepository>,
        storage: DiskStorage,
    ) -> Self {
        GalleryHandler {
            image_repo,
            user_repo,
            storage,
        }
    }

    pub async fn upload(&self, user_id: i64, file: TempFile) -> Result<ImageRecord, ApiError> {
        if file.size == 0 {
            return Err(ApiError::EmptyFile);
        }

        // The multipart layer enforces the same cap while streaming; this
        // covers any path that hands a file in directly.
        if file.size > MAX_UPLOAD_BYTES {
            return Err(ApiError::FileTooLarge);
        }

        let mimetype = file
            .content_type
            .as_ref()
            .map(|m| m.essence_str().to_ascii_lowercase())
            .ok_or_else(|| ApiError::InvalidFileType("unknown".to_string()))?;

        if !ALLOWED_IMAGE_TYPES.contains(&mimetype.as_str()) {
            return Err(ApiError::InvalidFileType(mimetype));
        }

        // Content sniffing catches non-image payloads hiding behind an
        // allowed declared type.
        if let Ok(Some(kind)) = infer::get_from_path(file.file.path()) {
            if !ALLOWED_IMAGE_TYPES.contains(&kind.mime_type()) {
                return Err(ApiError::InvalidFileType(kind.mime_type().to_string()));
            }
        }

        let original_name = file
            .file_name
            .clone()
            .unwrap_or_else(|| "upload".to_string());
        let filename = DiskStorage::unique_name(&original_name);

        self.storage
            .store(file.file.path(), &filename)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to store uploaded file: {}", e)))?;

        let record = NewImageRecord {
            user_id,
            filename: filename.clone(),
            original_name,
            size: file.size as i64,
            mimetype,
            path: format!("/uploads/{filename}"),
        };

        let id = match self.image_repo.insert(&record).await {
            Ok(id) => id,
            Err(e) => {
                // The blob was written but has no metadata row; remove it so
                // it does not dangle. Cleanup failure is only logged.
                if let Err(cleanup) = self.storage.remove(&filename).await {
                    tracing::error!(
                        user_id,
                        %filename,
                        error = %cleanup,
                        "failed to delete file after DB insert error"
                    );
                }
                return Err(e);
            }
        };

        if let Err(e) = self.user_repo.increment_image_count(user_id).await {
            tracing::warn!(user_id, %filename, error = %e, "image count update failed");
        }

        tracing::info!(user_id, %filename, size = record.size, "image uploaded");
        Ok(ImageRecord {
            id,
            user_id: record.user_id,
            filename: record.filename,
            original_name: record.original_name,
            size: record.size,
            mimetype: record.mimetype,
            path: record.path,
            created_at: Utc::now(),
        })
    }

    pub async fn list(&self, user_id: i64) -> Result<Vec<ImageRecord>, ApiError> {
        self.image_repo.list_for_user(user_id).await
    }

    pub async fn delete(&self, user_id: i64, filename: &str) -> Result<(), ApiError> {
        let filename = filename.trim();
        if filename.is_empty() {
            return Err(ApiError::MissingFilename);
        }
        if !DiskStorage::is_safe_filename(filename) {
            return Err(ApiError::InvalidFilename);
        }

        if !self.storage.exists(filename) {
            return Err(ApiError::FileNotFound);
        }

        self.storage
            .remove(filename)
            .await
            .map_err(|e| ApiError::FileDelete(e.to_string()))?;

        // A DB failure past this point leaves the row without its blob; it
        // is surfaced as an error without restoring the file.
        self.image_repo.delete(user_id, filename).await?;

        if let Err(e) = self.user_repo.decrement_image_count(user_id).await {
            tracing::warn!(user_id, %filename, error = %e, "image count update failed");
        }

        tracing::info!(user_id, %filename, "image deleted");
        Ok(())
    }
}
