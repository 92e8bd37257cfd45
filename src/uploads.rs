// ABOUTME: Multipart form extraction and on-disk storage for uploaded and generated files
// ABOUTME: Separates text fields from file parts and names stored files with a prefix and UUID
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Uploads
//!
//! Every form endpoint accepts `multipart/form-data`. [`MultipartForm`] is an
//! axum extractor that drains the body into text fields and file parts and
//! converts every failure into an [`AppError`], so handlers receive the
//! standard error envelope instead of axum's plain-text rejections.
//!
//! [`UploadStore`] writes files beneath the configured uploads directory.
//! Uploaded files get unique names (`<prefix>_<uuid>.<ext>`); generated
//! documents use fixed per-bid names so they can be replaced and deleted.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use axum::async_trait;
use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::StatusCode;
use bytes::Bytes;
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::{AppError, AppResult, ErrorCode};

/// Extension used when an uploaded file name carries none
const DEFAULT_EXTENSION: &str = "png";

/// One file part of a multipart form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied file name
    pub file_name: Option<String>,
    /// Declared content type
    pub content_type: Option<String>,
    /// File contents
    pub bytes: Bytes,
}

impl UploadedFile {
    /// Lowercase extension from the client file name, `png` when absent
    #[must_use]
    pub fn extension(&self) -> String {
        self.file_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map_or_else(|| DEFAULT_EXTENSION.to_owned(), str::to_ascii_lowercase)
    }
}

/// A drained multipart form
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, Vec<UploadedFile>>,
}

fn multipart_error(error: &MultipartError) -> AppError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::new(ErrorCode::PayloadTooLarge, error.body_text())
    } else {
        AppError::invalid_input(error.body_text())
    }
}

#[async_trait]
impl<S> FromRequest<S> for MultipartForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| AppError::invalid_input(rejection.body_text()))?;

        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(&e))?
        {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if field.file_name().is_some() {
                let file_name = field.file_name().map(str::to_owned);
                let content_type = field.content_type().map(str::to_owned);
                let bytes = field.bytes().await.map_err(|e| multipart_error(&e))?;
                // Browsers send an empty part for an untouched optional file input
                if bytes.is_empty() {
                    continue;
                }
                form.files.entry(name).or_default().push(UploadedFile {
                    file_name,
                    content_type,
                    bytes,
                });
            } else {
                let value = field.text().await.map_err(|e| multipart_error(&e))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }
}

impl MultipartForm {
    /// Build a form directly, mainly for tests
    #[must_use]
    pub fn from_parts(
        fields: HashMap<String, String>,
        files: HashMap<String, Vec<UploadedFile>>,
    ) -> Self {
        Self { fields, files }
    }

    /// Non-empty trimmed text value
    #[must_use]
    pub fn optional(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Text value that must be present and non-empty
    ///
    /// # Errors
    ///
    /// Returns `MISSING_REQUIRED_FIELD` when the field is absent or blank
    pub fn required(&self, name: &str) -> AppResult<&str> {
        self.optional(name).ok_or_else(|| AppError::missing_field(name))
    }

    /// Parse a required field
    ///
    /// # Errors
    ///
    /// Returns `MISSING_REQUIRED_FIELD` when absent, `INVALID_FORMAT` when unparsable
    pub fn parse_required<T: FromStr>(&self, name: &str) -> AppResult<T> {
        let raw = self.required(name)?;
        raw.parse()
            .map_err(|_| AppError::invalid_format(name, format!("could not parse '{raw}'")))
    }

    /// Parse an optional field
    ///
    /// # Errors
    ///
    /// Returns `INVALID_FORMAT` when present but unparsable
    pub fn parse_optional<T: FromStr>(&self, name: &str) -> AppResult<Option<T>> {
        self.optional(name)
            .map(|raw| {
                raw.parse()
                    .map_err(|_| AppError::invalid_format(name, format!("could not parse '{raw}'")))
            })
            .transpose()
    }

    /// Checkbox-style boolean; absent means false
    ///
    /// # Errors
    ///
    /// Returns `INVALID_FORMAT` for values other than true/false/1/0/on/off/yes/no
    pub fn flag(&self, name: &str) -> AppResult<bool> {
        match self.optional(name).map(str::to_ascii_lowercase).as_deref() {
            None | Some("false" | "0" | "off" | "no") => Ok(false),
            Some("true" | "1" | "on" | "yes") => Ok(true),
            Some(other) => Err(AppError::invalid_format(
                name,
                format!("'{other}' is not a boolean"),
            )),
        }
    }

    /// First file uploaded under `name`
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name).and_then(|files| files.first())
    }

    /// All files uploaded under `name`
    #[must_use]
    pub fn files(&self, name: &str) -> &[UploadedFile] {
        self.files.get(name).map_or(&[], Vec::as_slice)
    }
}

/// Filesystem storage rooted at the uploads directory
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    /// Create a store rooted at `root`; the directory is created lazily
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root directory if needed
    ///
    /// # Errors
    ///
    /// Returns `STORAGE_ERROR` when the directory cannot be created
    pub async fn ensure_dir(&self) -> AppResult<()> {
        fs::create_dir_all(&self.root).await.map_err(|e| {
            AppError::storage(format!(
                "Failed to create uploads directory {}: {e}",
                self.root.display()
            ))
        })
    }

    /// Store an uploaded file as `<prefix>_<uuid>.<ext>` and return its path
    ///
    /// # Errors
    ///
    /// Returns `STORAGE_ERROR` when the file cannot be written
    pub async fn save_upload(&self, prefix: &str, file: &UploadedFile) -> AppResult<String> {
        let name = format!("{prefix}_{}.{}", Uuid::new_v4(), file.extension());
        self.write_named(&name, &file.bytes).await
    }

    /// Store every file and return their paths in order
    ///
    /// # Errors
    ///
    /// Returns `STORAGE_ERROR` when any file cannot be written
    pub async fn save_uploads(&self, prefix: &str, files: &[UploadedFile]) -> AppResult<Vec<String>> {
        let mut paths = Vec::with_capacity(files.len());
        for file in files {
            paths.push(self.save_upload(prefix, file).await?);
        }
        Ok(paths)
    }

    /// Write bytes under a fixed file name, replacing any previous file
    ///
    /// # Errors
    ///
    /// Returns `STORAGE_ERROR` when the file cannot be written
    pub async fn write_named(&self, name: &str, bytes: &[u8]) -> AppResult<String> {
        self.ensure_dir().await?;
        let path = self.root.join(name);
        fs::write(&path, bytes).await.map_err(|e| {
            AppError::storage(format!("Failed to write {}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), size = bytes.len(), "Stored file");
        Ok(path.to_string_lossy().into_owned())
    }

    /// Remove a fixed-name file; returns whether it existed
    ///
    /// # Errors
    ///
    /// Returns `STORAGE_ERROR` for failures other than the file being absent
    pub async fn remove_named(&self, name: &str) -> AppResult<bool> {
        let path = self.root.join(name);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to remove stored file");
                Err(AppError::storage(format!(
                    "Failed to remove {}: {e}",
                    path.display()
                )))
            }
        }
    }

    /// Path of a fixed-name file
    #[must_use]
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

/// File name of a bid's stored estimate PDF
#[must_use]
pub fn estimate_file_name(bid_id: &str) -> String {
    format!("estimate_{bid_id}.pdf")
}

/// File name of a bid's stored contract PDF
#[must_use]
pub fn contract_file_name(bid_id: &str) -> String {
    format!("contract_{bid_id}.pdf")
}

/// File name of a bid's stored signature image
#[must_use]
pub fn signature_file_name(bid_id: &str) -> String {
    format!("signed_{bid_id}.png")
}
