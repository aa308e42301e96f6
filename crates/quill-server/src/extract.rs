//! Request body extraction shared by every write endpoint.
//!
//! Clients may send `multipart/form-data` (the only encoding that can carry
//! the image), JSON objects, or urlencoded forms. All three are flattened
//! into a map of string fields.

use std::collections::HashMap;

use async_trait::async_trait;
use axum::{
    Form, Json,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Multipart, Path, Request},
    http::{header, request::Parts},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Multipart field carrying the uploaded image
pub const FILE_FIELD: &str = "image";

/// File part of a multipart request
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

/// Text fields plus at most one uploaded file
#[derive(Debug, Default)]
pub struct Submission {
    pub fields: Map<String, Value>,
    pub file: Option<UploadedFile>,
}

impl Submission {
    /// Deserialize the text fields into `T`
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_value(Value::Object(self.fields.clone()))
            .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut submission = Submission::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            ApiError::BadRequest(format!("Failed to parse multipart data: {}", e))
        })? {
            let name = field.name().unwrap_or("").to_string();
            let file_name = field.file_name().map(str::to_string);

            if file_name.is_none() {
                let value = field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("Failed to read field '{}': {}", name, e))
                })?;
                submission.fields.insert(name, Value::String(value));
                continue;
            }

            let bytes = field.bytes().await.map_err(|e| {
                ApiError::BadRequest(format!("Failed to read file '{}': {}", name, e))
            })?;

            // Browsers send an empty, unnamed part when no file was picked
            let picked = !bytes.is_empty() || file_name.as_deref().is_some_and(|n| !n.is_empty());

            if name == FILE_FIELD && picked && submission.file.is_none() {
                tracing::debug!(file_name = ?file_name, size_bytes = bytes.len(), "Received upload");
                submission.file = Some(UploadedFile { file_name, bytes });
            } else if picked {
                tracing::debug!(field = %name, "Ignoring extra file part");
            }
        }

        Ok(submission)
    }

    fn from_json(value: Value) -> Result<Self, ApiError> {
        let Value::Object(object) = value else {
            return Err(ApiError::BadRequest(
                "Request body must be a JSON object".to_string(),
            ));
        };

        let fields = object
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::Null => None,
                Value::String(s) => Some((key, Value::String(s))),
                other => Some((key, Value::String(other.to_string()))),
            })
            .collect();

        Ok(Self {
            fields,
            file: None,
        })
    }

    fn from_form(form: HashMap<String, String>) -> Self {
        Self {
            fields: form
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect(),
            file: None,
        }
    }
}

#[async_trait]
impl<S> FromRequest<S> for Submission
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            Self::from_multipart(multipart).await
        } else if content_type.starts_with("application/json") {
            let Json(value) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            Self::from_json(value)
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(form) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            Ok(Self::from_form(form))
        } else {
            Ok(Self::default())
        }
    }
}

/// Numeric `:id` path segment. Anything that is not an `i64` is a 400 with
/// the usual JSON error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostId(pub i64);

impl PostId {
    fn parse(raw: &str) -> Result<Self, ApiError> {
        raw.parse()
            .map(PostId)
            .map_err(|_| ApiError::BadRequest(format!("Invalid post id: {raw}")))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for PostId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        Self::parse(&raw)
    }
}
