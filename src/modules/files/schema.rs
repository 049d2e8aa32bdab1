use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::model::{HostedFile, HostedFileMeta};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub size: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<HostedFile> for FileResponse {
    fn from(file: HostedFile) -> Self {
        Self {
            id: file.id,
            name: file.name,
            mime_type: file.mime_type,
            size: file.size_bytes,
            data_url: Some(file.data_url),
            created_at: file.created_at,
        }
    }
}

impl From<HostedFileMeta> for FileResponse {
    fn from(meta: HostedFileMeta) -> Self {
        Self {
            id: meta.id,
            name: meta.name,
            mime_type: meta.mime_type,
            size: meta.size_bytes,
            data_url: None,
            created_at: meta.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UploadFileRequest {
    #[validate(length(min = 1, max = 255, message = "File name is required"))]
    pub name: String,
    pub data_url: String,
}
