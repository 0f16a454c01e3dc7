use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use thiserror::Error;

use crate::{ErrorKind, MetadataRecord, UploadError};

/// Step of the submission sequence a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validation,
    AudioUpload,
    ImageUpload,
    MetadataInsert,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Validation => "validation",
            Stage::AudioUpload => "audio_upload",
            Stage::ImageUpload => "image_upload",
            Stage::MetadataInsert => "metadata_insert",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single result of one `submit` call.
///
/// A failure never implies anything was committed: the metadata record is
/// only written in the success path.
#[derive(Debug)]
pub enum UploadOutcome {
    Success { record: MetadataRecord },
    Failure { stage: Stage, reason: UploadError },
}

/// Owned failure half of an outcome, usable with `?`
#[derive(Error, Debug)]
#[error("{stage} failed: {reason}")]
pub struct UploadFailure {
    pub stage: Stage,
    #[source]
    pub reason: UploadError,
}

impl UploadOutcome {
    pub fn failure<E: Into<UploadError>>(stage: Stage, reason: E) -> Self {
        Self::Failure {
            stage,
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn record(&self) -> Option<&MetadataRecord> {
        match self {
            Self::Success { record } => Some(record),
            Self::Failure { .. } => None,
        }
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { stage, .. } => Some(*stage),
        }
    }

    pub fn reason(&self) -> Option<&UploadError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { reason, .. } => Some(reason),
        }
    }

    /// Text a caller can show the end user
    pub fn message(&self) -> String {
        match self {
            Self::Success { record } => format!("Uploaded '{}'", record.title),
            Self::Failure { reason, .. } => reason.to_string(),
        }
    }

    /// Whether the caller should clear its input state
    pub fn should_reset_form(&self) -> bool {
        self.is_success()
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.reason().map(UploadError::kind)
    }

    /// 201 on success, the failure's status code otherwise
    pub fn status_code(&self) -> u16 {
        self.kind().map_or(201, |k| k.status_code())
    }

    pub fn into_result(self) -> Result<MetadataRecord, UploadFailure> {
        match self {
            Self::Success { record } => Ok(record),
            Self::Failure { stage, reason } => Err(UploadFailure { stage, reason }),
        }
    }

    /// JSON body for transports: the record, or a name/message/code/className
    /// error with the failing stage (and field, for validation) under `data`
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Success { record } => json!({ "record": record }),
            Self::Failure { stage, reason } => {
                let kind = reason.kind();
                let mut data = json!({ "stage": stage });
                if let Some(validation) = reason.as_validation() {
                    data["field"] = json!(validation.field());
                }
                json!({
                    "name": kind.name(),
                    "message": reason.to_string(),
                    "code": kind.status_code(),
                    "className": kind.class_name(),
                    "data": data,
                })
            }
        }
    }
}
