use serde::{Deserialize, Serialize};

use crate::{ApiError, UtcDateTime, ValidationError};

/// Schema version stamped on every envelope.
pub const SCHEMA_VERSION: &str = "v1.0.0";

/// Where a page's data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataOrigin {
    Sahmk,
    Dataset,
}

/// Standard response envelope for every `tasi` page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub meta: EnvelopeMeta,
    pub data: T,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<EnvelopeError>,
}

impl<T> Envelope<T> {
    pub fn success(meta: EnvelopeMeta, data: T) -> Self {
        Self {
            meta,
            data,
            errors: Vec::new(),
        }
    }

    pub fn with_errors(
        meta: EnvelopeMeta,
        data: T,
        errors: Vec<EnvelopeError>,
    ) -> Result<Self, ValidationError> {
        meta.validate()?;
        for error in &errors {
            error.validate()?;
        }

        Ok(Self { meta, data, errors })
    }

    pub fn push_error(&mut self, error: EnvelopeError) -> Result<(), ValidationError> {
        error.validate()?;
        self.errors.push(error);
        Ok(())
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            meta: self.meta,
            data: f(self.data),
            errors: self.errors,
        }
    }
}

/// Metadata attached to every envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeMeta {
    pub request_id: String,
    pub schema_version: String,
    pub generated_at: UtcDateTime,
    pub source_chain: Vec<DataOrigin>,
    pub latency_ms: u64,
    pub cache_hit: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl EnvelopeMeta {
    pub fn new(
        request_id: impl Into<String>,
        source_chain: Vec<DataOrigin>,
        latency_ms: u64,
        cache_hit: bool,
    ) -> Result<Self, ValidationError> {
        let meta = Self {
            request_id: request_id.into(),
            schema_version: String::from(SCHEMA_VERSION),
            generated_at: UtcDateTime::now(),
            source_chain,
            latency_ms,
            cache_hit,
            warnings: Vec::new(),
        };
        meta.validate()?;
        Ok(meta)
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.request_id.trim().len() < 8 {
            return Err(ValidationError::InvalidRequestId);
        }

        if !is_valid_schema_version(&self.schema_version) {
            return Err(ValidationError::InvalidSchemaVersion {
                value: self.schema_version.clone(),
            });
        }

        Ok(())
    }
}

/// Structured error payload for sections that could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<DataOrigin>,
}

impl EnvelopeError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Result<Self, ValidationError> {
        let error = Self {
            code: code.into(),
            message: message.into(),
            retryable: None,
            source: None,
        };
        error.validate()?;
        Ok(error)
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = Some(retryable);
        self
    }

    pub fn with_source(mut self, source: DataOrigin) -> Self {
        self.source = Some(source);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.code.trim().is_empty() {
            return Err(ValidationError::EmptyErrorCode);
        }

        if self.message.trim().is_empty() {
            return Err(ValidationError::EmptyErrorMessage);
        }

        Ok(())
    }
}

impl From<&ApiError> for EnvelopeError {
    fn from(error: &ApiError) -> Self {
        let retryable = match error {
            ApiError::Transport { .. } => true,
            ApiError::Status { status, .. } => *status == 429 || *status >= 500,
            ApiError::Decode { .. } => false,
        };

        Self {
            code: error.code().to_owned(),
            message: error.to_string(),
            retryable: Some(retryable),
            source: Some(DataOrigin::Sahmk),
        }
    }
}

fn is_valid_schema_version(value: &str) -> bool {
    let Some(version) = value.strip_prefix('v') else {
        return false;
    };

    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|ch| ch.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_request_id() {
        let error = EnvelopeMeta::new("abc", vec![DataOrigin::Sahmk], 0, false).expect_err("short id");
        assert_eq!(error, ValidationError::InvalidRequestId);
    }

    #[test]
    fn schema_version_shape() {
        assert!(is_valid_schema_version("v1.0.0"));
        assert!(!is_valid_schema_version("1.0.0"));
        assert!(!is_valid_schema_version("v1.0"));
        assert!(!is_valid_schema_version("v1.x.0"));
    }

    #[test]
    fn api_errors_become_envelope_errors() {
        let timeout = ApiError::Transport {
            endpoint: String::from("/market/summary/"),
            message: String::from("deadline"),
            timeout: true,
        };
        let missing = ApiError::Status {
            endpoint: String::from("/quote/9999/"),
            status: 404,
        };

        let timeout = EnvelopeError::from(&timeout);
        assert_eq!(timeout.code, "api.timeout");
        assert_eq!(timeout.retryable, Some(true));
        assert_eq!(timeout.source, Some(DataOrigin::Sahmk));

        assert_eq!(EnvelopeError::from(&missing).retryable, Some(false));
    }

    #[test]
    fn envelope_omits_empty_errors() {
        let meta = EnvelopeMeta::new("12345678-req", vec![DataOrigin::Dataset], 3, true).expect("meta");
        let envelope = Envelope::success(meta, serde_json::json!({ "rows": 0 }));

        let value = serde_json::to_value(&envelope).expect("serialize");
        assert!(value.get("errors").is_none());
        assert_eq!(value["meta"]["source_chain"][0], "dataset");
    }

    #[test]
    fn push_error_validates() {
        let meta = EnvelopeMeta::new("12345678-req", vec![DataOrigin::Sahmk], 0, false).expect("meta");
        let mut envelope = Envelope::success(meta, ());
        let blank = EnvelopeError {
            code: String::from(" "),
            message: String::from("x"),
            retryable: None,
            source: None,
        };

        assert_eq!(envelope.push_error(blank), Err(ValidationError::EmptyErrorCode));
        assert!(envelope.errors.is_empty());
    }
}
