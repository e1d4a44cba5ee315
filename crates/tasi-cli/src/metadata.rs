use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use tasi_core::{DataOrigin, EnvelopeMeta, ValidationError};
use uuid::Uuid;

/// Request identifier (UUID v4), one per rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Page metadata collected while a handler runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub request_id: RequestId,
    pub source_chain: Vec<DataOrigin>,
    pub latency_ms: u64,
    pub cache_hit: bool,
    pub warnings: Vec<String>,
}

impl Metadata {
    pub fn new(source_chain: Vec<DataOrigin>, latency_ms: u64, cache_hit: bool) -> Self {
        Self {
            request_id: RequestId::new_v4(),
            source_chain,
            latency_ms,
            cache_hit,
            warnings: Vec::new(),
        }
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn into_envelope_meta(self) -> Result<EnvelopeMeta, ValidationError> {
        let mut meta = EnvelopeMeta::new(
            self.request_id.to_string(),
            self.source_chain,
            self.latency_ms,
            self.cache_hit,
        )?;

        for warning in self.warnings {
            meta.push_warning(warning);
        }

        Ok(meta)
    }
}
