/// Configuration shared by blob stores
#[derive(Debug, Clone)]
pub struct BlobConfig {
    /// Absolute max size allowed for a single blob (safety guard)
    pub max_blob_bytes: u64,

    /// `Cache-Control: max-age` hint for stores that honour it
    pub cache_control_secs: u64,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            max_blob_bytes: 50 * 1024 * 1024, // 50MB
            cache_control_secs: 3600,
        }
    }
}

impl BlobConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max blob size
    pub fn with_max_blob_bytes(mut self, bytes: u64) -> Self {
        self.max_blob_bytes = bytes;
        self
    }

    /// Set cache-control max age
    pub fn with_cache_control_secs(mut self, secs: u64) -> Self {
        self.cache_control_secs = secs;
        self
    }

    pub fn cache_control_header(&self) -> String {
        format!("max-age={}", self.cache_control_secs)
    }
}
