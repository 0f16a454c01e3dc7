//! # Configuration
//!
//! A flat string key/value store with a typed snapshot, in the
//! `set()` / `get()` style. Environment variables map onto keys by prefix:
//!
//! ```bash
//! export SONGDROP__AUDIO__ALLOWED_TYPES="audio/mpeg,audio/flac"
//! export SONGDROP__BLOB__MAX_BYTES=104857600
//! ```
//!
//! becomes `audio.allowed_types` and `blob.max_bytes`.
//!
//! | key | default |
//! |-----|---------|
//! | `audio.allowed_types` | common audio MIME types |
//! | `image.allowed_types` | jpeg, png, webp, gif |
//! | `blob.max_bytes` | 50MB |
//! | `blob.cache_control_secs` | 3600 |
//! | `log.format` | `SONGDROP_LOG_FORMAT`, else pretty |

use std::collections::HashMap;

use songdrop_blob::BlobConfig;

use crate::telemetry::LogFormat;
use crate::validate::{AllowList, DEFAULT_AUDIO_TYPES, DEFAULT_IMAGE_TYPES};
use crate::Validator;

pub const DEFAULT_ENV_PREFIX: &str = "SONGDROP__";

pub const AUDIO_ALLOWED_TYPES: &str = "audio.allowed_types";
pub const IMAGE_ALLOWED_TYPES: &str = "image.allowed_types";
pub const BLOB_MAX_BYTES: &str = "blob.max_bytes";
pub const BLOB_CACHE_CONTROL_SECS: &str = "blob.cache_control_secs";
pub const LOG_FORMAT: &str = "log.format";

#[derive(Debug, Clone, Default)]
pub struct UploadConfig {
    values: HashMap<String, String>,
}

impl UploadConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `{prefix}A__B=v` variable as key `a.b`
    pub fn from_env(prefix: &str) -> Self {
        Self::from_vars(std::env::vars(), prefix)
    }

    pub fn from_vars<I>(vars: I, prefix: &str) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut config = Self::new();
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(prefix) {
                config.set(stripped.to_lowercase().replace("__", "."), value);
            }
        }
        config
    }

    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn snapshot(&self) -> UploadConfigSnapshot {
        UploadConfigSnapshot {
            map: self.values.clone(),
        }
    }

    pub fn validator(&self) -> Validator {
        let snap = self.snapshot();
        let audio = snap
            .get_list(AUDIO_ALLOWED_TYPES)
            .map(AllowList::new)
            .unwrap_or_else(|| AllowList::new(DEFAULT_AUDIO_TYPES));
        let image = snap
            .get_list(IMAGE_ALLOWED_TYPES)
            .map(AllowList::new)
            .unwrap_or_else(|| AllowList::new(DEFAULT_IMAGE_TYPES));

        Validator::new()
            .with_audio_types(audio)
            .with_image_types(image)
            .with_max_blob_bytes(self.blob_config().max_blob_bytes)
    }

    pub fn blob_config(&self) -> BlobConfig {
        let snap = self.snapshot();
        let mut config = BlobConfig::default();
        if let Some(max) = snap.get_u64(BLOB_MAX_BYTES) {
            config = config.with_max_blob_bytes(max);
        }
        if let Some(secs) = snap.get_u64(BLOB_CACHE_CONTROL_SECS) {
            config = config.with_cache_control_secs(secs);
        }
        config
    }

    pub fn log_format(&self) -> LogFormat {
        self.snapshot()
            .get_string(LOG_FORMAT)
            .map(|name| LogFormat::from_name(&name))
            .unwrap_or_else(LogFormat::from_env)
    }
}

#[derive(Debug, Clone, Default)]
pub struct UploadConfigSnapshot {
    map: HashMap<String, String>,
}

impl UploadConfigSnapshot {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.trim().parse::<u64>().ok())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.trim().parse::<bool>().ok())
    }

    /// Comma-separated list; `None` if absent or empty
    pub fn get_list(&self, key: &str) -> Option<Vec<String>> {
        let items: Vec<String> = self
            .get(key)?
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        (!items.is_empty()).then_some(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use songdrop_blob::BlobPayload;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_env_keys_are_normalized() {
        let config = UploadConfig::from_vars(
            vars(&[
                ("SONGDROP__BLOB__MAX_BYTES", "1024"),
                ("SONGDROP__AUDIO__ALLOWED_TYPES", "audio/flac, audio/ogg"),
                ("OTHER__BLOB__MAX_BYTES", "1"),
            ]),
            DEFAULT_ENV_PREFIX,
        );

        assert_eq!(config.get(BLOB_MAX_BYTES), Some("1024"));
        assert!(config.has(AUDIO_ALLOWED_TYPES));
        assert_eq!(
            config.snapshot().get_list(AUDIO_ALLOWED_TYPES),
            Some(vec!["audio/flac".to_string(), "audio/ogg".to_string()])
        );
        assert_eq!(config.blob_config().max_blob_bytes, 1024);
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = UploadConfig::new();
        let blob = config.blob_config();
        assert_eq!(blob.cache_control_secs, 3600);
        assert_eq!(blob.max_blob_bytes, BlobConfig::default().max_blob_bytes);
        assert_eq!(config.snapshot().get_list(IMAGE_ALLOWED_TYPES), None);
    }

    #[test]
    fn test_validator_follows_config() {
        let mut config = UploadConfig::new();
        config.set(AUDIO_ALLOWED_TYPES, "audio/flac");
        let validator = config.validator();

        let request = crate::UploadRequest::builder()
            .owner(crate::OwnerId::new("u1"))
            .title("A")
            .author("B")
            .audio(BlobPayload::new(&b"ID3"[..], "audio/mpeg"))
            .image(BlobPayload::new(&b"png"[..], "image/png"))
            .build();
        assert!(validator.validate(&request).is_err());
    }

    #[test]
    fn test_log_format_key() {
        let config = UploadConfig::from_vars(vars(&[("SONGDROP__LOG__FORMAT", "json")]), DEFAULT_ENV_PREFIX);
        assert_eq!(config.snapshot().get_string(LOG_FORMAT), Some("json".to_string()));
        assert_eq!(config.log_format(), LogFormat::Json);

        let mut config = UploadConfig::new();
        config.set(LOG_FORMAT, "pretty");
        assert_eq!(config.log_format(), LogFormat::Pretty);
    }

    #[test]
    fn test_blank_list_falls_back() {
        let mut config = UploadConfig::new();
        config.set(IMAGE_ALLOWED_TYPES, " , ");
        assert_eq!(config.snapshot().get_list(IMAGE_ALLOWED_TYPES), None);
        assert_eq!(config.snapshot().get_bool("missing"), None);
    }
}
