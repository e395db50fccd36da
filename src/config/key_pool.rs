use serde::{Deserialize, Serialize};

use crate::state::CodePool;

/// Placeholder keys used when no pool file is configured
pub const PLACEHOLDER_KEYS: [&str; 3] = [
    "XXXXX-XXXXX-XXXXX",
    "YYYYY-YYYYY-YYYYY",
    "ZZZZZ-ZZZZZ-ZZZZZ",
];

/// Steam keys available for the alpha, in issue order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyPoolConfig {
    /// Keys handed out first to last
    pub keys: Vec<String>,
}

impl Default for KeyPoolConfig {
    fn default() -> Self {
        Self {
            keys: PLACEHOLDER_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl KeyPoolConfig {
    /// Load a key pool from a JSON file
    pub fn load_from_file(path: &str) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| crate::error::SignupError::ConfigLoad {
            path: path.to_string(),
            source: e,
        })?;

        // Try parsing as KeyPoolConfig first
        if let Ok(config) = serde_json::from_str::<KeyPoolConfig>(&content) {
            return Ok(config);
        }

        // Fall back to a bare array of keys
        let keys: Vec<String> = serde_json::from_str(&content).map_err(|e| {
            crate::error::SignupError::ConfigParse {
                path: path.to_string(),
                source: e,
            }
        })?;

        Ok(KeyPoolConfig { keys })
    }

    /// Build the runtime pool, validating the keys
    pub fn into_pool(self) -> crate::error::Result<CodePool> {
        CodePool::new(self.keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SignupError;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_object_format() {
        let file = write_temp(r#"{"keys": ["A1", "B2", "C3"]}"#);
        let config = KeyPoolConfig::load_from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.keys, vec!["A1", "B2", "C3"]);
    }

    #[test]
    fn test_parse_array_format() {
        let file = write_temp(r#"["A1", "B2"]"#);
        let config = KeyPoolConfig::load_from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.keys.len(), 2);
        assert_eq!(config.into_pool().unwrap().remaining(), 2);
    }

    #[test]
    fn test_missing_file() {
        let result = KeyPoolConfig::load_from_file("does/not/exist.json");
        assert!(matches!(result, Err(SignupError::ConfigLoad { .. })));
    }

    #[test]
    fn test_malformed_file() {
        let file = write_temp("{not json");
        let result = KeyPoolConfig::load_from_file(file.path().to_str().unwrap());
        assert!(matches!(result, Err(SignupError::ConfigParse { .. })));
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let config = KeyPoolConfig {
            keys: vec!["A1".to_string(), "A1".to_string()],
        };
        assert!(matches!(
            config.into_pool(),
            Err(SignupError::ConfigValidation { .. })
        ));
    }

    #[test]
    fn test_default_is_placeholder_pool() {
        let pool = KeyPoolConfig::default().into_pool().unwrap();
        assert_eq!(pool.remaining(), PLACEHOLDER_KEYS.len());
    }
}
