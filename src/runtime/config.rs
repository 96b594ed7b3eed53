use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Evaluator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Deepest allowed nesting of node evaluations
    pub max_depth: usize,
    /// Fractional digits when printing doubles
    pub float_precision: usize,
    /// Seed for `rand`; entropy when unset
    pub rand_seed: Option<u64>,
    /// Text written before each `read`
    pub read_prompt: String,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            max_depth: 256,
            float_precision: 6,
            rand_seed: None,
            read_prompt: "read := ".to_string(),
        }
    }
}

impl EvalConfig {
    /// Parses a JSON document; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Same settings with a fixed `rand` seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rand_seed = Some(seed);
        self
    }

    /// Same settings with a different depth limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EvalConfig::default();
        assert_eq!(config.read_prompt, "read := ");
        assert_eq!(config.float_precision, 6);
        assert_eq!(config.rand_seed, None);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EvalConfig::from_json(r#"{"max_depth": 32, "rand_seed": 9}"#).unwrap();
        assert_eq!(config.max_depth, 32);
        assert_eq!(config.rand_seed, Some(9));
        assert_eq!(config.float_precision, 6);
    }

    #[test]
    fn test_bad_json() {
        let err = EvalConfig::from_json(r#"{"max_depth": "deep"}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
