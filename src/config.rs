use std::path::PathBuf;

use anyhow::anyhow;
use tracing::error;

use crate::service::flow::KeywordPrecedence;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MODEL_PATH: &str = "skin_classifier.onnx";
const DEFAULT_API_BASE_URL: &str = "https://api.line.me";
const DEFAULT_DATA_API_BASE_URL: &str = "https://api-data.line.me";

/// Process configuration, read once at startup.
///
/// Holds secrets, so it deliberately has no `Debug` impl.
#[derive(Clone)]
pub struct AppConfig {
    pub channel_access_token: Option<String>,
    pub channel_secret: Option<String>,
    pub model_path: PathBuf,
    pub database_url: Option<String>,
    pub port: u16,
    pub api_base_url: String,
    pub data_api_base_url: String,
    pub precedence: KeywordPrecedence,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let precedence = match get("SYMPTOM_KEYWORD_PRECEDENCE") {
            Some(raw) => raw
                .parse::<KeywordPrecedence>()
                .map_err(|e| anyhow!("SYMPTOM_KEYWORD_PRECEDENCE: {e}"))?,
            None => KeywordPrecedence::default(),
        };

        Ok(Self {
            channel_access_token: get("LINE_CHANNEL_ACCESS_TOKEN"),
            channel_secret: get("LINE_CHANNEL_SECRET"),
            model_path: get("MODEL_PATH").unwrap_or_else(|| DEFAULT_MODEL_PATH.to_string()).into(),
            database_url: get("DATABASE_URL"),
            port: get("PORT").and_then(|p| p.parse().ok()).unwrap_or(DEFAULT_PORT),
            api_base_url: get("LINE_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            data_api_base_url: get("LINE_DATA_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_DATA_API_BASE_URL.to_string()),
            precedence,
        })
    }

    /// Missing secrets degrade the service rather than stop it.
    pub fn log_missing_secrets(&self) {
        if self.channel_access_token.is_none() {
            error!("CRITICAL: LINE_CHANNEL_ACCESS_TOKEN is not set; replies and image downloads will fail");
        }
        if self.channel_secret.is_none() {
            error!("CRITICAL: LINE_CHANNEL_SECRET is not set; every webhook will be rejected");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let env: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = config(&[]).unwrap();
        assert!(cfg.channel_access_token.is_none());
        assert!(cfg.channel_secret.is_none());
        assert!(cfg.database_url.is_none());
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.model_path, PathBuf::from("skin_classifier.onnx"));
        assert_eq!(cfg.api_base_url, "https://api.line.me");
        assert_eq!(cfg.data_api_base_url, "https://api-data.line.me");
        assert_eq!(cfg.precedence, KeywordPrecedence::SymptomFirst);
    }

    #[test]
    fn values_are_read_and_blank_ones_ignored() {
        let cfg = config(&[
            ("LINE_CHANNEL_ACCESS_TOKEN", "token"),
            ("LINE_CHANNEL_SECRET", "  "),
            ("PORT", "3000"),
            ("MODEL_PATH", "/models/skin.onnx"),
            ("SYMPTOM_KEYWORD_PRECEDENCE", "stage_first"),
        ])
        .unwrap();
        assert_eq!(cfg.channel_access_token.as_deref(), Some("token"));
        assert!(cfg.channel_secret.is_none());
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.model_path, PathBuf::from("/models/skin.onnx"));
        assert_eq!(cfg.precedence, KeywordPrecedence::StageFirst);
    }

    #[test]
    fn bad_port_falls_back_to_default() {
        assert_eq!(config(&[("PORT", "eighty")]).unwrap().port, 8080);
    }

    #[test]
    fn unknown_precedence_is_fatal() {
        assert!(config(&[("SYMPTOM_KEYWORD_PRECEDENCE", "random")]).is_err());
    }
}
