use crate::core::report::ScoreWeights;
use crate::utils::error::{ImagelynError, Result};
use crate::utils::logger::LOG_LEVELS;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const LOG_FORMATS: [&str; 2] = ["compact", "json"];
pub const REPORT_FORMATS: [&str; 2] = ["text", "json"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub session: SessionConfig,
    pub scoring: Option<ScoringConfig>,
    pub logging: Option<LoggingConfig>,
    pub report: Option<ReportConfig>,
    pub clients: Option<Vec<ClientConfig>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub positive_weight: Option<u32>,
    pub negative_weight: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub format: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub name: String,
    #[serde(default)]
    pub preferences: Vec<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${DATA_DIR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ImagelynError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn weights(&self) -> ScoreWeights {
        let defaults = ScoreWeights::default();
        match &self.scoring {
            Some(scoring) => ScoreWeights {
                positive: scoring.positive_weight.unwrap_or(defaults.positive),
                negative: scoring.negative_weight.unwrap_or(defaults.negative),
            },
            None => defaults,
        }
    }

    pub fn log_format(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .unwrap_or("compact")
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or("info")
    }

    pub fn report_format(&self) -> &str {
        self.report
            .as_ref()
            .and_then(|r| r.format.as_deref())
            .unwrap_or("text")
    }

    pub fn report_location(&self) -> Option<&str> {
        self.report.as_ref().and_then(|r| r.location.as_deref())
    }

    pub fn clients(&self) -> &[ClientConfig] {
        self.clients.as_deref().unwrap_or(&[])
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_list("session.files", &self.session.files)?;
        for file in &self.session.files {
            validation::validate_path("session.files", file)?;
        }

        validation::validate_one_of("logging.format", self.log_format(), &LOG_FORMATS)?;
        validation::validate_one_of("logging.level", self.log_level(), &LOG_LEVELS)?;
        validation::validate_one_of("report.format", self.report_format(), &REPORT_FORMATS)?;

        for client in self.clients() {
            validation::validate_non_empty_string("clients.name", &client.name)?;
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
