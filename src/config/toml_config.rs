use crate::utils::error::{NotifierError, Result};
use crate::utils::validation::{self, Validate};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str =
    "https://cdn-api.co-vin.in/api/v2/appointment/sessions/public/calendarByDistrict";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    pub district: DistrictConfig,
    #[serde(default)]
    pub source: SourceConfig,
    pub storage: StorageConfig,
    pub notification: NotificationConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistrictConfig {
    pub district_ids: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_seconds: None,
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    pub public_base_url: Option<String>,
    #[serde(default = "default_staging_dir")]
    pub staging_dir: String,
    #[serde(default = "default_true")]
    pub public_read: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub topic_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_pacing_seconds")]
    pub pacing_seconds: u64,
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            pacing_seconds: default_pacing_seconds(),
            utc_offset: default_utc_offset(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_file")]
    pub log_file: Option<String>,
    pub level: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
            level: None,
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_region() -> String {
    "ap-south-1".to_string()
}

fn default_staging_dir() -> String {
    "output".to_string()
}

fn default_true() -> bool {
    true
}

fn default_pacing_seconds() -> u64 {
    60
}

fn default_utc_offset() -> String {
    "+05:30".to_string()
}

fn default_log_file() -> Option<String> {
    Some("/tmp/vaccine-notifier.log".to_string())
}

impl NotifierConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(NotifierError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| NotifierError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SNS_TOPIC_PREFIX})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| NotifierError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn district_ids(&self) -> &[u32] {
        &self.district.district_ids
    }

    pub fn pacing_delay(&self) -> Duration {
        Duration::from_secs(self.schedule.pacing_seconds)
    }

    /// 計算「今天」所用的時區偏移
    pub fn utc_offset(&self) -> Result<FixedOffset> {
        self.schedule
            .utc_offset
            .parse::<FixedOffset>()
            .map_err(|e| NotifierError::InvalidConfigValueError {
                field: "schedule.utc_offset".to_string(),
                value: self.schedule.utc_offset.clone(),
                reason: format!("Expected an offset such as +05:30: {}", e),
            })
    }

    /// 取得公開網址前綴，未設定時使用 S3 虛擬主機網址
    pub fn public_base_url(&self) -> String {
        match &self.storage.public_base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!(
                "https://{}.s3.{}.amazonaws.com",
                self.storage.bucket, self.storage.region
            ),
        }
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.logging.log_file.as_deref().map(Path::new)
    }

    pub fn debug_logging(&self) -> bool {
        self.logging
            .level
            .as_deref()
            .map(|level| level.eq_ignore_ascii_case("debug"))
            .unwrap_or(false)
    }
}

impl Validate for NotifierConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_district_ids("district.district_ids", &self.district.district_ids)?;
        validation::validate_url("source.endpoint", &self.source.endpoint)?;
        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_range("source.timeout_seconds", timeout, 1, 300)?;
        }

        validation::validate_s3_bucket_name("storage.bucket", &self.storage.bucket)?;
        validation::validate_aws_region("storage.region", &self.storage.region)?;
        validation::validate_path("storage.staging_dir", &self.storage.staging_dir)?;
        if let Some(base) = &self.storage.public_base_url {
            validation::validate_url("storage.public_base_url", base)?;
        }

        validation::validate_non_empty_string(
            "notification.topic_prefix",
            &self.notification.topic_prefix,
        )?;
        if self.notification.topic_prefix.contains("${") {
            return Err(NotifierError::MissingConfigError {
                field: "notification.topic_prefix".to_string(),
            });
        }

        validation::validate_range("schedule.pacing_seconds", self.schedule.pacing_seconds, 0, 3600)?;
        self.utc_offset()?;

        if let Some(log_file) = &self.logging.log_file {
            validation::validate_path("logging.log_file", log_file)?;
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[district]
district_ids = [395, 392]

[storage]
bucket = "test-bucket-sathyaam"

[notification]
topic_prefix = "arn:aws:sns:ap-south-1:123456789012:vaccine-slots"
"#;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = NotifierConfig::from_toml_str(MINIMAL).unwrap();

        assert_eq!(config.district_ids(), &[395, 392]);
        assert_eq!(config.source.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.storage.region, "ap-south-1");
        assert_eq!(config.storage.staging_dir, "output");
        assert!(config.storage.public_read);
        assert_eq!(config.pacing_delay(), Duration::from_secs(60));
        assert_eq!(config.utc_offset().unwrap().local_minus_utc(), 5 * 3600 + 30 * 60);
        assert_eq!(
            config.public_base_url(),
            "https://test-bucket-sathyaam.s3.ap-south-1.amazonaws.com"
        );
        assert_eq!(
            config.log_file(),
            Some(Path::new("/tmp/vaccine-notifier.log"))
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_public_base_url_override_trims_slash() {
        let content = format!(
            "{}\n[schedule]\npacing_seconds = 0\n",
            MINIMAL.replace(
                "bucket = \"test-bucket-sathyaam\"",
                "bucket = \"test-bucket-sathyaam\"\npublic_base_url = \"https://cdn.example.com/\""
            )
        );
        let config = NotifierConfig::from_toml_str(&content).unwrap();

        assert_eq!(config.public_base_url(), "https://cdn.example.com");
        assert_eq!(config.pacing_delay(), Duration::ZERO);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("VN_TEST_BUCKET", "bucket-from-env");
        let content = MINIMAL.replace("test-bucket-sathyaam", "${VN_TEST_BUCKET}");
        let config = NotifierConfig::from_toml_str(&content).unwrap();

        assert_eq!(config.storage.bucket, "bucket-from-env");
    }

    #[test]
    fn test_unresolved_topic_prefix_fails_validation() {
        let content = MINIMAL.replace(
            "arn:aws:sns:ap-south-1:123456789012:vaccine-slots",
            "${VN_TEST_UNSET_TOPIC_PREFIX}",
        );
        let config = NotifierConfig::from_toml_str(&content).unwrap();

        assert!(matches!(
            config.validate(),
            Err(NotifierError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_repeated_district_ids_are_kept() {
        let content = MINIMAL.replace("[395, 392]", "[395, 392, 395]");
        let config = NotifierConfig::from_toml_str(&content).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.district_ids(), &[395, 392, 395]);
    }

    #[test]
    fn test_missing_district_section_is_parse_error() {
        let content = r#"
[storage]
bucket = "test-bucket-sathyaam"

[notification]
topic_prefix = "arn:aws:sns:ap-south-1:123456789012:vaccine-slots"
"#;
        assert!(matches!(
            NotifierConfig::from_toml_str(content),
            Err(NotifierError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_invalid_offset_fails_validation() {
        let content = format!("{}\n[schedule]\nutc_offset = \"Asia/Kolkata\"\n", MINIMAL);
        let config = NotifierConfig::from_toml_str(&content).unwrap();

        assert!(config.validate().is_err());
    }
}
