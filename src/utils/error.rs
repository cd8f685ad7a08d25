use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifierError {
    #[error("Request for district {district_id} failed: {source}")]
    FetchError {
        district_id: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("Upstream returned HTTP {status} for district {district_id}")]
    UpstreamStatusError { district_id: u32, status: u16 },

    #[error("Malformed centers payload for district {district_id}: {source}")]
    DecodeError {
        district_id: u32,
        #[source]
        source: serde_json::Error,
    },

    #[error("No centers available")]
    EmptyCentersError,

    #[error("Invalid date '{value}': {source}")]
    InvalidDateError {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Failed to upload '{key}': {message}")]
    PublishError { key: String, message: String },

    #[error("Failed to notify topic '{topic}': {message}")]
    NotifyError { topic: String, message: String },

    #[error("HTTP client error: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

/// 錯誤分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Storage,
    Notification,
    Config,
}

/// 錯誤嚴重程度，決定日誌等級
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl NotifierError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FetchError { .. } | Self::UpstreamStatusError { .. } | Self::ApiError(_) => {
                ErrorCategory::Network
            }
            Self::DecodeError { .. }
            | Self::EmptyCentersError
            | Self::InvalidDateError { .. }
            | Self::CsvError(_) => ErrorCategory::Data,
            Self::PublishError { .. } | Self::IoError(_) => ErrorCategory::Storage,
            Self::NotifyError { .. } => ErrorCategory::Notification,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Config,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 上游沒有中心是預期狀況
            Self::EmptyCentersError => ErrorSeverity::Low,
            Self::UpstreamStatusError { status, .. } if *status == 429 || *status >= 500 => {
                ErrorSeverity::Medium
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check network connectivity and the upstream endpoint",
            ErrorCategory::Data => "Inspect the upstream payload in the debug log",
            ErrorCategory::Storage => {
                "Check the staging directory permissions and the bucket policy"
            }
            ErrorCategory::Notification => "Check that the SNS topic exists for this district",
            ErrorCategory::Config => "Fix the configuration file and run again",
        }
    }
}

pub type Result<T> = std::result::Result<T, NotifierError>;
