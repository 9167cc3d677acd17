use crate::helpers::timezone::{offset_from_minutes, TimeZone};
use crate::utils::error::{MiscError, Result};
use crate::utils::validation::{validate_positive_number, validate_range, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

const MAX_OFFSET_MINUTES: i32 = 24 * 60 - 1;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MiscConfig {
    #[serde(default)]
    pub worker: WorkerConfig,
    pub timezone: Option<TimezoneConfig>,
    pub json: Option<JsonConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// 佇列容量，未設定時使用預設值
    pub capacity: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimezoneConfig {
    /// 相對 UTC 的分鐘數 (東為正)
    pub offset_minutes: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsonConfig {
    pub indent: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl WorkerConfig {
    pub fn capacity(&self) -> usize {
        self.capacity.unwrap_or(crate::app::worker::DEFAULT_CAPACITY)
    }
}

impl MiscConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MiscError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MiscError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GYVER_TZ_OFFSET})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MiscError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if let Some(capacity) = self.worker.capacity {
            validate_positive_number("worker.capacity", capacity, 1)?;
        }

        if let Some(timezone) = &self.timezone {
            validate_range(
                "timezone.offset_minutes",
                timezone.offset_minutes,
                -MAX_OFFSET_MINUTES,
                MAX_OFFSET_MINUTES,
            )?;
        }

        Ok(())
    }

    /// 取得設定的時區；未設定時回傳尚未固定的時區
    pub fn time_zone(&self) -> Result<TimeZone> {
        match &self.timezone {
            Some(timezone) => Ok(TimeZone::new(offset_from_minutes(timezone.offset_minutes)?)),
            None => Ok(TimeZone::unset()),
        }
    }

    pub fn json_indent(&self) -> bool {
        self.json.as_ref().and_then(|j| j.indent).unwrap_or(false)
    }

    pub fn verbose_logging(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.verbose).unwrap_or(false)
    }

    /// 依設定初始化日誌
    pub fn init_logging(&self) {
        let json = self.logging.as_ref().and_then(|l| l.json).unwrap_or(false);
        if json {
            crate::utils::logger::init_json_logger();
        } else {
            crate::utils::logger::init_logger(self.verbose_logging());
        }
    }
}

impl Validate for MiscConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
