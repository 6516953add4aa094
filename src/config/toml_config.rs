use crate::app::presets::DecoratorKind;
use crate::core::class_wrapper::Redecoration;
use crate::core::logging::{FormatLimits, TimingPrecision};
use crate::utils::error::{DecorError, Result};
use crate::utils::validation::{validate_positive_number, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    #[default]
    Stdout,
    Tracing,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub sink: SinkKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub precision: TimingPrecision,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormattingConfig {
    pub max_list_len: usize,
    pub head: usize,
    pub tail: usize,
    pub stream_peek: usize,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        let limits = FormatLimits::default();
        Self {
            max_list_len: limits.max_list_len,
            head: limits.head,
            tail: limits.tail,
            stream_peek: limits.stream_peek,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorationConfig {
    pub redecorate: Redecoration,
    /// Explicit decorator list, outermost first. Overrides the preset.
    pub decorators: Option<Vec<DecoratorKind>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilerConfig {
    pub output: OutputConfig,
    pub timing: TimingConfig,
    pub formatting: FormattingConfig,
    pub decoration: DecorationConfig,
}

impl ProfilerConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DecorError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DecorError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PROFILER_SINK})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DecorError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn format_limits(&self) -> FormatLimits {
        FormatLimits {
            max_list_len: self.formatting.max_list_len,
            head: self.formatting.head,
            tail: self.formatting.tail,
            stream_peek: self.formatting.stream_peek,
        }
    }

    pub fn timing_precision(&self) -> TimingPrecision {
        self.timing.precision
    }

    pub fn redecoration(&self) -> Redecoration {
        self.decoration.redecorate
    }
}

impl Validate for ProfilerConfig {
    fn validate(&self) -> Result<()> {
        let f = &self.formatting;
        validate_positive_number("formatting.max_list_len", f.max_list_len, 1)?;
        validate_positive_number("formatting.head", f.head, 1)?;
        validate_positive_number("formatting.stream_peek", f.stream_peek, 1)?;

        if f.head + f.tail > f.max_list_len {
            return Err(DecorError::InvalidConfigValueError {
                field: "formatting.head".to_string(),
                value: format!("{} + {}", f.head, f.tail),
                reason: format!(
                    "head + tail must not exceed max_list_len ({})",
                    f.max_list_len
                ),
            });
        }

        if let Some(decorators) = &self.decoration.decorators {
            if decorators.is_empty() {
                return Err(DecorError::ConfigValidationError {
                    field: "decoration.decorators".to_string(),
                    message: "List must name at least one decorator".to_string(),
                });
            }
        }

        Ok(())
    }
}
