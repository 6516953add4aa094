use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecorError {
    #[error("Module not found: {module}")]
    ModuleNotFound { module: String },

    #[error("Class not found: {module}.{class}")]
    ClassNotFound { module: String, class: String },

    #[error("Method not found: {class}.{method}")]
    MethodNotFound { class: String, method: String },

    #[error("Argument error: {message}")]
    ArgumentError { message: String },

    #[error("Method {method} failed: {message}")]
    InvocationError { method: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl DecorError {
    pub fn invocation(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvocationError {
            method: method.into(),
            message: message.into(),
        }
    }

    pub fn argument(message: impl Into<String>) -> Self {
        Self::ArgumentError {
            message: message.into(),
        }
    }

    /// Short message for the terminal, without the variant noise.
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ModuleNotFound { module } => format!("No module named '{}' is registered", module),
            Self::ClassNotFound { module, class } => {
                format!("Module '{}' has no class '{}'", module, class)
            }
            Self::MethodNotFound { class, method } => {
                format!("Class '{}' has no method '{}'", class, method)
            }
            Self::IoError(e) => format!("Could not read file: {}", e),
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => format!("Invalid configuration: {}", self),
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ModuleNotFound { .. } | Self::ClassNotFound { .. } => {
                "Check that the module and its classes are registered before decorating"
            }
            Self::MethodNotFound { .. } => "Check the method name against the class definition",
            Self::ArgumentError { .. } | Self::InvocationError { .. } => {
                "Check the arguments passed to the method"
            }
            Self::IoError(_) => "Make sure the file exists and is readable",
            Self::SerializationError(_) => "Check that argument values are valid JSON",
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => "Fix the configuration file and try again",
        }
    }
}

pub type Result<T> = std::result::Result<T, DecorError>;
