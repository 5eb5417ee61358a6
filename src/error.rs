use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatchError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("File is not valid UTF-8 text: {path}")]
    Encoding { path: String },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Permission denied: {path}")]
    Permission { path: String },

    #[error("Invalid patch rule '{rule}': {message}")]
    InvalidRule { rule: String, message: String },

    #[error("Unknown fix set: {name}")]
    UnknownFixSet { name: String, available: Vec<String> },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO operation failed: {0}")]
    Io(#[from] io::Error),
}

impl PatchError {
    /// Classify an error raised while reading `path`.
    pub fn from_read(path: &Path, error: io::Error) -> Self {
        let path = path.display().to_string();
        match error.kind() {
            io::ErrorKind::NotFound => PatchError::FileNotFound { path },
            io::ErrorKind::PermissionDenied => PatchError::Permission { path },
            io::ErrorKind::InvalidData => PatchError::Encoding { path },
            _ => PatchError::Read { path, source: error },
        }
    }

    /// Classify an error raised while writing `path`.
    pub fn from_write(path: &Path, error: io::Error) -> Self {
        let path = path.display().to_string();
        match error.kind() {
            io::ErrorKind::PermissionDenied => PatchError::Permission { path },
            _ => PatchError::Write { path, source: error },
        }
    }

    pub fn invalid_rule<R: Into<String>, M: ToString>(rule: R, message: M) -> Self {
        PatchError::InvalidRule {
            rule: rule.into(),
            message: message.to_string(),
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for PatchError {
    fn user_message(&self) -> String {
        match self {
            PatchError::FileNotFound { path } => {
                format!("Target file does not exist: {}", path)
            }
            PatchError::Encoding { path } => {
                format!("Target file is not UTF-8 text: {}", path)
            }
            PatchError::Read { path, source } => {
                format!("Could not read {}: {}", path, source)
            }
            PatchError::Write { path, source } => {
                format!("Could not write {}: {}", path, source)
            }
            PatchError::Permission { path } => {
                format!("Permission denied accessing: {}", path)
            }
            PatchError::InvalidRule { rule, message } => {
                format!("Patch rule '{}' is invalid: {}", rule, message)
            }
            PatchError::UnknownFixSet { name, .. } => {
                format!("No fix set named '{}'", name)
            }
            PatchError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            PatchError::FileNotFound { .. } => Some(
                "Pass the file explicitly or point --project-root at the project that contains it.".to_string()
            ),
            PatchError::Encoding { .. } => Some(
                "Only UTF-8 text files can be patched. Convert the file or pick another target.".to_string()
            ),
            PatchError::Permission { .. } => Some(
                "Ensure you have read/write permissions for the target file and its directory.".to_string()
            ),
            PatchError::InvalidRule { .. } => Some(
                "Check the rule's pattern syntax in your configuration file. Literal rules need a non-empty 'find'.".to_string()
            ),
            PatchError::UnknownFixSet { available, .. } => Some(format!(
                "Available fix sets: {}. Use --list to see what each one does.",
                available.join(", ")
            )),
            PatchError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for PatchError {
    fn from(error: toml::de::Error) -> Self {
        PatchError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PatchError>;
