//! Error types for GymLog

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GymlogError>;

#[derive(Error, Debug)]
pub enum GymlogError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Preferences error: {0}")]
    Preferences(#[from] PreferencesError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Workout session error: {0}")]
    Session(#[from] SessionError),

    #[error("History export error: {0}")]
    Export(#[from] ExportError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl GymlogError {
    /// True for errors that indicate a caller bug rather than a runtime condition
    pub fn is_logic_error(&self) -> bool {
        matches!(
            self,
            GymlogError::Repository(RepositoryError::DuplicateLogId(_))
                | GymlogError::Session(SessionError::AlreadyCompleted(_))
        )
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid duration for {field}: {reason}")]
    InvalidDuration { field: String, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Workout log id already exists: {0}")]
    DuplicateLogId(String),

    #[error("Workout log not found: {0}")]
    LogNotFound(String),
}

#[derive(Error, Debug)]
pub enum PreferencesError {
    #[error("Failed to read preferences: {0}")]
    Read(#[source] std::io::Error),

    #[error("Failed to write preferences: {0}")]
    Write(#[source] std::io::Error),

    #[error("Failed to parse preferences: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account already exists for {0}")]
    AccountExists(String),

    #[error("No account found for {0}")]
    UnknownAccount(String),

    #[error("No user is logged in")]
    NotLoggedIn,

    #[error("Identity provider failure: {0}")]
    Provider(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Workout {0} has already been completed")]
    AlreadyCompleted(String),

    #[error("Workout {0} cannot end before it started")]
    EndBeforeStart(String),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to serialize workout log: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Invalid workout log on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_formatting_invalid_input() {
        let error = GymlogError::InvalidInput("Rest timer must be positive".to_string());
        assert_eq!(error.to_string(), "Invalid input: Rest timer must be positive");
    }

    #[test]
    fn test_error_message_formatting_repository() {
        let error = GymlogError::Repository(RepositoryError::LogNotFound("abc".to_string()));
        assert_eq!(
            error.to_string(),
            "Repository error: Workout log not found: abc"
        );
    }

    #[test]
    fn test_error_message_formatting_config() {
        let error = GymlogError::Config(ConfigError::MissingField("preferences.path".to_string()));
        assert_eq!(
            error.to_string(),
            "Configuration error: Missing required field: preferences.path"
        );
    }

    #[test]
    fn test_invalid_duration_formatting() {
        let error = ConfigError::InvalidDuration {
            field: "screens.home_latency".to_string(),
            reason: "unknown unit".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("screens.home_latency"));
        assert!(message.contains("unknown unit"));
    }

    #[test]
    fn test_error_conversion_from_repository_error() {
        let error: GymlogError = RepositoryError::DuplicateLogId("x".to_string()).into();
        assert!(matches!(error, GymlogError::Repository(_)));
    }

    #[test]
    fn test_error_conversion_from_auth_error() {
        let error: GymlogError = AuthError::NotLoggedIn.into();
        assert_eq!(error.to_string(), "Authentication error: No user is logged in");
    }

    #[test]
    fn test_logic_errors() {
        assert!(GymlogError::from(RepositoryError::DuplicateLogId("a".to_string())).is_logic_error());
        assert!(GymlogError::from(SessionError::AlreadyCompleted("a".to_string())).is_logic_error());
        assert!(!GymlogError::from(RepositoryError::LogNotFound("a".to_string())).is_logic_error());
        assert!(!GymlogError::InvalidInput("x".to_string()).is_logic_error());
    }

    #[test]
    fn test_preferences_io_error_formatting() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = PreferencesError::Write(io);
        assert!(error.to_string().contains("Failed to write preferences"));
    }
}
