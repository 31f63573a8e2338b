//! Configuration types.

use std::path::PathBuf;

use crate::error::ConfigError;

/// Collection holding one profile document per subject.
pub const PROFILE_COLLECTION: &str = "userProfiles";

/// Onboarding wizard configuration.
#[derive(Debug, Clone)]
pub struct OnboardingConfig {
    /// Collection the final answer set is merge-written into.
    pub profile_collection: String,
    /// Whether "back" stays available while the profile write is in flight.
    pub allow_retreat_while_saving: bool,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            profile_collection: PROFILE_COLLECTION.to_string(),
            allow_retreat_while_saving: false,
        }
    }
}

/// Identity used by the CLI when signing in locally.
#[derive(Debug, Clone)]
pub struct LocalSubjectConfig {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

/// Application configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// libSQL database file for profile documents.
    pub db_path: PathBuf,
    /// Port for the onboarding status HTTP server.
    pub http_port: u16,
    /// Subject to sign in as. `None` leaves the provider signed out.
    pub subject: Option<LocalSubjectConfig>,
    pub onboarding: OnboardingConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let db_path = std::env::var("QUINTA_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data/quintaesencia.db"));

        let http_port = match std::env::var("QUINTA_HTTP_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                key: "QUINTA_HTTP_PORT".to_string(),
                message: e.to_string(),
            })?,
            Err(_) => 8080,
        };

        let subject = std::env::var("QUINTA_SUBJECT_ID")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(|id| LocalSubjectConfig {
                id,
                display_name: non_empty_var("QUINTA_SUBJECT_NAME"),
                email: non_empty_var("QUINTA_SUBJECT_EMAIL"),
            });

        let allow_retreat_while_saving = match non_empty_var("QUINTA_ALLOW_RETREAT_WHILE_SAVING")
        {
            Some(raw) => parse_bool("QUINTA_ALLOW_RETREAT_WHILE_SAVING", &raw)?,
            None => false,
        };

        Ok(Self {
            db_path,
            http_port,
            subject,
            onboarding: OnboardingConfig {
                allow_retreat_while_saving,
                ..OnboardingConfig::default()
            },
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got {other:?}"),
        }),
    }
}
