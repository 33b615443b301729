use std::env;
use std::env::current_dir;
use std::fmt::Display;
use std::time::Duration;

use config::Config;
use config::ConfigError;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

/// Global configuration, loaded from the yaml files in `configuration/`. See
/// `get_configuration`.
#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    #[serde(default)]
    pub capture: CaptureSettings,
    #[serde(default)]
    pub notifications: NotificationSettings,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ApplicationSettings {
    /// Used as the bunyan `name` field
    pub name: String,

    /// Fallback filter when `RUST_LOG` is unset
    pub log_level: String,
}

/// Timings shared by every capture surface
#[derive(Clone, Debug, Deserialize)]
pub struct CaptureSettings {
    /// How long the simulated backend takes to accept an address
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub submit_delay_milliseconds: u64,

    /// Pause between a modal dismissal and the state being cleared, so the
    /// exit animation can finish
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub reset_grace_milliseconds: u64,
}

impl CaptureSettings {
    pub fn submit_delay(&self) -> Duration { Duration::from_millis(self.submit_delay_milliseconds) }

    pub fn reset_grace(&self) -> Duration { Duration::from_millis(self.reset_grace_milliseconds) }
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            submit_delay_milliseconds: 800,
            reset_grace_milliseconds: 300,
        }
    }
}

/// Toast copy. Rendering is someone else's problem; we only pick the words.
#[derive(Clone, Debug, Deserialize)]
pub struct NotificationSettings {
    pub rejected_title: String,
    pub rejected_description: String,
    pub success_title: String,
    pub success_description: String,
    pub failed_title: String,
    pub failed_description: String,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            rejected_title: "Invalid email".to_string(),
            rejected_description: "Please enter a valid email address.".to_string(),
            success_title: "You're subscribed!".to_string(),
            success_description: "Thanks for subscribing. Watch your inbox for updates."
                .to_string(),
            failed_title: "Subscription failed".to_string(),
            failed_description: "Something went wrong, please try again.".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl Display for Environment {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Environment::Local => "local",
                Environment::Production => "production",
            }
        )
    }
}

impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            e => Err(format!("Invalid environment: {e}")),
        }
    }
}

/// `APP_ENVIRONMENT`, defaulting to `local`.
pub fn get_environment() -> Result<Environment, ConfigError> {
    env::var("APP_ENVIRONMENT")
        .unwrap_or("local".to_string())
        .try_into()
        .map_err(ConfigError::Message)
}

/// Load yaml configuration files at `<project_root>/configuration`.
///
/// `application` must be present; `capture` and `notifications` fall back to
/// their defaults. Env vars override files:
///
/// `APP_CAPTURE__SUBMIT_DELAY_MILLISECONDS=50` -> `Settings.capture.submit_delay_milliseconds`
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let cfg_dir = current_dir()
        .map_err(|e| ConfigError::Foreign(Box::new(e)))?
        .join("configuration");

    let env = get_environment()?;

    let settings = Config::builder()
        .add_source(config::File::from(cfg_dir.join("base.yaml")))
        .add_source(config::File::from(cfg_dir.join(format!("{env}.yaml"))))
        // env vars are -always- parsed as String, hence `serde-aux` on the
        // numeric fields
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
