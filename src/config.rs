use anyhow::Result;
use config::{Config, Environment, File};
use moka::future::Cache;
use scheduler::TimerPolicy;
use sea_orm::Database;
use serde::Deserialize;
use std::{fmt, sync::Arc, time::Duration};
use tracing::{debug, info};

use crate::mail::LogMailer;
use crate::schemas::AppState;

/// Runtime settings.
///
/// Sources, later ones winning: built-in defaults, an optional
/// `snapbook.{yaml,toml}` in the working directory, `SNAPBOOK_*` environment
/// variables, then CLI arguments.
#[derive(Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    pub jwt_secret: String,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_days: i64,
    pub verification_token_ttl_hours: i64,
    pub response_window_hours: i64,
    pub suspension_threshold: i32,
    pub sweep_interval_secs: u64,
    pub public_base_url: String,
    pub mail_from: String,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("database_url", &self.database_url)
            .field("bind_address", &self.bind_address)
            .field("jwt_secret", &"<redacted>")
            .field("access_token_ttl_minutes", &self.access_token_ttl_minutes)
            .field("refresh_token_ttl_days", &self.refresh_token_ttl_days)
            .field("verification_token_ttl_hours", &self.verification_token_ttl_hours)
            .field("response_window_hours", &self.response_window_hours)
            .field("suspension_threshold", &self.suspension_threshold)
            .field("sweep_interval_secs", &self.sweep_interval_secs)
            .field("public_base_url", &self.public_base_url)
            .field("mail_from", &self.mail_from)
            .finish()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://snapbook.db?mode=rwc".to_string(),
            bind_address: "0.0.0.0:3000".to_string(),
            jwt_secret: "change-me".to_string(),
            access_token_ttl_minutes: 60,
            refresh_token_ttl_days: 7,
            verification_token_ttl_hours: 24,
            response_window_hours: scheduler::policy::DEFAULT_RESPONSE_WINDOW_HOURS,
            suspension_threshold: scheduler::policy::DEFAULT_SUSPENSION_THRESHOLD,
            sweep_interval_secs: 300,
            public_base_url: "http://localhost:3000".to_string(),
            mail_from: "no-reply@snapbook.local".to_string(),
        }
    }
}

impl Settings {
    /// Loads settings from `.env`, the optional config file and the
    /// environment.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Settings::default();

        let settings = Config::builder()
            .set_default("database_url", defaults.database_url)?
            .set_default("bind_address", defaults.bind_address)?
            .set_default("jwt_secret", defaults.jwt_secret)?
            .set_default("access_token_ttl_minutes", defaults.access_token_ttl_minutes)?
            .set_default("refresh_token_ttl_days", defaults.refresh_token_ttl_days)?
            .set_default(
                "verification_token_ttl_hours",
                defaults.verification_token_ttl_hours,
            )?
            .set_default("response_window_hours", defaults.response_window_hours)?
            .set_default("suspension_threshold", defaults.suspension_threshold as i64)?
            .set_default("sweep_interval_secs", defaults.sweep_interval_secs)?
            .set_default("public_base_url", defaults.public_base_url)?
            .set_default("mail_from", defaults.mail_from)?
            .add_source(File::with_name("snapbook").required(false))
            .add_source(Environment::with_prefix("SNAPBOOK"))
            .build()?
            .try_deserialize::<Settings>()?;

        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    /// Applies CLI overrides on top of loaded settings.
    pub fn with_overrides(mut self, database_url: Option<String>, bind_address: Option<String>) -> Self {
        if let Some(url) = database_url {
            self.database_url = url;
        }
        if let Some(addr) = bind_address {
            self.bind_address = addr;
        }
        self
    }

    pub fn timer_policy(&self) -> TimerPolicy {
        TimerPolicy::new(self.response_window_hours, self.suspension_threshold)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

/// Revoked refresh-token ids. Unbounded so that nothing is evicted
/// before the token it blocks has expired.
pub fn refresh_blacklist(settings: &Settings) -> Cache<String, ()> {
    Cache::builder()
        .time_to_live(Duration::from_secs(
            (settings.refresh_token_ttl_days.max(1) as u64) * 24 * 60 * 60,
        ))
        .build()
}

/// Connects to the database and builds the shared handler state.
pub async fn initialize_app_state_with_settings(settings: Settings) -> Result<AppState> {
    info!("Connecting to database: {}", settings.database_url);
    let db = Database::connect(&settings.database_url).await?;

    let cache = refresh_blacklist(&settings);
    let mailer = Arc::new(LogMailer::new(settings.mail_from.clone()));
    let policy = settings.timer_policy();

    Ok(AppState {
        db,
        cache,
        settings: Arc::new(settings),
        mailer,
        policy,
    })
}
