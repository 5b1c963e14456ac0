use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct LifeCapsuleConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub gamification: GamificationConfig,
    pub companion: CompanionConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub transport: String,
    pub log_level: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
    /// Id of the profile this journal belongs to.
    pub user_id: String,
    /// Attempts at a profile write before a concurrent-modification error surfaces.
    pub max_write_retries: u32,
}

/// How memory captures advance the streak counter.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StreakPolicy {
    /// Every captured memory increments the streak.
    #[default]
    PerMemory,
    /// At most one increment per calendar day; a missed day restarts the streak.
    Daily,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GamificationConfig {
    pub memory_xp: u32,
    pub chat_xp: u32,
    pub capsule_xp: u32,
    pub free_daily_chat_limit: u32,
    pub chat_champion_threshold: u32,
    pub streak_policy: StreakPolicy,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CompanionConfig {
    pub simulate_typing: bool,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub encouraging_probability: f64,
    pub default_name: String,
    /// Fixed RNG seed for reproducible replies. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: "stdio".into(),
            log_level: "info".into(),
            host: "127.0.0.1".into(),
            port: 8734,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_lifecapsule_dir()
            .join("journal.db")
            .to_string_lossy()
            .into_owned();
        Self {
            db_path,
            user_id: "1".into(),
            max_write_retries: 3,
        }
    }
}

impl Default for GamificationConfig {
    fn default() -> Self {
        Self {
            memory_xp: 20,
            chat_xp: 5,
            capsule_xp: 15,
            free_daily_chat_limit: 10,
            chat_champion_threshold: 5,
            streak_policy: StreakPolicy::PerMemory,
        }
    }
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            simulate_typing: true,
            min_delay_ms: 1000,
            max_delay_ms: 2500,
            encouraging_probability: 0.3,
            default_name: "friend".into(),
            seed: None,
        }
    }
}

/// Returns `~/.lifecapsule/`, or `./.lifecapsule/` when no home directory is known.
pub fn default_lifecapsule_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".lifecapsule")
}

/// Returns the default config file path: `~/.lifecapsule/config.toml`
pub fn default_config_path() -> PathBuf {
    default_lifecapsule_dir().join("config.toml")
}

impl LifeCapsuleConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            LifeCapsuleConfig::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    /// (LIFECAPSULE_DB, LIFECAPSULE_USER, LIFECAPSULE_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("LIFECAPSULE_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("LIFECAPSULE_USER") {
            self.storage.user_id = val;
        }
        if let Ok(val) = std::env::var("LIFECAPSULE_LOG_LEVEL") {
            self.server.log_level = val;
        }
    }

    fn validate(&self) -> Result<()> {
        let c = &self.companion;
        anyhow::ensure!(
            c.min_delay_ms <= c.max_delay_ms,
            "companion.min_delay_ms ({}) must not exceed max_delay_ms ({})",
            c.min_delay_ms,
            c.max_delay_ms
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&c.encouraging_probability),
            "companion.encouraging_probability must be between 0.0 and 1.0"
        );
        anyhow::ensure!(
            !self.storage.user_id.trim().is_empty(),
            "storage.user_id must not be empty"
        );
        Ok(())
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
