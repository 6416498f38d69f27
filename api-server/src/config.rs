//! Configuration module

use std::env;
use std::path::PathBuf;

use premium_core::constants::{DEFAULT_SEED, DEFAULT_TEST_RATIO};
use premium_core::TrainerConfig;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Training CSV
    pub dataset_path: PathBuf,

    /// Append-only username/password_hash CSV
    pub credentials_path: PathBuf,

    /// Saved bundle; loaded when present, written after training otherwise
    pub artifacts_path: Option<PathBuf>,

    /// JWT secret key
    pub jwt_secret: String,

    /// JWT expiration in hours
    pub jwt_expiration_hours: u64,

    /// Shuffle seed for the train/test split
    pub training_seed: u64,

    /// Held-out fraction
    pub test_ratio: f64,

    /// Expose POST /api/v1/model/retrain
    pub allow_retrain: bool,

    /// Upper bound on one retraining run
    pub training_timeout_secs: u64,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            dataset_path: env::var("DATASET_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/base_de_donnees_tunisiennes.csv")),

            credentials_path: env::var("CREDENTIALS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("users.csv")),

            artifacts_path: env::var("ARTIFACTS_PATH").ok().map(PathBuf::from),

            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "premium-estimator-dev-secret-change-in-production".to_string()),

            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(24),

            training_seed: env::var("TRAINING_SEED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_SEED),

            test_ratio: env::var("TEST_RATIO")
                .ok()
                .and_then(|r| r.parse().ok())
                .unwrap_or(DEFAULT_TEST_RATIO),

            allow_retrain: env::var("ALLOW_RETRAIN")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),

            training_timeout_secs: env::var("TRAINING_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(300),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn trainer_config(&self) -> TrainerConfig {
        TrainerConfig {
            seed: self.training_seed,
            test_ratio: self.test_ratio,
            ..Default::default()
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" 1 "));
        assert!(parse_flag("YES"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }
}
