//! Process Configuration
//! Mission: Load all runtime settings from the environment, once, at startup

use std::env;
use std::path::PathBuf;
use tracing::warn;

/// Runtime configuration.
///
/// Loaded once at startup; in particular the token signing secret has no
/// mid-process rotation path (rotating it would invalidate every
/// outstanding session).
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub db_path: String,
    pub static_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub jwt_secret: String,
    pub default_admin_password: String,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(3000);

        let db_path = env::var("DB_PATH").unwrap_or_else(|_| "alsadiqoon.db".to_string());

        let static_dir = env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("public"));

        let upload_dir = env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("public/uploads"));

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("⚠️  JWT_SECRET not set; using the development secret");
            "alsadiqoon-dev-secret".to_string()
        });

        let default_admin_password = env::var("DEFAULT_ADMIN_PASSWORD").unwrap_or_else(|_| {
            warn!("⚠️  DEFAULT_ADMIN_PASSWORD not set; using the development default");
            "admin123".to_string()
        });

        Self {
            port,
            db_path,
            static_dir,
            upload_dir,
            jwt_secret,
            default_admin_password,
        }
    }
}
