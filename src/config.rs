// src/config.rs

use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub admin_password: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub questions_file: String,
    pub scores_file: String,
    pub backup_file: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        // Defaults mirror the single-classroom deployment this tool ships as.
        let admin_password =
            env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());

        let jwt_secret =
            env::var("JWT_SECRET").unwrap_or_else(|_| "exam_system_secret_key".to_string());

        // Token lifetime in seconds, 12 hours by default.
        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(12 * 60 * 60);

        let questions_file =
            env::var("QUESTIONS_FILE").unwrap_or_else(|_| "questions.json".to_string());

        let scores_file = env::var("SCORES_FILE").unwrap_or_else(|_| "scores.json".to_string());

        let backup_file =
            env::var("BACKUP_FILE").unwrap_or_else(|_| "scores_backup.json".to_string());

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            port,
            admin_password,
            jwt_secret,
            jwt_expiration,
            questions_file,
            scores_file,
            backup_file,
            rust_log,
        }
    }
}
