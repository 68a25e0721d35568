use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    /// Cap on JSON and urlencoded bodies.
    pub max_body_size: usize,
    /// Cap on a whole multipart stream, resume included.
    pub max_upload_size: u64,
    pub log_level: String,
    pub seed_demo: bool,
    pub admin: AdminConfig,
}

/// Credentials for the single dashboard account.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub username: String,
    /// Argon2 PHC string, e.g. `$argon2id$v=19$...`.
    pub password_hash: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let jwt_secret = env_required("JWT_SECRET")?;

        let host: IpAddr = env_or("INTAKE_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid INTAKE_HOST: {e}"))?;

        let port: u16 = env_or("INTAKE_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid INTAKE_PORT: {e}"))?;

        let max_body_size: usize = env_or("INTAKE_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid INTAKE_MAX_BODY_SIZE: {e}"))?;

        // Well above the 5MB resume rule so oversized files still reach
        // the validator and get a field error.
        let max_upload_size: u64 = env_or("INTAKE_MAX_UPLOAD_SIZE", "33554432")
            .parse()
            .map_err(|e| format!("Invalid INTAKE_MAX_UPLOAD_SIZE: {e}"))?;

        let log_level = env_or("INTAKE_LOG_LEVEL", "info");

        let seed_demo = matches!(
            env_or("INTAKE_SEED_DEMO", "false").to_lowercase().as_str(),
            "true" | "1" | "yes"
        );

        let admin = AdminConfig {
            username: env_required("INTAKE_ADMIN_USERNAME")?,
            password_hash: env_required("INTAKE_ADMIN_PASSWORD_HASH")?,
        };

        Ok(Config {
            jwt_secret,
            host,
            port,
            max_body_size,
            max_upload_size,
            log_level,
            seed_demo,
            admin,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
