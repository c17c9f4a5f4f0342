use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub gate: GateConfig,
    pub otp: OtpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub enable_query_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    /// Static bearer token required by the edge-function tier
    /// (OTP verification, dev seeding).
    pub service_key: String,
}

/// Route paths the access gate redirects between. Kept in config so the
/// backend stays in lockstep with the dashboard router without a deploy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    pub login_path: String,
    pub institution_check_path: String,
    pub submission_path: String,
    pub verification_pending_path: String,
    pub payment_path: String,
    pub payment_pending_path: String,
    pub account_rejected_path: String,
    pub forbidden_path: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            institution_check_path: "/cek-pesantren".to_string(),
            submission_path: "/pengajuan".to_string(),
            verification_pending_path: "/menunggu-verifikasi".to_string(),
            payment_path: "/pembayaran".to_string(),
            payment_pending_path: "/pembayaran/menunggu".to_string(),
            account_rejected_path: "/akun-ditolak".to_string(),
            forbidden_path: "/forbidden".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpConfig {
    pub code_length: usize,
    pub expiry_minutes: i64,
    pub max_attempts: i32,
    /// Return the plaintext code from the request endpoint. Development
    /// convenience only; both defaults and overrides refuse it elsewhere.
    pub expose_codes: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_ENABLE_QUERY_LOGGING") {
            self.database.enable_query_logging = v.parse().unwrap_or(self.database.enable_query_logging);
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("MPJ_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("MPJ_SERVICE_KEY") {
            self.security.service_key = v;
        }

        // Gate path overrides
        if let Ok(v) = env::var("GATE_LOGIN_PATH") {
            self.gate.login_path = v;
        }
        if let Ok(v) = env::var("GATE_INSTITUTION_CHECK_PATH") {
            self.gate.institution_check_path = v;
        }
        if let Ok(v) = env::var("GATE_SUBMISSION_PATH") {
            self.gate.submission_path = v;
        }
        if let Ok(v) = env::var("GATE_VERIFICATION_PENDING_PATH") {
            self.gate.verification_pending_path = v;
        }
        if let Ok(v) = env::var("GATE_PAYMENT_PATH") {
            self.gate.payment_path = v;
        }
        if let Ok(v) = env::var("GATE_PAYMENT_PENDING_PATH") {
            self.gate.payment_pending_path = v;
        }
        if let Ok(v) = env::var("GATE_ACCOUNT_REJECTED_PATH") {
            self.gate.account_rejected_path = v;
        }
        if let Ok(v) = env::var("GATE_FORBIDDEN_PATH") {
            self.gate.forbidden_path = v;
        }

        // OTP overrides
        if let Ok(v) = env::var("OTP_EXPIRY_MINUTES") {
            self.otp.expiry_minutes = v.parse().unwrap_or(self.otp.expiry_minutes);
        }
        if let Ok(v) = env::var("OTP_MAX_ATTEMPTS") {
            self.otp.max_attempts = v.parse().unwrap_or(self.otp.max_attempts);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 30,
                enable_query_logging: true,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
                jwt_secret: "dev-secret-change-me".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                service_key: "dev-service-key".to_string(),
            },
            gate: GateConfig::default(),
            otp: OtpConfig {
                code_length: 6,
                expiry_minutes: 10,
                max_attempts: 5,
                expose_codes: true,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 10,
                enable_query_logging: true,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.mpjapps.id".to_string()],
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                service_key: String::new(),
            },
            gate: GateConfig::default(),
            otp: OtpConfig {
                code_length: 6,
                expiry_minutes: 5,
                max_attempts: 5,
                expose_codes: false,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
                enable_query_logging: false,
            },
            api: ApiConfig {
                enable_request_logging: false,
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.mpjapps.id".to_string()],
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
                service_key: String::new(),
            },
            gate: GateConfig::default(),
            otp: OtpConfig {
                code_length: 6,
                expiry_minutes: 5,
                max_attempts: 5,
                expose_codes: false,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

// Helper macros for common checks
#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.otp.max_attempts, 5);
        assert!(config.otp.expose_codes);
        assert!(!config.security.jwt_secret.is_empty());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(!config.otp.expose_codes);
        assert!(config.security.jwt_secret.is_empty());
        assert_eq!(config.security.jwt_expiry_hours, 4);
    }

    #[test]
    fn test_gate_paths_defaults() {
        let gate = GateConfig::default();
        assert_eq!(gate.login_path, "/login");
        assert_eq!(gate.payment_pending_path, "/pembayaran/menunggu");
        assert_ne!(gate.payment_path, gate.payment_pending_path);
    }
}
