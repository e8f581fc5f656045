//! Server configuration from environment variables.

use std::path::PathBuf;

/// Top-level server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    /// Root directory attachment paths resolve against
    pub storage_root: PathBuf,
    pub cookie_secure: bool,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|_| "SERVER_PORT must be a valid port number".to_string())?;

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL not set".to_string())?;
        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| "JWT_SECRET not set".to_string())?;

        let storage_root = std::env::var("STORAGE_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./storage"));

        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Ok(Self {
            host,
            port,
            database_url,
            jwt_secret,
            storage_root,
            cookie_secure,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Session cookie settings shared with the login/logout handlers
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub cookie_secure: bool,
    /// Cookie lifetime in hours, matching the token expiry
    pub session_hours: i64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_secure: false,
            session_hours: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        let config = ApiConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: String::new(),
            jwt_secret: String::new(),
            storage_root: PathBuf::from("."),
            cookie_secure: false,
        };
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }
}
