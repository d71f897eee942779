use std::env;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

#[derive(Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub database_url: String,
    pub jwt_secret: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| "JWT_SECRET must be set".to_string())?;

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        Ok(ServerConfig {
            bind_addr,
            database_url,
            jwt_secret,
        })
    }
}
