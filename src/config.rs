use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub frontend_dir: String,
    pub cors_origin: String,
    /// Public base URL used in email links.
    pub app_url: String,
    pub resend_api_url: String,
    pub resend_api_key: String,
    pub resend_sender_email: String,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Ok(Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:kanban.db".into()),
            frontend_dir: std::env::var("FRONTEND_DIR")
                .unwrap_or_else(|_| "../frontend/dist".into()),
            cors_origin: std::env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".into()),
            app_url: std::env::var("APP_URL")
                .unwrap_or_else(|_| "http://localhost:8080".into()),
            resend_api_url: std::env::var("RESEND_API_URL")
                .unwrap_or_else(|_| "https://api.resend.com".into()),
            resend_api_key: std::env::var("RESEND_API_KEY").unwrap_or_default(),
            resend_sender_email: std::env::var("RESEND_SENDER_EMAIL")
                .unwrap_or_else(|_| "kanban@localhost".into()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            database_url: "sqlite:kanban.db".into(),
            frontend_dir: "../frontend/dist".into(),
            cors_origin: "http://localhost:3000,http://127.0.0.1:3000".into(),
            app_url: "http://localhost:8080".into(),
            resend_api_url: "https://api.resend.com".into(),
            resend_api_key: String::new(),
            resend_sender_email: "kanban@localhost".into(),
        }
    }
}
