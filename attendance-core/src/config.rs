use std::env;

#[derive(Clone)]
pub struct Config {
    pub backend_url: String,
    pub user_id: String,
    pub http_timeout_secs: u64,
    pub code_render_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            backend_url: env::var("BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:8080/api".to_string()),
            user_id: env::var("USER_ID").unwrap_or_default(),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("HTTP_TIMEOUT_SECS must be a valid number"),
            code_render_url: env::var("CODE_RENDER_URL")
                .unwrap_or_else(|_| "https://api.qrserver.com/v1/create-qr-code/".to_string()),
        }
    }
}
