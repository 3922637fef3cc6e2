pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    url_path: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn new(url_path: &str, port: u16) -> Self {
        Self {
            url_path: normalize_url_path(url_path),
            port,
        }
    }

    /// Prefix every query URL starts with; always begins and ends with `/`.
    pub fn url_path(&self) -> &str {
        &self.url_path
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("/", DEFAULT_PORT)
    }
}

fn normalize_url_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}
