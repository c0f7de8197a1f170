use std::path::PathBuf;

/// Runtime configuration for the mock server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Origin the UI is served from; used for the CORS allow-origin header.
    pub ui_origin: String,
    /// Port the HTTP listener binds to.
    pub port: u16,
    /// Directory holding the JSON documents served by this process.
    pub data_root: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ui_origin: "http://localhost:9001".to_string(),
            port: 8188,
            data_root: PathBuf::from("data"),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
