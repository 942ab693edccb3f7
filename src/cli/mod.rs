use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Conversation Store Args ---
    /// Conversation store type (memory)
    #[arg(long, env = "HISTORY_TYPE", default_value = "memory")]
    pub history_type: String,

    // --- Model Args ---
    /// Comma separated list of model identifiers a conversation may select.
    #[arg(
        long,
        env = "AVAILABLE_MODELS",
        value_delimiter = ',',
        default_value = "model_a,model_b,model_c"
    )]
    pub available_models: Vec<String>,

    /// Model used when a new conversation does not name one. Must be in AVAILABLE_MODELS.
    #[arg(long, env = "DEFAULT_MODEL", default_value = "model_a")]
    pub default_model: String,

    // --- Response Generator Args ---
    /// Response generator backend (echo)
    #[arg(long, env = "GENERATOR_TYPE", default_value = "echo")]
    pub generator_type: String,

    /// Simulated latency in milliseconds before the generator answers.
    #[arg(long, env = "RESPONSE_DELAY_MS", default_value = "1000")]
    pub response_delay_ms: u64,

    // --- Media Args ---
    /// Directory uploaded media is written to. Created on first upload.
    #[arg(long, env = "UPLOAD_DIR", default_value = "uploads")]
    pub upload_dir: String,

    /// Maximum accepted request body size for uploads, in bytes. Unlimited when unset.
    #[arg(long, env = "MAX_UPLOAD_BYTES")]
    pub max_upload_bytes: Option<usize>,

    // --- General App Args ---
    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,

    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "0.0.0.0:8000")]
    pub server_addr: String,

    /// Optional path to the TLS certificate file (PEM format) for enabling HTTPS. Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format) for enabling HTTPS. Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}

impl Args {
    /// Rejects option combinations the server cannot start with.
    pub fn validate(&self) -> Result<(), String> {
        if self.available_models.iter().all(|m| m.trim().is_empty()) {
            return Err("AVAILABLE_MODELS must name at least one model".into());
        }
        if !self.available_models.iter().any(|m| m == &self.default_model) {
            return Err(
                format!(
                    "Default model '{}' is not in the available models ({})",
                    self.default_model,
                    self.available_models.join(", ")
                )
            );
        }
        if self.enable_tls {
            match (&self.tls_cert_path, &self.tls_key_path) {
                (Some(_), Some(_)) => {}
                _ => {
                    return Err(
                        "Both --tls-cert-path and --tls-key-path must be provided to enable TLS.".into()
                    );
                }
            }
        }
        Ok(())
    }
}
