use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub node: NodeConfig,
    pub storage: StorageConfig,
    /// Enables dangerous operations like purge. Must never be true in production.
    pub test_mode: bool,
    /// Maximum PDF upload size in bytes
    pub max_pdf_size: u64,
    /// Maximum cover image upload size in bytes
    pub max_cover_size: u64,
}

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub bind_address: String,
    pub data_dir: String,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory for the local object store backend
    pub local_storage_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            local_storage_path: "./files".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string());

        let local_storage_path =
            std::env::var("STORAGE_PATH").unwrap_or_else(|_| "./files".to_string());

        let test_mode = std::env::var("TEST_MODE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let max_pdf_size = std::env::var("MAX_PDF_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10 * 1024 * 1024); // 10 MiB

        let max_cover_size = std::env::var("MAX_COVER_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(2 * 1024 * 1024); // 2 MiB

        let config = Config {
            node: NodeConfig {
                bind_address,
                data_dir,
            },
            storage: StorageConfig { local_storage_path },
            test_mode,
            max_pdf_size,
            max_cover_size,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_pdf_size == 0 {
            return Err(ConfigError::ValidationError(
                "MAX_PDF_SIZE must be greater than 0".to_string(),
            ));
        }

        if self.max_cover_size == 0 {
            return Err(ConfigError::ValidationError(
                "MAX_COVER_SIZE must be greater than 0".to_string(),
            ));
        }

        if self.storage.local_storage_path.is_empty() {
            return Err(ConfigError::ValidationError(
                "STORAGE_PATH cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Cap for multipart request bodies: both uploads plus form overhead.
    pub fn max_request_body(&self) -> u64 {
        self.max_pdf_size + self.max_cover_size + 1024 * 1024
    }
}
