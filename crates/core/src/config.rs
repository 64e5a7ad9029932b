use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `MEMBER_DESK__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_node_id")]
    pub node_id: String,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub blast: BlastConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    /// Seed the in-memory registry with demo members on startup.
    #[serde(default = "default_seed_demo_data")]
    pub seed_demo_data: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlastConfig {
    #[serde(default = "default_preview_sample_size")]
    pub preview_sample_size: usize,
    #[serde(default = "default_resolve_take")]
    pub resolve_default_take: usize,
    #[serde(default = "default_resolve_max_take")]
    pub resolve_max_take: usize,
}

// Default functions
fn default_node_id() -> String {
    "node-01".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8080
}
fn default_metrics_port() -> u16 {
    9091
}
fn default_seed_demo_data() -> bool {
    true
}
fn default_preview_sample_size() -> usize {
    50
}
fn default_resolve_take() -> usize {
    1000
}
fn default_resolve_max_take() -> usize {
    5000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node_id: default_node_id(),
            api: ApiConfig::default(),
            metrics: MetricsConfig::default(),
            registry: RegistryConfig::default(),
            blast: BlastConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            port: default_metrics_port(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            seed_demo_data: default_seed_demo_data(),
        }
    }
}

impl Default for BlastConfig {
    fn default() -> Self {
        Self {
            preview_sample_size: default_preview_sample_size(),
            resolve_default_take: default_resolve_take(),
            resolve_max_take: default_resolve_max_take(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("MEMBER_DESK")
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
