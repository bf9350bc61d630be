// tracevault-config - collector configuration
//
// Sources, in priority order:
// 1. CLI overrides (applied by the binary)
// 2. Config file (TOML) from an explicit path
// 3. Default locations (./tracevault.toml)
// 4. Built-in defaults

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

pub use tracevault_tenancy::TenancyOptions;

const DEFAULT_CONFIG_LOCATIONS: &[&str] = &["./tracevault.toml", "./.tracevault.toml"];

/// Top-level collector configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    pub pipeline: PipelineOptions,
    pub storage: StorageOptions,
    pub tenancy: TenancyOptions,
    pub grpc: GrpcServerOptions,
    pub http: HttpServerOptions,
    pub otlp: OtlpOptions,
    pub zipkin: ZipkinOptions,
    pub admin: AdminOptions,
    pub log: LogOptions,
}

/// Processing pipeline sizing and hooks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    pub num_workers: usize,
    pub queue_size: usize,
    /// Memory budget for dynamic queue sizing, in MiB; 0 disables it.
    pub dyn_queue_size_memory_mib: u64,
    pub blocking_submit: bool,
    pub span_size_metrics_enabled: bool,
    /// Tags appended to every span's process tags at consume time.
    pub collector_tags: BTreeMap<String, String>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            num_workers: 50,
            queue_size: 2000,
            dyn_queue_size_memory_mib: 0,
            blocking_submit: false,
            span_size_metrics_enabled: false,
            collector_tags: BTreeMap::new(),
        }
    }
}

impl PipelineOptions {
    pub fn dyn_queue_size_memory_bytes(&self) -> u64 {
        self.dyn_queue_size_memory_mib * 1024 * 1024
    }
}

/// In-memory trace store sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageOptions {
    /// Ring capacity per tenant.
    pub max_traces: usize,
}

impl Default for StorageOptions {
    fn default() -> Self {
        Self { max_traces: 50_000 }
    }
}

/// TLS material locations. Recognized and validated here; termination is
/// wired by the deployment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsOptions {
    pub enabled: bool,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
    pub ca_path: Option<String>,
    pub client_ca_path: Option<String>,
    pub min_version: Option<String>,
    pub max_version: Option<String>,
}

impl TlsOptions {
    fn validate(&self, server: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        if self.cert_path.is_none() || self.key_path.is_none() {
            bail!("{server}: tls requires both cert_path and key_path");
        }
        let order = |v: &str| -> Result<u8> {
            match v {
                "1.0" => Ok(0),
                "1.1" => Ok(1),
                "1.2" => Ok(2),
                "1.3" => Ok(3),
                other => bail!("{server}: unsupported tls version {other:?}"),
            }
        };
        if let (Some(min), Some(max)) = (&self.min_version, &self.max_version) {
            if order(min)? > order(max)? {
                bail!("{server}: tls min_version {min} exceeds max_version {max}");
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsOptions {
    pub allowed_origins: Vec<String>,
    pub allowed_headers: Vec<String>,
}

/// Jaeger gRPC collector endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GrpcServerOptions {
    pub host_port: String,
    /// Max inbound gRPC message size in bytes.
    pub max_message_size: usize,
    pub max_connection_age_secs: u64,
    pub max_connection_age_grace_secs: u64,
    pub tls: TlsOptions,
}

impl Default for GrpcServerOptions {
    fn default() -> Self {
        Self {
            host_port: "0.0.0.0:14250".to_owned(),
            max_message_size: 4 * 1024 * 1024,
            max_connection_age_secs: 0,
            max_connection_age_grace_secs: 0,
            tls: TlsOptions::default(),
        }
    }
}

/// Jaeger HTTP (Thrift) collector endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpServerOptions {
    pub host_port: String,
    pub idle_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub read_header_timeout_secs: u64,
    pub tls: TlsOptions,
}

impl Default for HttpServerOptions {
    fn default() -> Self {
        Self {
            host_port: "0.0.0.0:14268".to_owned(),
            idle_timeout_secs: 0,
            read_timeout_secs: 0,
            read_header_timeout_secs: 2,
            tls: TlsOptions::default(),
        }
    }
}

/// OTLP receivers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OtlpOptions {
    pub enabled: bool,
    pub grpc_host_port: String,
    pub http_host_port: String,
}

impl Default for OtlpOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            grpc_host_port: "0.0.0.0:4317".to_owned(),
            http_host_port: "0.0.0.0:4318".to_owned(),
        }
    }
}

/// Zipkin HTTP receiver. Disabled unless a host:port is configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZipkinOptions {
    pub host_port: String,
    pub keep_alive: bool,
    pub cors: CorsOptions,
    pub tls: TlsOptions,
}

impl Default for ZipkinOptions {
    fn default() -> Self {
        Self {
            host_port: String::new(),
            keep_alive: true,
            cors: CorsOptions::default(),
            tls: TlsOptions::default(),
        }
    }
}

impl ZipkinOptions {
    pub fn enabled(&self) -> bool {
        !self.host_port.is_empty()
    }
}

/// Health/admin endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminOptions {
    pub host_port: String,
}

impl Default for AdminOptions {
    fn default() -> Self {
        Self {
            host_port: "0.0.0.0:14269".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogOptions {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

impl CollectorConfig {
    /// Loads configuration from an explicit TOML file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Tries the default config locations, falling back to defaults.
    pub fn load_or_default() -> Result<Self> {
        for location in DEFAULT_CONFIG_LOCATIONS {
            if Path::new(location).exists() {
                return Self::load_from_path(location);
            }
        }
        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.pipeline.queue_size == 0 {
            bail!("pipeline.queue_size must be positive");
        }
        if self.storage.max_traces == 0 {
            bail!("storage.max_traces must be positive");
        }
        if self.grpc.max_message_size == 0 {
            bail!("grpc.max_message_size must be positive");
        }
        validate_host_port("grpc.host_port", &self.grpc.host_port)?;
        validate_host_port("http.host_port", &self.http.host_port)?;
        validate_host_port("admin.host_port", &self.admin.host_port)?;
        if self.otlp.enabled {
            validate_host_port("otlp.grpc_host_port", &self.otlp.grpc_host_port)?;
            validate_host_port("otlp.http_host_port", &self.otlp.http_host_port)?;
        }
        if self.zipkin.enabled() {
            validate_host_port("zipkin.host_port", &self.zipkin.host_port)?;
        }
        self.grpc.tls.validate("grpc")?;
        self.http.tls.validate("http")?;
        self.zipkin.tls.validate("zipkin")?;
        Ok(())
    }
}

fn validate_host_port(field: &str, value: &str) -> Result<()> {
    value
        .parse::<SocketAddr>()
        .with_context(|| format!("{field}: invalid host:port {value:?}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = CollectorConfig::default();
        config.validate().unwrap();
        assert_eq!(config.pipeline.num_workers, 50);
        assert_eq!(config.pipeline.queue_size, 2000);
        assert_eq!(config.grpc.max_message_size, 4 * 1024 * 1024);
        assert!(config.otlp.enabled);
        assert!(config.zipkin.keep_alive);
        assert!(!config.zipkin.enabled());
        assert!(!config.tenancy.enabled);
    }

    #[test]
    fn parses_full_toml() {
        let raw = r#"
            [pipeline]
            num_workers = 4
            queue_size = 100
            dyn_queue_size_memory_mib = 256

            [pipeline.collector_tags]
            cluster = "dev"

            [storage]
            max_traces = 128

            [tenancy]
            enabled = true
            header = "x-tenant"
            tenants = ["acme"]

            [zipkin]
            host_port = "0.0.0.0:9411"
            keep_alive = false

            [log]
            level = "debug"
            format = "json"
        "#;
        let config: CollectorConfig = toml::from_str(raw).unwrap();
        config.validate().unwrap();
        assert_eq!(config.pipeline.num_workers, 4);
        assert_eq!(
            config.pipeline.dyn_queue_size_memory_bytes(),
            256 * 1024 * 1024
        );
        assert_eq!(config.pipeline.collector_tags["cluster"], "dev");
        assert_eq!(config.storage.max_traces, 128);
        assert!(config.tenancy.enabled);
        assert!(config.zipkin.enabled());
        assert!(!config.zipkin.keep_alive);
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn rejects_invalid_values() {
        let mut config = CollectorConfig::default();
        config.pipeline.queue_size = 0;
        assert!(config.validate().is_err());

        let mut config = CollectorConfig::default();
        config.grpc.host_port = "not-a-host-port".to_owned();
        assert!(config.validate().is_err());

        let mut config = CollectorConfig::default();
        config.http.tls.enabled = true;
        assert!(config.validate().is_err());

        let mut config = CollectorConfig::default();
        config.zipkin.host_port = "0.0.0.0:9411".to_owned();
        config.zipkin.tls = TlsOptions {
            enabled: true,
            cert_path: Some("c.pem".into()),
            key_path: Some("k.pem".into()),
            min_version: Some("1.3".into()),
            max_version: Some("1.2".into()),
            ..TlsOptions::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_from_path_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[storage]\nmax_traces = 9").unwrap();
        let config = CollectorConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.storage.max_traces, 9);

        assert!(CollectorConfig::load_from_path("/nonexistent/x.toml").is_err());
    }
}
