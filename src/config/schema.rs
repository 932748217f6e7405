//! Gateway configuration schema.
//!
//! This module defines the process-level configuration for the gateway.
//! All types derive Serde traits for deserialization from the TOML config
//! file; every field has a default so a minimal (or empty) file works.

use serde::{Deserialize, Serialize};

/// Root configuration for the webhook gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Where the rule-set and outbound body templates live on disk.
    pub rules: RulesConfig,

    /// Dispatch worker pool settings.
    pub dispatch: DispatchConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Rule-set and template file locations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Path to the rule-set JSON file.
    pub rules_path: String,

    /// Directory of outbound body templates, keyed by file name.
    pub templates_dir: String,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            rules_path: "rules.json".to_string(),
            templates_dir: "templates".to_string(),
        }
    }
}

/// Dispatch worker pool configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Number of dispatch workers consuming the job queue.
    pub workers: usize,

    /// Job queue capacity. Jobs arriving while the queue is full are dropped
    /// with a warning; the inbound response is never delayed.
    pub queue_capacity: usize,

    /// Grace period for draining queued jobs at shutdown, in seconds.
    pub shutdown_grace_secs: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_capacity: 256,
            shutdown_grace_secs: 5,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Inbound request timeout in seconds.
    pub request_secs: u64,

    /// Outbound hook delivery timeout in seconds.
    pub delivery_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            delivery_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
