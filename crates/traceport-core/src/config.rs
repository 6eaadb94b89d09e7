//! Configuration management for Traceport

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration struct
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// Logical service name reported in every exported batch
    pub service_name: String,

    /// Agent endpoint configuration
    pub agent: AgentConfig,

    /// Static tags merged into the process identity of every batch
    pub tags: Vec<(String, serde_json::Value)>,

    /// Span-name prefix to service-name routing, in configuration order
    pub routing: Vec<(String, String)>,
}

impl ExporterConfig {
    /// Create a configuration for the given service with default agent settings
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            agent: AgentConfig::default(),
            tags: Vec::new(),
            routing: Vec::new(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.service_name.is_empty() {
            return Err(Error::config("service_name must not be empty"));
        }
        if self.agent.host.is_empty() {
            return Err(Error::config("agent.host must not be empty"));
        }
        Ok(())
    }
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self::new("")
    }
}

/// Agent endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Host of the agent accepting compact-protocol batches over UDP
    pub host: String,
    /// UDP port of the agent
    pub port: u16,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6831,
        }
    }
}
