//! Deployment Configuration
//!
//! The deployment context carries the contract constants of this topology
//! (ports, image, sizing, the gated path) plus the optional network
//! selectors. Explicit context always wins over the environment: the
//! `EDGESTACK_*` variables only fill selector fields that are still unset.

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct DeploymentContext {
    /// Prefix for every logical resource name in this topology.
    pub name_prefix: String,

    // Network selection (see the network resolver for precedence)
    pub network_id: Option<String>,
    pub network_name: Option<String>,

    /// Platform account identifier, used to derive the hosted identity
    /// domain suffix when available.
    pub account_id: Option<String>,

    // Deployment port contract
    pub listener_port: u16,
    pub container_port: u16,
    /// Port the edge cache connects to the frontend on. Matches the public
    /// listener port by configuration, never by assumption.
    pub origin_http_port: u16,

    // Compute service sizing
    pub image: String,
    pub cpu: u32,
    pub memory_mib: u32,
    pub desired_count: u32,

    // Routing target health-check contract
    pub health_check_path: String,
    pub health_check_interval_secs: u64,

    // Authenticated path rule
    pub secure_path_pattern: String,
    pub secure_rule_priority: u16,

    /// Untrusted header stripped at the edge before origin dispatch.
    pub strip_header: String,

    pub log_stream_prefix: String,
    pub debug: bool,
}

impl Default for DeploymentContext {
    fn default() -> Self {
        Self {
            name_prefix: "edgestack".to_string(),
            network_id: None,
            network_name: None,
            account_id: None,
            listener_port: 8080,
            container_port: 80,
            origin_http_port: 8080,
            image: "nginx:stable".to_string(),
            cpu: 512,
            memory_mib: 1024,
            desired_count: 2,
            health_check_path: "/".to_string(),
            health_check_interval_secs: 30,
            secure_path_pattern: "/secure/*".to_string(),
            secure_rule_priority: 10,
            strip_header: "x-exploit-activate".to_string(),
            log_stream_prefix: "web".to_string(),
            debug: false,
        }
    }
}

impl DeploymentContext {
    /// Fill unset selector fields from fallback values.
    ///
    /// Fields already set explicitly are never overwritten; this is the
    /// precedence rule between structured context and process environment.
    pub fn fill_selection_fallback(
        &mut self,
        network_id: Option<String>,
        network_name: Option<String>,
        account_id: Option<String>,
    ) {
        if self.network_id.is_none() {
            self.network_id = network_id;
        }
        if self.network_name.is_none() {
            self.network_name = network_name;
        }
        if self.account_id.is_none() {
            self.account_id = account_id;
        }
    }
}

/// Load the deployment context from the environment.
pub fn load_config() -> anyhow::Result<DeploymentContext> {
    let mut ctx = DeploymentContext {
        name_prefix: std::env::var("EDGESTACK_NAME_PREFIX")
            .unwrap_or_else(|_| "edgestack".to_string()),
        image: std::env::var("EDGESTACK_IMAGE").unwrap_or_else(|_| "nginx:stable".to_string()),
        desired_count: std::env::var("EDGESTACK_DESIRED_COUNT")
            .unwrap_or_else(|_| "2".to_string())
            .parse()
            .unwrap_or(2),
        debug: std::env::var("DEBUG").is_ok(),
        ..DeploymentContext::default()
    };

    // A variable that is set but blank stays visible to the resolver, which
    // rejects blank selectors instead of silently falling through.
    ctx.fill_selection_fallback(
        std::env::var("EDGESTACK_NETWORK_ID").ok(),
        std::env::var("EDGESTACK_NETWORK_NAME").ok(),
        std::env::var("EDGESTACK_ACCOUNT_ID").ok(),
    );

    Ok(ctx)
}
