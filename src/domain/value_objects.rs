//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use crate::domain::errors::{ComposeError, ComposeResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Routing class of a subnet group.
///
/// Classifies reachability: `Public` subnets route to and from the internet,
/// `PrivateRouted` subnets have egress through a NAT path only, `Isolated`
/// subnets have no external routing at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoutingClass {
    Public,
    PrivateRouted,
    Isolated,
}

impl RoutingClass {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::PrivateRouted => "private-routed",
            Self::Isolated => "isolated",
        }
    }
}

impl std::fmt::Display for RoutingClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transport protocol for security-boundary ingress rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportProtocol {
    Tcp,
    Udp,
}

/// Application protocol for routing targets, listeners, and origins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppProtocol {
    Http,
    Https,
}

/// Unique identifier for a virtual network.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkId(pub String);

impl NetworkId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NetworkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a security boundary.
///
/// Cross-boundary "allow traffic from X" relationships reference this
/// identity directly, never a resolved address range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundaryId(pub String);

impl BoundaryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BoundaryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a routing target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetId(pub String);

impl TargetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a compute service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceId(pub String);

impl ServiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ServiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of a security-boundary ingress rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleSource {
    /// Unrestricted: any origin may connect.
    Anywhere,
    /// Only traffic originating from the referenced boundary.
    Boundary(BoundaryId),
}

/// Path pattern matched by conditional listener rules.
///
/// `*` matches any run of characters (including none), `?` matches exactly
/// one character; the pattern is anchored at both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathPattern(String);

impl PathPattern {
    /// Create a pattern. A blank pattern is rejected.
    pub fn new(pattern: impl Into<String>) -> ComposeResult<Self> {
        let pattern = pattern.into();
        if pattern.trim().is_empty() {
            return Err(ComposeError::Configuration(
                "path pattern must not be empty".to_string(),
            ));
        }
        Ok(Self(pattern))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a request path matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        wildcard_match(&self.0, path)
    }
}

impl std::fmt::Display for PathPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Anchored wildcard match with iterative backtracking over `*`.
fn wildcard_match(pattern: &str, input: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let s: Vec<char> = input.chars().collect();
    let (mut pi, mut si) = (0usize, 0usize);
    let mut star: Option<usize> = None;
    let mut mark = 0usize;

    while si < s.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == s[si]) {
            pi += 1;
            si += 1;
        } else if pi < p.len() && p[pi] == '*' {
            star = Some(pi);
            mark = si;
            pi += 1;
        } else if let Some(star_pos) = star {
            // widen the last '*' by one character and retry
            pi = star_pos + 1;
            mark += 1;
            si = mark;
        } else {
            return false;
        }
    }

    while pi < p.len() && p[pi] == '*' {
        pi += 1;
    }
    pi == p.len()
}

/// Header map operated on by edge mutation hooks.
///
/// Keys compare case-insensitively at the edge; hooks must not rely on the
/// stored casing.
pub type HeaderMap = BTreeMap<String, String>;

/// A pure request-rewrite applied at the edge before origin dispatch.
///
/// Hooks are declared as data so the chain can be compiled for the edge
/// platform and inspected in tests. They apply in declaration order; each
/// hook must be a pure function of the header map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationHook {
    /// Remove the named header if present; no-op otherwise. Idempotent.
    StripHeader { name: String },
}

impl MutationHook {
    pub fn strip_header(name: impl Into<String>) -> Self {
        Self::StripHeader { name: name.into() }
    }

    /// Apply this hook to a header map.
    pub fn apply(&self, headers: &mut HeaderMap) {
        match self {
            Self::StripHeader { name } => {
                headers.retain(|key, _| !key.eq_ignore_ascii_case(name));
            }
        }
    }

    /// Apply an ordered chain of hooks.
    pub fn apply_chain(hooks: &[MutationHook], headers: &mut HeaderMap) {
        for hook in hooks {
            hook.apply(headers);
        }
    }
}

/// Viewer protocol policy of an edge distribution.
///
/// The composer always selects `RedirectToHttps`: the auth gate downstream
/// assumes a single canonical scheme. The other values exist because they
/// are part of the edge platform's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewerProtocolPolicy {
    AllowAll,
    RedirectToHttps,
    HttpsOnly,
}

impl Default for ViewerProtocolPolicy {
    fn default() -> Self {
        Self::RedirectToHttps
    }
}

/// Network address of an edge distribution's origin.
///
/// The origin is referenced by hostname, not an object handle, and connects
/// on its own configured port. That port matches the frontend's listener
/// only by configuration, never by assumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginAddress {
    pub hostname: String,
    pub port: u16,
}

/// Identity binding for an authenticate-then-forward listener action.
///
/// Unauthenticated traffic hitting a gated rule is redirected to the
/// identity provider's hosted domain before the forward step runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthGate {
    pub directory_id: String,
    pub client_id: String,
    pub hosted_domain: String,
}

/// Log delivery configuration handed to the compute platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogDelivery {
    pub stream_prefix: String,
    pub mode: LogDeliveryMode,
}

/// Delivery mode of the streaming log driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogDeliveryMode {
    /// Log calls stall the task when the delivery buffer is full.
    Blocking,
    /// Log calls drop on a full buffer instead of stalling the task.
    NonBlocking,
}
