//! Identity Platform Port
//!
//! Defines the interface to the hosted user directory and token-issuance
//! platform. The redirect protocol used by gated listener rules belongs to
//! the platform; this crate only creates the directory, the client, and the
//! hosted domain they are reachable under.

use crate::domain::entities::{ClientRecord, DirectoryRecord};
use crate::domain::errors::ComposeResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Verification message sent to new directory members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationTemplate {
    pub subject: String,
    /// Body text; `{####}` is replaced with the verification code.
    pub body: String,
}

impl Default for VerificationTemplate {
    fn default() -> Self {
        Self {
            subject: "Verify your email for our app".to_string(),
            body: "Hello, verify your email: {####}".to_string(),
        }
    }
}

/// Specification of an identity directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorySpec {
    pub name: String,
    pub self_service_signup: bool,
    pub email_sign_in: bool,
    pub verification: VerificationTemplate,
}

/// Specification of a directory client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSpec {
    pub directory_id: String,
    /// Public client pattern: no shared secret is generated.
    pub generate_secret: bool,
    /// Sign-in restricted to the directory itself, no external federation.
    pub directory_sign_in_only: bool,
}

/// Access to the identity platform.
#[async_trait]
pub trait IdentityPlatform: Send + Sync {
    async fn create_directory(&self, spec: &DirectorySpec) -> ComposeResult<DirectoryRecord>;

    async fn create_client(&self, spec: &ClientSpec) -> ComposeResult<ClientRecord>;

    /// Claim a hosted domain name for the directory. The namespace is
    /// platform-wide: a name already claimed by anyone is a `Conflict`.
    async fn claim_hosted_domain(
        &self,
        directory_id: &str,
        domain: &str,
    ) -> ComposeResult<String>;
}
