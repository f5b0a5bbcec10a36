//! Identity Binder - Directory, client, and hosted-domain registration
//!
//! Registers the identity side of the authentication gate: a user directory
//! with self-service sign-up, a public client restricted to that directory,
//! and a hosted domain for the sign-in pages. Hosted domain names live in a
//! platform-wide namespace, so the binder derives a suffix from the account
//! identifier when one exists and otherwise generates a random one, retrying
//! on collisions.

use crate::config::DeploymentContext;
use crate::domain::entities::{ClientRecord, DirectoryRecord};
use crate::domain::errors::{ComposeError, ComposeResult};
use crate::domain::ports::{ClientSpec, DirectorySpec, IdentityPlatform, VerificationTemplate};
use crate::domain::value_objects::AuthGate;
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

const MAX_DOMAIN_ATTEMPTS: u32 = 3;
const DOMAIN_SUFFIX_LEN: usize = 6;

/// The identity resources backing the authentication gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRegistration {
    pub directory: DirectoryRecord,
    pub client: ClientRecord,
    pub hosted_domain: String,
}

impl IdentityRegistration {
    /// The gate attached to authenticated listener rules.
    pub fn auth_gate(&self) -> AuthGate {
        AuthGate {
            directory_id: self.directory.id.clone(),
            client_id: self.client.id.clone(),
            hosted_domain: self.hosted_domain.clone(),
        }
    }
}

/// Register directory, client, and hosted domain with the identity platform.
pub async fn register_identity(
    ctx: &DeploymentContext,
    platform: &dyn IdentityPlatform,
) -> ComposeResult<IdentityRegistration> {
    let directory = platform
        .create_directory(&DirectorySpec {
            name: format!("{}-users", ctx.name_prefix),
            self_service_signup: true,
            email_sign_in: true,
            verification: VerificationTemplate::default(),
        })
        .await?;
    tracing::info!(directory = %directory.id, "identity directory created");

    let client = platform
        .create_client(&ClientSpec {
            directory_id: directory.id.clone(),
            generate_secret: false,
            directory_sign_in_only: true,
        })
        .await?;
    tracing::info!(client = %client.id, "identity client created");

    let hosted_domain = claim_hosted_domain(ctx, platform, &directory.id).await?;
    tracing::info!("hosted identity domain claimed: {}", hosted_domain);

    Ok(IdentityRegistration {
        directory,
        client,
        hosted_domain,
    })
}

/// Claim a hosted domain, regenerating the suffix on collisions.
async fn claim_hosted_domain(
    ctx: &DeploymentContext,
    platform: &dyn IdentityPlatform,
    directory_id: &str,
) -> ComposeResult<String> {
    let mut candidate = format!(
        "{}-{}",
        ctx.name_prefix,
        initial_suffix(ctx.account_id.as_deref())
    );
    let mut last_conflict = None;

    for attempt in 1..=MAX_DOMAIN_ATTEMPTS {
        match platform.claim_hosted_domain(directory_id, &candidate).await {
            Ok(domain) => return Ok(domain),
            Err(ComposeError::Conflict(reason)) => {
                tracing::warn!(
                    "hosted domain '{}' unavailable (attempt {}/{}), retrying with a random suffix",
                    candidate,
                    attempt,
                    MAX_DOMAIN_ATTEMPTS
                );
                last_conflict = Some(ComposeError::Conflict(reason));
                candidate = format!("{}-{}", ctx.name_prefix, random_suffix());
            }
            Err(other) => return Err(other),
        }
    }

    Err(last_conflict
        .unwrap_or_else(|| ComposeError::Conflict("hosted domain claim failed".to_string())))
}

/// Suffix for the first claim attempt: the tail of the account identifier
/// when one is long enough, otherwise random. A fixed placeholder would
/// collide across deployments, so there is none.
fn initial_suffix(account_id: Option<&str>) -> String {
    match account_id.map(str::trim) {
        Some(account) if account.chars().count() >= DOMAIN_SUFFIX_LEN => {
            let skip = account.chars().count() - DOMAIN_SUFFIX_LEN;
            account.chars().skip(skip).collect::<String>().to_lowercase()
        }
        _ => random_suffix(),
    }
}

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(DOMAIN_SUFFIX_LEN)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    // ===== Mock Identity Platform =====

    struct MockIdentity {
        claimed: Mutex<Vec<String>>,
        attempts: Mutex<Vec<String>>,
        /// Refuse every claim regardless of name.
        always_conflict: bool,
    }

    impl MockIdentity {
        fn new() -> Self {
            Self {
                claimed: Mutex::new(Vec::new()),
                attempts: Mutex::new(Vec::new()),
                always_conflict: false,
            }
        }

        fn with_claimed(self, domain: &str) -> Self {
            self.claimed.lock().unwrap().push(domain.to_string());
            self
        }
    }

    #[async_trait]
    impl IdentityPlatform for MockIdentity {
        async fn create_directory(
            &self,
            spec: &DirectorySpec,
        ) -> ComposeResult<DirectoryRecord> {
            Ok(DirectoryRecord {
                id: "dir-1".to_string(),
                name: spec.name.clone(),
            })
        }

        async fn create_client(&self, spec: &ClientSpec) -> ComposeResult<ClientRecord> {
            Ok(ClientRecord {
                id: "client-1".to_string(),
                directory_id: spec.directory_id.clone(),
            })
        }

        async fn claim_hosted_domain(
            &self,
            _directory_id: &str,
            domain: &str,
        ) -> ComposeResult<String> {
            self.attempts.lock().unwrap().push(domain.to_string());
            if self.always_conflict || self.claimed.lock().unwrap().contains(&domain.to_string())
            {
                return Err(ComposeError::Conflict(format!(
                    "hosted domain '{}' is already claimed",
                    domain
                )));
            }
            self.claimed.lock().unwrap().push(domain.to_string());
            Ok(domain.to_string())
        }
    }

    fn ctx_with_account(account: Option<&str>) -> DeploymentContext {
        DeploymentContext {
            name_prefix: "test".to_string(),
            account_id: account.map(str::to_string),
            ..DeploymentContext::default()
        }
    }

    // ===== Suffix Derivation Tests =====

    #[test]
    fn test_suffix_from_account_tail() {
        assert_eq!(initial_suffix(Some("123456789012")), "789012");
        assert_eq!(initial_suffix(Some("ABCDEF")), "abcdef");
    }

    #[test]
    fn test_short_account_falls_back_to_random() {
        let suffix = initial_suffix(Some("123"));

        assert_eq!(suffix.len(), DOMAIN_SUFFIX_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(suffix, suffix.to_lowercase());
    }

    #[test]
    fn test_missing_account_falls_back_to_random() {
        let suffix = initial_suffix(None);

        assert_eq!(suffix.len(), DOMAIN_SUFFIX_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    // ===== Registration Tests =====

    #[tokio::test]
    async fn test_register_identity_produces_gate() {
        let platform = MockIdentity::new();

        let registration = register_identity(&ctx_with_account(Some("123456789012")), &platform)
            .await
            .unwrap();

        assert_eq!(registration.hosted_domain, "test-789012");
        let gate = registration.auth_gate();
        assert_eq!(gate.directory_id, "dir-1");
        assert_eq!(gate.client_id, "client-1");
        assert_eq!(gate.hosted_domain, "test-789012");
    }

    #[tokio::test]
    async fn test_domain_collision_retries_with_random_suffix() {
        let platform = MockIdentity::new().with_claimed("test-789012");

        let registration = register_identity(&ctx_with_account(Some("123456789012")), &platform)
            .await
            .unwrap();

        assert_ne!(registration.hosted_domain, "test-789012");
        assert!(registration.hosted_domain.starts_with("test-"));
        assert_eq!(platform.attempts.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_exhausted_retries_surface_conflict() {
        let platform = MockIdentity {
            always_conflict: true,
            ..MockIdentity::new()
        };

        let err = register_identity(&ctx_with_account(None), &platform)
            .await
            .unwrap_err();

        assert!(matches!(err, ComposeError::Conflict(_)));
        assert_eq!(
            platform.attempts.lock().unwrap().len(),
            MAX_DOMAIN_ATTEMPTS as usize
        );
    }

    #[tokio::test]
    async fn test_platform_error_is_not_retried() {
        struct FailingIdentity;

        #[async_trait]
        impl IdentityPlatform for FailingIdentity {
            async fn create_directory(
                &self,
                spec: &DirectorySpec,
            ) -> ComposeResult<DirectoryRecord> {
                Ok(DirectoryRecord {
                    id: "dir-1".to_string(),
                    name: spec.name.clone(),
                })
            }

            async fn create_client(&self, spec: &ClientSpec) -> ComposeResult<ClientRecord> {
                Ok(ClientRecord {
                    id: "client-1".to_string(),
                    directory_id: spec.directory_id.clone(),
                })
            }

            async fn claim_hosted_domain(
                &self,
                _directory_id: &str,
                _domain: &str,
            ) -> ComposeResult<String> {
                Err(ComposeError::Platform("identity plane outage".to_string()))
            }
        }

        let err = register_identity(&ctx_with_account(None), &FailingIdentity)
            .await
            .unwrap_err();

        assert!(matches!(err, ComposeError::Platform(_)));
    }
}
