//! In-Memory Identity Platform
//!
//! Simulates the hosted identity platform. The hosted-domain namespace is
//! global and first-come-first-served, which is exactly the collision
//! surface the identity binder's retry exists for.

use crate::domain::entities::{ClientRecord, DirectoryRecord};
use crate::domain::errors::{ComposeError, ComposeResult};
use crate::domain::ports::{ClientSpec, DirectorySpec, IdentityPlatform};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::short_id;

/// In-memory identity platform.
pub struct InMemoryIdentityPlatform {
    directories: DashMap<String, DirectoryRecord>,
    clients: DashMap<String, ClientRecord>,
    /// hosted domain -> owning directory
    domains: DashMap<String, String>,
}

impl InMemoryIdentityPlatform {
    pub fn new() -> Self {
        Self {
            directories: DashMap::new(),
            clients: DashMap::new(),
            domains: DashMap::new(),
        }
    }

    /// Seed an already-claimed hosted domain.
    pub fn with_claimed_domain(self, domain: &str) -> Self {
        self.domains
            .insert(domain.to_string(), "someone-else".to_string());
        self
    }
}

impl Default for InMemoryIdentityPlatform {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityPlatform for InMemoryIdentityPlatform {
    async fn create_directory(&self, spec: &DirectorySpec) -> ComposeResult<DirectoryRecord> {
        let record = DirectoryRecord {
            id: format!("dir-{}", short_id()),
            name: spec.name.clone(),
        };
        self.directories.insert(record.id.clone(), record.clone());
        tracing::debug!("created identity directory {}", record.id);
        Ok(record)
    }

    async fn create_client(&self, spec: &ClientSpec) -> ComposeResult<ClientRecord> {
        let record = ClientRecord {
            id: format!("client-{}", short_id()),
            directory_id: spec.directory_id.clone(),
        };
        self.clients.insert(record.id.clone(), record.clone());
        tracing::debug!("created identity client {}", record.id);
        Ok(record)
    }

    async fn claim_hosted_domain(
        &self,
        directory_id: &str,
        domain: &str,
    ) -> ComposeResult<String> {
        match self.domains.entry(domain.to_string()) {
            Entry::Occupied(_) => Err(ComposeError::Conflict(format!(
                "hosted domain '{}' is already claimed",
                domain
            ))),
            Entry::Vacant(entry) => {
                entry.insert(directory_id.to_string());
                Ok(domain.to_string())
            }
        }
    }
}
