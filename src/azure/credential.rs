//! Service principal credential.
//!
//! Exchanges the client id and secret for ARM bearer tokens.

use crate::config::{Secrets, ARM_SCOPE};
use crate::error::SyncError;
use async_trait::async_trait;
use azure_core::auth::TokenCredential;
use azure_identity::{ClientSecretCredential, TokenCredentialOptions};
use std::sync::Arc;

/// Anything that can hand out ARM bearer tokens.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// # Errors
    /// `SyncError::Credential` when no token can be obtained.
    async fn bearer_token(&self) -> Result<String, SyncError>;
}

/// Token source for the Azure Resource Manager API.
#[derive(Clone)]
pub struct ServicePrincipal {
    credential: Arc<ClientSecretCredential>,
    client_id: String,
}

impl ServicePrincipal {
    pub fn new(secrets: &Secrets) -> Self {
        let credential = ClientSecretCredential::new(
            azure_core::new_http_client(),
            secrets.sp_tenant_id.clone(),
            secrets.sp_client_id.clone(),
            secrets.sp_secret.clone(),
            TokenCredentialOptions::default(),
        );
        ServicePrincipal {
            credential: Arc::new(credential),
            client_id: secrets.sp_client_id.clone(),
        }
    }
}

#[async_trait]
impl TokenSource for ServicePrincipal {
    async fn bearer_token(&self) -> Result<String, SyncError> {
        let token = self
            .credential
            .get_token(&[ARM_SCOPE])
            .await
            .map_err(|e| {
                SyncError::Credential(format!(
                    "token exchange for client {} failed: {e}",
                    self.client_id
                ))
            })?;
        log::debug!("Got ARM token for client {}", self.client_id);
        Ok(token.token.secret().to_string())
    }
}
