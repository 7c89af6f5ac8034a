//! Network interface read/write against Azure Resource Manager.

use super::credential::TokenSource;
use super::operation::{arm_error_message, retry_after, OperationHandle, OperationState, OperationStatus};
use crate::config::{ARM_ENDPOINT, NETWORK_API_VERSION, OPERATION_TIMEOUT_SECS, POLL_INTERVAL_SECS};
use crate::error::SyncError;
use crate::models::NetworkInterface;
use async_trait::async_trait;
use colored::Colorize;
use reqwest::header::{HeaderMap, IF_MATCH, RETRY_AFTER};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

const ASYNC_OPERATION_HEADER: &str = "azure-asyncoperation";

/// Read/write access to a NIC's IP configuration list.
#[async_trait]
pub trait NetworkControlPlane: Send + Sync {
    /// # Errors
    /// `SyncError::Read`, or `SyncError::Credential` if no token could be obtained.
    async fn get_interface(
        &self,
        resource_group: &str,
        interface_name: &str,
    ) -> Result<NetworkInterface, SyncError>;

    /// Submit the full interface. The update is all-or-nothing.
    ///
    /// # Errors
    /// `SyncError::Write`, or `SyncError::Credential`.
    async fn update_interface(
        &self,
        resource_group: &str,
        interface_name: &str,
        interface: &NetworkInterface,
    ) -> Result<OperationHandle, SyncError>;

    /// Block until the update reaches a terminal state and return the final resource.
    ///
    /// # Errors
    /// `SyncError::Write` when the operation fails, is canceled or times out.
    async fn await_operation(&self, handle: OperationHandle)
        -> Result<NetworkInterface, SyncError>;
}

/// ARM REST client for `Microsoft.Network/networkInterfaces`.
pub struct ArmNetworkClient {
    http: reqwest::Client,
    credential: Arc<dyn TokenSource>,
    subscription_id: String,
    endpoint: String,
    poll_interval: Duration,
    timeout: Duration,
}

impl ArmNetworkClient {
    pub fn new(credential: impl TokenSource + 'static, subscription_id: impl Into<String>) -> Self {
        ArmNetworkClient {
            http: reqwest::Client::new(),
            credential: Arc::new(credential),
            subscription_id: subscription_id.into(),
            endpoint: ARM_ENDPOINT.to_string(),
            poll_interval: Duration::from_secs(POLL_INTERVAL_SECS),
            timeout: Duration::from_secs(OPERATION_TIMEOUT_SECS),
        }
    }

    /// Wait between polls when Azure sends no usable Retry-After.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Longest time to wait for an update to finish.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Point the client at another ARM endpoint (sovereign clouds).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn interface_url(&self, resource_group: &str, interface_name: &str) -> String {
        format!(
            "{endpoint}/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.Network/networkInterfaces/{nic}?api-version={NETWORK_API_VERSION}",
            endpoint = self.endpoint,
            sub = self.subscription_id,
            rg = resource_group,
            nic = interface_name,
        )
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        fail: impl Fn(String) -> SyncError,
    ) -> Result<(reqwest::StatusCode, HeaderMap, String), SyncError> {
        let token = self.credential.bearer_token().await?;
        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| fail(format!("request failed: {e}")))?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| fail(format!("error reading response body: {e}")))?;
        log::debug!("ARM response status={status} body.len()={}", body.len());
        if status.is_success() {
            Ok((status, headers, body))
        } else {
            Err(fail(format!("HTTP {status}: {}", arm_error_message(&body))))
        }
    }

    async fn get_status(&self, status_url: &str) -> Result<(OperationStatus, Duration), SyncError> {
        let fail = |cause: String| SyncError::write("await_operation", cause);
        let (_, headers, body) = self.send(self.http.get(status_url), fail).await?;
        let status = decode(&body).map_err(fail)?;
        let wait = retry_after(header_str(&headers, RETRY_AFTER.as_str()), self.poll_interval);
        Ok((status, wait))
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Decode a JSON body, reporting the failing JSON path.
fn decode<T: DeserializeOwned>(body: &str) -> Result<T, String> {
    let mut deserializer = serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        log::error!("OUTPUT START:\n\n{}\n\nOUTPUT END\n", body);
        format!("Error parsing JSON: path={} error={}", e.path(), e.inner())
    })
}

#[async_trait]
impl NetworkControlPlane for ArmNetworkClient {
    async fn get_interface(
        &self,
        resource_group: &str,
        interface_name: &str,
    ) -> Result<NetworkInterface, SyncError> {
        let url = self.interface_url(resource_group, interface_name);
        log::info!("Reading NIC {resource_group}/{interface_name}");
        let fail = |cause: String| SyncError::read("get_interface", cause);
        let (_, _, body) = self.send(self.http.get(&url), fail).await?;
        decode(&body).map_err(fail)
    }

    async fn update_interface(
        &self,
        resource_group: &str,
        interface_name: &str,
        interface: &NetworkInterface,
    ) -> Result<OperationHandle, SyncError> {
        let url = self.interface_url(resource_group, interface_name);
        let mut request = self.http.put(&url).json(interface);
        if let Some(etag) = &interface.etag {
            request = request.header(IF_MATCH, etag.as_str());
        }
        let fail = |cause: String| SyncError::write("update_interface", cause);
        let (status, headers, body) = self.send(request, fail).await?;
        log::info!("Update of {interface_name} accepted: {status}");

        match header_str(&headers, ASYNC_OPERATION_HEADER) {
            Some(status_url) => Ok(OperationHandle::Pending {
                status_url: status_url.to_string(),
                retry_after: retry_after(
                    header_str(&headers, RETRY_AFTER.as_str()),
                    self.poll_interval,
                ),
                resource_group: resource_group.to_string(),
                interface_name: interface_name.to_string(),
            }),
            None => decode(&body).map(OperationHandle::Completed).map_err(fail),
        }
    }

    async fn await_operation(
        &self,
        handle: OperationHandle,
    ) -> Result<NetworkInterface, SyncError> {
        let (status_url, mut wait, resource_group, interface_name) = match handle {
            OperationHandle::Completed(interface) => return Ok(interface),
            OperationHandle::Pending {
                status_url,
                retry_after,
                resource_group,
                interface_name,
            } => (status_url, retry_after, resource_group, interface_name),
        };

        let timed_out = || {
            SyncError::write(
                "await_operation",
                format!("timed out after {}s", self.timeout.as_secs()),
            )
        };
        let deadline = tokio::time::Instant::now() + self.timeout;
        loop {
            let now = tokio::time::Instant::now();
            if now >= deadline {
                return Err(timed_out());
            }
            // A wait past the deadline is cut short for one final poll.
            let remaining = deadline - now;
            let last_poll = wait >= remaining;
            let wait_now = wait.min(remaining);
            log::info!(
                "Waiting {}ms for update of {interface_name} ...",
                wait_now.as_millis()
            );
            tokio::time::sleep(wait_now).await;

            let (status, next_wait) = self.get_status(&status_url).await?;
            match status.state() {
                OperationState::Succeeded => break,
                OperationState::Failed(detail) => {
                    log::warn!("{} update of {interface_name}: {detail}", "failed".on_red());
                    return Err(SyncError::write("await_operation", detail));
                }
                OperationState::InProgress if last_poll => return Err(timed_out()),
                OperationState::InProgress => {
                    log::debug!("Operation status={}", status.status);
                    wait = next_wait;
                }
            }
        }

        self.get_interface(&resource_group, &interface_name)
            .await
            .map_err(|e| match e {
                SyncError::Read { cause, .. } => SyncError::write("await_operation", cause),
                other => other,
            })
    }
}
