//! Integration tests for azure-ipconfig-sync
//!
//! These tests run the full read-compare-write pass against an in-memory
//! control plane.

use async_trait::async_trait;
use azure_ipconfig_sync::azure::{NetworkControlPlane, OperationHandle};
use azure_ipconfig_sync::config::SiteConfig;
use azure_ipconfig_sync::locator::{OnPremLocator, RouterLocator, StaticLocator};
use azure_ipconfig_sync::models::{NetworkInterface, OnPremAddressSet};
use azure_ipconfig_sync::{Reconciler, RunOptions, SyncError};
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::Duration;

const NIC_FIXTURE: &str = "src/tests/test_data/nic_test_01.json";

fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

fn ips(list: &[&str]) -> Vec<IpAddr> {
    list.iter().map(|s| ip(s)).collect()
}

fn site() -> SiteConfig {
    SiteConfig {
        resource_group: "lisp-rg".to_string(),
        csr_azure_intf_name: "csr-nic-inside".to_string(),
        site_name: "site-azure".to_string(),
    }
}

fn fixture_nic() -> NetworkInterface {
    let json = std::fs::read_to_string(NIC_FIXTURE).expect("Error reading NIC fixture");
    serde_json::from_str(&json).expect("Error parsing NIC fixture")
}

/// Control plane holding one NIC in memory.
struct FakeControlPlane {
    nic: Mutex<NetworkInterface>,
    updates: Mutex<Vec<NetworkInterface>>,
    pending: bool,
    fail_update: bool,
}

impl FakeControlPlane {
    fn new(nic: NetworkInterface) -> Self {
        FakeControlPlane {
            nic: Mutex::new(nic),
            updates: Mutex::new(vec![]),
            pending: false,
            fail_update: false,
        }
    }

    fn update_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }

    fn current(&self) -> NetworkInterface {
        self.nic.lock().unwrap().clone()
    }
}

#[async_trait]
impl NetworkControlPlane for FakeControlPlane {
    async fn get_interface(
        &self,
        resource_group: &str,
        interface_name: &str,
    ) -> Result<NetworkInterface, SyncError> {
        assert_eq!(resource_group, "lisp-rg");
        if interface_name != "csr-nic-inside" {
            return Err(SyncError::read("get_interface", "HTTP 404: ResourceNotFound"));
        }
        Ok(self.current())
    }

    async fn update_interface(
        &self,
        resource_group: &str,
        interface_name: &str,
        interface: &NetworkInterface,
    ) -> Result<OperationHandle, SyncError> {
        if self.fail_update {
            return Err(SyncError::write("update_interface", "HTTP 400: PrivateIPAddressInUse"));
        }
        self.updates.lock().unwrap().push(interface.clone());
        *self.nic.lock().unwrap() = interface.clone();
        if self.pending {
            Ok(OperationHandle::Pending {
                status_url: "https://example.invalid/operations/1".to_string(),
                retry_after: Duration::from_secs(0),
                resource_group: resource_group.to_string(),
                interface_name: interface_name.to_string(),
            })
        } else {
            Ok(OperationHandle::Completed(interface.clone()))
        }
    }

    async fn await_operation(
        &self,
        handle: OperationHandle,
    ) -> Result<NetworkInterface, SyncError> {
        match handle {
            OperationHandle::Completed(nic) => Ok(nic),
            OperationHandle::Pending { .. } => Ok(self.current()),
        }
    }
}

struct FailingLocator;

impl OnPremLocator for FailingLocator {
    fn list_on_prem_addresses(&self, _site_name: &str) -> Result<OnPremAddressSet, SyncError> {
        Err(SyncError::Locator("dohost: command not found".to_string()))
    }
}

#[tokio::test]
async fn test_unchanged_when_on_prem_matches() {
    let reconciler = Reconciler::new(
        site(),
        FakeControlPlane::new(fixture_nic()),
        StaticLocator::new(ips(&["10.100.100.20"])),
    );
    let report = reconciler.run().await.expect("run failed");
    assert!(report.plan.is_unchanged());
    assert!(report.written);
    assert_eq!(reconciler.control_plane().current(), fixture_nic());
}

#[tokio::test]
async fn test_stale_secondary_removed() {
    let reconciler = Reconciler::new(
        site(),
        FakeControlPlane::new(fixture_nic()),
        StaticLocator::new(vec![]),
    );
    let report = reconciler.run().await.expect("run failed");
    assert_eq!(report.plan.dropped.len(), 1);
    let nic = reconciler.control_plane().current();
    assert_eq!(nic.addresses(), ips(&["10.0.0.4"]));
    assert_eq!(nic.primary_configuration(), fixture_nic().primary_configuration());
}

#[tokio::test]
async fn test_new_secondary_added_and_other_members_kept() {
    let reconciler = Reconciler::new(
        site(),
        FakeControlPlane::new(fixture_nic()),
        StaticLocator::new(ips(&["10.100.100.20", "10.100.100.31"])),
    );
    reconciler.run().await.expect("run failed");

    let nic = reconciler.control_plane().current();
    assert_eq!(
        nic.addresses(),
        ips(&["10.0.0.4", "10.100.100.20", "10.100.100.31"])
    );
    let added = &nic.ip_configurations()[2];
    assert_eq!(added.name(), "ipconfig_remote_10.100.100.31");
    assert_eq!(added.subnet(), fixture_nic().ip_configurations()[0].subnet());

    let original = fixture_nic();
    assert_eq!(nic.extra, original.extra);
    assert_eq!(nic.properties.extra, original.properties.extra);
    assert_eq!(nic.etag, original.etag);
}

#[tokio::test]
async fn test_second_run_is_a_no_op() {
    let locator = StaticLocator::new(ips(&["10.100.100.31", "10.100.100.32"]));
    let reconciler = Reconciler::new(site(), FakeControlPlane::new(fixture_nic()), locator);

    let first = reconciler.run().await.expect("first run failed");
    assert!(!first.plan.is_unchanged());
    let after_first = reconciler.control_plane().current();

    let second = reconciler.run().await.expect("second run failed");
    assert!(second.plan.is_unchanged());
    assert_eq!(reconciler.control_plane().current(), after_first);
}

#[tokio::test]
async fn test_pending_operation_is_awaited() {
    let mut control_plane = FakeControlPlane::new(fixture_nic());
    control_plane.pending = true;
    let reconciler = Reconciler::new(
        site(),
        control_plane,
        StaticLocator::new(ips(&["10.100.100.33"])),
    );
    let report = reconciler.run().await.expect("run failed");
    assert!(report.written);
    assert_eq!(reconciler.control_plane().update_count(), 1);
}

#[tokio::test]
async fn test_dry_run_does_not_write() {
    let reconciler = Reconciler::new(
        site(),
        FakeControlPlane::new(fixture_nic()),
        StaticLocator::new(ips(&["10.100.100.31"])),
    )
    .with_options(RunOptions { dry_run: true });
    let report = reconciler.run().await.expect("run failed");
    assert!(!report.written);
    assert_eq!(report.plan.added, ips(&["10.100.100.31"]));
    assert_eq!(reconciler.control_plane().update_count(), 0);
}

#[tokio::test]
async fn test_no_primary_aborts_before_write() {
    let mut nic = fixture_nic();
    nic.properties.ip_configurations[0].properties.primary = Some(false);
    let reconciler = Reconciler::new(
        site(),
        FakeControlPlane::new(nic),
        StaticLocator::default(),
    );
    let err = reconciler.run().await.unwrap_err();
    assert!(matches!(err, SyncError::Compute(_)));
    assert_eq!(err.exit_code(), 6);
    assert_eq!(reconciler.control_plane().update_count(), 0);
}

#[tokio::test]
async fn test_locator_failure_aborts_before_write() {
    let reconciler = Reconciler::new(site(), FakeControlPlane::new(fixture_nic()), FailingLocator);
    let err = reconciler.run().await.unwrap_err();
    assert!(matches!(err, SyncError::Locator(_)));
    assert_eq!(reconciler.control_plane().update_count(), 0);
}

#[tokio::test]
async fn test_read_failure() {
    let mut wrong_site = site();
    wrong_site.csr_azure_intf_name = "missing-nic".to_string();
    let reconciler = Reconciler::new(
        wrong_site,
        FakeControlPlane::new(fixture_nic()),
        StaticLocator::default(),
    );
    let err = reconciler.run().await.unwrap_err();
    assert!(matches!(err, SyncError::Read { step: "get_interface", .. }));
}

#[tokio::test]
async fn test_write_failure_leaves_nic_unchanged() {
    let mut control_plane = FakeControlPlane::new(fixture_nic());
    control_plane.fail_update = true;
    let reconciler = Reconciler::new(
        site(),
        control_plane,
        StaticLocator::new(ips(&["10.100.100.31"])),
    );
    let err = reconciler.run().await.unwrap_err();
    assert!(matches!(err, SyncError::Write { .. }));
    assert_eq!(reconciler.control_plane().current(), fixture_nic());
}

fn router_output(_cmd: &str) -> Result<String, String> {
    std::fs::read_to_string("src/tests/test_data/lisp_database_01.txt").map_err(|e| e.to_string())
}

#[tokio::test]
async fn test_router_locator_end_to_end() {
    let locator = RouterLocator::default().with_runner(router_output);
    let reconciler = Reconciler::new(site(), FakeControlPlane::new(fixture_nic()), locator);
    let report = reconciler.run().await.expect("run failed");
    assert_eq!(report.plan.kept, ips(&["10.100.100.20"]));
    assert_eq!(report.plan.added, ips(&["10.100.100.31"]));
}
