//! One read-compare-write pass over a NIC.

use crate::azure::NetworkControlPlane;
use crate::config::SiteConfig;
use crate::error::SyncError;
use crate::locator::OnPremLocator;
use crate::processing::{reconcile, ReconcilePlan};
use itertools::Itertools;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Compute and log the new list without writing it.
    pub dry_run: bool,
}

/// What a run did.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub plan: ReconcilePlan,
    /// False for dry runs.
    pub written: bool,
}

/// Syncs the secondary ipconfigs of one NIC with the on-prem addresses of one site.
pub struct Reconciler<C, L> {
    site: SiteConfig,
    control_plane: C,
    locator: L,
    options: RunOptions,
}

impl<C: NetworkControlPlane, L: OnPremLocator> Reconciler<C, L> {
    pub fn new(site: SiteConfig, control_plane: C, locator: L) -> Self {
        Reconciler {
            site,
            control_plane,
            locator,
            options: RunOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn control_plane(&self) -> &C {
        &self.control_plane
    }

    /// Fetch the NIC, fetch the on-prem set, reconcile, write and wait.
    ///
    /// Fails fast: the first error ends the run and nothing is written.
    pub async fn run(&self) -> Result<RunReport, SyncError> {
        let rg = &self.site.resource_group;
        let nic = &self.site.csr_azure_intf_name;

        let interface = self.control_plane.get_interface(rg, nic).await?;
        log::info!(
            "NIC {nic} has {} ipconfigs: [{}]",
            interface.ip_configurations().len(),
            interface.addresses().iter().join(", ")
        );

        let on_prem = self.locator.list_on_prem_addresses(&self.site.site_name)?;
        log::info!("On-prem IPs for site {}: {on_prem}", self.site.site_name);

        let plan = reconcile(interface.ip_configurations(), &on_prem)?;
        let new_list = plan.addresses().iter().join(", ");

        if self.options.dry_run {
            log::warn!("Dry run, not updating {nic}. New list would be: [{new_list}]");
            return Ok(RunReport {
                plan,
                written: false,
            });
        }

        log::info!("Triggering the update of the ipconfig in Azure to include the following list: [{new_list}]");
        let updated = interface.with_ip_configurations(plan.configurations.clone());
        let handle = self.control_plane.update_interface(rg, nic, &updated).await?;
        let result = self.control_plane.await_operation(handle).await?;

        if result.addresses() != plan.addresses() {
            log::warn!(
                "NIC {nic} reports [{}] after update, expected [{new_list}]",
                result.addresses().iter().join(", ")
            );
        }
        log::info!("Update completed.");

        Ok(RunReport {
            plan,
            written: true,
        })
    }
}
