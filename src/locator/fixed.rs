//! Fixed address list locator.

use super::OnPremLocator;
use crate::error::SyncError;
use crate::models::OnPremAddressSet;
use std::net::IpAddr;

/// Addresses used when no list is given.
pub const DEFAULT_TEST_IPS: &[&str] = &["10.100.100.20"];

/// Returns the same addresses for every site.
#[derive(Debug, Clone)]
pub struct StaticLocator {
    addresses: Vec<IpAddr>,
}

impl StaticLocator {
    pub fn new(addresses: Vec<IpAddr>) -> Self {
        StaticLocator { addresses }
    }
}

impl Default for StaticLocator {
    fn default() -> Self {
        let addresses = DEFAULT_TEST_IPS
            .iter()
            .filter_map(|a| a.parse().ok())
            .collect();
        StaticLocator { addresses }
    }
}

impl OnPremLocator for StaticLocator {
    fn list_on_prem_addresses(&self, site_name: &str) -> Result<OnPremAddressSet, SyncError> {
        let set: OnPremAddressSet = self.addresses.iter().copied().collect();
        log::info!("Using test IPs {set} for site {site_name}, not reading the router");
        Ok(set)
    }
}
