//! Domain models for the NIC ipconfig sync.
//!
//! - [`IpConfiguration`] - one address binding on a NIC
//! - [`NetworkInterface`] - the NIC resource holding the configuration list
//! - [`OnPremAddressSet`] - addresses currently reachable on-prem

mod interface;
mod ip_configuration;
mod on_prem;

// Re-export public types
pub use interface::{InterfaceProperties, NetworkInterface};
pub use ip_configuration::{
    secondary_config_name, AllocationMethod, IpConfiguration, IpConfigurationProperties,
    SubnetReference, SECONDARY_NAME_PREFIX,
};
pub use on_prem::OnPremAddressSet;
