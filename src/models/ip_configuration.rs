//! Azure NIC IP configuration data model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::net::IpAddr;

/// Name prefix for configurations synthesized from on-prem addresses.
pub const SECONDARY_NAME_PREFIX: &str = "ipconfig_remote_";

/// Canonical name for a synthesized secondary configuration.
///
/// Stable across runs for the same address. IPv6 uses the compressed form
/// with `:` replaced by `-`, as ARM resource names may not contain `:`.
/// IPv4 never contains `:` and IPv6 display never contains `-`, so distinct
/// addresses always yield distinct names.
///
/// ```
/// use azure_ipconfig_sync::models::secondary_config_name;
/// let ip = "10.100.100.30".parse().unwrap();
/// assert_eq!(secondary_config_name(ip), "ipconfig_remote_10.100.100.30");
/// ```
pub fn secondary_config_name(address: IpAddr) -> String {
    match address {
        IpAddr::V4(v4) => format!("{SECONDARY_NAME_PREFIX}{v4}"),
        IpAddr::V6(v6) => format!("{SECONDARY_NAME_PREFIX}{}", v6.to_string().replace(':', "-")),
    }
}

/// How Azure assigns the private address.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AllocationMethod {
    Static,
    #[default]
    Dynamic,
}

/// Reference to the subnet an address belongs to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SubnetReference {
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SubnetReference {
    pub fn new(id: impl Into<String>) -> Self {
        SubnetReference {
            id: id.into(),
            extra: Map::new(),
        }
    }
}

/// The `properties` object of an IP configuration.
///
/// Members this tool does not model are kept in `extra` and written back as read.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct IpConfigurationProperties {
    #[serde(
        rename = "privateIPAddress",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub private_ip_address: Option<IpAddr>,
    #[serde(
        rename = "privateIPAllocationMethod",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub private_ip_allocation_method: Option<AllocationMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet: Option<SubnetReference>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One address binding on a network interface.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IpConfiguration {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default)]
    pub properties: IpConfigurationProperties,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IpConfiguration {
    /// Synthesize a static secondary configuration for an on-prem address.
    pub fn new_secondary(address: IpAddr, subnet: SubnetReference) -> Self {
        IpConfiguration {
            name: secondary_config_name(address),
            id: None,
            etag: None,
            properties: IpConfigurationProperties {
                private_ip_address: Some(address),
                private_ip_allocation_method: Some(AllocationMethod::Static),
                primary: Some(false),
                subnet: Some(subnet),
                extra: Map::new(),
            },
            extra: Map::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> Option<IpAddr> {
        self.properties.private_ip_address
    }

    pub fn is_primary(&self) -> bool {
        self.properties.primary.unwrap_or(false)
    }

    pub fn allocation_method(&self) -> AllocationMethod {
        self.properties
            .private_ip_allocation_method
            .unwrap_or_default()
    }

    pub fn subnet(&self) -> Option<&SubnetReference> {
        self.properties.subnet.as_ref()
    }
}

impl fmt::Display for IpConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let address = self
            .address()
            .map(|a| a.to_string())
            .unwrap_or_else(|| "none".to_string());
        write!(
            f,
            "{} [{}] ({:?}{})",
            self.name,
            address,
            self.allocation_method(),
            if self.is_primary() { ", primary" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_secondary_config_name_v4() {
        let ip: IpAddr = "10.100.100.31".parse().unwrap();
        assert_eq!(secondary_config_name(ip), "ipconfig_remote_10.100.100.31");
    }

    #[test]
    fn test_secondary_config_name_v6_has_no_colons() {
        let ip: IpAddr = "fd00:0:0::1".parse().unwrap();
        let name = secondary_config_name(ip);
        assert_eq!(name, "ipconfig_remote_fd00--1");
        assert!(!name.contains(':'));
    }

    #[test]
    fn test_secondary_config_name_v6_canonical() {
        let a: IpAddr = "FD00:0000::0001".parse().unwrap();
        let b: IpAddr = "fd00::1".parse().unwrap();
        assert_eq!(secondary_config_name(a), secondary_config_name(b));
    }

    #[test]
    fn test_new_secondary() {
        let ip: IpAddr = "10.100.100.30".parse().unwrap();
        let cfg = IpConfiguration::new_secondary(ip, SubnetReference::new("/subnets/lan"));
        assert_eq!(cfg.address(), Some(ip));
        assert!(!cfg.is_primary());
        assert_eq!(cfg.allocation_method(), AllocationMethod::Static);
        assert_eq!(cfg.subnet().map(|s| s.id.as_str()), Some("/subnets/lan"));
        let value = serde_json::to_value(&cfg).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "ipconfig_remote_10.100.100.30",
                "properties": {
                    "privateIPAddress": "10.100.100.30",
                    "privateIPAllocationMethod": "Static",
                    "primary": false,
                    "subnet": { "id": "/subnets/lan" }
                }
            })
        );
    }

    #[test]
    fn test_unknown_members_survive() {
        let raw = json!({
            "name": "ipconfig1",
            "id": "/nic/ipConfigurations/ipconfig1",
            "etag": "W/\"1\"",
            "type": "Microsoft.Network/networkInterfaces/ipConfigurations",
            "properties": {
                "provisioningState": "Succeeded",
                "privateIPAddress": "10.0.0.4",
                "privateIPAllocationMethod": "Dynamic",
                "privateIPAddressVersion": "IPv4",
                "primary": true,
                "subnet": { "id": "/subnets/lan", "resourceGroup": "rg" }
            }
        });
        let cfg: IpConfiguration = serde_json::from_value(raw.clone()).unwrap();
        assert!(cfg.is_primary());
        assert_eq!(cfg.address(), Some("10.0.0.4".parse().unwrap()));
        assert_eq!(serde_json::to_value(&cfg).unwrap(), raw);
    }
}
