//! Azure network interface data model.

use super::IpConfiguration;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::net::IpAddr;

/// The `properties` object of a network interface.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct InterfaceProperties {
    #[serde(rename = "ipConfigurations", default)]
    pub ip_configurations: Vec<IpConfiguration>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A network interface as returned by the ARM API.
///
/// The whole resource is written back on update, so every member not
/// modelled here is carried in `extra`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct NetworkInterface {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default)]
    pub properties: InterfaceProperties,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NetworkInterface {
    pub fn ip_configurations(&self) -> &[IpConfiguration] {
        &self.properties.ip_configurations
    }

    /// Replace the configuration list, keeping every other member as read.
    pub fn with_ip_configurations(mut self, configurations: Vec<IpConfiguration>) -> Self {
        self.properties.ip_configurations = configurations;
        self
    }

    pub fn primary_configuration(&self) -> Option<&IpConfiguration> {
        self.ip_configurations().iter().find(|c| c.is_primary())
    }

    /// Addresses of all configurations, in list order.
    pub fn addresses(&self) -> Vec<IpAddr> {
        self.ip_configurations()
            .iter()
            .filter_map(|c| c.address())
            .collect()
    }
}
