//! Secondary ipconfig reconciliation.
//!
//! Computes the new configuration list of a NIC from its current list and the
//! set of addresses currently reachable on-prem.

use crate::error::SyncError;
use crate::models::{IpConfiguration, OnPremAddressSet};
use itertools::Itertools;
use std::collections::HashSet;
use std::net::IpAddr;

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcilePlan {
    /// New configuration list: primary first, kept secondaries, then added ones.
    pub configurations: Vec<IpConfiguration>,
    /// Secondary addresses carried over from the current list.
    pub kept: Vec<IpAddr>,
    /// Secondaries removed because their host is no longer on-prem.
    pub dropped: Vec<IpConfiguration>,
    /// Addresses that got a newly synthesized configuration.
    pub added: Vec<IpAddr>,
}

impl ReconcilePlan {
    /// True when the new list has the same entries as the current one.
    pub fn is_unchanged(&self) -> bool {
        self.dropped.is_empty() && self.added.is_empty()
    }

    pub fn addresses(&self) -> Vec<IpAddr> {
        self.configurations
            .iter()
            .filter_map(|c| c.address())
            .collect()
    }
}

/// Reconcile `current` against `on_prem`.
///
/// The primary entry is kept unchanged and first. A secondary is kept iff its
/// address is on-prem. Every on-prem address not yet present gets a new static
/// secondary in the subnet of the first configuration in `current`.
///
/// # Errors
/// `SyncError::Compute` when `current` is empty, does not hold exactly one
/// primary, or a new secondary is needed while its first entry has no subnet.
pub fn reconcile(
    current: &[IpConfiguration],
    on_prem: &OnPremAddressSet,
) -> Result<ReconcilePlan, SyncError> {
    let first = current
        .first()
        .ok_or_else(|| SyncError::Compute("interface has no ip configurations".to_string()))?;

    let primaries: Vec<&IpConfiguration> = current.iter().filter(|c| c.is_primary()).collect();
    let primary = match primaries.as_slice() {
        [primary] => *primary,
        [] => return Err(SyncError::Compute("no primary ip configuration".to_string())),
        many => {
            return Err(SyncError::Compute(format!(
                "{} primary ip configurations: {}",
                many.len(),
                many.iter().map(|c| c.name()).join(", ")
            )))
        }
    };

    log::info!("Adding primary IP {primary} to the list (primary IP of the NIC).");
    let mut configurations = vec![primary.clone()];
    let mut present: HashSet<IpAddr> = primary.address().into_iter().collect();
    let mut kept = Vec::new();
    let mut dropped = Vec::new();

    for cfg in current.iter().filter(|c| !c.is_primary()) {
        match cfg.address() {
            Some(addr) if on_prem.contains(&addr) && present.insert(addr) => {
                log::info!("Keeping the IP {addr} in the list");
                kept.push(addr);
                configurations.push(cfg.clone());
            }
            _ => {
                log::info!("Dropping {cfg} from the current list");
                dropped.push(cfg.clone());
            }
        }
    }

    let mut added = Vec::new();
    for addr in on_prem.iter().copied() {
        if present.insert(addr) {
            let subnet = first.subnet().cloned().ok_or_else(|| {
                SyncError::Compute(format!(
                    "first ip configuration '{}' has no subnet for new IP {addr}",
                    first.name()
                ))
            })?;
            let cfg = IpConfiguration::new_secondary(addr, subnet);
            log::info!("Adding the IP {addr} to the list as {}", cfg.name());
            added.push(addr);
            configurations.push(cfg);
        }
    }

    Ok(ReconcilePlan {
        configurations,
        kept,
        dropped,
        added,
    })
}
