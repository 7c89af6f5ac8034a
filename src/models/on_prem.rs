//! Set of currently reachable on-prem addresses.

use itertools::Itertools;
use std::collections::HashSet;
use std::fmt;
use std::net::IpAddr;

/// Duplicate-free address set that remembers the order addresses were found in.
///
/// Order decides where new secondaries land in the output, so it is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnPremAddressSet {
    ordered: Vec<IpAddr>,
    members: HashSet<IpAddr>,
}

impl OnPremAddressSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, address: &IpAddr) -> bool {
        self.members.contains(address)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IpAddr> {
        self.ordered.iter()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

impl FromIterator<IpAddr> for OnPremAddressSet {
    fn from_iter<I: IntoIterator<Item = IpAddr>>(iter: I) -> Self {
        let ordered: Vec<IpAddr> = iter.into_iter().unique().collect();
        let members = ordered.iter().copied().collect();
        OnPremAddressSet { ordered, members }
    }
}

impl fmt::Display for OnPremAddressSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.ordered.iter().join(", "))
    }
}
