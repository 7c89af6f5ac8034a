//! On-prem address discovery.
//!
//! - [`RouterLocator`] - reads the router's LISP local database
//! - [`StaticLocator`] - fixed address list for runs off the router

mod fixed;
mod router;

use crate::error::SyncError;
use crate::models::OnPremAddressSet;

pub use fixed::{StaticLocator, DEFAULT_TEST_IPS};
pub use router::{parse_lisp_database, RouterLocator, DEFAULT_HOST_COMMAND};

/// Source of the addresses currently reachable on-prem for a site.
pub trait OnPremLocator {
    /// # Errors
    /// `SyncError::Locator` when the address list cannot be produced.
    fn list_on_prem_addresses(&self, site_name: &str) -> Result<OnPremAddressSet, SyncError>;
}

impl<T: OnPremLocator + ?Sized> OnPremLocator for Box<T> {
    fn list_on_prem_addresses(&self, site_name: &str) -> Result<OnPremAddressSet, SyncError> {
        (**self).list_on_prem_addresses(site_name)
    }
}
