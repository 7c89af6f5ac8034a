//! Keeps the secondary private IP configurations of an Azure NIC in line with
//! the on-prem endpoints a router has in its LISP local database.
//!
//! - [`models`] - NIC, ipconfig and on-prem address set
//! - [`processing`] - the reconciliation algorithm
//! - [`locator`] - on-prem address sources
//! - [`azure`] - identity and network control plane
//! - [`reconciler`] - one read-compare-write run

pub mod args;
pub mod azure;
pub mod config;
pub mod error;
pub mod locator;
pub mod logging;
pub mod models;
pub mod processing;
pub mod reconciler;
mod shell;

use args::{Args, LocatorKind};
use azure::{ArmNetworkClient, ServicePrincipal};
use locator::{OnPremLocator, RouterLocator, StaticLocator};

pub use error::SyncError;
pub use reconciler::{Reconciler, RunOptions, RunReport};

/// Build the locator picked on the command line.
pub fn build_locator(args: &Args) -> Box<dyn OnPremLocator> {
    match args.locator {
        LocatorKind::Router => Box::new(RouterLocator::new(args.host_command.clone())),
        LocatorKind::Static if args.test_ips.is_empty() => Box::new(StaticLocator::default()),
        LocatorKind::Static => Box::new(StaticLocator::new(args.test_ips.clone())),
    }
}

/// Load configuration, wire the Azure client and locator, and run once.
pub async fn run(args: &Args) -> Result<RunReport, SyncError> {
    let site = config::load_site_config(&args.config_dir)?;
    let secrets = config::load_secrets(&args.config_dir, |k| std::env::var(k).ok())?;
    log::info!("Site config: {site:?}");

    let credential = ServicePrincipal::new(&secrets);
    let client = ArmNetworkClient::new(credential, secrets.sub_id.clone());

    Reconciler::new(site, client, build_locator(args))
        .with_options(RunOptions {
            dry_run: args.dry_run,
        })
        .run()
        .await
}
