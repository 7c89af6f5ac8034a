//! Command line arguments.

use crate::locator::DEFAULT_HOST_COMMAND;
use clap::{Parser, ValueEnum};
use std::net::IpAddr;
use std::path::PathBuf;

/// Where on-prem addresses come from.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocatorKind {
    /// LISP local database on the router
    Router,
    /// Fixed list given with --test-ip
    Static,
}

#[derive(Parser, Debug)]
#[command(name = "azure-ipconfig-sync")]
#[command(about = "Sync an Azure NIC's secondary ipconfigs with on-prem LISP EIDs.")]
pub struct Args {
    /// Directory holding site_configs.json and secret.json
    #[arg(long, default_value = ".")]
    pub config_dir: PathBuf,
    /// Source of on-prem addresses
    #[arg(long, value_enum, default_value_t = LocatorKind::Router)]
    pub locator: LocatorKind,
    /// Address for the static locator, repeatable
    #[arg(long = "test-ip", value_name = "IP")]
    pub test_ips: Vec<IpAddr>,
    /// Guest-shell command that runs router CLI commands
    #[arg(long, default_value = DEFAULT_HOST_COMMAND)]
    pub host_command: String,
    /// Compute the new ipconfig list but do not update the NIC
    #[arg(long)]
    pub dry_run: bool,
    /// log4rs config file
    #[arg(long, default_value = "log4rs.yml")]
    pub log_config: PathBuf,
}
