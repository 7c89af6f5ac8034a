//! Router-backed locator.
//!
//! Lists the site's EIDs from the LISP local mapping database on the router.
//! The guest shell reaches the router CLI through a host bridge command.

use super::OnPremLocator;
use crate::error::SyncError;
use crate::models::OnPremAddressSet;
use crate::shell;
use regex::Regex;
use std::net::IpAddr;
use std::sync::OnceLock;

/// Guest-shell command that runs its argument on the router CLI.
pub const DEFAULT_HOST_COMMAND: &str = "dohost";

/// Matches the leading `<address>/<prefix>` EID of a database line.
static EID_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_eid_regex() -> &'static Regex {
    EID_REGEX.get_or_init(|| Regex::new(r"^\s*([0-9A-Fa-f:.]+)/\d{1,3}\b").expect("Invalid Regex"))
}

type Runner = fn(&str) -> Result<String, String>;

/// Reads on-prem addresses from the router CLI.
#[derive(Debug, Clone)]
pub struct RouterLocator {
    host_command: String,
    runner: Runner,
}

impl RouterLocator {
    pub fn new(host_command: impl Into<String>) -> Self {
        RouterLocator {
            host_command: host_command.into(),
            runner: shell::run,
        }
    }

    /// Replace the command runner, used to feed canned router output.
    pub fn with_runner(mut self, runner: Runner) -> Self {
        self.runner = runner;
        self
    }

    fn command(&self, site_name: &str) -> String {
        format!(
            "{} 'show ip lisp database eid-table default | inc {site_name}'",
            self.host_command
        )
    }
}

impl Default for RouterLocator {
    fn default() -> Self {
        Self::new(DEFAULT_HOST_COMMAND)
    }
}

impl OnPremLocator for RouterLocator {
    fn list_on_prem_addresses(&self, site_name: &str) -> Result<OnPremAddressSet, SyncError> {
        if site_name.trim().is_empty() {
            return Err(SyncError::Locator("site name is empty".to_string()));
        }
        if site_name.contains('\'') {
            return Err(SyncError::Locator(format!(
                "site name {site_name:?} contains a single quote"
            )));
        }
        let cmd = self.command(site_name);
        let output = (self.runner)(&cmd).map_err(SyncError::Locator)?;
        log::info!("Router output of show = {output:?}");

        let set = parse_lisp_database(&output);
        log::info!("Picking up IPs {set} in local database for site {site_name}");
        Ok(set)
    }
}

/// Extract the EID addresses from `show ip lisp database` output lines.
///
/// Blank lines are ignored. Other lines without a leading EID prefix are
/// skipped with a warning.
pub fn parse_lisp_database(output: &str) -> OnPremAddressSet {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let parsed = get_eid_regex()
                .captures(line)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse::<IpAddr>().ok());
            if parsed.is_none() {
                log::warn!("Skipping line without EID prefix: {line:?}");
            }
            parsed
        })
        .collect()
}
