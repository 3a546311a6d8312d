//! Single-instance enforcement.
//!
//! Two builders exporting into the same directory would race on destinations,
//! so startup refuses to proceed while another instance runs.

use std::ffi::OsStr;

use super::error::{Error, Result};

/// Something that can list running processes by executable name.
pub trait ProcessRegistry {
    /// Pids of running processes named `name`.
    fn pids_named(&self, name: &OsStr) -> Vec<u32>;
}

/// [`ProcessRegistry`] backed by the operating system's process table.
#[derive(Debug, Default)]
pub struct SysinfoRegistry;

impl ProcessRegistry for SysinfoRegistry {
    fn pids_named(&self, name: &OsStr) -> Vec<u32> {
        let mut system = sysinfo::System::new();
        system.refresh_processes(sysinfo::ProcessesToUpdate::All, true);
        system
            .processes_by_exact_name(name)
            .map(|process| process.pid().as_u32())
            .collect()
    }
}

/// Fails with [`Error::AlreadyRunning`] if a process named `name`, other than
/// `own_pid`, is running.
pub fn ensure_single_instance(
    registry: &impl ProcessRegistry,
    name: &OsStr,
    own_pid: u32,
) -> Result<()> {
    match registry.pids_named(name).into_iter().find(|pid| *pid != own_pid) {
        Some(pid) => Err(Error::AlreadyRunning { pid }),
        None => {
            log::debug!("No other {} instance running", name.to_string_lossy());
            Ok(())
        }
    }
}
