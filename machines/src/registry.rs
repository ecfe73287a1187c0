//! Machine registry for host discovery.
//!
//! Each machine module self-registers via [`inventory::submit!`] with a
//! [`MachineEntry`] carrying its name and a factory function, so hosts
//! discover available machines at runtime without a central list.

use gbx_core::core::CoreError;

use crate::System;

pub struct MachineEntry {
    /// Name used to select this machine (e.g. "gameboyx").
    pub name: &'static str,
    /// One-line human-readable description.
    pub description: &'static str,
    /// Factory: construct the machine in its power-on state.
    pub create: fn() -> Result<Box<dyn System>, CoreError>,
}

impl MachineEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        create: fn() -> Result<Box<dyn System>, CoreError>,
    ) -> Self {
        Self {
            name,
            description,
            create,
        }
    }
}

inventory::collect!(MachineEntry);

/// All registered machines, sorted by name.
pub fn all() -> Vec<&'static MachineEntry> {
    let mut entries: Vec<_> = inventory::iter::<MachineEntry>.into_iter().collect();
    entries.sort_by_key(|e| e.name);
    entries
}

/// Look up a machine by name.
pub fn find(name: &str) -> Option<&'static MachineEntry> {
    inventory::iter::<MachineEntry>
        .into_iter()
        .find(|e| e.name == name)
}
