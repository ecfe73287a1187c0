//! The memory controller: mode-dependent address space resolution.
//!
//! Two independent resource sets exist, one per [`Mode`]. Every access
//! resolves against the set selected by the current mode, so the same
//! address can reach different backing resources in System and User mode.

use log::debug;

use crate::core::error::MemoryError;
use crate::memory::range::AddressRange;
use crate::memory::resource::{AccessType, MemoryResource, MemoryValue};

/// Privilege axis selecting which registered resource set is visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    System,
    User,
}

struct RegisteredResource {
    resource: Box<dyn MemoryResource>,
    range: AddressRange,
    id: usize,
}

pub struct MemoryController {
    system_resources: Vec<RegisteredResource>,
    user_resources: Vec<RegisteredResource>,
    mode: Mode,
    next_id: usize,
}

impl Default for MemoryController {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryController {
    pub fn new() -> Self {
        Self {
            system_resources: Vec::new(),
            user_resources: Vec::new(),
            mode: Mode::System,
            next_id: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if mode != self.mode {
            debug!("memory controller mode -> {:?}", mode);
        }
        self.mode = mode;
    }

    fn resources(&self, owner: Mode) -> &Vec<RegisteredResource> {
        match owner {
            Mode::System => &self.system_resources,
            Mode::User => &self.user_resources,
        }
    }

    fn resources_mut(&mut self, owner: Mode) -> &mut Vec<RegisteredResource> {
        match owner {
            Mode::System => &mut self.system_resources,
            Mode::User => &mut self.user_resources,
        }
    }

    /// Register a resource for the given owner mode. Fails when the range
    /// overlaps an existing registration or disagrees with the resource's
    /// size.
    pub fn register_resource(
        &mut self,
        resource: Box<dyn MemoryResource>,
        range: AddressRange,
        owner: Mode,
    ) -> Result<usize, MemoryError> {
        if range.len() != resource.size() {
            return Err(MemoryError::ResourceMisfit {
                range_len: range.len(),
                size: resource.size(),
            });
        }

        for registered in self.resources(owner) {
            if range.begin() < registered.range.end() && registered.range.begin() < range.end() {
                return Err(MemoryError::RangeOverlap(range.begin(), range.end()));
            }
        }

        let id = self.next_id;
        self.next_id += 1;

        debug!(
            "registered {:?} resource {} at {:#06X}-{:#06X}",
            owner,
            id,
            range.begin(),
            range.end()
        );

        let target = self.resources_mut(owner);
        target.push(RegisteredResource {
            resource,
            range,
            id,
        });
        target.sort_by_key(|r| r.range.begin());
        Ok(id)
    }

    pub fn unregister_resource(&mut self, id: usize, owner: Mode) -> Result<(), MemoryError> {
        let target = self.resources_mut(owner);
        match target.iter().position(|r| r.id == id) {
            Some(index) => {
                target.remove(index);
                Ok(())
            }
            None => Err(MemoryError::UnknownResource(id)),
        }
    }

    fn resolve(&self, address: usize) -> Result<(usize, usize), MemoryError> {
        for (index, registered) in self.resources(self.mode).iter().enumerate() {
            if registered.range.contains(address) {
                return Ok((index, address - registered.range.begin()));
            }
        }
        Err(MemoryError::UnmappedAddress(address))
    }

    pub fn read(&self, address: usize, access: AccessType) -> Result<MemoryValue, MemoryError> {
        let (index, local) = self.resolve(address)?;
        self.resources(self.mode)[index].resource.read(local, access)
    }

    /// Byte read; convenience over [`MemoryController::read`].
    pub fn read_byte(&self, address: usize) -> Result<u8, MemoryError> {
        Ok(self.read(address, AccessType::Byte)?.as_byte())
    }

    pub fn write(&mut self, value: MemoryValue, address: usize) -> Result<(), MemoryError> {
        let (index, local) = self.resolve(address)?;
        let mode = self.mode;
        self.resources_mut(mode)[index].resource.write(value, local)
    }

    pub fn write_byte(&mut self, value: u8, address: usize) -> Result<(), MemoryError> {
        self.write(MemoryValue::Byte(value), address)
    }

    /// Bulk load into the resource containing `address`, at the given
    /// offset inside that resource.
    pub fn load(
        &mut self,
        data: &[u8],
        address: usize,
        offset: Option<usize>,
    ) -> Result<(), MemoryError> {
        let (index, _local) = self.resolve(address)?;
        let mode = self.mode;
        self.resources_mut(mode)[index].resource.load(data, offset)
    }

    /// Switch the bank of the resource containing `address`. Goes through
    /// the resource's bank capability; flat resources refuse.
    pub fn switch_bank(&mut self, address: usize, bank: usize) -> Result<(), MemoryError> {
        let (index, _local) = self.resolve(address)?;
        let mode = self.mode;
        let registered = &mut self.resources_mut(mode)[index];
        if !registered.resource.is_bank_switchable() {
            return Err(MemoryError::NotBankSwitchable(address));
        }
        registered.resource.select_bank(bank)
    }
}
