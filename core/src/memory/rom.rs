//! Read-only memory. Mutation happens only through the load path.

use crate::core::error::MemoryError;
use crate::memory::resource::{load_flat, read_flat, AccessType, MemoryResource, MemoryValue};

pub struct Rom {
    data: Vec<u8>,
}

impl Rom {
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size],
        }
    }

    pub(crate) fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn load_into(&mut self, data: &[u8], offset: Option<usize>) -> Result<(), MemoryError> {
        load_flat(&mut self.data, data, offset)
    }
}

impl MemoryResource for Rom {
    fn read(&self, address: usize, access: AccessType) -> Result<MemoryValue, MemoryError> {
        read_flat(&self.data, address, access)
    }

    fn write(&mut self, _value: MemoryValue, address: usize) -> Result<(), MemoryError> {
        Err(MemoryError::ReadOnlyResource(address))
    }

    fn load(&mut self, data: &[u8], offset: Option<usize>) -> Result<(), MemoryError> {
        self.load_into(data, offset)
    }

    fn size(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_are_rejected_loads_are_not() {
        let mut rom = Rom::new(0x10);
        assert_eq!(
            rom.write(MemoryValue::Byte(0x01), 0x00),
            Err(MemoryError::ReadOnlyResource(0x00))
        );

        rom.load(&[0xDE, 0xAD], Some(0x02)).unwrap();
        assert_eq!(rom.read(0x02, AccessType::Byte).unwrap(), MemoryValue::Byte(0xDE));
        assert_eq!(rom.read(0x03, AccessType::Byte).unwrap(), MemoryValue::Byte(0xAD));
    }
}
