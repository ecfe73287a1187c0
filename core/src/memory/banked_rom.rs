//! Bank-switched ROM: a large physical image visible one fixed-size bank
//! at a time.

use crate::core::error::MemoryError;
use crate::memory::resource::{read_flat, AccessType, MemoryResource, MemoryValue};
use crate::memory::rom::Rom;

pub struct BankedRom {
    rom: Rom,
    bank_size: usize,
    active_bank: usize,
}

impl BankedRom {
    pub fn new(physical_size: usize, bank_size: usize) -> Self {
        Self {
            rom: Rom::new(physical_size),
            bank_size,
            active_bank: 0,
        }
    }

    pub fn physical_size(&self) -> usize {
        self.rom.data().len()
    }

    pub fn bank_size(&self) -> usize {
        self.bank_size
    }

    pub fn bank_count(&self) -> usize {
        self.physical_size() / self.bank_size
    }

    pub fn current_bank(&self) -> usize {
        self.active_bank
    }

    fn check_bank_bounds(&self, address: usize, access: AccessType) -> Result<(), MemoryError> {
        let last = match access {
            AccessType::Byte => address,
            AccessType::Word => address + 1,
        };
        if last >= self.bank_size {
            return Err(MemoryError::OutOfBounds {
                address,
                size: self.bank_size,
            });
        }
        Ok(())
    }
}

impl MemoryResource for BankedRom {
    fn read(&self, address: usize, access: AccessType) -> Result<MemoryValue, MemoryError> {
        self.check_bank_bounds(address, access)?;
        let offset = self.bank_size * self.active_bank;
        read_flat(self.rom.data(), offset + address, access)
    }

    fn write(&mut self, _value: MemoryValue, address: usize) -> Result<(), MemoryError> {
        Err(MemoryError::ReadOnlyResource(address))
    }

    /// Loads address the physical image, not the active bank, so a whole
    /// multi-bank cartridge can be loaded in one call.
    fn load(&mut self, data: &[u8], offset: Option<usize>) -> Result<(), MemoryError> {
        self.rom.load_into(data, offset)
    }

    fn size(&self) -> usize {
        self.bank_size
    }

    fn is_bank_switchable(&self) -> bool {
        true
    }

    fn select_bank(&mut self, bank: usize) -> Result<(), MemoryError> {
        if bank >= self.bank_count() {
            return Err(MemoryError::BankOutOfRange {
                bank,
                bank_count: self.bank_count(),
            });
        }
        self.active_bank = bank;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_follow_the_active_bank() {
        let mut rom = BankedRom::new(0x40, 0x10);
        let image: Vec<u8> = (0..0x40).collect();
        rom.load(&image, None).unwrap();

        assert_eq!(rom.bank_count(), 4);
        assert_eq!(rom.read(0x05, AccessType::Byte).unwrap(), MemoryValue::Byte(0x05));

        rom.select_bank(2).unwrap();
        assert_eq!(rom.current_bank(), 2);
        assert_eq!(rom.read(0x05, AccessType::Byte).unwrap(), MemoryValue::Byte(0x25));
    }

    #[test]
    fn bank_selection_is_validated() {
        let mut rom = BankedRom::new(0x40, 0x10);
        assert_eq!(
            rom.select_bank(4),
            Err(MemoryError::BankOutOfRange {
                bank: 4,
                bank_count: 4
            })
        );
    }

    #[test]
    fn reads_do_not_cross_the_bank_boundary() {
        let rom = BankedRom::new(0x40, 0x10);
        assert!(rom.read(0x10, AccessType::Byte).is_err());
        assert!(rom.read(0x0F, AccessType::Word).is_err());
    }
}
