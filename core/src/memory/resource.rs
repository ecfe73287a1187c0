//! The memory-resource abstraction registered with the controller.

use crate::core::error::MemoryError;

/// Width of one memory access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    Byte,
    Word,
}

/// Value transported by a read or write. Words are little-endian in the
/// backing storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemoryValue {
    Byte(u8),
    Word(u16),
}

impl MemoryValue {
    /// Byte payload; the low byte of a word.
    pub fn as_byte(self) -> u8 {
        match self {
            MemoryValue::Byte(value) => value,
            MemoryValue::Word(value) => value as u8,
        }
    }

    /// Word payload; a byte zero-extends.
    pub fn as_word(self) -> u16 {
        match self {
            MemoryValue::Byte(value) => value as u16,
            MemoryValue::Word(value) => value,
        }
    }
}

/// A memory-mapped resource (RAM, ROM, banked ROM, device registers).
/// Addresses are local to the resource; the controller translates.
pub trait MemoryResource {
    fn read(&self, address: usize, access: AccessType) -> Result<MemoryValue, MemoryError>;

    fn write(&mut self, value: MemoryValue, address: usize) -> Result<(), MemoryError>;

    /// Bulk load, bypassing write protection (the cartridge/kernel path).
    fn load(&mut self, data: &[u8], offset: Option<usize>) -> Result<(), MemoryError>;

    /// Visible size in bytes (one bank for banked resources).
    fn size(&self) -> usize;

    /// Capability probe for bank switching; banked resources override.
    fn is_bank_switchable(&self) -> bool {
        false
    }

    fn select_bank(&mut self, _bank: usize) -> Result<(), MemoryError> {
        Err(MemoryError::NotBankSwitchable(0))
    }
}

/// Shared bounds check for flat byte-array resources.
pub(crate) fn check_access(
    address: usize,
    access: AccessType,
    size: usize,
) -> Result<(), MemoryError> {
    let last = match access {
        AccessType::Byte => address,
        AccessType::Word => address + 1,
    };
    if last >= size {
        return Err(MemoryError::OutOfBounds { address, size });
    }
    Ok(())
}

/// Read a byte or little-endian word out of a flat byte array.
pub(crate) fn read_flat(
    data: &[u8],
    address: usize,
    access: AccessType,
) -> Result<MemoryValue, MemoryError> {
    check_access(address, access, data.len())?;
    match access {
        AccessType::Byte => Ok(MemoryValue::Byte(data[address])),
        AccessType::Word => Ok(MemoryValue::Word(
            data[address] as u16 | ((data[address + 1] as u16) << 8),
        )),
    }
}

/// Store a byte or little-endian word into a flat byte array.
pub(crate) fn write_flat(
    data: &mut [u8],
    value: MemoryValue,
    address: usize,
) -> Result<(), MemoryError> {
    match value {
        MemoryValue::Byte(byte) => {
            check_access(address, AccessType::Byte, data.len())?;
            data[address] = byte;
        }
        MemoryValue::Word(word) => {
            check_access(address, AccessType::Word, data.len())?;
            data[address] = word as u8;
            data[address + 1] = (word >> 8) as u8;
        }
    }
    Ok(())
}

/// Copy a block into a flat byte array at the given offset.
pub(crate) fn load_flat(
    data: &mut [u8],
    source: &[u8],
    offset: Option<usize>,
) -> Result<(), MemoryError> {
    let offset = offset.unwrap_or(0);
    let end = offset + source.len();
    if end > data.len() {
        return Err(MemoryError::OutOfBounds {
            address: end,
            size: data.len(),
        });
    }
    data[offset..end].copy_from_slice(source);
    Ok(())
}
