pub mod banked_rom;
pub mod controller;
pub mod ram;
pub mod range;
pub mod resource;
pub mod rom;

pub use banked_rom::BankedRom;
pub use controller::{MemoryController, Mode};
pub use ram::Ram;
pub use range::{AddressRange, RangeType};
pub use resource::{AccessType, MemoryResource, MemoryValue};
pub use rom::Rom;
