pub mod error;

pub use error::{CoreError, InstructionError, MemoryError};
