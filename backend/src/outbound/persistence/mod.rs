//! In-memory document store backing the repository ports.

mod memory;

pub use memory::MemoryStore;
