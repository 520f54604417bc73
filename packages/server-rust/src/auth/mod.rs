//! Auth collaborator implementations.

pub mod memory;

pub use memory::MemoryAuthProvider;
