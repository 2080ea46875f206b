//! Studio: Virtual Project Tree & Atomic GitHub Publishing
//!
//! In-memory project filesystem model (a flat, parent-linked node collection)
//! plus a publish engine that pushes a consistent snapshot of the whole
//! project to GitHub as one commit via the low-level git object API.

pub mod config;
pub mod error;
pub mod logging;
pub mod remote;
pub mod sync;
pub mod tree;
pub mod types;
