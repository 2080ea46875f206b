//! Core types for the Studio project tree.

/// NodeId: Opaque unique identifier of a project tree node
pub type NodeId = String;

/// Sentinel identifier of the project root folder
pub const ROOT_ID: &str = "root";
