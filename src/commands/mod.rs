//! CLI command handlers
//!
//! This module contains the implementation of CLI command handlers
//! extracted from main.rs for better organization.

pub mod build;
pub mod init;
