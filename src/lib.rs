//! content-publish - propagate script-generated content into a repository
//!
//! Clones a repository, runs an update script, and publishes whatever it
//! changed under a content path as a merged pull request.

pub mod auth;
pub mod config;
pub mod error;
pub mod git;
pub mod platform;
pub mod publish;
pub mod types;
