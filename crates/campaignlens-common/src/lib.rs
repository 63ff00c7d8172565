//! CampaignLens Common - Shared types and utilities
//!
//! This crate provides the campaign and mailbox records decoded from the
//! remote marketing API, configuration, and the error type shared across
//! all CampaignLens components.

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use types::{Campaign, MailboxAccount};
