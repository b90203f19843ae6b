//! # clientdesk-core
//!
//! Shared domain types and configuration for Clientdesk.
//!
//! This crate defines:
//! - The client record model ([`ClientRecord`], [`NewClient`], [`ClientPatch`])
//! - The audit log model ([`AuditAction`], [`AuditEntry`])
//! - The authenticated actor identity ([`Actor`])
//! - Application configuration loaded from YAML ([`config::AppConfig`])
//!
//! All other Clientdesk crates depend on this one; it has no knowledge of
//! HTTP, storage, or dispatch concerns.

pub mod config;
pub mod types;

pub use config::AppConfig;
pub use types::{
    Actor, AuditAction, AuditEntry, ClientId, ClientPatch, ClientRecord, NewClient, UserId,
};
