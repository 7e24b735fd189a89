//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`] — configuration errors caught before a tool runs

pub mod error;
