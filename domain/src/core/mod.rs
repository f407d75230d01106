//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: registry construction errors
//! - [`string`]: UTF-8 safe string helpers used for previews and messages

pub mod error;
pub mod string;
