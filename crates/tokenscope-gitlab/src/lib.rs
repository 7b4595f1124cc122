//! GitLab REST API v4 client for job token scopes.
//!
//! Implements [`tokenscope_core::GitLabApi`] over `reqwest`, authenticating
//! with a `PRIVATE-TOKEN` header.

mod client;

pub use client::{ClientConfig, GitLabClient};
