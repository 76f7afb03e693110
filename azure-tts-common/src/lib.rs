//! Azure TTS Common Library
//!
//! Shared plumbing for the text-to-speech client: configuration, bearer
//! token acquisition and refresh, error handling, and tracing.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod auth;
pub mod config;
pub mod error;
pub mod tracing;


pub use auth::{Credential, HttpTokenIssuer, RefreshHandle, TokenIssuer, TokenManager};
pub use config::Config;
pub use error::{ApiErrorKind, AuthError, ConfigError, Error, Result};
