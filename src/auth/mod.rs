//! Authentication for CoinSpot private endpoints.
//!
//! This module provides:
//! - Credential management with secure secret storage
//! - Nonce generation (Unix seconds) for replay protection
//! - Nonce injection into JSON request bodies
//! - HMAC-SHA512 body signing

mod credentials;
mod envelope;
mod nonce;
mod signature;

pub use credentials::{Credentials, CredentialsProvider, EnvCredentials, StaticCredentials};
pub use envelope::{inject_nonce, parse_body, with_nonce};
pub use nonce::{NonceProvider, UnixSecondsNonce};
pub use signature::sign_body;
