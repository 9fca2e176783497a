//! HTTP client module for the Bissoy login service.
//!
//! The only remote exchange this application performs is the login POST.
//! `AuthClient` issues it and classifies the response as an `AuthOutcome`,
//! which the caller consumes exactly once.

pub mod client;
pub mod error;

pub use client::{AuthClient, AuthOutcome, Credentials};
pub use error::AuthError;
