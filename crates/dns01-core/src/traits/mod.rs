//! Core traits for DNS-01 providers
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`ChallengeProvider`]: Publish and remove DNS-01 challenge records
//! - [`ProviderFactory`]: Build providers from configuration

pub mod challenge_provider;

pub use challenge_provider::{ChallengeProvider, ProviderFactory};
