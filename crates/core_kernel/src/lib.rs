//! Core Kernel - Foundational types for the transit insurance system
//!
//! This crate provides the building blocks used across all domain modules:
//! - Amount helpers with precise decimal arithmetic (premium cap, cent
//!   rounding, INR display formatting)
//! - Common identifiers
//! - Core error type

pub mod error;
pub mod identifiers;
pub mod money;

pub use error::CoreError;
pub use identifiers::RequestId;
pub use money::{clamp_to_premium_cap, format_inr, premium_cap, round_to_cents};
