//! Quintaesencia — artist onboarding core.

pub mod auth;
pub mod cli;
pub mod config;
pub mod directory;
pub mod error;
pub mod identity;
pub mod onboarding;
pub mod store;
