//! chorus-core - provider dispatch for the chorus CLI
//!
//! This crate provides:
//! - The [`TextProvider`] trait and one implementation per supported
//!   provider (OpenAI, Anthropic, Google Gemini)
//! - The [`Dispatcher`] that holds at most one client handle per provider
//!   and routes a prompt to one of them, or fans it out to all

pub mod dispatch;
pub mod providers;

// Re-export main types for convenience
pub use dispatch::{Dispatcher, DispatcherSettings};
pub use providers::{ProviderConfig, ProviderId, TextProvider};
