//! Multi-provider text generation
//!
//! Each supported provider implements the [`TextProvider`] trait. Handles
//! are owned by the [`crate::dispatch::Dispatcher`], which builds one per
//! provider whose credential is present at startup.

pub mod anthropic;
pub mod google;
pub mod openai;
pub mod types;

pub use types::{ProviderConfig, ProviderId, TextProvider};
