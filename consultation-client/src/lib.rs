//! Client-side presentation helpers for the consultation service.
pub mod reveal;

pub use reveal::{RevealConfig, RevealEngine};
