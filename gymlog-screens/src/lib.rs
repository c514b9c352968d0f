//! gymlog-screens library
//!
//! Presentation state holders for the GymLog screens. Each holder is built
//! from a [`ScreenContext`], publishes its UI state on a watch channel, and
//! stops its background work when dropped.

pub mod context;
pub mod error;
pub mod screen;
pub mod screens;

// Re-export commonly used types
pub use context::ScreenContext;
pub use error::{Result, ScreenError};
pub use screen::Screen;
