//! Floor-plan Application
//!
//! Headless application shell wiring the editing session to the plan view and
//! the 3D view, plus keyboard shortcuts and the design-advice chat boundary.

pub mod advice;
mod app;
mod config;
mod shortcuts;

pub use advice::{AdviceClient, AdviceError, AdviceService, ChatMessage, ChatRole, UnconfiguredAdvice};
pub use app::{App, AppError, KeyOutcome};
pub use config::AppConfig;
pub use shortcuts::{Shortcut, ShortcutAction, ShortcutRegistry};
