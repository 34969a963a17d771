//! CLI module for AURA

pub mod app;
pub mod commands;
pub mod session;

pub use app::{render_summary, AuraApp};
pub use commands::{Cli, Commands, SessionCommand, SessionLine};
pub use session::SessionRegistry;
