pub mod commands;
pub mod display;
pub mod provision;

pub use self::commands::{CliArgs, Commands};
