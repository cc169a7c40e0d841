pub mod actions;

mod start;
pub use self::start::{get_config_path, start};

mod commands;
mod dispatch;
