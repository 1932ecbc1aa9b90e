pub mod config;

pub use self::config::{LogConfig, LogFormatter};
