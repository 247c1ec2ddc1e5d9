mod catalog;
mod config;
mod serde_utils;
mod server;
pub mod xtream_const;

pub use catalog::*;
pub use config::*;
pub use server::*;
