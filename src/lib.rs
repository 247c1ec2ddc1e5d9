pub mod auth;
pub mod download;
pub mod foundation;
pub mod model;
pub mod processing;
pub mod repository;
pub mod utils;
pub mod xtream_grab_error;
