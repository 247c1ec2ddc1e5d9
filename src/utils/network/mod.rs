pub mod request;
pub mod xtream;
