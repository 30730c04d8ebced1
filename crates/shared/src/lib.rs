pub mod config;
pub mod error;
pub mod form;
pub mod geo;
pub mod models;
pub mod render;
pub mod session;
pub mod storage;

pub use error::{Error, Result};
