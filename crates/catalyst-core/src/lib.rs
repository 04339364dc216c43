pub mod accountability;
pub mod calendar;
pub mod config;
pub mod cycle;
pub mod error;
pub mod io;
pub mod paths;
pub mod remote;
pub mod repository;
pub mod score;
pub mod store;
pub mod summary;
pub mod types;

pub use error::{CatalystError, Result};
