pub mod browser;
pub mod config;
pub mod confirm;
pub mod constants;
pub mod error;
pub mod logging;
pub mod parser;
pub mod pipeline;
pub mod storage;
pub mod types;

pub use error::{Result, ScraperError};
pub use types::{DuplicateGroup, IdentityKey, KeyCount, MovieRecord};
