pub mod cache;
pub mod cli;
pub mod config;
pub mod evidence;
pub mod generator;
pub mod html;
pub mod llm;
pub mod memory;
pub mod outlet;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use generator::types::{PageResult, PresentationResult, ProcessOptions};
pub use generator::workflow::launch;
