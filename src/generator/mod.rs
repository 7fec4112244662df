pub mod context;
pub mod multipage;
pub mod orchestrator;
pub mod pipeline;
pub mod planner;
pub mod types;
pub mod workflow;

pub use context::GeneratorContext;
pub use types::{PageResult, PresentationResult, ProcessOptions};
pub use workflow::launch;
