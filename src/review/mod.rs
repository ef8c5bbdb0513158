pub mod collector;
pub mod generator;
pub mod pipeline;
pub mod prompt;
pub mod recommendation;
pub mod submitter;

pub use pipeline::ReviewPipeline;
pub use recommendation::{Disposition, ReviewResult};
