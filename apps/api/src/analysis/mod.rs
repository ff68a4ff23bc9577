pub mod handlers;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod prompts;
pub mod tracker;

/// Context used when a caller does not name one.
pub const DEFAULT_CONTEXT: &str = "default";
