//! Reliability rules: correctness hazards rather than style.

mod async_void;
mod empty_catch;

pub use async_void::AsyncVoidRule;
pub use empty_catch::EmptyCatchRule;
