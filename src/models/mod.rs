//! Data models for the Aula curriculum backend.
//!
//! These models match the frontend TypeScript interfaces exactly for seamless interoperability.

mod job;
mod level;
mod topic;

pub use job::*;
pub use level::*;
pub use topic::*;
