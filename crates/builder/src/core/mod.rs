//! Run orchestration

pub mod builder;
pub mod context;
