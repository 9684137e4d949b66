//! Detection module for tajweedcheck

mod result;

pub use result::{GhunnaResult, MaddResult, RecitationReport};
