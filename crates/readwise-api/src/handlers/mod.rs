//! HTTP handlers grouped by area.

pub mod highlights;
pub mod insights;
pub mod system;
