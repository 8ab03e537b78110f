//! Crossroads — results aggregation bounded context.
//!
//! Consumes a session's recorded choices and produces the presentable
//! summary: per-framework counts and percentages, the dominant-framework
//! set with tie handling, the narrative summary, and earned badges.

pub mod application;
pub mod domain;
