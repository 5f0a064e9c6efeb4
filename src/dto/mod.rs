//! DTO modules that bridge the listing controller with templates.

pub mod listing;
pub mod notice;
