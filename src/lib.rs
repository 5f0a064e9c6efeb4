//! Query, selection and batch-action state for the campus storefront's
//! listing views (catalog search and wishlist).

pub mod domain;
pub mod dto;
pub mod error_conversions;
pub mod forms;
pub mod models;
pub mod pagination;
pub mod projection;
pub mod repository;
pub mod selection;
pub mod services;
pub mod url_sync;

pub const DEFAULT_PAGE_SIZE: usize = 12;
pub const MAX_PAGE_SIZE: usize = 100;
pub const MAX_KEYWORD_LENGTH: u64 = 100;
