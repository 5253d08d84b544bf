//! Service Layer
//!
//! Request validation and the calls into the ranking cache and the catalogue.
//! Handlers stay thin; everything they need to decide lives here.

mod ranking_service;
mod recipe_service;

pub use ranking_service::*;
pub use recipe_service::*;
