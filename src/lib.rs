//! Library interface for the mensa OpenMensa client
//!
//! The binary is a thin layer over these modules; they are exposed for
//! integration tests and benchmarks.

pub mod api;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod format;
pub mod models;

// Re-export commonly used types
pub use api::{ApiSettings, OpenMensaApi};
pub use config::{ConfigStore, DefaultCanteenConfig};
pub use error::{MensaError, Result};
pub use fetcher::PageFetcher;
pub use models::{Audience, Canteen, CanteenDate, DayMeals, Meal, PriceSet};
