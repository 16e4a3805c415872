//! Command implementations for the mensa CLI
//!
//! - **canteens**: listing, showing and the default canteen
//! - **meals**: today / tomorrow / week meal plans
//! - **status**: opening status for a day or the coming week
//! - **utils**: shared helpers (internal)
//!
//! Commands print everything the user sees. A failed lookup prints a message
//! and returns `Ok`; only a missing or unsaveable default canteen is an error.

pub mod canteens;
pub mod meals;
pub mod status;
pub(crate) mod utils;

pub use canteens::{list, set_default, show, show_default};
pub use meals::{today, tomorrow, week};
pub use status::{status, week_status};

use mensa::api::OpenMensaApi;
use mensa::config::ConfigStore;

/// Everything a command needs to talk to the API and the config store
#[derive(Clone)]
pub struct Session {
    pub api: OpenMensaApi,
    pub store: ConfigStore,
}

impl Session {
    pub fn new(api: OpenMensaApi, store: ConfigStore) -> Self {
        Self { api, store }
    }
}
