pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use crate::config::SourceConfig;
pub use crate::core::{
    admin::ContentAdmin,
    contact::submit_contact,
    fixtures::FixtureSet,
    resolver::{ContentResolver, RequestScope},
};
pub use crate::utils::error::{ContentError, Result};
