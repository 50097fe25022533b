use clap::{Parser, ValueEnum};

use crate::blueprint::filters::BlueprintFilter;

pub const REDUNDANCY_PROFILE: &str = "redundancy";
pub const UNDERSAMPLING_PROFILE: &str = "undersampling";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("profiles 'redundancy' and 'undersampling' are mutually exclusive; enable only one")]
    ConflictingFilters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    Mongo,
    Memory,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "blueprints-api", about = "REST service for author-owned point blueprints")]
pub struct Config {
    #[arg(long, env = "BLUEPRINTS_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "BLUEPRINTS_PORT", default_value_t = 8080)]
    pub port: u16,

    #[arg(long, env = "BLUEPRINTS_STORE", value_enum, default_value_t = StoreKind::Mongo)]
    pub store: StoreKind,

    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    #[arg(long, env = "BLUEPRINTS_DATABASE", default_value = "blueprints")]
    pub database: String,

    /// Active profiles, e.g. `redundancy` or `undersampling`.
    #[arg(long, env = "BLUEPRINTS_PROFILES", value_delimiter = ',')]
    pub profiles: Vec<String>,

    /// Browser origin allowed to call the API.
    #[arg(long, env = "BLUEPRINTS_CORS_ORIGIN")]
    pub cors_origin: Option<String>,
}

impl Config {
    pub fn filter(&self) -> Result<BlueprintFilter, ConfigError> {
        filter_for_profiles(&self.profiles)
    }
}

/// Picks the point filter for the active profiles. Unknown profiles are ignored.
pub fn filter_for_profiles<S: AsRef<str>>(profiles: &[S]) -> Result<BlueprintFilter, ConfigError> {
    let mut redundancy = false;
    let mut undersampling = false;

    for profile in profiles {
        match profile.as_ref().trim() {
            REDUNDANCY_PROFILE => redundancy = true,
            UNDERSAMPLING_PROFILE => undersampling = true,
            "" => {}
            other => log::debug!("profile '{}' does not select a filter", other),
        }
    }

    match (redundancy, undersampling) {
        (true, true) => Err(ConfigError::ConflictingFilters),
        (true, false) => Ok(BlueprintFilter::Redundancy),
        (false, true) => Ok(BlueprintFilter::Undersampling),
        (false, false) => Ok(BlueprintFilter::Identity),
    }
}
