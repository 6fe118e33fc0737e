pub mod app_config;
pub mod config;
pub mod jobs;
pub mod party;
pub mod result;
pub mod roles;
pub mod stats;
pub mod zones;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use jobs::JobRecord;
pub use party::{Party, PartyError, PartyEstimate, RoleCounts};
pub use result::{GroupedJobs, ResultSet};
pub use roles::{classify, RoleGroup};
pub use stats::ScoreKind;
pub use zones::Zone;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
