use dashboard_config::ConfigError;
use dashboard_domain::SnapshotError;
use dashboard_mutation::MutationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Mutation(#[from] MutationError),
    #[error("{0}")]
    Configuration(String),
    #[error("no complaint row with id {0}")]
    UnknownRow(String),
}

pub type AppResult<T> = Result<T, AppError>;
