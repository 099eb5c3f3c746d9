// Construction-time errors.
//
// Searches themselves never fail: unreachable goals produce best-effort
// paths, cancellation and faults produce empty outcomes. `PathError` only
// covers building a `Pathfinder` from a config and capturing a job's
// snapshot.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("invalid pathfinder config JSON: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("invalid pathfinder config: {0}")]
    InvalidConfig(String),

    #[error("snapshot of {cells} cells exceeds the limit of {limit}")]
    SnapshotTooLarge { cells: u64, limit: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_convert() {
        let err: PathError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, PathError::Config(_)));
        assert!(err.to_string().starts_with("invalid pathfinder config JSON"));
    }

    #[test]
    fn invalid_config_message() {
        let err = PathError::InvalidConfig("worker_threads must be at least 1".into());
        assert_eq!(err.to_string(), "invalid pathfinder config: worker_threads must be at least 1");
    }

    #[test]
    fn snapshot_limit_message() {
        let err = PathError::SnapshotTooLarge { cells: 10, limit: 4 };
        assert_eq!(err.to_string(), "snapshot of 10 cells exceeds the limit of 4");
    }
}
