//! Configuration-mode handler trait and the driver that runs it.
//!
//! A handler owns one feature subtree. Each commit runs the same pipeline:
//!
//! 1. [`ConfModeHandler::get_config`] reads the subtree into a value
//! 2. [`ConfModeHandler::verify`] rejects logically inconsistent values
//! 3. [`ConfModeHandler::generate`] writes the daemon's configuration
//! 4. [`ConfModeHandler::apply`] reconciles the daemon's running state
//!
//! A verification failure stops the pipeline before anything is written.

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::error::CfgMgrResult;
use crate::store::ConfigStore;

/// A per-feature configuration handler.
#[async_trait]
pub trait ConfModeHandler: Send + Sync {
    /// The value extracted from the store.
    type Config: Send + Sync;

    /// Returns the handler name used in logs.
    fn name(&self) -> &str;

    /// Reads the feature subtree.
    async fn get_config(&self, store: &mut dyn ConfigStore) -> CfgMgrResult<Self::Config>;

    /// Checks domain rules. Must not have side effects.
    fn verify(&self, config: &Self::Config) -> CfgMgrResult<()>;

    /// Produces the daemon configuration.
    async fn generate(&self, config: &Self::Config) -> CfgMgrResult<()>;

    /// Starts, stops or restarts the daemon.
    async fn apply(&self, config: &Self::Config) -> CfgMgrResult<()>;
}

/// Runs the full pipeline of `handler` against `store`.
///
/// Returns the extracted configuration on success.
#[instrument(skip_all, fields(handler = handler.name()))]
pub async fn run_handler<H: ConfModeHandler>(
    handler: &H,
    store: &mut dyn ConfigStore,
) -> CfgMgrResult<H::Config> {
    let config = handler.get_config(store).await?;
    debug!("Configuration extracted");

    handler.verify(&config)?;
    debug!("Configuration verified");

    handler.generate(&config).await?;
    handler.apply(&config).await?;

    info!("{} configuration applied", handler.name());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CfgMgrError;
    use crate::tree::ConfigTree;
    use std::sync::Mutex;

    struct StepRecorder {
        steps: Mutex<Vec<&'static str>>,
    }

    impl StepRecorder {
        fn new() -> Self {
            Self {
                steps: Mutex::new(Vec::new()),
            }
        }

        fn push(&self, step: &'static str) {
            self.steps.lock().unwrap().push(step);
        }

        fn steps(&self) -> Vec<&'static str> {
            self.steps.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ConfModeHandler for StepRecorder {
        type Config = Option<String>;

        fn name(&self) -> &str {
            "recorder"
        }

        async fn get_config(&self, store: &mut dyn ConfigStore) -> CfgMgrResult<Self::Config> {
            self.push("get_config");
            store.return_value("system host-name").await
        }

        fn verify(&self, config: &Self::Config) -> CfgMgrResult<()> {
            self.push("verify");
            match config.as_deref() {
                Some("bad") => Err(CfgMgrError::config("bad host name")),
                _ => Ok(()),
            }
        }

        async fn generate(&self, _config: &Self::Config) -> CfgMgrResult<()> {
            self.push("generate");
            Ok(())
        }

        async fn apply(&self, _config: &Self::Config) -> CfgMgrResult<()> {
            self.push("apply");
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_run_handler_runs_all_stages_in_order() {
        let handler = StepRecorder::new();
        let mut tree = ConfigTree::new();
        tree.set_value("system host-name", "edge");

        let config = run_handler(&handler, &mut tree).await.unwrap();
        assert_eq!(config.as_deref(), Some("edge"));
        assert_eq!(handler.steps(), vec!["get_config", "verify", "generate", "apply"]);
    }

    #[tokio::test]
    async fn test_run_handler_stops_on_verify_failure() {
        let handler = StepRecorder::new();
        let mut tree = ConfigTree::new();
        tree.set_value("system host-name", "bad");

        let err = run_handler(&handler, &mut tree).await.unwrap_err();
        assert!(err.is_config_error());
        assert_eq!(handler.steps(), vec!["get_config", "verify"]);
    }
}
