//! Shared execution logic for the CLI
//!
//! Runs configured simulators one after another, each under its own fresh
//! root budget, handing every finished run to a reporter.

use crate::cli::Config;
use crate::errors::{Result, SimError};
use crate::report::Reporter;
use crate::sequencer::RunReport;
use tracing::debug;

/// Run every simulator in `config`, or only the one named by `only`
pub async fn run_simulators(
    config: &Config,
    only: Option<&str>,
    reporter: &mut dyn Reporter,
) -> Result<Vec<RunReport>> {
    let selected: Vec<_> = match only {
        Some(name) => {
            let simulator = config.simulator(name).ok_or_else(|| {
                SimError::ConfigError(format!("no simulator named '{}'", name))
            })?;
            vec![simulator]
        }
        None => config.simulators.iter().collect(),
    };

    let mut reports = Vec::with_capacity(selected.len());
    for simulator in selected {
        debug!(simulator = %simulator.name, "building sequencer");
        let mut sequencer = simulator.build(config.budget)?;
        let report = sequencer.run().await?;
        reporter.report(&report)?;
        reports.push(report);
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::RunOutcome;

    #[derive(Default)]
    struct Collect(Vec<String>);

    impl Reporter for Collect {
        fn report(&mut self, report: &RunReport) -> Result<()> {
            self.0.push(report.simulator.clone());
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_default_demos_in_order() {
        let mut collect = Collect::default();
        let reports = run_simulators(&Config::default(), None, &mut collect).await.unwrap();

        assert_eq!(collect.0, vec!["dynamic-priority", "fixed-overrun"]);
        assert_eq!(reports[0].outcome, RunOutcome::Completed { remaining_ms: 145 });
        assert_eq!(
            reports[1].outcome,
            RunOutcome::Expired {
                unexecuted: vec!["slow-lookup".to_string(), "render".to_string()]
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_filter() {
        let mut collect = Collect::default();
        let reports = run_simulators(&Config::default(), Some("fixed-overrun"), &mut collect)
            .await
            .unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(collect.0, vec!["fixed-overrun"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_simulator() {
        let mut collect = Collect::default();
        let err = run_simulators(&Config::default(), Some("nope"), &mut collect)
            .await
            .unwrap_err();
        assert!(matches!(err, SimError::ConfigError(_)));
        assert!(collect.0.is_empty());
    }
}
