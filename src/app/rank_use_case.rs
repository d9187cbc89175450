use std::path::PathBuf;
use tracing::{info, instrument};

use crate::app::ports::{RankingOutputPort, RawInputPort};
use crate::error::Result;
use crate::pipeline::{Pipeline, PipelineRun};

/// Result of ranking one raw input
#[derive(Debug)]
pub struct RankOutcome {
    pub run: PipelineRun,
    pub artifacts: Vec<PathBuf>,
}

/// Reads raw entries, runs the scoring pipeline and writes every artifact
pub struct RankUseCase {
    input: Box<dyn RawInputPort>,
    outputs: Vec<Box<dyn RankingOutputPort>>,
}

impl RankUseCase {
    pub fn new(input: Box<dyn RawInputPort>, outputs: Vec<Box<dyn RankingOutputPort>>) -> Self {
        Self { input, outputs }
    }

    /// Fails only when the input cannot be read or an artifact cannot be written
    #[instrument(skip(self), fields(input = %self.input.describe()))]
    pub fn execute(&self) -> Result<RankOutcome> {
        let entries = self.input.load_entries()?;
        let run = Pipeline::run(&entries);

        let ranked = run.ranked();
        let artifacts = self
            .outputs
            .iter()
            .map(|output| output.write_ranking(&ranked))
            .collect::<Result<Vec<_>>>()?;

        info!("🏁 Ranking written to {} artifacts", artifacts.len());
        Ok(RankOutcome { run, artifacts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScraperError;
    use crate::types::{Category, RawEntry, ScoredRecord};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    struct StaticInput(std::result::Result<Vec<RawEntry>, String>);

    impl RawInputPort for StaticInput {
        fn describe(&self) -> String {
            "static".to_string()
        }

        fn load_entries(&self) -> Result<Vec<RawEntry>> {
            self.0.clone().map_err(|reason| ScraperError::InputUnavailable {
                path: PathBuf::from("static"),
                reason,
            })
        }
    }

    struct CapturingOutput {
        written: Arc<Mutex<Vec<ScoredRecord>>>,
    }

    impl RankingOutputPort for CapturingOutput {
        fn write_ranking(&self, ranked: &[ScoredRecord]) -> Result<PathBuf> {
            self.written.lock().unwrap().extend_from_slice(ranked);
            Ok(PathBuf::from("captured"))
        }
    }

    struct FailingOutput;

    impl RankingOutputPort for FailingOutput {
        fn write_ranking(&self, _ranked: &[ScoredRecord]) -> Result<PathBuf> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }
    }

    #[test]
    fn test_writes_ranked_records() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let use_case = RankUseCase::new(
            Box::new(StaticInput(Ok(vec![
                json!({ "name": "Offline" }),
                json!({ "no_name": true }),
                json!({ "name": "Portal", "site": "portal.com.br", "email": "a@portal.com.br" }),
            ]))),
            vec![Box::new(CapturingOutput {
                written: written.clone(),
            })],
        );

        let outcome = use_case.execute().unwrap();

        assert_eq!(outcome.artifacts, vec![PathBuf::from("captured")]);
        assert_eq!(outcome.run.summary.skipped_records, 1);
        let written = written.lock().unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(written[0].record.name, "Portal");
        assert_eq!(written[0].category, Category::MidConsolidated);
        assert_eq!(written[1].category, Category::OfflineNoSite);
    }

    #[test]
    fn test_unreadable_input_is_fatal() {
        let use_case = RankUseCase::new(Box::new(StaticInput(Err("gone".to_string()))), vec![]);
        assert!(matches!(
            use_case.execute(),
            Err(ScraperError::InputUnavailable { .. })
        ));
    }

    #[test]
    fn test_unwritable_output_is_fatal() {
        let use_case = RankUseCase::new(
            Box::new(StaticInput(Ok(vec![json!({ "name": "A" })]))),
            vec![Box::new(FailingOutput)],
        );
        assert!(matches!(use_case.execute(), Err(ScraperError::Io(_))));
    }
}
