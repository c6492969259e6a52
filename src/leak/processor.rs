use std::io::{self, Write};
use std::path::PathBuf;

use serde_json::Value;

use crate::config::ProfilerOptions;
use crate::error::LeakError;
use crate::heap::HeapSnapshot;
use crate::render::GraphRenderer;
use crate::report;
use crate::retention::{RetentionPathExtractor, RetentionStrategy};

use super::{IterationResult, LeakDetector, LeakScenario, RunLog};

/// Per-run leak bookkeeping driven by the stress-test harness.
///
/// Call [`LeakProcessor::process`] once per iteration, in order, then
/// [`LeakProcessor::report_result`] at the end of the run.
pub struct LeakProcessor {
    scenario: Box<dyn LeakScenario + Send>,
    options: ProfilerOptions,
    extractor: RetentionPathExtractor,
    run_log: RunLog,
    diagnostics: Box<dyn Write + Send>,
}

impl LeakProcessor {
    /// Creates a processor that prints its summary to stdout.
    pub fn new(scenario: impl LeakScenario + Send + 'static, options: ProfilerOptions) -> Self {
        let extractor = RetentionPathExtractor::new(&options);
        Self {
            scenario: Box::new(scenario),
            options,
            extractor,
            run_log: RunLog::new(),
            diagnostics: Box::new(io::stdout()),
        }
    }

    pub fn with_diagnostics(mut self, out: impl Write + Send + 'static) -> Self {
        self.diagnostics = Box::new(out);
        self
    }

    pub fn with_strategy(mut self, strategy: impl RetentionStrategy + 'static) -> Self {
        self.extractor = self.extractor.with_strategy(strategy);
        self
    }

    pub fn with_renderer(mut self, renderer: impl GraphRenderer + 'static) -> Self {
        self.extractor = self.extractor.with_renderer(renderer);
        self
    }

    pub fn options(&self) -> &ProfilerOptions {
        &self.options
    }

    pub fn run_log(&self) -> &RunLog {
        &self.run_log
    }

    pub fn into_run_log(self) -> RunLog {
        self.run_log
    }

    /// Records one iteration.
    ///
    /// Without a snapshot nothing is recorded. Otherwise an entry is always
    /// appended, even if it has no leaks (detection disabled, nothing tracked).
    pub fn process(
        &mut self,
        snapshot: Option<&dyn HeapSnapshot>,
        is_cleanup: bool,
        iteration_name: &str,
        memory_stats: Option<Value>,
    ) -> Result<(), LeakError> {
        let Some(snapshot) = snapshot else {
            log::debug!("{iteration_name}: no heap snapshot, skipping");
            return Ok(());
        };

        let previous = self.run_log.last();
        let tracked = self.scenario.tracked_types(is_cleanup);
        let detector = LeakDetector::new(&self.options, &self.extractor);
        let leaks = detector.detect(
            Some(snapshot),
            is_cleanup,
            previous,
            &tracked,
            iteration_name,
            &mut *self.diagnostics,
        )?;

        self.run_log
            .append(IterationResult::new(iteration_name, leaks, memory_stats));
        Ok(())
    }

    /// Writes `{scenario}_Result.json` under the output root and returns its path.
    pub fn report_result(&self) -> Result<PathBuf, LeakError> {
        let path = self
            .options
            .output_root
            .join(format!("{}_Result.json", self.scenario.name()));
        report::write_report(&self.run_log, &path)?;
        log::info!(
            "wrote {} iteration(s) to {}",
            self.run_log.len(),
            path.display()
        );
        Ok(path)
    }
}
