use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::{ProfilerOptions, TraversalLimits};
use crate::heap::{HeapSnapshot, TypeInfo};
use crate::render::{DotRenderer, GraphRenderer};

use super::strategy::{FirstInstance, RetentionStrategy};

/// Directory, relative to the output root, that receives rendered retention graphs.
pub const GRAPHS_DIRECTORY: &str = "graphs";

/// Traces a representative instance of a type and writes its rendered retention graph.
pub struct RetentionPathExtractor {
    output_root: PathBuf,
    limits: TraversalLimits,
    strategy: Box<dyn RetentionStrategy>,
    renderer: Box<dyn GraphRenderer>,
}

impl RetentionPathExtractor {
    /// Extractor using [`FirstInstance`] selection and [`DotRenderer`] output.
    pub fn new(options: &ProfilerOptions) -> Self {
        Self {
            output_root: options.output_root.clone(),
            limits: options.traversal,
            strategy: Box::new(FirstInstance),
            renderer: Box::new(DotRenderer),
        }
    }

    pub fn with_strategy(mut self, strategy: impl RetentionStrategy + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    pub fn with_renderer(mut self, renderer: impl GraphRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn graphs_dir(&self) -> PathBuf {
        self.output_root.join(GRAPHS_DIRECTORY)
    }

    pub fn ensure_graphs_dir(&self) -> io::Result<()> {
        fs::create_dir_all(self.graphs_dir())
    }

    /// `graphs/{label}_{type}.{ext}`, relative to the output root.
    pub fn artifact_path(&self, iteration_name: &str, type_name: &str) -> String {
        format!(
            "{}/{}_{}.{}",
            GRAPHS_DIRECTORY,
            sanitize(iteration_name),
            sanitize(type_name),
            self.renderer.extension()
        )
    }

    /// Writes the retention graph for one instance of `type_info`.
    ///
    /// Returns the artifact path relative to the output root, or `None` when no
    /// path could be traced or the file could not be written. The graphs
    /// directory is created if absent.
    pub fn extract_path(
        &self,
        snapshot: &dyn HeapSnapshot,
        type_info: &TypeInfo,
        iteration_name: &str,
    ) -> Option<String> {
        let graph = match self.strategy.select(snapshot, type_info, self.limits) {
            Ok(graph) => graph,
            Err(err) => {
                log::debug!(
                    "no retention path for {} in {iteration_name}: {err}",
                    type_info.type_name
                );
                return None;
            }
        };

        if !graph.is_strongly_rooted() {
            log::warn!(
                "retention path for {} instance {} in {iteration_name} is held only through finalizer or ephemeron references",
                type_info.type_name,
                graph.target()
            );
        }

        if let Err(err) = self.ensure_graphs_dir() {
            log::error!("cannot create {}: {err}", self.graphs_dir().display());
            return None;
        }

        let renamed = [iteration_name, type_info.type_name.as_str()]
            .into_iter()
            .any(|component| matches!(sanitize(component), Cow::Owned(_)));
        let relative = self.artifact_path(iteration_name, &type_info.type_name);
        if renamed {
            log::warn!(
                "{} in {iteration_name} written as {relative}; other names may map to the same file",
                type_info.type_name
            );
        }
        let full = self.output_root.join(Path::new(&relative));
        if let Err(err) = fs::write(&full, self.renderer.render(&graph)) {
            log::error!("failed to write retention graph {}: {err}", full.display());
            return None;
        }

        log::debug!(
            "wrote {} ({} nodes, {} edges)",
            full.display(),
            graph.nodes().len(),
            graph.edges().len()
        );
        Some(relative)
    }
}

/// Replaces characters that are not valid in file names on common platforms.
///
/// Borrows when nothing needed replacing.
fn sanitize(component: &str) -> Cow<'_, str> {
    let invalid = |ch: char| matches!(ch, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|');
    if !component.contains(invalid) {
        return Cow::Borrowed(component);
    }
    Cow::Owned(
        component
            .chars()
            .map(|ch| if invalid(ch) { '_' } else { ch })
            .collect(),
    )
}
