//! The end-to-end run: load, group, chart, write.

use crate::artifact::ArtifactWriter;
use crate::chart::{render_chart, select_chart};
use crate::config::{Config, FailurePolicy};
use crate::error::{Error, Result};
use crate::group::{enumerate, unclassified_operations, Group, GroupKey};
use crate::record::{load_records, BenchmarkRecord};
use crate::theme::Style;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{info, warn};

/// A group whose chart could not be produced.
#[derive(Debug)]
pub struct GroupFailure {
    /// The group.
    pub key: GroupKey,
    /// What went wrong.
    pub error: Error,
}

/// Outcome of a run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Files written, in group order.
    pub written: Vec<PathBuf>,
    /// Groups that failed, in group order.
    pub failures: Vec<GroupFailure>,
    /// Operations left out because they are not in the taxonomy.
    pub skipped_operations: Vec<String>,
}

impl RunReport {
    /// Whether every group produced its chart.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Configured chart generation run.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
    style: Style,
    writer: ArtifactWriter,
}

impl Pipeline {
    /// Validate `config` and prepare the shared style.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let style = config.style()?;
        let writer = ArtifactWriter::new(&config.output_dir, config.dpi);
        Ok(Self {
            config,
            style,
            writer,
        })
    }

    /// The configuration in effect.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load the configured input and chart every group.
    ///
    /// # Errors
    ///
    /// Returns the load error if the input cannot be read, or the first group
    /// failure under [`FailurePolicy::Abort`].
    pub fn run(&self) -> Result<RunReport> {
        let records = load_records(&self.config.input_path)?;
        info!(
            input = %self.config.input_path.display(),
            records = records.len(),
            mode = %self.config.grouping_mode,
            "loaded input"
        );
        self.run_records(&records)
    }

    /// Chart every group of already loaded records.
    ///
    /// # Errors
    ///
    /// Returns the first group failure under [`FailurePolicy::Abort`].
    pub fn run_records(&self, records: &[BenchmarkRecord]) -> Result<RunReport> {
        let skipped_operations = unclassified_operations(records);
        for operation in &skipped_operations {
            warn!(operation = %operation, "operation is not in the taxonomy; no chart will be produced");
        }

        let groups: Vec<Group<'_>> = enumerate(records, self.config.grouping_mode).collect();
        let mut report = RunReport {
            skipped_operations,
            ..RunReport::default()
        };

        let clashes = self.name_clashes(&groups);
        for (key, result) in self.process_all(&groups, &clashes) {
            match result {
                Ok(path) => report.written.push(path),
                Err(error) => {
                    warn!(key = %key, error = %error, "chart failed");
                    if self.config.failure_policy == FailurePolicy::Abort {
                        return Err(error);
                    }
                    report.failures.push(GroupFailure { key, error });
                }
            }
        }

        info!(
            written = report.written.len(),
            failed = report.failures.len(),
            skipped = report.skipped_operations.len(),
            "run complete"
        );
        Ok(report)
    }

    /// For each group, the earlier group whose artifact path it would reuse.
    fn name_clashes(&self, groups: &[Group<'_>]) -> Vec<Option<GroupKey>> {
        let mut owners: HashMap<PathBuf, &GroupKey> = HashMap::new();
        groups
            .iter()
            .map(|group| match owners.entry(self.writer.path_for(&group.key)) {
                Entry::Occupied(owner) => Some((*owner.get()).clone()),
                Entry::Vacant(slot) => {
                    slot.insert(&group.key);
                    None
                }
            })
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn process_all(
        &self,
        groups: &[Group<'_>],
        clashes: &[Option<GroupKey>],
    ) -> Vec<(GroupKey, Result<PathBuf>)> {
        let abort = self.config.failure_policy == FailurePolicy::Abort;
        let mut results = Vec::with_capacity(groups.len());
        for (group, clash) in groups.iter().zip(clashes) {
            let result = self.process(group, clash.as_ref());
            let failed = result.is_err();
            results.push((group.key.clone(), result));
            if failed && abort {
                break;
            }
        }
        results
    }

    #[cfg(feature = "parallel")]
    fn process_all(
        &self,
        groups: &[Group<'_>],
        clashes: &[Option<GroupKey>],
    ) -> Vec<(GroupKey, Result<PathBuf>)> {
        use rayon::prelude::*;

        groups
            .par_iter()
            .zip(clashes)
            .map(|(group, clash)| (group.key.clone(), self.process(group, clash.as_ref())))
            .collect()
    }

    /// Chart one group. The framebuffer lives only for this call.
    fn process(&self, group: &Group<'_>, clash: Option<&GroupKey>) -> Result<PathBuf> {
        if let Some(other) = clash {
            return Err(Error::ArtifactCollision {
                key: group.key.to_string(),
                other: other.to_string(),
                path: self.writer.path_for(&group.key),
            });
        }
        let spec = select_chart(group)?;
        let fb = render_chart(&spec, &self.style)?;
        self.writer.write(&fb, &group.key)
    }
}
