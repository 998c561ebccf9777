//! Group enumeration: which subsets of the records become one chart each.

use crate::classify::{classify, ChartFamily, Operation};
use crate::error::{Error, Result};
use crate::record::BenchmarkRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// How records are partitioned into charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupingMode {
    /// One chart per operation, all entity types aggregated.
    #[default]
    Global,
    /// One chart per (entity type, operation).
    PerEntity,
    /// Global charts followed by per-entity charts.
    Both,
}

impl GroupingMode {
    /// The single-key modes this mode runs, in order.
    #[must_use]
    pub fn passes(self) -> &'static [GroupingMode] {
        match self {
            Self::Global => &[Self::Global],
            Self::PerEntity => &[Self::PerEntity],
            Self::Both => &[Self::Global, Self::PerEntity],
        }
    }
}

impl fmt::Display for GroupingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Global => "global",
            Self::PerEntity => "per-entity",
            Self::Both => "both",
        })
    }
}

impl FromStr for GroupingMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "global" => Ok(Self::Global),
            "per-entity" | "perentity" | "entity" => Ok(Self::PerEntity),
            "both" => Ok(Self::Both),
            other => Err(Error::Config {
                key: "grouping_mode".into(),
                message: format!("unknown grouping mode '{other}' (expected global, per-entity or both)"),
            }),
        }
    }
}

/// Identity of one chart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    /// Operation identifier as it appears in the input.
    pub operation: String,
    /// Entity type, present only for per-entity groups.
    pub entity_type: Option<String>,
}

impl GroupKey {
    /// Key for a global group.
    #[must_use]
    pub fn global(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            entity_type: None,
        }
    }

    /// Key for a per-entity group.
    #[must_use]
    pub fn per_entity(entity_type: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            entity_type: Some(entity_type.into()),
        }
    }

    /// Grouping mode this key belongs to.
    #[must_use]
    pub fn mode(&self) -> GroupingMode {
        if self.entity_type.is_some() {
            GroupingMode::PerEntity
        } else {
            GroupingMode::Global
        }
    }

    /// File name without extension: `{operation}_all_entities` for global
    /// groups, `{entityType}_{operation}` for per-entity groups.
    #[must_use]
    pub fn file_stem(&self) -> String {
        let operation = sanitize(&self.operation);
        match &self.entity_type {
            None => format!("{operation}_all_entities"),
            Some(entity) => format!("{}_{operation}", sanitize(entity)),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entity_type {
            None => write!(f, "{}", self.operation),
            Some(entity) => write!(f, "{entity}/{}", self.operation),
        }
    }
}

fn sanitize(part: &str) -> String {
    part.replace(['/', '\\'], "_")
}

/// A non-empty subset of records charted together.
#[derive(Debug, Clone)]
pub struct Group<'a> {
    /// Identity of the chart.
    pub key: GroupKey,
    /// Classified operation shared by every record.
    pub operation: Operation,
    /// Chart family of `operation`.
    pub family: ChartFamily,
    /// Records in input order.
    pub records: Vec<&'a BenchmarkRecord>,
}

impl Group<'_> {
    /// Grouping mode the group was produced under.
    #[must_use]
    pub fn mode(&self) -> GroupingMode {
        self.key.mode()
    }
}

/// Partition classified records into groups, in first-seen key order.
/// Unclassified operations are left out; no group is ever empty.
pub fn enumerate(records: &[BenchmarkRecord], mode: GroupingMode) -> impl Iterator<Item = Group<'_>> {
    mode.passes()
        .iter()
        .flat_map(move |&pass| enumerate_pass(records, pass))
}

fn enumerate_pass(records: &[BenchmarkRecord], mode: GroupingMode) -> Vec<Group<'_>> {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<Group<'_>> = Vec::new();

    for record in records {
        let Some(operation) = classify(&record.operation).operation() else {
            continue;
        };
        let key = match mode {
            GroupingMode::PerEntity => GroupKey::per_entity(&record.entity_type, &record.operation),
            GroupingMode::Global | GroupingMode::Both => GroupKey::global(&record.operation),
        };
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(Group {
                key,
                operation,
                family: operation.family(),
                records: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].records.push(record);
    }

    for group in &groups {
        debug!(key = %group.key, family = %group.family, records = group.records.len(), "enumerated group");
    }
    groups
}

/// Distinct operation identifiers outside the taxonomy, in first-seen order.
#[must_use]
pub fn unclassified_operations(records: &[BenchmarkRecord]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for record in records {
        if classify(&record.operation).operation().is_none()
            && !seen.iter().any(|op| *op == record.operation)
        {
            seen.push(record.operation.clone());
        }
    }
    seen
}

/// A group as it would be charted, without its records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedGroup {
    /// Identity of the chart.
    pub key: GroupKey,
    /// Chart family.
    pub family: ChartFamily,
    /// Number of records in the group.
    pub records: usize,
}

/// List the charts a run would produce.
#[must_use]
pub fn plan(records: &[BenchmarkRecord], mode: GroupingMode) -> Vec<PlannedGroup> {
    enumerate(records, mode)
        .map(|g| PlannedGroup {
            records: g.records.len(),
            family: g.family,
            key: g.key,
        })
        .collect()
}
