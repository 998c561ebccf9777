//! Operation taxonomy: which chart family each benchmarked operation gets.

use std::fmt;

/// How a group of measurements is charted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartFamily {
    /// Trend line across an increasing size dimension.
    Batch,
    /// Latency distribution per scale.
    Single,
}

impl fmt::Display for ChartFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Batch => "batch",
            Self::Single => "single",
        })
    }
}

/// A recognized benchmark operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Bulk insert.
    AddMany,
    /// Read the whole collection.
    GetAll,
    /// Delete the whole collection.
    DeleteAll,
    /// Read one item by key.
    GetById,
    /// Update one item.
    Update,
    /// Delete one item.
    Delete,
}

impl Operation {
    /// Every recognized operation.
    pub const ALL: [Self; 6] = [
        Self::AddMany,
        Self::GetAll,
        Self::DeleteAll,
        Self::GetById,
        Self::Update,
        Self::Delete,
    ];

    /// Chart family for this operation.
    #[must_use]
    pub const fn family(self) -> ChartFamily {
        match self {
            Self::AddMany | Self::GetAll | Self::DeleteAll => ChartFamily::Batch,
            Self::GetById | Self::Update | Self::Delete => ChartFamily::Single,
        }
    }

    /// Whether this is the collection-wide delete, charted on a log axis.
    #[must_use]
    pub const fn is_delete_all(self) -> bool {
        matches!(self, Self::DeleteAll)
    }

    /// Canonical name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AddMany => "AddMany",
            Self::GetAll => "GetAll",
            Self::DeleteAll => "DeleteAll",
            Self::GetById => "GetById",
            Self::Update => "Update",
            Self::Delete => "Delete",
        }
    }

    /// Look up an identifier as written in benchmark output.
    ///
    /// Matching ignores case, `-`, `_`, spaces and a trailing `Async`, so
    /// `GetByIdAsync`, `get-by-id` and `get_by_id` are all [`Self::GetById`].
    #[must_use]
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match normalize(identifier).as_str() {
            "addmany" => Some(Self::AddMany),
            "getall" => Some(Self::GetAll),
            "deleteall" => Some(Self::DeleteAll),
            "getbyid" => Some(Self::GetById),
            "update" => Some(Self::Update),
            "delete" | "deleteone" => Some(Self::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn normalize(identifier: &str) -> String {
    let folded: String = identifier
        .chars()
        .filter(|c| !matches!(c, '-' | '_') && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    match folded.strip_suffix("async") {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => folded,
    }
}

/// Result of looking up an operation identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Known operation.
    Classified(Operation),
    /// Not in the taxonomy; produces no chart.
    Unclassified,
}

impl Classification {
    /// The operation, if classified.
    #[must_use]
    pub const fn operation(self) -> Option<Operation> {
        match self {
            Self::Classified(op) => Some(op),
            Self::Unclassified => None,
        }
    }

    /// The chart family, if classified.
    #[must_use]
    pub const fn family(self) -> Option<ChartFamily> {
        match self {
            Self::Classified(op) => Some(op.family()),
            Self::Unclassified => None,
        }
    }
}

/// Classify an operation identifier.
#[must_use]
pub fn classify(identifier: &str) -> Classification {
    Operation::from_identifier(identifier).map_or(Classification::Unclassified, Classification::Classified)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_benchmark_names_classify() {
        assert_eq!(classify("AddManyAsync").family(), Some(ChartFamily::Batch));
        assert_eq!(classify("GetAllAsync").family(), Some(ChartFamily::Batch));
        assert_eq!(classify("DeleteAllAsync").family(), Some(ChartFamily::Batch));
        assert_eq!(classify("GetByIdAsync").family(), Some(ChartFamily::Single));
        assert_eq!(classify("UpdateAsync").family(), Some(ChartFamily::Single));
        assert_eq!(classify("DeleteAsync").family(), Some(ChartFamily::Single));
    }

    #[test]
    fn test_spellings_normalize() {
        for name in ["GetByIdAsync", "get-by-id", "get_by_id", "GET BY ID"] {
            assert_eq!(classify(name), Classification::Classified(Operation::GetById), "{name}");
        }
        assert_eq!(classify("delete-one").operation(), Some(Operation::Delete));
        assert_eq!(classify("delete-all").operation(), Some(Operation::DeleteAll));
    }

    #[test]
    fn test_unknown_operations_are_unclassified() {
        assert_eq!(classify("ping"), Classification::Unclassified);
        assert_eq!(classify("AddAsync"), Classification::Unclassified);
        assert_eq!(classify("Async"), Classification::Unclassified);
        assert_eq!(classify(""), Classification::Unclassified);
        assert_eq!(classify("ping").family(), None);
    }

    #[test]
    fn test_only_delete_all_is_log() {
        let log: Vec<_> = Operation::ALL.iter().filter(|op| op.is_delete_all()).collect();
        assert_eq!(log, vec![&Operation::DeleteAll]);
    }

    #[test]
    fn test_round_trip_canonical_names() {
        for op in Operation::ALL {
            assert_eq!(Operation::from_identifier(op.name()), Some(op));
        }
    }
}
