//! Dataset-level derivations: record size, missing cells, type distribution.

use crate::defect::Defect;
use crate::report::{Table, Variable};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Bytes per row: the reported `record_size`, else `memory_size / n`.
///
/// An empty table has no meaningful record size and yields `0.0`.
pub fn derive_record_size(table: &Table) -> f64 {
    if let Some(size) = table.record_size {
        return size;
    }
    if table.n == 0 {
        debug!("record size undefined for an empty table");
        return 0.0;
    }
    table.memory_size / table.n as f64
}

/// Share of missing cells: the reported `p_cells_missing`, else
/// `n_cells_missing / (n * n_var)`, `0.0` for an empty table.
pub fn derive_p_cells_missing(table: &Table) -> f64 {
    if let Some(p) = table.p_cells_missing {
        return p;
    }
    match table.n_cells() {
        0 => 0.0,
        total => table.n_cells_missing.min(total) as f64 / total as f64,
    }
}

/// Number of variables with at least one missing value.
pub fn derive_variables_with_missing(
    table: &Table,
    variables: &IndexMap<String, Variable>,
) -> u64 {
    table.n_vars_with_missing.unwrap_or_else(|| {
        variables
            .values()
            .filter(|variable| variable.common().n_missing > 0)
            .count() as u64
    })
}

/// Cell split for the missing-data pie/bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingDataStats {
    pub with_data: u64,
    pub missing: u64,
}

impl MissingDataStats {
    pub fn total(&self) -> u64 {
        self.with_data + self.missing
    }
}

/// Present vs missing cells. Both parts sum to `n * n_var`.
pub fn missing_data_stats(table: &Table) -> MissingDataStats {
    missing_data_stats_checked(table).0
}

/// Like [`missing_data_stats`], also reporting a missing count larger than the table.
pub fn missing_data_stats_checked(table: &Table) -> (MissingDataStats, Option<Defect>) {
    let total = table.n_cells();
    let defect = (table.n_cells_missing > total).then(|| {
        warn!(
            missing = table.n_cells_missing,
            total, "missing cell count exceeds table size, clamping"
        );
        Defect::MissingCellsExceedTotal {
            missing: table.n_cells_missing,
            total,
        }
    });
    let missing = table.n_cells_missing.min(total);
    let stats = MissingDataStats {
        with_data: total - missing,
        missing,
    };
    (stats, defect)
}

/// A labelled value for categorical charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedValue {
    pub name: String,
    pub value: u64,
}

/// Variable types and their counts, in the order the report lists them.
pub fn type_distribution(table: &Table) -> Vec<NamedValue> {
    table
        .types
        .iter()
        .map(|(name, count)| NamedValue {
            name: name.to_string(),
            value: *count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{CommonStats, UnknownVariable};
    use pretty_assertions::assert_eq;

    fn table(n: u64, n_var: u64) -> Table {
        Table {
            n,
            n_var,
            ..Default::default()
        }
    }

    fn variable_with_missing(n_missing: u64) -> Variable {
        Variable::Unknown(UnknownVariable {
            type_name: "Text".to_string(),
            common: CommonStats {
                n_missing,
                ..Default::default()
            },
        })
    }

    #[test]
    fn test_record_size_derived() {
        let table = Table {
            memory_size: 1000.0,
            ..table(100, 14)
        };
        assert_eq!(derive_record_size(&table), 10.0);
    }

    #[test]
    fn test_record_size_reported_wins() {
        let table = Table {
            memory_size: 1000.0,
            record_size: Some(112.0),
            ..table(100, 14)
        };
        assert_eq!(derive_record_size(&table), 112.0);
    }

    #[test]
    fn test_record_size_empty_table() {
        let table = Table {
            memory_size: 1000.0,
            ..table(0, 14)
        };
        assert_eq!(derive_record_size(&table), 0.0);
    }

    #[test]
    fn test_p_cells_missing() {
        let table = Table {
            n_cells_missing: 120,
            ..table(507, 14)
        };
        assert!((derive_p_cells_missing(&table) - 120.0 / 7098.0).abs() < 1e-12);
        assert_eq!(derive_p_cells_missing(&self::table(0, 0)), 0.0);
    }

    #[test]
    fn test_variables_with_missing() {
        let variables: IndexMap<String, Variable> = [
            ("CRIM", variable_with_missing(20)),
            ("ZN", variable_with_missing(0)),
            ("AGE", variable_with_missing(3)),
        ]
        .into_iter()
        .map(|(name, variable)| (name.to_string(), variable))
        .collect();

        assert_eq!(derive_variables_with_missing(&table(10, 3), &variables), 2);

        let reported = Table {
            n_vars_with_missing: Some(6),
            ..table(10, 3)
        };
        assert_eq!(derive_variables_with_missing(&reported, &variables), 6);
    }

    #[test]
    fn test_missing_data_stats() {
        let table = Table {
            n_cells_missing: 120,
            ..table(507, 14)
        };
        let stats = missing_data_stats(&table);
        assert_eq!(
            stats,
            MissingDataStats {
                with_data: 6978,
                missing: 120
            }
        );
        assert_eq!(stats.total(), 7098);
    }

    #[test]
    fn test_missing_data_stats_clamped() {
        let table = Table {
            n_cells_missing: 50,
            ..table(4, 10)
        };
        let (stats, defect) = missing_data_stats_checked(&table);
        assert_eq!(stats.missing, 40);
        assert_eq!(stats.with_data, 0);
        assert_eq!(
            defect,
            Some(Defect::MissingCellsExceedTotal {
                missing: 50,
                total: 40
            })
        );
    }

    #[test]
    fn test_type_distribution_keeps_order() {
        let table = Table {
            types: IndexMap::from([("Numeric".to_string(), 13), ("Categorical".to_string(), 1)]),
            ..table(506, 14)
        };
        let names: Vec<(String, u64)> = type_distribution(&table)
            .into_iter()
            .map(|nv| (nv.name, nv.value))
            .collect();
        assert_eq!(
            names,
            vec![("Numeric".to_string(), 13), ("Categorical".to_string(), 1)]
        );
    }
}
