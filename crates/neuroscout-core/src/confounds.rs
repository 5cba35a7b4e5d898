//! First-row imputation for motion confound columns.
//!
//! Confound extraction tools leave the first sample of derivative-based
//! measures undefined. Downstream design matrices cannot carry missing
//! cells, so the first row is filled from the rest of the column.

use tracing::warn;

/// Columns subject to first-row imputation.
const IMPUTABLE: [&str; 3] = ["framewise_displacement", "std_dvars", "dvars"];

/// A named column of row-aligned samples. NaN marks a missing value.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfoundColumn {
    pub name: String,
    pub values: Vec<f64>,
}

impl ConfoundColumn {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Dense confound table: one column per confound, rows aligned across
/// columns by scan volume.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfoundTable {
    columns: Vec<ConfoundColumn>,
}

impl ConfoundTable {
    pub fn new(columns: Vec<ConfoundColumn>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[ConfoundColumn] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ConfoundColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    fn column_mut(&mut self, name: &str) -> Option<&mut ConfoundColumn> {
        self.columns.iter_mut().find(|c| c.name == name)
    }
}

/// Impute the first sample of each motion confound column whose value is
/// missing, using the mean of the column's non-zero, non-NaN samples.
///
/// Columns outside the fixed set, or whose first sample is already
/// present, are untouched. Mutates in place and returns the table for
/// chaining.
pub fn impute_confounds(table: &mut ConfoundTable) -> &mut ConfoundTable {
    for name in IMPUTABLE {
        let column = match table.column_mut(name) {
            Some(column) => column,
            None => continue,
        };
        if column.values.is_empty() || !column.values[0].is_nan() {
            continue;
        }

        let usable: Vec<f64> = column
            .values
            .iter()
            .copied()
            .filter(|v| *v != 0.0 && !v.is_nan())
            .collect();
        if usable.is_empty() {
            warn!(column = name, "no usable samples to impute from");
            continue;
        }

        column.values[0] = usable.iter().sum::<f64>() / usable.len() as f64;
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAN: f64 = f64::NAN;

    #[test]
    fn test_imputes_first_row_from_nonzero_mean() {
        let mut table = ConfoundTable::new(vec![ConfoundColumn::new(
            "framewise_displacement",
            vec![NAN, 0.1, 0.2, 0.0],
        )]);
        impute_confounds(&mut table);

        let values = &table.column("framewise_displacement").expect("column").values;
        assert!((values[0] - 0.15).abs() < 1e-12);
        assert_eq!(&values[1..], &[0.1, 0.2, 0.0]);
    }

    #[test]
    fn test_leaves_present_first_row_alone() {
        let mut table = ConfoundTable::new(vec![ConfoundColumn::new(
            "std_dvars",
            vec![1.2, NAN, 0.8],
        )]);
        impute_confounds(&mut table);

        assert_eq!(table.column("std_dvars").expect("column").values[0], 1.2);
    }

    #[test]
    fn test_ignores_columns_outside_fixed_set() {
        let mut table = ConfoundTable::new(vec![ConfoundColumn::new(
            "trans_x",
            vec![NAN, 0.3, 0.4],
        )]);
        impute_confounds(&mut table);

        assert!(table.column("trans_x").expect("column").values[0].is_nan());
    }

    #[test]
    fn test_imputes_all_listed_columns_independently() {
        let mut table = ConfoundTable::new(vec![
            ConfoundColumn::new("framewise_displacement", vec![NAN, 0.2]),
            ConfoundColumn::new("dvars", vec![NAN, 4.0, 6.0]),
            ConfoundColumn::new("trans_y", vec![NAN, 9.0]),
        ]);
        impute_confounds(&mut table);

        assert_eq!(
            table.column("framewise_displacement").expect("column").values[0],
            0.2
        );
        assert_eq!(table.column("dvars").expect("column").values[0], 5.0);
        assert!(table.column("trans_y").expect("column").values[0].is_nan());
    }

    #[test]
    fn test_no_usable_samples_leaves_missing() {
        let mut table = ConfoundTable::new(vec![ConfoundColumn::new(
            "dvars",
            vec![NAN, 0.0, NAN],
        )]);
        impute_confounds(&mut table);

        assert!(table.column("dvars").expect("column").values[0].is_nan());
    }
}
