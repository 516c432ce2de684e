// src/oracles/grid.rs

//! Row and column sum constraints over a binary grid.
//!
//! Cell `(r, c)` of an `R × C` grid is input bit `r * C + c`.

use super::{Clause, Conjunction, SumEquals};
use crate::core::RevqError;

fn check_dimensions(rows: usize, columns: usize) -> Result<(), RevqError> {
    if rows == 0 || columns == 0 {
        return Err(RevqError::invalid_argument(format!(
            "grid needs at least one row and one column, got {}x{}",
            rows, columns
        )));
    }
    Ok(())
}

fn row_clauses(row_sums: &[usize], columns: usize) -> Result<Vec<Clause>, RevqError> {
    row_sums
        .iter()
        .enumerate()
        .map(|(r, sum)| {
            let positions = (r * columns..(r + 1) * columns).collect();
            Ok::<_, RevqError>(Clause::new(Box::new(SumEquals::new(columns, *sum)?), positions))
        })
        .collect()
}

fn column_clauses(column_sums: &[usize], rows: usize) -> Result<Vec<Clause>, RevqError> {
    let columns = column_sums.len();
    column_sums
        .iter()
        .enumerate()
        .map(|(c, sum)| {
            let positions = (0..rows).map(|r| r * columns + c).collect();
            Ok::<_, RevqError>(Clause::new(Box::new(SumEquals::new(rows, *sum)?), positions))
        })
        .collect()
}

/// Marks grids whose row `r` has exactly `row_sums[r]` set cells.
pub fn row_constraints(row_sums: &[usize], columns: usize) -> Result<Conjunction, RevqError> {
    let rows = row_sums.len();
    check_dimensions(rows, columns)?;
    Conjunction::new(
        format!("rows{:?}", row_sums),
        rows * columns,
        row_clauses(row_sums, columns)?,
    )
}

/// Marks grids whose column `c` has exactly `column_sums[c]` set cells.
pub fn column_constraints(column_sums: &[usize], rows: usize) -> Result<Conjunction, RevqError> {
    let columns = column_sums.len();
    check_dimensions(rows, columns)?;
    Conjunction::new(
        format!("columns{:?}", column_sums),
        rows * columns,
        column_clauses(column_sums, rows)?,
    )
}

/// Kakuro-style grid: every row sum and every column sum must match.
///
/// One flat conjunction of `R + C` sum clauses, rows first, each with its own
/// status qubit.
pub fn kakuro(row_sums: &[usize], column_sums: &[usize]) -> Result<Conjunction, RevqError> {
    let (rows, columns) = (row_sums.len(), column_sums.len());
    check_dimensions(rows, columns)?;
    let mut clauses = row_clauses(row_sums, columns)?;
    clauses.extend(column_clauses(column_sums, rows)?);
    Conjunction::new(
        format!("kakuro({:?}, {:?})", row_sums, column_sums),
        rows * columns,
        clauses,
    )
}
