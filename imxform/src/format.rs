//! Plain-text matrix persistence: space-separated cells, one row per line.

use crate::matrix::IntMatrix;
use core::fmt;
use itertools::Itertools;
use ndarray::{Array2, ArrayView2};
use num_complex::Complex;
use std::io;
use std::string::String;
use std::vec::Vec;

/// Write `matrix` as space-separated cells, one row per line.
pub fn write_matrix<W, T>(writer: &mut W, matrix: ArrayView2<'_, T>) -> io::Result<()>
where
    W: io::Write,
    T: fmt::Display,
{
    for row in matrix.rows() {
        writeln!(writer, "{}", row.iter().join(" "))?;
    }
    Ok(())
}

/// Write a complex matrix with every cell rendered as `(re,im)`.
pub fn write_complex_matrix<W, F>(
    writer: &mut W,
    matrix: ArrayView2<'_, Complex<F>>,
) -> io::Result<()>
where
    W: io::Write,
    F: fmt::Display,
{
    for row in matrix.rows() {
        writeln!(
            writer,
            "{}",
            row.iter().map(|c| format!("({},{})", c.re, c.im)).join(" ")
        )?;
    }
    Ok(())
}

/// Failure to read a text matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseMatrixError {
    /// A cell is not a base-10 `i32`.
    InvalidCell {
        /// 1-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },
    /// A row has a different number of cells than the first row.
    Ragged {
        /// 1-based line number.
        line: usize,
        /// Cells in the first row.
        expected: usize,
        /// Cells in this row.
        got: usize,
    },
}

impl fmt::Display for ParseMatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseMatrixError::InvalidCell { line, token } => {
                write!(f, "Line {line}: `{token}` is not an integer.")
            }
            ParseMatrixError::Ragged {
                line,
                expected,
                got,
            } => write!(f, "Line {line}: expected {expected} cells, got {got}."),
        }
    }
}

impl std::error::Error for ParseMatrixError {}

/// Parse the text produced by [`write_matrix`] back into an integer matrix.
///
/// Blank lines are skipped. Empty text yields a `0 x 0` matrix.
///
/// ```
/// use imxform::format::parse_int_matrix;
/// use ndarray::array;
///
/// let m = parse_int_matrix("11 12 \n21 22 \n").unwrap();
/// assert_eq!(m, array![[11, 12], [21, 22]]);
/// ```
pub fn parse_int_matrix(text: &str) -> Result<IntMatrix, ParseMatrixError> {
    let mut cols = None;
    let mut rows = 0;
    let mut cells = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let before = cells.len();
        for token in line.split_whitespace() {
            let value = token
                .parse::<i32>()
                .map_err(|_| ParseMatrixError::InvalidCell {
                    line: index + 1,
                    token: token.into(),
                })?;
            cells.push(value);
        }
        let got = cells.len() - before;
        if got == 0 {
            continue;
        }
        match cols {
            None => cols = Some(got),
            Some(expected) if expected != got => {
                return Err(ParseMatrixError::Ragged {
                    line: index + 1,
                    expected,
                    got,
                })
            }
            Some(_) => {}
        }
        rows += 1;
    }
    let cols = cols.unwrap_or(0);
    Ok(Array2::from_shape_fn((rows, cols), |(i, j)| cells[i * cols + j]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn writes_one_row_per_line() {
        let mut buf = Vec::new();
        write_matrix(&mut buf, array![[-6, -5], [5, 6]].view()).expect("in-memory write");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "-6 -5\n5 6\n");
    }

    #[test]
    fn writes_complex_cells_as_pairs() {
        let mut buf = Vec::new();
        let m = array![[Complex::new(33.0, 0.0), Complex::new(-5.0, 5.0)]];
        write_complex_matrix(&mut buf, m.view()).expect("in-memory write");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "(33,0) (-5,5)\n");
    }

    #[test]
    fn parse_reads_written_text() {
        let m = array![[1, -2, 3], [40, 50, -60]];
        let mut buf = Vec::new();
        write_matrix(&mut buf, m.view()).expect("in-memory write");
        let text = String::from_utf8(buf).expect("utf8");
        assert_eq!(parse_int_matrix(&text).expect("well formed"), m);
    }

    #[test]
    fn parse_rejects_ragged_rows_and_bad_tokens() {
        assert_eq!(
            parse_int_matrix("1 2\n3\n").expect_err("ragged"),
            ParseMatrixError::Ragged {
                line: 2,
                expected: 2,
                got: 1
            }
        );
        assert_eq!(
            parse_int_matrix("1 2\n3 x\n").expect_err("bad token"),
            ParseMatrixError::InvalidCell {
                line: 2,
                token: "x".into()
            }
        );
    }

    #[test]
    fn parse_skips_blank_lines_and_accepts_empty_text() {
        assert_eq!(
            parse_int_matrix("\n7 8\n\n9 10\n").expect("well formed"),
            array![[7, 8], [9, 10]]
        );
        assert_eq!(parse_int_matrix("").expect("empty").dim(), (0, 0));
    }
}
