//! Sliding windows over indexed columns.
//!
//! A rolling computation of size `w` over a column of `n` rows produces
//! one output per row. The output at row `t` sees rows `t-w+1 ..= t`;
//! rows before the first full window (`t < w-1`) produce no value.
//!
//! Columns may contain missing observations (`None`). The window bounds
//! are positional, so a missing observation still occupies its row; the
//! statistic applied to the window decides what to do with it (the
//! functions in [`stats`] skip them).
//!
//! # Example
//!
//! ```rust
//! use perfcalc_math::rolling::{rolling_apply, stats};
//!
//! let column = [None, Some(1.0), Some(2.0), Some(3.0)];
//! let sums = rolling_apply(&column, 2, |w| Some(stats::present(w).iter().sum()));
//!
//! assert_eq!(sums, vec![None, Some(1.0), Some(3.0), Some(5.0)]);
//! ```

pub mod stats;

/// Iterator over the trailing window ending at each row.
///
/// Yields exactly one item per row of the underlying slice: `None` while
/// the window is not yet full, then `Some(slice)` of length `size`.
/// A `size` of zero never fills.
#[derive(Debug, Clone)]
pub struct RollingWindows<'a, T> {
    data: &'a [T],
    size: usize,
    row: usize,
}

impl<'a, T> RollingWindows<'a, T> {
    /// Creates a rolling iterator of `size` rows over `data`.
    #[must_use]
    pub fn new(data: &'a [T], size: usize) -> Self {
        Self { data, size, row: 0 }
    }

    /// Returns the index of the first row with a full window, if any.
    #[must_use]
    pub fn first_full_row(&self) -> Option<usize> {
        if self.size == 0 || self.size > self.data.len() {
            None
        } else {
            Some(self.size - 1)
        }
    }
}

impl<'a, T> Iterator for RollingWindows<'a, T> {
    type Item = Option<&'a [T]>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.row >= self.data.len() {
            return None;
        }

        let row = self.row;
        self.row += 1;

        if self.size == 0 || row + 1 < self.size {
            Some(None)
        } else {
            Some(Some(&self.data[row + 1 - self.size..=row]))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.data.len() - self.row;
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for RollingWindows<'_, T> {}

/// Applies `f` to every full trailing window of `data`.
///
/// Rows without a full window, rows where `f` returns `None`, and rows
/// where `f` returns a non-finite number are all `None` in the output.
pub fn rolling_apply<T, F>(data: &[T], size: usize, mut f: F) -> Vec<Option<f64>>
where
    F: FnMut(&[T]) -> Option<f64>,
{
    RollingWindows::new(data, size)
        .map(|window| window.and_then(&mut f).filter(|v| v.is_finite()))
        .collect()
}
