//! Merged cell resolution
//!
//! Turns a worksheet's merge declarations into a lookup from each merge's
//! top-left coordinate to its span, plus the set of every covered coordinate.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use crate::reader::parser_utils::cell_ref;

/// Minimum colspan for a merge to turn its row into a warning banner
pub const WARNING_MIN_COLSPAN: u32 = 2;

/// A rectangular merge declaration, 1-based inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MergeRange {
    pub min_row: u32,
    pub min_col: u32,
    pub max_row: u32,
    pub max_col: u32,
}

impl MergeRange {
    /// Create a range from two corners, normalising so min <= max on both axes
    pub fn new(row_a: u32, col_a: u32, row_b: u32, col_b: u32) -> Self {
        Self {
            min_row: row_a.min(row_b),
            min_col: col_a.min(col_b),
            max_row: row_a.max(row_b),
            max_col: col_a.max(col_b),
        }
    }

    pub fn top_left(&self) -> (u32, u32) {
        (self.min_row, self.min_col)
    }

    pub fn span(&self) -> Span {
        Span {
            rowspan: self.max_row - self.min_row + 1,
            colspan: self.max_col - self.min_col + 1,
        }
    }

    /// Every (row, col) inside the range, row-major
    pub fn coordinates(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.min_row..=self.max_row)
            .flat_map(move |row| (self.min_col..=self.max_col).map(move |col| (row, col)))
    }
}

impl fmt::Display for MergeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            cell_ref(self.min_row, self.min_col),
            cell_ref(self.max_row, self.max_col)
        )
    }
}

/// Rows and columns a rendered cell occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub rowspan: u32,
    pub colspan: u32,
}

impl Span {
    pub const SINGLE: Span = Span {
        rowspan: 1,
        colspan: 1,
    };
}

/// Per-worksheet merge lookup
#[derive(Debug, Clone, Default)]
pub struct MergeIndex {
    top_left: HashMap<(u32, u32), Span>,
    covered: HashSet<(u32, u32)>,
    /// Merge origins per row, ordered by column
    origins_by_row: BTreeMap<u32, BTreeMap<u32, Span>>,
}

impl MergeIndex {
    pub fn build(ranges: &[MergeRange]) -> Self {
        let mut index = Self::default();

        for range in ranges {
            let span = range.span();
            index.top_left.insert(range.top_left(), span);
            index
                .origins_by_row
                .entry(range.min_row)
                .or_default()
                .insert(range.min_col, span);
            index.covered.extend(range.coordinates());
        }

        index
    }

    /// Whether any merge covers (row, col), its origin included
    pub fn is_covered(&self, row: u32, col: u32) -> bool {
        self.covered.contains(&(row, col))
    }

    /// Span of the merge whose top-left is (row, col)
    pub fn span_at(&self, row: u32, col: u32) -> Option<Span> {
        self.top_left.get(&(row, col)).copied()
    }

    /// Merge origins on `row` wide enough to form a warning banner, leftmost first
    pub fn warning_origins(&self, row: u32) -> Vec<(u32, Span)> {
        self.origins_by_row
            .get(&row)
            .map(|origins| {
                origins
                    .iter()
                    .filter(|(_, span)| span.colspan >= WARNING_MIN_COLSPAN)
                    .map(|(col, span)| (*col, *span))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_warning_row(&self, row: u32) -> bool {
        !self.warning_origins(row).is_empty()
    }

    pub fn covered_count(&self) -> usize {
        self.covered.len()
    }

    pub fn len(&self) -> usize {
        self.top_left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.top_left.is_empty()
    }
}
