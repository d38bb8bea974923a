//! Winning-line masks.
//!
//! A line is a row, a column or one of the two full diagonals. Lines depend
//! only on the side length, so they are generated once per side length and
//! kept in a [`LineCache`]. A [`Game`](crate::Game) holds the cache it was
//! built with; [`LineCache::global`] is the default shared one.

use crate::bits::{Coord, Mask, cell_bit, check_side_length};
use crate::error::BoardError;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};
use tracing::{debug, instrument};

static GLOBAL: LazyLock<Arc<LineCache>> = LazyLock::new(Arc::default);

/// Lazily populated map from side length to its winning lines.
#[derive(Debug, Default)]
pub struct LineCache {
    lines: RwLock<HashMap<usize, Arc<[Mask]>>>,
}

impl LineCache {
    /// Default cache, shared by games created without their own.
    pub fn global() -> Arc<LineCache> {
        Arc::clone(&GLOBAL)
    }

    /// Returns the lines for `side_length`, generating them on first use.
    ///
    /// Entries are deterministic, so a racing first access that generates
    /// the same entry twice keeps the first stored value.
    ///
    /// # Errors
    ///
    /// Returns a format error for an unsupported side length; nothing is
    /// cached for it.
    pub fn get(&self, side_length: usize) -> Result<Arc<[Mask]>, BoardError> {
        check_side_length(side_length)?;
        if let Some(lines) = self
            .lines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&side_length)
        {
            return Ok(Arc::clone(lines));
        }

        let generated: Arc<[Mask]> = generate_lines(side_length)?.into();
        debug!(side_length, count = generated.len(), "Caching winning lines");
        let mut lines = self.lines.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(lines.entry(side_length).or_insert(generated)))
    }

    /// Number of side lengths cached so far.
    pub fn len(&self) -> usize {
        self.lines.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Winning lines for a side length, from the default cache.
///
/// # Errors
///
/// Returns a format error for an unsupported side length.
pub fn winning_lines(side_length: usize) -> Result<Arc<[Mask]>, BoardError> {
    LineCache::global().get(side_length)
}

/// Builds every row, column and diagonal mask, dropping duplicates.
///
/// Rows come first, then columns, then the main diagonal and the
/// anti-diagonal. On a 1x1 board all of them are the same single cell.
///
/// # Errors
///
/// Returns a format error for an unsupported side length.
#[instrument]
pub fn generate_lines(side_length: usize) -> Result<Vec<Mask>, BoardError> {
    check_side_length(side_length)?;

    let n = side_length;
    let rows = (0..n).map(|row| line_mask((0..n).map(move |col| (row, col)), n));
    let columns = (0..n).map(|col| line_mask((0..n).map(move |row| (row, col)), n));
    let diagonal = line_mask((0..n).map(|i| (i, i)), n);
    let anti_diagonal = line_mask((0..n).map(|i| (i, n - 1 - i)), n);

    let mut lines = Vec::with_capacity(2 * n + 2);
    for mask in rows.chain(columns).chain([diagonal, anti_diagonal]) {
        if !lines.contains(&mask) {
            lines.push(mask);
        }
    }
    Ok(lines)
}

fn line_mask(cells: impl Iterator<Item = Coord>, side_length: usize) -> Mask {
    cells
        .filter_map(|coord| cell_bit(coord, side_length).ok())
        .fold(0, |acc, bit| acc | bit)
}

/// Returns true if `player` covers every cell of `line`.
pub fn is_won(player: Mask, line: Mask) -> bool {
    player & line == line
}
