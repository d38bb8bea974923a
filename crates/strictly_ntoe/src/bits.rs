//! Packed board encoding.
//!
//! A board of side length `n` is stored as one bit per cell in row-major
//! order. The most significant used bit (bit `n² - 1`) is cell `(0, 0)` and
//! bit 0 is cell `(n - 1, n - 1)`.

use crate::error::{BoardError, BoardErrorKind};
use tracing::instrument;

/// One bit per cell, one mask per player.
pub type Mask = u128;

/// Cell coordinates as `(row, col)`.
pub type Coord = (usize, usize);

/// Largest side length whose cells fit in a [`Mask`].
pub const MAX_SIDE_LENGTH: usize = 11;

/// Rejects side lengths the encoding cannot represent.
pub fn check_side_length(side_length: usize) -> Result<(), BoardError> {
    if (1..=MAX_SIDE_LENGTH).contains(&side_length) {
        Ok(())
    } else {
        Err(BoardError::new(BoardErrorKind::SideLength(side_length)))
    }
}

/// Mask with every cell of the board set.
///
/// # Errors
///
/// Returns a format error for an unsupported side length.
pub fn full_mask(side_length: usize) -> Result<Mask, BoardError> {
    check_side_length(side_length)?;
    Ok(board_mask(side_length))
}

/// [`full_mask`] for a side length that has already been checked.
pub(crate) fn board_mask(side_length: usize) -> Mask {
    (1 << (side_length * side_length)) - 1
}

/// Bit index of a coordinate, without range checks.
fn shift_of((row, col): Coord, side_length: usize) -> usize {
    side_length * side_length - 1 - (row * side_length + col)
}

/// Returns the single-bit mask for a cell.
///
/// # Errors
///
/// Returns a format error for an unsupported side length and a range error
/// if either coordinate is outside `[0, side_length)`.
pub fn cell_bit(coord: Coord, side_length: usize) -> Result<Mask, BoardError> {
    check_side_length(side_length)?;
    if coord.0 >= side_length || coord.1 >= side_length {
        return Err(BoardError::new(BoardErrorKind::OutOfRange { coord, side_length }));
    }
    Ok(1 << shift_of(coord, side_length))
}

/// Packs a square bit matrix into a mask.
///
/// # Errors
///
/// Returns a format error if the grid is not `side_length` rows of
/// `side_length` entries, or if any entry is not 0 or 1.
#[instrument(skip(grid), fields(rows = grid.len()))]
pub fn matrix_to_mask<R: AsRef<[u8]>>(grid: &[R], side_length: usize) -> Result<Mask, BoardError> {
    check_side_length(side_length)?;
    if grid.len() != side_length || grid.iter().any(|row| row.as_ref().len() != side_length) {
        return Err(BoardErrorKind::GridShape {
            expected: side_length,
        }
        .into());
    }

    grid.iter()
        .flat_map(|row| row.as_ref().iter().copied())
        .try_fold(0, |acc: Mask, cell| match cell {
            0 | 1 => Ok(acc << 1 | Mask::from(cell)),
            other => Err(BoardError::new(BoardErrorKind::NotABit(other))),
        })
}

/// Number of occupied cells in a mask.
pub fn population_count(mask: Mask) -> u32 {
    mask.count_ones()
}

/// Coordinates of every set bit, from `(0, 0)` to `(n - 1, n - 1)`.
///
/// Bits above the board are ignored.
///
/// # Errors
///
/// Returns a format error for an unsupported side length.
pub fn occupied_cells(mask: Mask, side_length: usize) -> Result<Vec<Coord>, BoardError> {
    check_side_length(side_length)?;
    Ok(cells_of(mask, side_length))
}

/// [`occupied_cells`] for a side length that has already been checked.
pub(crate) fn cells_of(mask: Mask, side_length: usize) -> Vec<Coord> {
    (0..side_length)
        .flat_map(|row| (0..side_length).map(move |col| (row, col)))
        .filter(|&coord| mask >> shift_of(coord, side_length) & 1 == 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    #[test]
    fn test_matrix_to_mask_is_row_major_msb_first() {
        let grid: [[u8; 3]; 3] = [[1, 0, 0], [0, 1, 0], [0, 0, 1]];
        assert_eq!(matrix_to_mask(&grid, 3).unwrap(), 0b100_010_001);

        let grid: [[u8; 3]; 3] = [[0, 0, 0], [0, 0, 0], [0, 0, 1]];
        assert_eq!(matrix_to_mask(&grid, 3).unwrap(), 1);
    }

    #[test]
    fn test_matrix_to_mask_rejects_ragged_grid() {
        let grid: Vec<Vec<u8>> = vec![vec![1, 0, 0], vec![0, 1], vec![0, 0, 1]];
        let err = matrix_to_mask(&grid, 3).unwrap_err();
        assert_eq!(err.kind(), &BoardErrorKind::GridShape { expected: 3 });
    }

    #[test]
    fn test_matrix_to_mask_rejects_wrong_row_count() {
        let grid: [[u8; 2]; 2] = [[1, 0], [0, 1]];
        let err = matrix_to_mask(&grid, 3).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Format);
    }

    #[test]
    fn test_matrix_to_mask_rejects_non_bits() {
        let grid: [[u8; 3]; 3] = [[1, 0, 0], [0, 2, 0], [0, 0, 1]];
        let err = matrix_to_mask(&grid, 3).unwrap_err();
        assert_eq!(err.kind(), &BoardErrorKind::NotABit(2));
    }

    #[test]
    fn test_population_count() {
        assert_eq!(population_count(0), 0);
        assert_eq!(population_count(0b101_010_101), 5);
        assert_eq!(population_count(full_mask(11).unwrap()), 121);
    }

    #[test]
    fn test_occupied_cells_in_row_major_order() {
        assert_eq!(
            occupied_cells(0b100_010_011, 3).unwrap(),
            vec![(0, 0), (1, 1), (2, 1), (2, 2)]
        );
        assert!(occupied_cells(0, 4).unwrap().is_empty());
    }

    #[test]
    fn test_occupied_cells_round_trips_every_3x3_grid() {
        for mask in 0..(1 as Mask) << 9 {
            let grid: Vec<Vec<u8>> = (0..3)
                .map(|row| (0..3).map(|col| (mask >> (8 - (row * 3 + col)) & 1) as u8).collect())
                .collect();
            assert_eq!(matrix_to_mask(&grid, 3).unwrap(), mask);

            let ones: Vec<Coord> = (0..3)
                .flat_map(|row| (0..3).map(move |col| (row, col)))
                .filter(|&(row, col)| grid[row][col] == 1)
                .collect();
            assert_eq!(occupied_cells(mask, 3).unwrap(), ones);
        }
    }

    #[test]
    fn test_cell_bit_range() {
        assert_eq!(cell_bit((0, 0), 3).unwrap(), 1 << 8);
        assert_eq!(cell_bit((2, 2), 3).unwrap(), 1);
        let err = cell_bit((0, 3), 3).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Range);
    }

    #[test]
    fn test_side_length_bounds() {
        assert!(check_side_length(0).is_err());
        assert!(check_side_length(1).is_ok());
        assert!(check_side_length(MAX_SIDE_LENGTH).is_ok());
        assert!(check_side_length(MAX_SIDE_LENGTH + 1).is_err());
    }

    #[test]
    fn test_helpers_reject_unsupported_side_lengths() {
        for n in [0, MAX_SIDE_LENGTH + 1, usize::MAX] {
            assert_eq!(cell_bit((0, 0), n).unwrap_err().category(), ErrorCategory::Format);
            assert_eq!(full_mask(n).unwrap_err().kind(), &BoardErrorKind::SideLength(n));
            assert_eq!(occupied_cells(0, n).unwrap_err().category(), ErrorCategory::Format);
        }
        assert_eq!(full_mask(MAX_SIDE_LENGTH).unwrap(), Mask::MAX >> 7);
    }
}
