//! Position arithmetic shared by list and task ordering.
//!
//! # Responsibility
//! - Validate requested 1-based positions against container size.
//! - Compute the sibling range that shifts when one row moves.
//!
//! # Invariants
//! - Positions inside one container form `1..=N` with no gaps.
//! - A moving row is parked at [`PARKED_POSITION`] before siblings shift, so
//!   no range update can ever touch it.

use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Temporary out-of-range position held by a row while its siblings shift.
pub const PARKED_POSITION: i64 = -1;

/// Position validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionError {
    /// Positions are 1-based.
    NotPositive(i64),
    /// Position exceeds the container's valid slots.
    OutOfRange { requested: i64, max: i64 },
}

impl Display for PositionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotPositive(value) => write!(f, "position must be >= 1, got {value}"),
            Self::OutOfRange { requested, max } => {
                write!(f, "position {requested} is out of range 1..={max}")
            }
        }
    }
}

impl Error for PositionError {}

/// Inclusive range of sibling positions shifted by `delta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeShift {
    pub from: i64,
    pub to: i64,
    pub delta: i64,
}

/// Checks `requested` against `1..=max`.
pub fn check_position(requested: i64, max: i64) -> Result<(), PositionError> {
    if requested < 1 {
        return Err(PositionError::NotPositive(requested));
    }
    if requested > max {
        return Err(PositionError::OutOfRange { requested, max });
    }
    Ok(())
}

/// Returns the sibling shift for moving a row from `current` to `target`
/// inside one container, or `None` when nothing moves.
///
/// Moving down pulls `(current, target]` up by one; moving up pushes
/// `[target, current)` down by one.
pub fn reorder_shift(current: i64, target: i64) -> Option<RangeShift> {
    match target.cmp(&current) {
        Ordering::Equal => None,
        Ordering::Greater => Some(RangeShift {
            from: current + 1,
            to: target,
            delta: -1,
        }),
        Ordering::Less => Some(RangeShift {
            from: target,
            to: current - 1,
            delta: 1,
        }),
    }
}

/// Returns whether `positions` are exactly `1..=len` in any order.
pub fn is_contiguous(positions: impl IntoIterator<Item = i64>) -> bool {
    let mut sorted: Vec<i64> = positions.into_iter().collect();
    sorted.sort_unstable();
    sorted
        .iter()
        .enumerate()
        .all(|(index, position)| *position == index as i64 + 1)
}

#[cfg(test)]
mod tests {
    use super::{check_position, is_contiguous, reorder_shift, PositionError, RangeShift};

    #[test]
    fn check_position_rejects_zero_and_overflow() {
        assert_eq!(check_position(0, 3), Err(PositionError::NotPositive(0)));
        assert_eq!(
            check_position(4, 3),
            Err(PositionError::OutOfRange {
                requested: 4,
                max: 3
            })
        );
        assert!(check_position(1, 3).is_ok());
        assert!(check_position(3, 3).is_ok());
    }

    #[test]
    fn check_position_rejects_everything_for_empty_container() {
        assert!(check_position(1, 0).is_err());
    }

    #[test]
    fn reorder_shift_moving_down_pulls_following_rows_up() {
        assert_eq!(
            reorder_shift(2, 5),
            Some(RangeShift {
                from: 3,
                to: 5,
                delta: -1
            })
        );
    }

    #[test]
    fn reorder_shift_moving_up_pushes_preceding_rows_down() {
        assert_eq!(
            reorder_shift(4, 1),
            Some(RangeShift {
                from: 1,
                to: 3,
                delta: 1
            })
        );
    }

    #[test]
    fn reorder_shift_same_position_is_noop() {
        assert_eq!(reorder_shift(3, 3), None);
    }

    #[test]
    fn contiguity_detects_gaps_and_duplicates() {
        assert!(is_contiguous([3, 1, 2]));
        assert!(is_contiguous(Vec::new()));
        assert!(!is_contiguous([1, 3]));
        assert!(!is_contiguous([1, 1, 2]));
        assert!(!is_contiguous([0, 1]));
    }
}
