//! Construction errors.

use thiserror::Error;

/// Why a board could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("board dimensions must be positive, got {rows}x{cols}")]
    EmptyDimension { rows: usize, cols: usize },

    #[error("preset has {len} cells but the board only holds {capacity}")]
    PresetTooLong { len: usize, capacity: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            GridError::EmptyDimension { rows: 0, cols: 4 }.to_string(),
            "board dimensions must be positive, got 0x4"
        );
        assert_eq!(
            GridError::PresetTooLong { len: 20, capacity: 16 }.to_string(),
            "preset has 20 cells but the board only holds 16"
        );
    }
}
