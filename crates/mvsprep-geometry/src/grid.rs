use serde::{Deserialize, Serialize};

use crate::GeometryError;

/// A rectangular layout of camera ids.
///
/// The cell at `(row, col)` holds the id of the camera mounted at that place
/// of the rig. The layout is read as written in source: row 0 is the first
/// row of the array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u32>>", into = "Vec<Vec<u32>>")]
pub struct CameraGrid {
    rows: usize,
    cols: usize,
    ids: Vec<u32>,
}

/// The place of a camera in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraPosition {
    /// The grid row.
    pub row: usize,
    /// The grid column.
    pub col: usize,
}

impl CameraGrid {
    /// Create a camera grid from a list of rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout is empty or its rows differ in length.
    /// Id bijectivity is checked by [`arrange`].
    pub fn new(layout: Vec<Vec<u32>>) -> Result<Self, GeometryError> {
        let rows = layout.len();
        let cols = layout.first().map_or(0, Vec::len);

        if rows == 0 || cols == 0 {
            return Err(GeometryError::EmptyGrid);
        }

        if let Some((row, len)) = layout
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != cols)
        {
            return Err(GeometryError::RaggedGrid {
                row,
                len,
                expected: cols,
            });
        }

        Ok(Self {
            rows,
            cols,
            ids: layout.into_iter().flatten().collect(),
        })
    }

    /// The 4x4 layout of the ReVeRy rig.
    ///
    /// Cameras are numbered bottom to top and left to right:
    ///
    /// ```text
    /// 12 13 14 15
    ///  8  9 10 11
    ///  4  5  6  7
    ///  0  1  2  3
    /// ```
    pub fn revery_4x4() -> Self {
        Self {
            rows: 4,
            cols: 4,
            ids: vec![12, 13, 14, 15, 8, 9, 10, 11, 4, 5, 6, 7, 0, 1, 2, 3],
        }
    }

    /// Number of grid rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of grid columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells, which is also the number of cameras.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Always false, an empty grid cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The camera id stored at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        if row < self.rows && col < self.cols {
            Some(self.ids[row * self.cols + col])
        } else {
            None
        }
    }

    /// Iterate the cells in row-major order as `(row, col, id)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, u32)> + '_ {
        let cols = self.cols;
        self.ids
            .iter()
            .enumerate()
            .map(move |(i, &id)| (i / cols, i % cols, id))
    }
}

impl TryFrom<Vec<Vec<u32>>> for CameraGrid {
    type Error = GeometryError;

    fn try_from(layout: Vec<Vec<u32>>) -> Result<Self, Self::Error> {
        Self::new(layout)
    }
}

impl From<CameraGrid> for Vec<Vec<u32>> {
    fn from(grid: CameraGrid) -> Self {
        grid.ids.chunks(grid.cols).map(<[u32]>::to_vec).collect()
    }
}

impl std::fmt::Display for CameraGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = self.len().saturating_sub(1).to_string().len();
        for (i, row) in self.ids.chunks(self.cols).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let cells = row
                .iter()
                .map(|id| format!("{id:>width$}"))
                .collect::<Vec<_>>();
            write!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}

/// Compute the grid position of every camera.
///
/// # Arguments
///
/// * `grid` - The camera layout. Every id in `[0, grid.len())` must appear exactly once.
///
/// # Returns
///
/// A vector indexed by camera id holding the position of that camera.
///
/// # Errors
///
/// Fails on the first cell, in row-major order, holding an out of range or
/// already seen id. No partial result is returned.
pub fn arrange(grid: &CameraGrid) -> Result<Vec<CameraPosition>, GeometryError> {
    let num_cameras = grid.len();
    let mut positions: Vec<Option<CameraPosition>> = vec![None; num_cameras];

    for (row, col, id) in grid.iter() {
        let slot = positions
            .get_mut(id as usize)
            .ok_or(GeometryError::CameraIdOutOfRange {
                id,
                row,
                col,
                num_cameras,
            })?;

        if slot.is_some() {
            return Err(GeometryError::DuplicateCameraId { id, row, col });
        }

        *slot = Some(CameraPosition { row, col });
    }

    // as many cells as slots, no duplicate and no out of range id: every
    // slot is filled
    Ok(positions.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

    fn shuffled_grid(rows: usize, cols: usize, rng: &mut StdRng) -> CameraGrid {
        let mut ids = (0..(rows * cols) as u32).collect::<Vec<_>>();
        ids.shuffle(rng);
        CameraGrid::new(ids.chunks(cols).map(<[u32]>::to_vec).collect()).unwrap()
    }

    #[test]
    fn test_arrange_revery() -> Result<(), GeometryError> {
        let positions = arrange(&CameraGrid::revery_4x4())?;
        assert_eq!(positions.len(), 16);
        assert_eq!(positions[0], CameraPosition { row: 3, col: 0 });
        assert_eq!(positions[3], CameraPosition { row: 3, col: 3 });
        assert_eq!(positions[12], CameraPosition { row: 0, col: 0 });
        assert_eq!(positions[9], CameraPosition { row: 1, col: 1 });
        Ok(())
    }

    #[test]
    fn test_arrange_random_bijective_grids() -> Result<(), GeometryError> {
        let mut rng = StdRng::seed_from_u64(7);
        for (rows, cols) in [(1, 1), (1, 5), (3, 2), (4, 4), (5, 7)] {
            let grid = shuffled_grid(rows, cols, &mut rng);
            let positions = arrange(&grid)?;
            assert_eq!(positions.len(), rows * cols);

            for (id, position) in positions.iter().enumerate() {
                assert!(position.row < rows && position.col < cols);
                assert_eq!(grid.get(position.row, position.col), Some(id as u32));
            }

            let mut cells = positions
                .iter()
                .map(|p| (p.row, p.col))
                .collect::<Vec<_>>();
            cells.sort_unstable();
            cells.dedup();
            assert_eq!(cells.len(), rows * cols);
        }
        Ok(())
    }

    #[test]
    fn test_arrange_duplicate() {
        let grid = CameraGrid::new(vec![vec![0, 1], vec![1, 3]]).unwrap();
        assert_eq!(
            arrange(&grid),
            Err(GeometryError::DuplicateCameraId {
                id: 1,
                row: 1,
                col: 0
            })
        );
    }

    #[test]
    fn test_arrange_out_of_range() {
        let grid = CameraGrid::new(vec![vec![0, 1], vec![4, 2]]).unwrap();
        assert_eq!(
            arrange(&grid),
            Err(GeometryError::CameraIdOutOfRange {
                id: 4,
                row: 1,
                col: 0,
                num_cameras: 4
            })
        );
    }

    #[test]
    fn test_new_rejects_bad_layouts() {
        assert_eq!(CameraGrid::new(vec![]), Err(GeometryError::EmptyGrid));
        assert_eq!(CameraGrid::new(vec![vec![]]), Err(GeometryError::EmptyGrid));
        assert_eq!(
            CameraGrid::new(vec![vec![0, 1], vec![2]]),
            Err(GeometryError::RaggedGrid {
                row: 1,
                len: 1,
                expected: 2
            })
        );
    }

    #[test]
    fn test_grid_serde_and_display() {
        let grid: CameraGrid = serde_json::from_str("[[2, 3], [0, 1]]").unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 2);
        assert_eq!(grid.get(1, 0), Some(0));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(serde_json::to_string(&grid).unwrap(), "[[2,3],[0,1]]");
        assert!(serde_json::from_str::<CameraGrid>("[[0, 1], [2]]").is_err());

        let text = CameraGrid::revery_4x4().to_string();
        assert_eq!(text.lines().next(), Some("12 13 14 15"));
        assert_eq!(text.lines().last(), Some(" 0  1  2  3"));
    }
}
