use gridtrace_core::{Matrix, MatrixIndex};

use crate::projector::{CostPair, Projector};

/// A projector over a dense grid with a designated blocked value.
///
/// A cell is traversable iff it differs from the blocked indicator, so for
/// `bool` surfaces either polarity can mark walls (the comparison is an
/// XOR). Moves are rook-adjacent (up, right, down, left) at unit cost and
/// the heuristic is L1 distance, which is admissible and consistent for
/// such moves.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatrixProjector<T> {
    surface: Matrix<T>,
    blocked: T,
}

impl<T: PartialEq> MatrixProjector<T> {
    /// Project `surface`, treating cells equal to `blocked` as impassable.
    pub fn new(surface: Matrix<T>, blocked: T) -> Self {
        Self { surface, blocked }
    }

    /// The surface being walked on.
    pub fn surface(&self) -> &Matrix<T> {
        &self.surface
    }

    /// Mutable access to the surface.
    ///
    /// Engines hold their own copy of the projector: mutate the surface
    /// before constructing one.
    pub fn surface_mut(&mut self) -> &mut Matrix<T> {
        &mut self.surface
    }

    /// The value marking impassable cells.
    pub fn blocked(&self) -> &T {
        &self.blocked
    }

    #[inline]
    fn traversable(&self, index: MatrixIndex) -> bool {
        self.surface.get(index).is_some_and(|cell| *cell != self.blocked)
    }
}

impl<T: PartialEq> Projector for MatrixProjector<T> {
    type Cost = usize;

    #[inline]
    fn height(&self) -> usize {
        self.surface.height()
    }

    #[inline]
    fn width(&self) -> usize {
        self.surface.width()
    }

    #[inline]
    fn distance(&self, a: MatrixIndex, b: MatrixIndex) -> usize {
        a.row.abs_diff(b.row) + a.column.abs_diff(b.column)
    }

    fn neighbors(&self, source: MatrixIndex, buf: &mut Vec<CostPair<usize>>) {
        buf.clear();
        let MatrixIndex { row, column } = source;
        // Fixed up/right/down/left order keeps tie-breaking reproducible.
        let candidates = [
            (row > 0).then(|| MatrixIndex::new(row - 1, column)),
            (column + 1 < self.width()).then(|| MatrixIndex::new(row, column + 1)),
            (row + 1 < self.height()).then(|| MatrixIndex::new(row + 1, column)),
            (column > 0).then(|| MatrixIndex::new(row, column - 1)),
        ];
        for neighbor in candidates.into_iter().flatten() {
            if self.traversable(neighbor) {
                buf.push(CostPair::new(neighbor, 1));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid(height: usize, width: usize) -> MatrixProjector<bool> {
        MatrixProjector::new(Matrix::filled(height, width, false), true)
    }

    fn neighbors_of(p: &MatrixProjector<bool>, ix: MatrixIndex) -> Vec<MatrixIndex> {
        let mut buf = Vec::new();
        p.neighbors(ix, &mut buf);
        assert!(buf.iter().all(|pair| pair.cost == 1));
        buf.into_iter().map(|pair| pair.index).collect()
    }

    #[test]
    fn interior_cell_has_four_neighbors_in_order() {
        let p = open_grid(3, 3);
        assert_eq!(
            neighbors_of(&p, MatrixIndex::new(1, 1)),
            vec![
                MatrixIndex::new(0, 1), // up
                MatrixIndex::new(1, 2), // right
                MatrixIndex::new(2, 1), // down
                MatrixIndex::new(1, 0), // left
            ]
        );
    }

    #[test]
    fn corners_clip_to_bounds() {
        let p = open_grid(3, 3);
        assert_eq!(
            neighbors_of(&p, MatrixIndex::new(0, 0)),
            vec![MatrixIndex::new(0, 1), MatrixIndex::new(1, 0)]
        );
        assert_eq!(
            neighbors_of(&p, MatrixIndex::new(2, 2)),
            vec![MatrixIndex::new(1, 2), MatrixIndex::new(2, 1)]
        );
    }

    #[test]
    fn blocked_cells_are_excluded() {
        let mut surface = Matrix::filled(3, 3, false);
        surface[MatrixIndex::new(0, 1)] = true;
        surface[MatrixIndex::new(1, 0)] = true;
        let p = MatrixProjector::new(surface, true);
        assert_eq!(
            neighbors_of(&p, MatrixIndex::new(1, 1)),
            vec![MatrixIndex::new(1, 2), MatrixIndex::new(2, 1)]
        );
    }

    #[test]
    fn blocked_polarity_flips_with_the_indicator() {
        // Same surface, opposite indicator: walls become floors.
        let mut surface = Matrix::filled(2, 2, false);
        surface[MatrixIndex::new(0, 1)] = true;

        let walls_are_true = MatrixProjector::new(surface.clone(), true);
        assert_eq!(
            neighbors_of(&walls_are_true, MatrixIndex::new(0, 0)),
            vec![MatrixIndex::new(1, 0)]
        );

        let walls_are_false = MatrixProjector::new(surface, false);
        assert_eq!(
            neighbors_of(&walls_are_false, MatrixIndex::new(0, 0)),
            vec![MatrixIndex::new(0, 1)]
        );
    }

    #[test]
    fn numeric_sentinel_surface() {
        // A numeric surface with 9 as the blocked sentinel.
        let surface = Matrix::from_fn(2, 2, |ix| if ix.column == 1 { 9u8 } else { 0 });
        let p = MatrixProjector::new(surface, 9u8);
        assert_eq!(
            neighbors_of_u8(&p, MatrixIndex::new(0, 0)),
            vec![MatrixIndex::new(1, 0)]
        );
    }

    fn neighbors_of_u8(p: &MatrixProjector<u8>, ix: MatrixIndex) -> Vec<MatrixIndex> {
        let mut buf = Vec::new();
        p.neighbors(ix, &mut buf);
        buf.into_iter().map(|pair| pair.index).collect()
    }

    #[test]
    fn l1_distance() {
        let p = open_grid(10, 10);
        assert_eq!(p.distance(MatrixIndex::new(2, 3), MatrixIndex::new(5, 1)), 5);
        assert_eq!(p.distance(MatrixIndex::new(4, 4), MatrixIndex::new(4, 4)), 0);
        // Symmetric.
        assert_eq!(
            p.distance(MatrixIndex::new(0, 9), MatrixIndex::new(9, 0)),
            p.distance(MatrixIndex::new(9, 0), MatrixIndex::new(0, 9))
        );
    }
}
