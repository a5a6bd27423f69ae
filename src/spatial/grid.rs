//! Generic grid for spatial data
//!
//! Cells are stored row-major: index = y * width + x.

/// Generic 2D grid of cells
#[derive(Debug, Clone)]
pub struct Grid<T: Clone + Default> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }

    /// True if signed coordinates fall inside the grid
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Row-major index of signed coordinates, if inside
    #[inline]
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if self.contains(x, y) {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    /// Coordinates of a row-major index
    #[inline]
    pub fn coords_of(&self, index: usize) -> (i32, i32) {
        ((index % self.width) as i32, (index / self.width) as i32)
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<&T> {
        self.index_of(x, y).map(|i| &self.data[i])
    }

    #[inline]
    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut T> {
        let index = self.index_of(x, y)?;
        self.data.get_mut(index)
    }

    #[inline]
    pub fn set(&mut self, x: i32, y: i32, value: T) {
        if let Some(i) = self.index_of(x, y) {
            self.data[i] = value;
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Cells in row-major order
    pub fn cells(&self) -> &[T] {
        &self.data
    }

    pub fn cells_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Cells with their coordinates, row-major
    pub fn iter(&self) -> impl Iterator<Item = ((i32, i32), &T)> + '_ {
        self.data
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.coords_of(i), cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_bounds() {
        let grid: Grid<u8> = Grid::new(4, 3);
        assert!(grid.contains(0, 0));
        assert!(grid.contains(3, 2));
        assert!(!grid.contains(4, 0));
        assert!(!grid.contains(0, 3));
        assert!(!grid.contains(-1, 1));
        assert!(grid.get(-1, 0).is_none());
    }

    #[test]
    fn test_grid_row_major_indexing() {
        let mut grid: Grid<u32> = Grid::new(4, 3);
        grid.set(1, 2, 7);
        assert_eq!(grid.index_of(1, 2), Some(9));
        assert_eq!(grid.cells()[9], 7);
        assert_eq!(grid.coords_of(9), (1, 2));
        assert_eq!(grid.get(1, 2), Some(&7));
    }

    #[test]
    fn test_grid_iter_order() {
        let grid: Grid<u8> = Grid::new(2, 2);
        let coords: Vec<_> = grid.iter().map(|(c, _)| c).collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }
}
