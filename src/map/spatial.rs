use glam::DVec2;
use std::collections::HashMap;

/// Spatial hash grid over screen pixels for O(1) neighbourhood queries
pub struct SpatialGrid<T> {
    /// Grid cells indexed by (cell_x, cell_y)
    cells: HashMap<(i32, i32), Vec<usize>>,
    /// All items (indices into this vec stored in cells)
    items: Vec<T>,
    /// Cell size in pixels
    cell_size: f64,
}

impl<T> SpatialGrid<T> {
    /// Create a new spatial grid with given cell size in pixels
    pub fn new(cell_size: f64) -> Self {
        Self {
            cells: HashMap::new(),
            items: Vec::new(),
            cell_size: cell_size.max(1.0),
        }
    }

    #[inline(always)]
    fn to_cell(&self, p: DVec2) -> (i32, i32) {
        let c = (p / self.cell_size).floor();
        (c.x as i32, c.y as i32)
    }

    /// Insert an item at a screen position, returning its index
    pub fn insert(&mut self, p: DVec2, item: T) -> usize {
        let idx = self.items.len();
        self.items.push(item);

        let cell = self.to_cell(p);
        self.cells.entry(cell).or_default().push(idx);
        idx
    }

    /// Indices of items in every cell touching the circle (may include items
    /// slightly outside `radius`; callers do the exact distance check)
    pub fn query_radius(&self, p: DVec2, radius: f64) -> Vec<usize> {
        let min = self.to_cell(p - DVec2::splat(radius));
        let max = self.to_cell(p + DVec2::splat(radius));

        let mut results = Vec::new();
        for y in min.1..=max.1 {
            for x in min.0..=max.0 {
                if let Some(indices) = self.cells.get(&(x, y)) {
                    results.extend_from_slice(indices);
                }
            }
        }
        results
    }

    #[inline(always)]
    pub fn get(&self, idx: usize) -> Option<&T> {
        self.items.get(idx)
    }

    #[inline(always)]
    pub fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.items.get_mut(idx)
    }

    /// Consume the grid, yielding items in insertion order
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
