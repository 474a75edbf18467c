/// A bounded 2D grid indexed by integer position.
///
/// Unlike a world-wrapping map, reads outside the grid return `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Build a map by evaluating `f(x, y)` for every cell, column by column
    /// (x outer, y inner).
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self
    where
        T: Default,
    {
        let mut map = Self::new(width, height);
        for x in 0..width {
            for y in 0..height {
                let value = f(x, y);
                map.set(x, y, value);
            }
        }
        map
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        self.index(x, y).map(|idx| &self.data[idx])
    }

    /// Signed lookup; negative positions are simply out of bounds.
    pub fn get_signed(&self, x: i32, y: i32) -> Option<&T> {
        if self.contains(x, y) {
            self.get(x as usize, y as usize)
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        self.index(x, y).map(move |idx| &mut self.data[idx])
    }

    /// Write a cell. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        if let Some(idx) = self.index(x, y) {
            self.data[idx] = value;
        }
    }

    /// Fill the entire map with a value.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate over all cells with their coordinates (row-major).
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data.iter_mut().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }
}

impl Tilemap<f32> {
    /// Minimum and maximum value, or `None` for an empty map.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        if self.data.is_empty() {
            return None;
        }
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for &v in &self.data {
            if v < min { min = v; }
            if v > max { max = v; }
        }
        Some((min, max))
    }

    pub fn mean(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f32>() / self.data.len() as f32
    }
}
