use crate::error::{Error, Result};

/// Fixed-size row-major 2-D container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
}

pub struct GridIter<'a, T> {
    grid: &'a Grid<T>,
    pos: usize,
}

impl<T> Grid<T> {
    pub fn new<F: FnMut(usize, usize) -> T>(width: usize, height: usize, initializer: &mut F) -> Self {
        let mut data = Vec::with_capacity(width * height);

        for y in 0..height {
            for x in 0..width {
                data.push(initializer(x, y));
            }
        }

        Self {
            data,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn iter(&self) -> GridIter<'_, T> {
        GridIter { grid: self, pos: 0 }
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            None
        } else {
            Some(x + (y * self.width))
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        self.index(x, y).map(|index| &self.data[index])
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) -> Result<()> {
        let index = self.index(x, y).ok_or(Error::OutOfBounds {
            x: x as i64,
            y: y as i64,
        })?;

        self.data[index] = value;

        Ok(())
    }

    /// Rows from top to bottom, each `width` long.
    pub fn rows(&self) -> std::slice::Chunks<'_, T> {
        self.data.chunks(self.width.max(1))
    }

    /// Overwrites every cell with the initializer's value.
    pub fn fill<F: FnMut(usize, usize) -> T>(&mut self, initializer: &mut F) {
        for (pos, value) in self.data.iter_mut().enumerate() {
            *value = initializer(pos % self.width, pos / self.width);
        }
    }
}

impl<'a, T> IntoIterator for &'a Grid<T> {
    type Item = (usize, usize, &'a T);
    type IntoIter = GridIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> Iterator for GridIter<'a, T> {
    type Item = (usize, usize, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.grid.data.len() {
            None
        } else {
            let x = self.pos % self.grid.width;
            let y = self.pos / self.grid.width;
            let value = &self.grid.data[self.pos];

            self.pos += 1;

            Some((x, y, value))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.grid.data.len() - self.pos;

        (remaining, Some(remaining))
    }
}

impl<'a, T> ExactSizeIterator for GridIter<'a, T> {}
