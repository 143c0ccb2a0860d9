// Copyright (C) 2023 Dheatly23
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Lesser General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use crate::error::{Error, Result};

/// Half-open pixel rectangle `[left, right) x [top, bottom)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub left: usize,
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
}

impl Rect {
    #[inline]
    pub fn width(&self) -> usize {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.bottom - self.top
    }

    /// Size as `(height, width)`, the order of the array axes.
    #[inline]
    pub fn size(&self) -> (usize, usize) {
        (self.height(), self.width())
    }
}

/// Row-major grid of square blocks covering a `width x height` buffer.
///
/// The last column and last row may be clipped to the buffer edge.
/// A grid is always recomputed from its inputs and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    block_size: usize,
    cols: usize,
    rows: usize,
}

impl Grid {
    pub fn new(width: usize, height: usize, block_size: usize) -> Result<Self> {
        if block_size == 0 {
            return Err(Error::InvalidBlockSize(block_size));
        }
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions(format!(
                "{width}x{height} buffer is empty"
            )));
        }

        let (cols, rows) = (width.div_ceil(block_size), height.div_ceil(block_size));
        if cols.checked_mul(rows).is_none() {
            return Err(Error::InvalidDimensions(format!(
                "{cols}x{rows} blocks is too many"
            )));
        }

        Ok(Self {
            width,
            height,
            block_size,
            cols,
            rows,
        })
    }

    /// Grid for an array shape. Axis 0 is height, axis 1 is width.
    pub fn for_shape(shape: &[usize], block_size: usize) -> Result<Self> {
        if block_size == 0 {
            return Err(Error::InvalidBlockSize(block_size));
        }
        match shape {
            [h, w, ..] => Self::new(*w, *h, block_size),
            _ => Err(Error::InvalidDimensions(format!(
                "array needs at least 2 axes, got {}",
                shape.len()
            ))),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Block count.
    pub fn len(&self) -> usize {
        self.cols * self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clipped rectangle of linear index `g`, or `None` if out of range.
    pub fn rect(&self, g: usize) -> Option<Rect> {
        if g >= self.len() {
            return None;
        }

        let (row, col) = (g / self.cols, g % self.cols);
        let bs = self.block_size;
        Some(Rect {
            left: col * bs,
            top: row * bs,
            right: (col * bs).saturating_add(bs).min(self.width),
            bottom: (row * bs).saturating_add(bs).min(self.height),
        })
    }

    /// All rectangles in linear index order.
    pub fn rects(&self) -> impl Iterator<Item = Rect> + Clone + '_ {
        (0..self.len()).filter_map(|g| self.rect(g))
    }
}
