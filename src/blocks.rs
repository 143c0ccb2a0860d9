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

use std::ops::Range;

use ndarray::prelude::*;
use ndarray::Slice;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::grid::Grid;

/// Lazy iterator over the blocks of an array, in linear grid order.
///
/// Yields views, nothing is copied. Clone it to iterate again.
#[derive(Clone)]
pub struct Blocks<'a, A, D: Dimension> {
    arr: ArrayView<'a, A, D>,
    grid: Grid,
    range: Range<usize>,
}

impl<'a, A, D: Dimension> Iterator for Blocks<'a, A, D> {
    type Item = ArrayView<'a, A, D>;

    fn next(&mut self) -> Option<Self::Item> {
        let r = self.grid.rect(self.range.next()?)?;

        let mut v = self.arr.clone();
        v.slice_axis_inplace(Axis(0), Slice::from(r.top..r.bottom));
        v.slice_axis_inplace(Axis(1), Slice::from(r.left..r.right));
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl<A, D: Dimension> ExactSizeIterator for Blocks<'_, A, D> {}

fn check_shape(shape: &[usize], grid: &Grid) -> Result<()> {
    match shape {
        [h, w, ..] if *h == grid.height() && *w == grid.width() => Ok(()),
        _ => Err(Error::InvalidDimensions(format!(
            "array of shape {shape:?} does not fit a {}x{} grid",
            grid.width(),
            grid.height(),
        ))),
    }
}

/// Split `arr` into the blocks of `grid`.
///
/// Only the first 2 axes are split, trailing axes stay whole.
pub fn extract<'a, A, D>(arr: ArrayView<'a, A, D>, grid: &Grid) -> Result<Blocks<'a, A, D>>
where
    D: Dimension,
{
    check_shape(arr.shape(), grid)?;

    Ok(Blocks {
        arr,
        grid: *grid,
        range: 0..grid.len(),
    })
}

/// Write `blocks[g]` into the rectangle of `g`, for every block of `grid`.
///
/// All shapes are checked before anything is written. Grid rows are
/// written in parallel.
pub fn composite<A, D>(
    mut dest: ArrayViewMut<'_, A, D>,
    grid: &Grid,
    blocks: &[ArrayView<'_, A, D>],
) -> Result<()>
where
    A: Clone + Send + Sync,
    D: Dimension,
{
    check_shape(dest.shape(), grid)?;
    if blocks.len() != grid.len() {
        return Err(Error::BlockCount {
            expected: grid.len(),
            found: blocks.len(),
        });
    }

    let mut expected = dest.shape().to_vec();
    for (index, (r, b)) in grid.rects().zip(blocks).enumerate() {
        (expected[0], expected[1]) = r.size();
        if b.shape() != &expected[..] {
            return Err(Error::ShapeMismatch {
                index,
                expected,
                found: b.shape().to_vec(),
            });
        }
    }

    let (bs, cols) = (grid.block_size(), grid.cols());
    dest.axis_chunks_iter_mut(Axis(0), bs)
        .into_par_iter()
        .enumerate()
        .for_each(|(row, mut band)| {
            // Each band is a disjoint row of the grid
            for (col, mut out) in band.axis_chunks_iter_mut(Axis(1), bs).enumerate() {
                out.assign(&blocks[row * cols + col]);
            }
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(h: usize, w: usize) -> Array3<u32> {
        Array3::from_shape_fn((h, w, 2), |(y, x, c)| ((y * w + x) * 2 + c) as u32)
    }

    #[test]
    fn extract_follows_grid() {
        let arr = sample(65, 65);
        let grid = Grid::new(65, 65, 32).unwrap();
        let blocks = extract(arr.view(), &grid).unwrap();
        assert_eq!(blocks.len(), 9);

        for (r, b) in grid.rects().zip(blocks) {
            assert_eq!(b.shape(), &[r.height(), r.width(), 2]);
            assert_eq!(b[[0, 0, 0]], arr[[r.top, r.left, 0]]);
            assert_eq!(
                b[[r.height() - 1, r.width() - 1, 1]],
                arr[[r.bottom - 1, r.right - 1, 1]]
            );
        }
    }

    #[test]
    fn extract_restarts() {
        let arr = sample(10, 7);
        let grid = Grid::new(7, 10, 3).unwrap();
        let blocks = extract(arr.view(), &grid).unwrap();
        let first: Vec<_> = blocks.clone().collect();
        let second: Vec<_> = blocks.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn extract_rejects_wrong_grid() {
        let arr = sample(10, 7);
        let grid = Grid::new(10, 7, 3).unwrap();
        assert!(matches!(
            extract(arr.view(), &grid),
            Err(Error::InvalidDimensions(_))
        ));
    }

    #[test]
    fn composite_inverts_extract() {
        let arr = sample(33, 50);
        let grid = Grid::new(50, 33, 8).unwrap();
        let blocks: Vec<_> = extract(arr.view(), &grid).unwrap().collect();

        let mut out = Array3::zeros(arr.raw_dim());
        composite(out.view_mut(), &grid, &blocks).unwrap();
        assert_eq!(out, arr);
    }

    #[test]
    fn composite_2d() {
        let arr = Array2::from_shape_fn((9, 4), |(y, x)| y * 4 + x);
        let grid = Grid::new(4, 9, 2).unwrap();
        let blocks: Vec<_> = extract(arr.view(), &grid).unwrap().collect();

        let mut out = Array2::zeros((9, 4));
        composite(out.view_mut(), &grid, &blocks).unwrap();
        assert_eq!(out, arr);
    }

    #[test]
    fn composite_shape_mismatch() {
        let arr = sample(65, 65);
        let grid = Grid::new(65, 65, 32).unwrap();
        let mut blocks: Vec<_> = extract(arr.view(), &grid).unwrap().collect();
        blocks.swap(0, 2);

        let mut out = Array3::zeros(arr.raw_dim());
        let err = composite(out.view_mut(), &grid, &blocks).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { index: 0, .. }));
        assert!(out.iter().all(|&v| v == 0));
    }

    #[test]
    fn composite_block_count() {
        let arr = sample(8, 8);
        let grid = Grid::new(8, 8, 4).unwrap();
        let blocks: Vec<_> = extract(arr.view(), &grid).unwrap().take(3).collect();

        let mut out = Array3::zeros(arr.raw_dim());
        assert!(matches!(
            composite(out.view_mut(), &grid, &blocks),
            Err(Error::BlockCount {
                expected: 4,
                found: 3
            })
        ));
    }
}
