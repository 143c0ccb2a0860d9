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

use ndarray::prelude::*;
use rand::Rng;
use tracing::debug;

use crate::blocks::{composite, extract};
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::key::Key;
use crate::permutation::Permutation;

/// Scramble blocks of an array.
///
/// Parameters:
/// * `arr` : Input array view. Can be multidimensional,
///   but only the first 2 dimension (height, width) will be split into blocks.
/// * `block_size` : Block edge length. Edge blocks are clipped.
/// * `random` : Random number generator.
///
/// Returns the scrambled array and the permutation needed to undo it.
/// Blocks only trade places with blocks of the same size.
pub fn scramble<A, D, R>(
    arr: ArrayView<'_, A, D>,
    block_size: usize,
    random: &mut R,
) -> Result<(Array<A, D>, Permutation)>
where
    A: Clone + Send + Sync,
    D: Dimension,
    R: Rng + ?Sized,
{
    let grid = Grid::for_shape(arr.shape(), block_size)?;
    debug!(
        cols = grid.cols(),
        rows = grid.rows(),
        block_size,
        "scrambling"
    );

    let orig: Vec<_> = extract(arr.view(), &grid)?.collect();
    let permutation = Permutation::random_for_grid(&grid, random);
    let blocks: Vec<_> = permutation.iter().map(|&src| orig[src].view()).collect();

    let mut out = arr.to_owned();
    composite(out.view_mut(), &grid, &blocks)?;

    Ok((out, permutation))
}

/// Undo [scramble].
///
/// `block_size` must be the one used when scrambling. A permutation of the
/// wrong length fails with [Error::KeySizeMismatch].
pub fn unscramble<A, D>(
    arr: ArrayView<'_, A, D>,
    permutation: &Permutation,
    block_size: usize,
) -> Result<Array<A, D>>
where
    A: Clone + Send + Sync,
    D: Dimension,
{
    let grid = Grid::for_shape(arr.shape(), block_size)?;
    if permutation.len() != grid.len() {
        return Err(Error::KeySizeMismatch {
            expected: grid.len(),
            found: permutation.len(),
        });
    }
    debug!(
        cols = grid.cols(),
        rows = grid.rows(),
        block_size,
        "unscrambling"
    );

    let scr: Vec<_> = extract(arr.view(), &grid)?.collect();
    let inverse = permutation.inverse();
    let blocks: Vec<_> = inverse.iter().map(|&g| scr[g].view()).collect();

    let mut out = arr.to_owned();
    composite(out.view_mut(), &grid, &blocks)?;

    Ok(out)
}

/// [scramble], returning a [Key] that records the grid.
pub fn scramble_with_key<A, D, R>(
    arr: ArrayView<'_, A, D>,
    block_size: usize,
    random: &mut R,
) -> Result<(Array<A, D>, Key)>
where
    A: Clone + Send + Sync,
    D: Dimension,
    R: Rng + ?Sized,
{
    let grid = Grid::for_shape(arr.shape(), block_size)?;
    let (out, permutation) = scramble(arr, block_size, random)?;
    Ok((out, Key::new(permutation, grid)))
}

/// [unscramble] with a [Key].
///
/// Block size defaults to the one stored in the key. If both are
/// given they must agree, and the key's dimensions must match `arr`.
pub fn unscramble_with_key<A, D>(
    arr: ArrayView<'_, A, D>,
    key: &Key,
    block_size: Option<usize>,
) -> Result<Array<A, D>>
where
    A: Clone + Send + Sync,
    D: Dimension,
{
    let block_size = match (block_size, key.block_size()) {
        (Some(v), _) | (None, Some(v)) => v,
        (None, None) => {
            return Err(Error::KeyDecode(
                "key has no block size, one must be given".into(),
            ))
        }
    };

    let grid = Grid::for_shape(arr.shape(), block_size)?;
    key.check(&grid)?;
    unscramble(arr, key.permutation(), block_size)
}
