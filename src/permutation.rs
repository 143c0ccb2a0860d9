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

use std::collections::BTreeMap;

use rand::prelude::*;
use rand_xoshiro::Xoshiro256StarStar;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::grid::Grid;

/// Bijection on block indices.
///
/// `self[g]` is the original block index whose content sits at
/// scrambled index `g`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation(Vec<usize>);

impl Permutation {
    pub fn identity(n: usize) -> Self {
        Self((0..n).collect())
    }

    /// Uniformly random permutation of `[0, n)`.
    pub fn random<R: Rng + ?Sized>(n: usize, random: &mut R) -> Self {
        let mut indices: Vec<_> = (0..n).collect();
        indices.shuffle(random);
        Self(indices)
    }

    /// Uniformly random permutation that only swaps blocks of equal size.
    ///
    /// Ragged edge blocks are exchanged among themselves, so every block
    /// fits exactly into the slot it lands in.
    pub fn random_for_grid<R: Rng + ?Sized>(grid: &Grid, random: &mut R) -> Self {
        let mut classes = <BTreeMap<(usize, usize), Vec<usize>>>::new();
        for (g, r) in grid.rects().enumerate() {
            classes.entry(r.size()).or_default().push(g);
        }

        let mut indices = vec![0; grid.len()];
        for slots in classes.values() {
            let mut sources = slots.clone();
            sources.shuffle(random);
            for (&slot, src) in slots.iter().zip(sources) {
                indices[slot] = src;
            }
        }
        Self(indices)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<usize> {
        self.0
    }

    /// Inverse mapping: `inv[original] = scrambled`.
    pub fn inverse(&self) -> Self {
        let mut inv = vec![0; self.0.len()];
        for (g, &src) in self.0.iter().enumerate() {
            inv[src] = g;
        }
        Self(inv)
    }
}

impl TryFrom<Vec<usize>> for Permutation {
    type Error = Error;

    fn try_from(indices: Vec<usize>) -> Result<Self> {
        let mut seen = vec![false; indices.len()];
        for (index, &value) in indices.iter().enumerate() {
            if value >= seen.len() || std::mem::replace(&mut seen[value], true) {
                return Err(Error::KeyCorrupt { index, value });
            }
        }
        Ok(Self(indices))
    }
}

impl std::ops::Index<usize> for Permutation {
    type Output = usize;

    fn index(&self, g: usize) -> &usize {
        &self.0[g]
    }
}

/// Random source for scrambling.
///
/// With a seed the generator is keyed by the SHA-256 of it and fully
/// reproducible, otherwise it is seeded from OS entropy.
pub fn seeded_rng(seed: Option<&str>) -> Xoshiro256StarStar {
    match seed {
        Some(seed) => {
            let mut hasher = Sha256::new();
            hasher.update(seed);
            Xoshiro256StarStar::from_seed(hasher.finalize().into())
        }
        None => Xoshiro256StarStar::from_entropy(),
    }
}
