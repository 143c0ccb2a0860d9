//! Library to reversibly scramble image/array blocks.
//!
//! The array is cut into square blocks (edge blocks are clipped),
//! and blocks are moved around by a random permutation such that:
//!
//! * No element is duplicated nor removed.
//! * All elements in a block is moved together.
//! * Blocks only trade places with blocks of the same size.
//!
//! The permutation is returned as a [Key], which can be saved
//! and later used to [unscramble] the array exactly.

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
//

pub mod blocks;
mod error;
pub mod grid;
pub mod image_io;
pub mod key;
pub mod permutation;
mod scramble;

#[doc(inline)]
pub use crate::error::{Error, Result};
#[doc(inline)]
pub use crate::grid::{Grid, Rect};
#[doc(inline)]
pub use crate::key::{key_path_for, Key, KeyFormat};
#[doc(inline)]
pub use crate::permutation::{seeded_rng, Permutation};
#[doc(inline)]
pub use crate::scramble::{scramble, scramble_with_key, unscramble, unscramble_with_key};

/// Block size used when none is given.
pub const DEFAULT_BLOCK_SIZE: usize = 32;
