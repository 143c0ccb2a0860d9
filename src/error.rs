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

use std::path::PathBuf;

use image::ColorType;
use thiserror::Error;

/// Everything that can go wrong while scrambling or unscrambling.
///
/// Operations fail before producing any output, so a returned error
/// never comes with a half-written buffer.
#[derive(Debug, Error)]
pub enum Error {
    /// Block size is zero.
    #[error("invalid block size {0} (must be positive)")]
    InvalidBlockSize(usize),

    /// Buffer is empty, or has fewer than 2 axes, or doesn't match the grid.
    #[error("invalid buffer dimensions: {0}")]
    InvalidDimensions(String),

    /// A block's content does not exactly fill its target rectangle.
    #[error("block {index} has shape {found:?}, expected {expected:?}")]
    ShapeMismatch {
        index: usize,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    /// Wrong number of blocks handed to the compositor.
    #[error("got {found} blocks for a grid of {expected}")]
    BlockCount { expected: usize, found: usize },

    #[error("key file not found at {}", .0.display())]
    KeyNotFound(PathBuf),

    #[error("cannot decode key: {0}")]
    KeyDecode(String),

    /// Key length differs from the block count of the buffer.
    #[error("key has {found} entries but the image has {expected} blocks")]
    KeySizeMismatch { expected: usize, found: usize },

    /// Key is not a bijection: `value` at `index` is out of range or repeated.
    #[error("corrupt key: entry {index} ({value}) is out of range or repeated")]
    KeyCorrupt { index: usize, value: usize },

    /// Geometry embedded in the key disagrees with the buffer or caller.
    #[error("key was made with {field} {expected}, but got {found}")]
    KeyMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("cannot decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("cannot encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("unsupported color type {0:?}")]
    UnsupportedColor(ColorType),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::KeyDecode(e.to_string())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
