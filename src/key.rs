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

//! Scramble key file format.
//!
//! A key is JSON, in one of two shapes:
//!
//! * Full (default):
//!   `{"version":1,"block_size":32,"width":65,"height":65,"permutation":[...]}`.
//!   The geometry is checked when unscrambling.
//! * Legacy: a bare array of block indices, e.g. `[5,0,3,1,4,2]`.
//!   The caller must supply the block size.
//!
//! Both are always accepted when reading.

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::permutation::Permutation;

pub const KEY_VERSION: u32 = 1;

/// Key path for a scrambled image: `<image path>.key.json`.
pub fn key_path_for(image: impl AsRef<Path>) -> PathBuf {
    let mut s = OsString::from(image.as_ref().as_os_str());
    s.push(".key.json");
    s.into()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyFormat {
    #[default]
    Full,
    Legacy,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum KeyRepr {
    Legacy(Vec<usize>),
    Full {
        version: u32,
        block_size: usize,
        width: usize,
        height: usize,
        permutation: Vec<usize>,
    },
}

/// A permutation, plus the grid it was made for if known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    permutation: Permutation,
    grid: Option<Grid>,
}

impl Key {
    pub fn new(permutation: Permutation, grid: Grid) -> Self {
        Self {
            permutation,
            grid: Some(grid),
        }
    }

    /// Key without geometry, as stored in the legacy format.
    pub fn legacy(permutation: Permutation) -> Self {
        Self {
            permutation,
            grid: None,
        }
    }

    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    pub fn into_permutation(self) -> Permutation {
        self.permutation
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn block_size(&self) -> Option<usize> {
        self.grid.map(|g| g.block_size())
    }

    /// Check that this key can unscramble a buffer with `grid`.
    pub fn check(&self, grid: &Grid) -> Result<()> {
        if let Some(own) = &self.grid {
            for (field, expected, found) in [
                ("block size", own.block_size(), grid.block_size()),
                ("width", own.width(), grid.width()),
                ("height", own.height(), grid.height()),
            ] {
                if expected != found {
                    return Err(Error::KeyMismatch {
                        field,
                        expected,
                        found,
                    });
                }
            }
        }

        if self.permutation.len() != grid.len() {
            return Err(Error::KeySizeMismatch {
                expected: grid.len(),
                found: self.permutation.len(),
            });
        }
        Ok(())
    }

    /// Serialize to JSON. Without geometry the legacy array is written
    /// regardless of `format`.
    pub fn encode(&self, format: KeyFormat) -> Result<String> {
        let permutation = self.permutation.as_slice().to_vec();
        let repr = match (format, &self.grid) {
            (KeyFormat::Full, Some(grid)) => KeyRepr::Full {
                version: KEY_VERSION,
                block_size: grid.block_size(),
                width: grid.width(),
                height: grid.height(),
                permutation,
            },
            _ => KeyRepr::Legacy(permutation),
        };
        Ok(serde_json::to_string(&repr)?)
    }

    pub fn decode(s: &str) -> Result<Self> {
        match serde_json::from_str::<KeyRepr>(s)? {
            KeyRepr::Legacy(v) => Ok(Self::legacy(v.try_into()?)),
            KeyRepr::Full {
                version,
                block_size,
                width,
                height,
                permutation,
            } => {
                if version != KEY_VERSION {
                    return Err(Error::KeyDecode(format!(
                        "unsupported key version {version}"
                    )));
                }
                let grid = Grid::new(width, height, block_size)
                    .map_err(|e| Error::KeyDecode(e.to_string()))?;
                Ok(Self::new(permutation.try_into()?, grid))
            }
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::KeyNotFound(path.to_owned()))
            }
            Err(e) => return Err(e.into()),
        };

        let key = Self::decode(&s)?;
        debug!(path = %path.display(), blocks = key.permutation.len(), "loaded key");
        Ok(key)
    }

    pub fn save(&self, path: impl AsRef<Path>, format: KeyFormat) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.encode(format)?)?;
        debug!(path = %path.display(), ?format, "saved key");
        Ok(())
    }
}
