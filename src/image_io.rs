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

//! Loading and saving images as `(height, width, bytes per pixel)` arrays.

use std::fs::{self, File};
use std::io::{BufReader, Cursor, ErrorKind};
use std::path::Path;

use image::io::Reader as ImageReader;
use image::{write_buffer_with_format, ColorType, DynamicImage, ImageFormat};
use ndarray::prelude::*;
use tracing::{debug, warn};

use crate::error::{Error, Result};

pub fn load(path: impl AsRef<Path>) -> Result<DynamicImage> {
    let path = path.as_ref();
    let f = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::FileNotFound(path.to_owned()))
        }
        Err(e) => return Err(e.into()),
    };

    let im = ImageReader::new(BufReader::new(f))
        .with_guessed_format()?
        .decode()
        .map_err(Error::Decode)?;
    debug!(
        path = %path.display(),
        width = im.width(),
        height = im.height(),
        color = ?im.color(),
        "loaded image"
    );
    Ok(im)
}

/// View image bytes as an array. Each pixel is one cell on the last axis.
pub fn as_array(im: &DynamicImage) -> Result<ArrayView3<'_, u8>> {
    let channels = match im {
        DynamicImage::ImageLuma8(_) => 1,
        DynamicImage::ImageLumaA8(_) => 2,
        DynamicImage::ImageRgb8(_) => 3,
        DynamicImage::ImageRgba8(_) => 4,
        DynamicImage::ImageLuma16(_) => 2,
        DynamicImage::ImageLumaA16(_) => 4,
        DynamicImage::ImageRgb16(_) => 6,
        DynamicImage::ImageRgba16(_) => 8,
        DynamicImage::ImageRgb32F(_) => 12,
        DynamicImage::ImageRgba32F(_) => 16,
        _ => return Err(Error::UnsupportedColor(im.color())),
    };

    <ArrayView3<u8>>::from_shape(
        (im.height() as usize, im.width() as usize, channels),
        im.as_bytes(),
    )
    .map_err(|e| Error::InvalidDimensions(e.to_string()))
}

/// Lossy formats can't be unscrambled exactly.
fn is_lossy(path: &Path) -> bool {
    matches!(ImageFormat::from_path(path), Ok(ImageFormat::Jpeg))
}

/// Encode `arr` (as produced from [as_array]) to `path`.
///
/// The format follows the extension. The image is encoded in memory
/// first, so a failed encode leaves no file behind.
pub fn save(path: impl AsRef<Path>, arr: ArrayView3<'_, u8>, color: ColorType) -> Result<()> {
    let path = path.as_ref();
    if is_lossy(path) {
        warn!(
            path = %path.display(),
            "lossy output format, image will not unscramble exactly"
        );
    }

    let (h, w, _) = arr.dim();
    let data = arr.as_standard_layout();
    let bytes = data
        .as_slice()
        .ok_or_else(|| Error::InvalidDimensions("array is not contiguous".into()))?;
    let format = ImageFormat::from_path(path).map_err(Error::Encode)?;

    let mut buf = Cursor::new(Vec::new());
    write_buffer_with_format(&mut buf, bytes, w as u32, h as u32, color, format)
        .map_err(Error::Encode)?;
    fs::write(path, buf.into_inner())?;

    debug!(path = %path.display(), width = w, height = h, "saved image");
    Ok(())
}
