// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Getting a finished canvas out of the process: as an image file, or
//! as a crude text dump for eyeballing small renders in a terminal.

use std::convert::TryFrom;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::ColorType;

use crate::canvas::Canvas;
use crate::errors::{RenderError, Result};

/// Darkest to brightest.
const RAMP: &[u8] = b" .:-=+*#%@";

/// Writes a grayscale canvas to `path`.  `.pgm` and `.pnm` files are
/// written as binary graymaps; anything else goes through the image
/// crate's format detection, so `.png` gives a PNG.
pub fn write_image<P: AsRef<Path>>(path: P, canvas: &Canvas<u8>) -> Result<()> {
    let path = path.as_ref();
    let (width, height) = match (u32::try_from(canvas.width()), u32::try_from(canvas.height())) {
        (Ok(w), Ok(h)) => (w, h),
        _ => return Err(RenderError::InvalidDimensions(canvas.width(), canvas.height())),
    };
    let is_pnm = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pgm") || e.eq_ignore_ascii_case("pnm"))
        .unwrap_or(false);

    if is_pnm {
        let output = BufWriter::new(File::create(path)?);
        let mut encoder =
            PnmEncoder::new(output).with_subtype(PnmSubtype::Graymap(SampleEncoding::Binary));
        encoder.encode(canvas.as_slice(), width, height, ColorType::L8)?;
        return Ok(());
    }

    image::save_buffer(path, canvas.as_slice(), width, height, ColorType::L8)?;
    Ok(())
}

/// Dumps a grayscale canvas as text, one character per pixel, one
/// line per row.
pub fn write_text<W: Write>(out: &mut W, canvas: &Canvas<u8>) -> Result<()> {
    for row in canvas.as_slice().chunks(canvas.width()) {
        let line: Vec<u8> = row
            .iter()
            .map(|&v| RAMP[usize::from(v) * (RAMP.len() - 1) / 255])
            .collect();
        out.write_all(&line)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
