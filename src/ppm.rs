//! Reading and writing of image files
//!
//! Thin wrappers over the `image` crate used by tests and demos to dump
//! rendered buffers and compare them.

use std::path::Path;

/// Read an image file as raw RGBA bytes plus dimensions
pub fn read_file<P: AsRef<Path>>(filename: P) -> Result<(Vec<u8>, usize, usize), image::ImageError> {
    let img = image::open(filename)?.to_rgba();
    let (w, h) = img.dimensions();
    let buf = img.into_raw();
    Ok((buf, w as usize, h as usize))
}

/// Write raw RGBA bytes to an image file; the format follows the file
/// extension
pub fn write_file<P: AsRef<Path>>(
    buf: &[u8],
    width: usize,
    height: usize,
    filename: P,
) -> Result<(), std::io::Error> {
    image::save_buffer(filename, buf, width as u32, height as u32, image::RGBA(8))
}

/// Compare two image files pixel by pixel
///
/// Differing components are reported on stdout; returns false on any
/// mismatch or size difference.
pub fn img_diff<P: AsRef<Path>>(f1: P, f2: P) -> Result<bool, image::ImageError> {
    let (d1, w1, h1) = read_file(f1)?;
    let (d2, w2, h2) = read_file(f2)?;
    if w1 != w2 || h1 != h2 {
        return Ok(false);
    }
    let mut flag = true;
    for (i, (v1, v2)) in d1.iter().zip(d2.iter()).enumerate() {
        if v1 != v2 {
            println!("{} [{},{},{}]: {} {}", i, (i / 4) % w1, (i / 4) / w1, i % 4, v1, v2);
            flag = false;
        }
    }
    Ok(flag)
}
