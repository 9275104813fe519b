//! Coons boundary handling
//!
//! A mesh gradient patch arrives as the 12 control points of its closed
//! boundary (four cubic sides sharing corner points) plus one color per
//! corner, both in traversal order around the loop. The rasterizer wants
//! a full 4x4 control grid instead, with corner colors in grid order.

use crate::bezier::{Patch, Point};
use crate::color::Rgba16;
use crate::error::Error;
use crate::raster::{draw_patch_with, RasterSettings};

/// Number of control points on a closed Coons boundary
pub const BOUNDARY_POINTS: usize = 12;

/// Number of corner colors on a Coons patch
pub const BOUNDARY_COLORS: usize = 4;

fn lerp_point(a: Point, b: Point, t: f64) -> Point {
    Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y))
}

/// Build the 4x4 control grid from a closed 12 point boundary
///
/// Boundary points run around the loop: 0..=3 along the first side,
/// 3..=6 down the second, 6..=9 back along the third and 9..=11 up the
/// fourth, which closes at point 0. Sides one and three land in grid
/// rows 0 and 3, sides two and four in columns 3 and 0.
///
/// The four interior points are placed at 1/3 and 2/3 between the two
/// facing boundary midpoints. True Coons interpolation blends all four
/// sides bilinearly; this two-point blend is a deliberate simplification
/// kept for output compatibility, not a defect to fix.
pub fn coons_to_grid(boundary: &[Point]) -> Result<Patch, Error> {
    if boundary.len() != BOUNDARY_POINTS {
        return Err(Error::MalformedGeometry {
            expected: BOUNDARY_POINTS,
            got: boundary.len(),
        });
    }
    let b = boundary;
    let mut patch: Patch = [
        [b[0], b[1], b[2], b[3]],
        [b[11], Point::default(), Point::default(), b[4]],
        [b[10], Point::default(), Point::default(), b[5]],
        [b[9], b[8], b[7], b[6]],
    ];

    patch[1][1] = lerp_point(b[1], b[8], 1.0 / 3.0);
    patch[2][1] = lerp_point(b[1], b[8], 2.0 / 3.0);
    patch[1][2] = lerp_point(b[2], b[7], 1.0 / 3.0);
    patch[2][2] = lerp_point(b[2], b[7], 2.0 / 3.0);

    Ok(patch)
}

/// Reorder boundary corner colors into `draw_patch` order
///
/// Boundary corners sit at points 0, 3, 6 and 9 of the loop, so the
/// traversal-order colors belong to grid corners p00, p03, p33 and p30.
/// `draw_patch` wants reading order: row 0 start, row 0 end, row 3
/// start, row 3 end.
pub fn corner_colors(colors: &[Rgba16]) -> Result<[Rgba16; 4], Error> {
    if colors.len() != BOUNDARY_COLORS {
        return Err(Error::MalformedGeometry {
            expected: BOUNDARY_COLORS,
            got: colors.len(),
        });
    }
    Ok([colors[0], colors[1], colors[3], colors[2]])
}

/// Rasterize one Coons patch: validate, build the grid, reorder the
/// colors, draw
pub fn draw_coons_patch(
    buf: &mut [u8],
    width: usize,
    height: usize,
    boundary: &[Point],
    colors: &[Rgba16],
) -> Result<(), Error> {
    draw_coons_patch_with(buf, width, height, boundary, colors, RasterSettings::default())
}

/// `draw_coons_patch` with explicit step ceilings
pub fn draw_coons_patch_with(
    buf: &mut [u8],
    width: usize,
    height: usize,
    boundary: &[Point],
    colors: &[Rgba16],
    settings: RasterSettings,
) -> Result<(), Error> {
    let patch = coons_to_grid(boundary)?;
    let colors = corner_colors(colors)?;
    draw_patch_with(buf, width, height, &patch, &colors, settings)
}

/// One parsed mesh patch: closed boundary plus corner colors, both in
/// traversal order
///
/// This is the shape the markup layer hands over; lengths are validated
/// when the patch is drawn.
#[derive(Debug, Clone)]
pub struct CoonsPatch {
    pub boundary: Vec<Point>,
    pub colors: Vec<Rgba16>,
}

/// Render a whole mesh
///
/// Patches draw in slice order and later patches overwrite earlier ones
/// where they overlap, so adjacent patches sharing a boundary meet
/// without a seam. Any malformed patch aborts the render with nothing
/// further drawn.
pub fn draw_mesh(
    buf: &mut [u8],
    width: usize,
    height: usize,
    patches: &[CoonsPatch],
) -> Result<(), Error> {
    draw_mesh_with(buf, width, height, patches, RasterSettings::default())
}

/// `draw_mesh` with explicit step ceilings
pub fn draw_mesh_with(
    buf: &mut [u8],
    width: usize,
    height: usize,
    patches: &[CoonsPatch],
    settings: RasterSettings,
) -> Result<(), Error> {
    for patch in patches {
        draw_coons_patch_with(buf, width, height, &patch.boundary, &patch.colors, settings)?;
    }
    Ok(())
}
