//! Curve and patch rasterization
//!
//! Both rasterizers run the same state machine per invocation: classify
//! the control-point bounding box against the viewport, then skip, split
//! or walk. Splitting recurses on exactly covering de Casteljau halves,
//! so the walk loops only ever see geometry whose extent fits the fixed
//! point formats and whose step count keeps the accumulated error below
//! one pixel.
//!
//! Pixel writes are opaque overwrites. When a patch folds over itself
//! the painter's order decides: curves are emitted in increasing v, and
//! a patch too coarse to walk is split along v only, first half before
//! second half, so the half with the higher v parameter always lands
//! last. Within one curve, later u overwrites earlier u.

use crate::bezier::{split, sq_steps_to_shift, steps_sq, Curve, Patch, Point};
use crate::clip::{curve_bounds, intersect_interval, patch_bounds, Visibility};
use crate::color::{Rgba16, Rgba8};
use crate::error::Error;
use crate::fd::ForwardDiff;
use crate::fixed::{fixed_floor, fixed_from_double};

/// Step-count ceilings for the rasterizers
///
/// A walk never takes more than `steps_max` steps per axis; above that
/// the geometry is split first. 256 is the most the integer difference
/// formats can absorb while keeping the accumulated error below one
/// pixel. Partially visible geometry splits at the lower `steps_clip`
/// ceiling instead, giving the offscreen halves a chance to be discarded
/// before any walking happens; 64 is an empirical value, anything from 1
/// to `steps_max` is valid.
#[derive(Debug, Clone, Copy)]
pub struct RasterSettings {
    pub steps_max_u: f64,
    pub steps_clip_u: f64,
    pub steps_max_v: f64,
    pub steps_clip_v: f64,
}

impl Default for RasterSettings {
    fn default() -> Self {
        RasterSettings {
            steps_max_u: 256.0,
            steps_clip_u: 64.0,
            steps_max_v: 256.0,
            steps_clip_v: 64.0,
        }
    }
}

/// Color carried through subdivision: RGBA components on the 0..=65535
/// scale, kept in f64 so repeated halving keeps its precision
type ColorF = [f64; 4];

fn color_f(c: Rgba16) -> ColorF {
    [f64::from(c.r), f64::from(c.g), f64::from(c.b), f64::from(c.a)]
}

fn color_mid(a: ColorF, b: ColorF) -> ColorF {
    [
        0.5 * (a[0] + b[0]),
        0.5 * (a[1] + b[1]),
        0.5 * (a[2] + b[2]),
        0.5 * (a[3] + b[3]),
    ]
}

fn color_round(c: ColorF) -> [i32; 4] {
    [
        c[0].round() as i32,
        c[1].round() as i32,
        c[2].round() as i32,
        c[3].round() as i32,
    ]
}

/// Per-step color increment over 2^shift steps
///
/// Rounds toward zero: rounding to nearest could overshoot the target
/// component after 2^shift additions.
fn color_delta_shifted(from: i32, to: i32, shift: u32) -> i32 {
    let delta = to - from;
    if delta >= 0 {
        delta >> shift
    } else {
        -((-delta) >> shift)
    }
}

/// Overwrite one pixel
///
/// Color components are 0..=65535; the high byte of each is stored.
/// Out-of-bounds coordinates are dropped with a diagnostic, never an
/// error: the walk loops legitimately produce them for partially
/// visible geometry.
fn draw_pixel(buf: &mut [u8], width: usize, height: usize, x: i32, y: i32, color: [i32; 4]) {
    if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
        log::trace!("ignoring out-of-bounds pixel ({}, {})", x, y);
        return;
    }
    let pos = 4 * (y as usize * width + x as usize);
    buf[pos] = (color[0] >> 8) as u8;
    buf[pos + 1] = (color[1] >> 8) as u8;
    buf[pos + 2] = (color[2] >> 8) as u8;
    buf[pos + 3] = (color[3] >> 8) as u8;
}

/// Forward-rasterize one cubic curve at 2^ushift steps
///
/// `dxu`/`dyu` are the x and y forward differences already halved down
/// to the walk resolution; colors are interpolated from `c0` to `c3` by
/// a per-step integer delta. Draws 2^ushift + 1 pixels, t = 0 and t = 1
/// included.
fn rasterize_curve(
    buf: &mut [u8],
    width: usize,
    height: usize,
    ushift: u32,
    dxu: &ForwardDiff,
    dyu: &ForwardDiff,
    c0: [i32; 4],
    c3: [i32; 4],
) {
    let usteps = 1i32 << ushift;

    let mut xu = dxu.fixed();
    let mut yu = dyu.fixed();

    // The start point becomes the origin of the integer differences:
    // the 9.23 offsets then only span the curve's extent, which
    // subdivision has already bounded, while the 24.8 origin covers the
    // full coordinate range.
    let x0 = fixed_from_double(dxu.value());
    let y0 = fixed_from_double(dyu.value());
    xu.d[0] = 0;
    yu.d[0] = 0;

    let mut c = c0;
    let dc = [
        color_delta_shifted(c0[0], c3[0], ushift),
        color_delta_shifted(c0[1], c3[1], ushift),
        color_delta_shifted(c0[2], c3[2], ushift),
        color_delta_shifted(c0[3], c3[3], ushift),
    ];

    for _ in 0..=usteps {
        // A sample belongs to the pixel whose half-open square contains
        // it; >>15 rescales the 9.23 offset to 24.8 and the (>>14)&1
        // bit rounds that rescaling to nearest.
        let x = fixed_floor(x0 + (xu.d[0] >> 15) + ((xu.d[0] >> 14) & 1));
        let y = fixed_floor(y0 + (yu.d[0] >> 15) + ((yu.d[0] >> 14) & 1));

        draw_pixel(buf, width, height, x, y, c);

        xu.step();
        yu.step();

        c[0] += dc[0];
        c[1] += dc[1];
        c[2] += dc[2];
        c[3] += dc[3];
    }
}

/// Classify, split and rasterize one cubic curve
///
/// Skips curves with no viewport intersection, splits curves whose step
/// estimate exceeds the applicable ceiling (halving the color range with
/// the geometry), and walks the rest. The exact end point is re-drawn
/// after the walk: fixed point rounding may legitimately place the last
/// sample on a neighbouring pixel.
fn draw_curve_inner(
    buf: &mut [u8],
    width: usize,
    height: usize,
    settings: &RasterSettings,
    p: &Curve,
    c0: ColorF,
    c3: ColorF,
) {
    let b = curve_bounds(p);

    let v = intersect_interval(b.y1, b.y2, 0.0, height as f64);
    if v == Visibility::Outside {
        return;
    }
    let v = v & intersect_interval(b.x1, b.x2, 0.0, width as f64);
    if v == Visibility::Outside {
        return;
    }

    let ssq = steps_sq(p);
    let limit = if v == Visibility::Inside {
        settings.steps_max_u
    } else {
        settings.steps_clip_u
    };

    if ssq >= limit * limit {
        let (first, second) = split(p);
        let midc = color_mid(c0, c3);
        draw_curve_inner(buf, width, height, settings, &first, c0, midc);
        draw_curve_inner(buf, width, height, settings, &second, midc, c3);
    } else {
        let ushift = sq_steps_to_shift(ssq);

        let mut dxu = ForwardDiff::new(p[0].x, p[1].x, p[2].x, p[3].x);
        let mut dyu = ForwardDiff::new(p[0].y, p[1].y, p[2].y, p[3].y);
        for _ in 0..ushift {
            dxu.halve();
            dyu.halve();
        }

        rasterize_curve(buf, width, height, ushift, &dxu, &dyu, color_round(c0), color_round(c3));

        let x = fixed_floor(fixed_from_double(p[3].x));
        let y = fixed_floor(fixed_from_double(p[3].y));
        draw_pixel(buf, width, height, x, y, color_round(c3));
    }
}

/// Forward-rasterize one patch at 2^vshift curves
///
/// One forward-difference pair per grid row maps v to the position of
/// that row's node of the current curve; corner colors advance along the
/// two side edges by per-step deltas. Every emitted curve goes through
/// the full curve state machine, so each picks its own u resolution.
///
/// Internal corner color order is (p00, p30, p03, p33).
fn rasterize_patch(
    buf: &mut [u8],
    width: usize,
    height: usize,
    settings: &RasterSettings,
    vshift: u32,
    p: &Patch,
    col: &[ColorF; 4],
) {
    let vsteps = 1i32 << vshift;

    let mut pv: [(ForwardDiff, ForwardDiff); 4] = Default::default();
    for i in 0..4 {
        let mut fx = ForwardDiff::new(p[i][0].x, p[i][1].x, p[i][2].x, p[i][3].x);
        let mut fy = ForwardDiff::new(p[i][0].y, p[i][1].y, p[i][2].y, p[i][3].y);
        for _ in 0..vshift {
            fx.halve();
            fy.halve();
        }
        pv[i] = (fx, fy);
    }

    let mut cstart = col[0];
    let mut cend = col[1];
    let mut dcstart = [0f64; 4];
    let mut dcend = [0f64; 4];
    for i in 0..4 {
        dcstart[i] = (col[2][i] - col[0][i]) / f64::from(vsteps);
        dcend[i] = (col[3][i] - col[1][i]) / f64::from(vsteps);
    }

    for _ in 0..=vsteps {
        let nodes: Curve = [
            Point::new(pv[0].0.value(), pv[0].1.value()),
            Point::new(pv[1].0.value(), pv[1].1.value()),
            Point::new(pv[2].0.value(), pv[2].1.value()),
            Point::new(pv[3].0.value(), pv[3].1.value()),
        ];

        draw_curve_inner(buf, width, height, settings, &nodes, cstart, cend);

        for i in 0..4 {
            pv[i].0.step();
            pv[i].1.step();
            cstart[i] += dcstart[i];
            cend[i] += dcend[i];
        }
    }
}

/// Classify, split and rasterize one cubic patch
///
/// The step estimate is the worst of the four grid rows along v. A patch
/// too coarse for the applicable ceiling is split along v only, first
/// half drawn before second half, which is what makes the higher-v half
/// of a folded patch overwrite the lower-v half.
///
/// Internal corner color order is (p00, p30, p03, p33).
fn draw_patch_inner(
    buf: &mut [u8],
    width: usize,
    height: usize,
    settings: &RasterSettings,
    p: &Patch,
    col: &[ColorF; 4],
) {
    let b = patch_bounds(p);

    let v = intersect_interval(b.y1, b.y2, 0.0, height as f64);
    if v == Visibility::Outside {
        return;
    }
    let v = v & intersect_interval(b.x1, b.x2, 0.0, width as f64);
    if v == Visibility::Outside {
        return;
    }

    let mut ssq = 0.0f64;
    for row in p {
        ssq = ssq.max(steps_sq(row));
    }

    let limit = if v == Visibility::Inside {
        settings.steps_max_v
    } else {
        settings.steps_clip_v
    };

    if ssq >= limit * limit {
        let mut first: Patch = Default::default();
        let mut second: Patch = Default::default();
        for i in 0..4 {
            let (a, b) = split(&p[i]);
            first[i] = a;
            second[i] = b;
        }

        let lo = [col[0], col[1], color_mid(col[0], col[2]), color_mid(col[1], col[3])];
        draw_patch_inner(buf, width, height, settings, &first, &lo);

        let hi = [lo[2], lo[3], col[2], col[3]];
        draw_patch_inner(buf, width, height, settings, &second, &hi);
    } else {
        rasterize_patch(buf, width, height, settings, sq_steps_to_shift(ssq), p, col);
    }
}

fn check_buffer(buf: &[u8], width: usize, height: usize) -> Result<(), Error> {
    let expected = 4 * width * height;
    if buf.len() != expected {
        return Err(Error::MalformedGeometry { expected, got: buf.len() });
    }
    Ok(())
}

fn check_finite<'a, I>(points: I) -> Result<(), Error>
where
    I: IntoIterator<Item = &'a Point>,
{
    for p in points {
        if !p.x.is_finite() || !p.y.is_finite() {
            return Err(Error::DegenerateGeometry);
        }
    }
    Ok(())
}

/// Draw one cubic Bezier curve with linearly interpolated color
///
/// `buf` is a row-major RGBA byte buffer of length `4 * width * height`
/// with the origin at the top-left. Pixels falling outside the buffer
/// are dropped silently. Non-finite control points are rejected.
pub fn draw_curve(
    buf: &mut [u8],
    width: usize,
    height: usize,
    curve: &Curve,
    c0: Rgba8,
    c3: Rgba8,
) -> Result<(), Error> {
    draw_curve_with(buf, width, height, curve, c0, c3, RasterSettings::default())
}

/// `draw_curve` with explicit step ceilings
pub fn draw_curve_with(
    buf: &mut [u8],
    width: usize,
    height: usize,
    curve: &Curve,
    c0: Rgba8,
    c3: Rgba8,
    settings: RasterSettings,
) -> Result<(), Error> {
    check_buffer(buf, width, height)?;
    check_finite(curve.iter())?;
    draw_curve_inner(
        buf,
        width,
        height,
        &settings,
        curve,
        color_f(Rgba16::from(c0)),
        color_f(Rgba16::from(c3)),
    );
    Ok(())
}

/// Draw one cubic Bezier patch
///
/// `colors` are the corner colors in grid reading order: start of row 0,
/// end of row 0, start of row 3, end of row 3. `buf` is a row-major RGBA
/// byte buffer of length `4 * width * height`, top-left origin. Pixels
/// falling outside the buffer are dropped silently; non-finite control
/// points are rejected.
pub fn draw_patch(
    buf: &mut [u8],
    width: usize,
    height: usize,
    patch: &Patch,
    colors: &[Rgba16; 4],
) -> Result<(), Error> {
    draw_patch_with(buf, width, height, patch, colors, RasterSettings::default())
}

/// `draw_patch` with explicit step ceilings
pub fn draw_patch_with(
    buf: &mut [u8],
    width: usize,
    height: usize,
    patch: &Patch,
    colors: &[Rgba16; 4],
    settings: RasterSettings,
) -> Result<(), Error> {
    check_buffer(buf, width, height)?;
    check_finite(patch.iter().flatten())?;
    // Reorder the corner colors from reading order to the rasterizer's
    // (p00, p30, p03, p33) convention.
    let col = [
        color_f(colors[0]),
        color_f(colors[2]),
        color_f(colors[1]),
        color_f(colors[3]),
    ];
    draw_patch_inner(buf, width, height, &settings, patch, &col);
    Ok(())
}
