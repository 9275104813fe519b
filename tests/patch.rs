use meshgrad::{draw_patch, Patch, Point, RenderingBuffer, Rgba16, Rgba8};

fn red() -> Rgba16 {
    Rgba8::new(255, 0, 0, 255).into()
}
fn green() -> Rgba16 {
    Rgba8::new(0, 255, 0, 255).into()
}
fn blue() -> Rgba16 {
    Rgba8::new(0, 0, 255, 255).into()
}
fn yellow() -> Rgba16 {
    Rgba8::new(255, 255, 0, 255).into()
}

/// Flat 4x4 grid spanning the bilinear quad with the given corners
/// (row 0 start, row 0 end, row 3 start, row 3 end)
fn bilinear_patch(p00: Point, p03: Point, p30: Point, p33: Point) -> Patch {
    let mut p: Patch = Default::default();
    let lerp = |a: Point, b: Point, t: f64| {
        Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y))
    };
    for i in 0..4 {
        let u = i as f64 / 3.0;
        let start = lerp(p00, p30, u);
        let end = lerp(p03, p33, u);
        for j in 0..4 {
            p[i][j] = lerp(start, end, j as f64 / 3.0);
        }
    }
    p
}

fn square_patch() -> Patch {
    bilinear_patch(
        Point::new(100.0, 100.0),
        Point::new(400.0, 100.0),
        Point::new(100.0, 400.0),
        Point::new(400.0, 400.0),
    )
}

#[test]
fn flat_square_corners_are_exact_and_center_blends() {
    let mut pix = RenderingBuffer::new(500, 500);
    let colors = [red(), green(), blue(), yellow()];

    draw_patch(&mut pix.data, 500, 500, &square_patch(), &colors).unwrap();

    assert_eq!(pix.pixel(100, 100), Rgba8::new(255, 0, 0, 255));
    assert_eq!(pix.pixel(400, 100), Rgba8::new(0, 255, 0, 255));
    assert_eq!(pix.pixel(100, 400), Rgba8::new(0, 0, 255, 255));
    assert_eq!(pix.pixel(400, 400), Rgba8::new(255, 255, 0, 255));

    // center is the four-way blend: (127.5, 127.5, 127.5, 255)
    let c = pix.pixel(250, 250);
    assert!((f64::from(c.r) - 127.5).abs() <= 3.0, "center r = {}", c.r);
    assert!((f64::from(c.g) - 127.5).abs() <= 3.0, "center g = {}", c.g);
    assert!((f64::from(c.b) - 127.5).abs() <= 3.0, "center b = {}", c.b);
    assert_eq!(c.a, 255);

    // dump for inspection, and make sure the file round trips
    let out = std::env::temp_dir().join("meshgrad_flat_square.png");
    meshgrad::ppm::write_file(&pix.data, 500, 500, &out).unwrap();
    let (data, w, h) = meshgrad::ppm::read_file(&out).unwrap();
    assert_eq!((w, h), (500, 500));
    assert_eq!(data, pix.data);
    assert_eq!(meshgrad::ppm::img_diff(&out, &out).unwrap(), true);
}

#[test]
fn flat_square_has_no_holes() {
    let mut pix = RenderingBuffer::new(500, 500);
    let colors = [red(), green(), blue(), yellow()];

    draw_patch(&mut pix.data, 500, 500, &square_patch(), &colors).unwrap();

    for y in 100..=400 {
        for x in 100..=400 {
            assert_eq!(pix.pixel(x, y).a, 255, "hole at ({}, {})", x, y);
        }
    }
    // and nothing outside the footprint
    for k in 0..500 {
        assert_eq!(pix.pixel(k, 99).a, 0);
        assert_eq!(pix.pixel(k, 401).a, 0);
        assert_eq!(pix.pixel(99, k).a, 0);
        assert_eq!(pix.pixel(401, k).a, 0);
    }
}

#[test]
fn convex_quad_coverage_matches_scanline_oracle() {
    // a skewed quad; every pixel whose center is clearly interior must
    // be covered, per the 1/sqrt(2) sampling bound
    let a = Point::new(150.0, 80.0);
    let b = Point::new(420.0, 140.0);
    let c = Point::new(90.0, 300.0);
    let d = Point::new(380.0, 430.0);
    let patch = bilinear_patch(a, b, c, d);

    let mut pix = RenderingBuffer::new(500, 500);
    draw_patch(&mut pix.data, 500, 500, &patch, &[red(), green(), blue(), yellow()]).unwrap();

    // corners in boundary cycle order
    let quad = [a, b, d, c];
    let edge_distance = |p: Point, q: Point, pt: Point| {
        let ex = q.x - p.x;
        let ey = q.y - p.y;
        (ex * (pt.y - p.y) - ey * (pt.x - p.x)) / (ex * ex + ey * ey).sqrt()
    };
    let clearly_inside = |pt: Point| {
        (0..4).all(|i| edge_distance(quad[i], quad[(i + 1) % 4], pt) >= 1.0)
    };

    let mut interior = 0;
    for y in 0..500 {
        for x in 0..500 {
            let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
            if clearly_inside(center) {
                interior += 1;
                assert_eq!(pix.pixel(x, y).a, 255, "hole at ({}, {})", x, y);
            }
        }
    }
    assert!(interior > 10_000, "oracle degenerated: {} pixels", interior);
}

#[test]
fn direct_and_split_rasterization_cover_the_same_pixels() {
    // dyadic coordinates keep every forward difference exact, so one
    // manual subdivision must touch exactly the same pixel set as the
    // direct walk
    let scale = 0.375;
    let rows: [[(f64, f64); 4]; 4] = [
        [(100.0, 50.0), (200.0, 100.0), (300.0, 100.0), (310.0, 50.0)],
        [(100.0, 150.0), (200.0, 150.0), (300.0, 150.0), (400.0, 150.0)],
        [(100.0, 300.0), (200.0, 350.0), (300.0, 350.0), (450.0, 300.0)],
        [(100.0, 450.0), (200.0, 400.0), (300.0, 400.0), (400.0, 450.0)],
    ];
    let mut patch: Patch = Default::default();
    for i in 0..4 {
        for j in 0..4 {
            patch[i][j] = Point::new(rows[i][j].0 * scale, rows[i][j].1 * scale);
        }
    }

    let colors = [red(), green(), blue(), yellow()];
    let mut direct = RenderingBuffer::new(200, 200);
    draw_patch(&mut direct.data, 200, 200, &patch, &colors).unwrap();

    // split every row along v by hand
    let mut first: Patch = Default::default();
    let mut second: Patch = Default::default();
    for i in 0..4 {
        let (lo, hi) = meshgrad::split(&patch[i]);
        first[i] = lo;
        second[i] = hi;
    }
    let mid = |p: Rgba16, q: Rgba16| {
        Rgba16::new(
            ((u32::from(p.r) + u32::from(q.r)) / 2) as u16,
            ((u32::from(p.g) + u32::from(q.g)) / 2) as u16,
            ((u32::from(p.b) + u32::from(q.b)) / 2) as u16,
            ((u32::from(p.a) + u32::from(q.a)) / 2) as u16,
        )
    };
    let top_mid = mid(colors[0], colors[1]);
    let bottom_mid = mid(colors[2], colors[3]);

    let mut split = RenderingBuffer::new(200, 200);
    draw_patch(&mut split.data, 200, 200, &first, &[colors[0], top_mid, colors[2], bottom_mid]).unwrap();
    draw_patch(&mut split.data, 200, 200, &second, &[top_mid, colors[1], bottom_mid, colors[3]]).unwrap();

    // compare coverage; colors at the shared boundary differ by the
    // folding tie-break, the pixel sets may not
    for y in 0..200 {
        for x in 0..200 {
            assert_eq!(
                direct.pixel(x, y).a != 0,
                split.pixel(x, y).a != 0,
                "coverage differs at ({}, {})",
                x,
                y
            );
        }
    }
}

#[test]
fn folded_patch_paints_higher_v_on_top() {
    // all four rows trace the same folded x-cubic (forward, beyond,
    // back, forward again), so the patch is a ribbon that passes over
    // itself; the highest v must win every contested column
    let mut patch: Patch = Default::default();
    for i in 0..4 {
        let y = 100.0 + 20.0 * i as f64;
        patch[i] = [
            Point::new(100.0, y),
            Point::new(400.0, y),
            Point::new(0.0, y),
            Point::new(300.0, y),
        ];
    }
    // left edge red, right edge green: color is a pure function of v
    let colors = [red(), green(), red(), green()];

    let mut pix = RenderingBuffer::new(500, 200);
    draw_patch(&mut pix.data, 500, 200, &patch, &colors).unwrap();

    // x(v) = 100 + 900v - 2100v^2 + 1400v^3 crosses x = 210 three
    // times; the last crossing is at v ~ 0.857, so the surviving color
    // is well past the midpoint toward green
    let c = pix.pixel(210, 130);
    assert!(c.g > 180, "expected late-v green at the fold, got {:?}", c);
    assert!(c.r < 80, "expected late-v green at the fold, got {:?}", c);

    // outside the fold the sweep is single valued: near the right end
    // the color is almost pure green, near the left end almost pure red
    assert!(pix.pixel(299, 130).g > 230);
    assert!(pix.pixel(1, 130).a == 0);
}

#[test]
fn collapsed_edge_patch_renders_cleanly() {
    // bottom row collapsed to a single point, like a radial fan
    let mut patch = bilinear_patch(
        Point::new(100.0, 100.0),
        Point::new(400.0, 100.0),
        Point::new(250.0, 400.0),
        Point::new(250.0, 400.0),
    );
    for j in 0..4 {
        patch[3][j] = Point::new(250.0, 400.0);
    }

    let mut pix = RenderingBuffer::new(500, 500);
    draw_patch(&mut pix.data, 500, 500, &patch, &[red(), green(), blue(), blue()]).unwrap();

    // the apex carries the collapsed corners' color
    assert_eq!(pix.pixel(250, 400), Rgba8::new(0, 0, 255, 255));
    // the top edge is still fully painted
    for x in 100..=400 {
        assert_eq!(pix.pixel(x, 100).a, 255, "hole at ({}, 100)", x);
    }
}

#[test]
fn offscreen_patch_leaves_the_buffer_untouched() {
    let patch = bilinear_patch(
        Point::new(-1000.0, -1000.0),
        Point::new(-700.0, -1000.0),
        Point::new(-1000.0, -700.0),
        Point::new(-700.0, -700.0),
    );
    let mut pix = RenderingBuffer::new(100, 100);
    draw_patch(&mut pix.data, 100, 100, &patch, &[red(), green(), blue(), yellow()]).unwrap();
    assert!(pix.data.iter().all(|&v| v == 0));
}

#[test]
fn straddling_patch_clips_to_the_viewport() {
    // centered on the origin: only the bottom-right quarter is visible
    let patch = bilinear_patch(
        Point::new(-150.0, -150.0),
        Point::new(150.0, -150.0),
        Point::new(-150.0, 150.0),
        Point::new(150.0, 150.0),
    );
    let mut pix = RenderingBuffer::new(200, 200);
    draw_patch(&mut pix.data, 200, 200, &patch, &[red(), green(), blue(), yellow()]).unwrap();

    for y in 0..150 {
        for x in 0..150 {
            assert_eq!(pix.pixel(x, y).a, 255, "hole at ({}, {})", x, y);
        }
    }
    for k in 0..200 {
        assert_eq!(pix.pixel(151, k).a, 0);
        assert_eq!(pix.pixel(k, 151).a, 0);
    }
}
