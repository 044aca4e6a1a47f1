use super::{assert_buffers_close, assert_close, gradient, uniform};
use texforge::{
    resample::{cubic_weight, rotate, sample_bicubic, shrink, shrink_region},
    Color, Error, PixelBuffer, Rect,
};

#[test]
fn kernel_weights() {
    assert_eq!(cubic_weight(0.0), 1.0);
    assert_eq!(cubic_weight(1.0), 0.0);
    assert_eq!(cubic_weight(-1.0), 0.0);
    assert_eq!(cubic_weight(2.0), 0.0);
    assert_eq!(cubic_weight(3.5), 0.0);
    assert!((cubic_weight(0.5) - 0.5625).abs() < 1e-12);
    assert!((cubic_weight(-1.5) + 0.0625).abs() < 1e-12);
}

#[test]
fn kernel_weights_sum_to_one() {
    for step in 0..10 {
        let f = step as f64 / 10.0;
        let sum: f64 = (-1..3).map(|m| cubic_weight(m as f64 - f)).sum();
        assert!((sum - 1.0).abs() < 1e-9, "weights at {f} sum to {sum}");
    }
}

#[test]
fn sampling_pixel_centers_is_exact() {
    let source = gradient(5, 4);
    for y in 0..4 {
        for x in 0..5 {
            let sampled = sample_bicubic(&source, x as f64 + 0.5, y as f64 + 0.5);
            assert_eq!(sampled, source.pixel(x, y));
        }
    }
}

#[test]
fn shrink_dimensions_follow_floor() {
    let source = gradient(13, 7);
    for (scale_x, scale_y) in [(0.5, 0.5), (0.3, 0.9), (1.0, 1.0), (2.5, 1.7), (0.1, 3.0)] {
        let result = shrink(&source, scale_x, scale_y).unwrap();
        assert_eq!(result.width(), (13.0_f32 * scale_x).floor() as u32);
        assert_eq!(result.height(), (7.0_f32 * scale_y).floor() as u32);
    }
}

#[test]
fn shrink_uses_absolute_scale() {
    let source = gradient(8, 8);
    assert_eq!(
        shrink(&source, -0.5, 0.5).unwrap(),
        shrink(&source, 0.5, 0.5).unwrap()
    );
}

#[test]
fn shrink_keeps_uniform_color() {
    let color = Color::new(0.2, 0.4, 0.6, 0.8);
    let result = shrink(&uniform(9, 6, color), 0.5, 1.5).unwrap();
    for px in result.pixels() {
        assert_close(*px, color, 1e-5);
    }
}

#[test]
fn shrink_to_nothing_is_degenerate() {
    let source = gradient(4, 4);
    assert!(matches!(
        shrink(&source, 0.1, 1.0),
        Err(Error::DegenerateInput(_))
    ));
    assert!(matches!(
        shrink(&source, 0.0, 1.0),
        Err(Error::DegenerateInput(_))
    ));
    assert!(shrink(&source, f32::NAN, 1.0).is_err());
}

#[test]
fn shrink_region_only_reads_the_region() {
    let red = Color::new(1.0, 0.0, 0.0, 1.0);
    let blue = Color::new(0.0, 0.0, 1.0, 1.0);
    let source =
        PixelBuffer::from_fn(8, 4, |x, _| if x < 4 { red } else { blue }).unwrap();
    let result = shrink_region(&source, Rect::new(4, 0, 4, 4), 0.5, 0.5).unwrap();
    assert_eq!(result.dimensions(), (2, 2));
    for px in result.pixels() {
        assert_close(*px, blue, 1e-5);
    }
}

#[test]
fn zero_rotation_is_identity() {
    let source = gradient(6, 3);
    assert_eq!(rotate(&source, 0.0).unwrap(), source);
}

#[test]
fn quarter_turn_moves_pixels_counter_clockwise() {
    let source = gradient(4, 2);
    let result = rotate(&source, 90.0).unwrap();
    assert_eq!(result.dimensions(), (2, 4));
    for y in 0..2 {
        for x in 0..4 {
            assert_close(result.pixel(1 - y, x), source.pixel(x, y), 1e-4);
        }
    }
}

#[test]
fn half_turn_keeps_dimensions() {
    let source = gradient(5, 3);
    let result = rotate(&source, 180.0).unwrap();
    assert_eq!(result.dimensions(), (5, 3));
    assert_close(result.pixel(4, 2), source.pixel(0, 0), 1e-4);
}

#[test]
fn diagonal_rotation_grows_and_leaves_corners_empty() {
    let color = Color::new(0.5, 0.5, 0.5, 1.0);
    let result = rotate(&uniform(10, 10, color), 45.0).unwrap();
    assert_eq!(result.dimensions(), (15, 15));
    assert_eq!(result.pixel(0, 0), Color::TRANSPARENT);
    assert_eq!(result.pixel(14, 14), Color::TRANSPARENT);
    assert_close(result.pixel(7, 7), color, 1e-4);
}

#[test]
fn rotation_round_trip_restores_interior() {
    let color = Color::new(0.1, 0.7, 0.3, 1.0);
    let source = uniform(8, 8, color);
    let back = rotate(&rotate(&source, 30.0).unwrap(), -30.0).unwrap();
    let (cx, cy) = (back.width() / 2, back.height() / 2);
    assert_close(back.pixel(cx, cy), color, 1e-4);
}

#[test]
fn non_finite_angle_is_rejected() {
    assert!(rotate(&gradient(2, 2), f32::INFINITY).is_err());
}

#[test]
fn forge_rotation_matches_free_function() {
    let forge = texforge::Forge::new(texforge::ForgeConfig {
        threads: 3,
        ..Default::default()
    })
    .unwrap();
    let source = gradient(7, 5);
    assert_buffers_close(
        &forge.rotate(&source, 33.0).unwrap(),
        &rotate(&source, 33.0).unwrap(),
        0.0,
    );
    assert_eq!(
        forge.shrink(&source, 0.5, 0.5).unwrap(),
        shrink(&source, 0.5, 0.5).unwrap()
    );
    let region = Rect::new(1, 1, 4, 4);
    assert_eq!(
        forge.shrink_region(&source, region, 0.5, 0.75).unwrap(),
        shrink_region(&source, region, 0.5, 0.75).unwrap()
    );
}
