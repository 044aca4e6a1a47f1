use super::{assert_close, checkerboard, uniform};
use texforge::{
    composite::{composite, larger_power_of_two},
    Color, Point,
};

#[test]
fn opaque_overlay_replaces_base() {
    let base = checkerboard(6, 6);
    let overlay = uniform(2, 3, Color::new(0.2, 0.4, 0.6, 1.0));
    let result = composite(&base, &overlay, Point::new(1, 2), false);
    for y in 0..6 {
        for x in 0..6 {
            let inside = (1..3).contains(&x) && (2..5).contains(&y);
            let expected = if inside {
                overlay.pixel(0, 0)
            } else {
                base.pixel(x, y)
            };
            assert_eq!(result.pixel(x, y), expected, "({x}, {y})");
        }
    }
}

#[test]
fn translucent_overlay_blends_every_channel() {
    let base = uniform(2, 2, Color::BLACK);
    let overlay = uniform(2, 2, Color::new(1.0, 1.0, 1.0, 0.5));
    let result = composite(&base, &overlay, Point::new(0, 0), false);
    for px in result.pixels() {
        assert_close(*px, Color::new(0.5, 0.5, 0.5, 0.75), 1e-6);
    }
}

#[test]
fn solidify_makes_visible_pixels_opaque() {
    let base = uniform(2, 1, Color::BLACK);
    let overlay = texforge::PixelBuffer::from_pixels(
        2,
        1,
        vec![Color::new(1.0, 0.0, 0.0, 0.2), Color::new(0.0, 1.0, 0.0, 0.0)],
    )
    .unwrap();
    let result = composite(&base, &overlay, Point::new(0, 0), true);
    assert_eq!(result.pixel(0, 0), Color::new(1.0, 0.0, 0.0, 1.0));
    assert_eq!(result.pixel(1, 0), Color::BLACK);
}

#[test]
fn overlay_outside_base_is_dropped() {
    let base = uniform(4, 4, Color::BLACK);
    let overlay = uniform(3, 3, Color::WHITE);
    let result = composite(&base, &overlay, Point::new(-2, 3), false);
    assert_eq!(result.dimensions(), (4, 4));
    assert_eq!(result.pixel(0, 3), Color::WHITE);
    assert_eq!(result.pixel(1, 2), Color::BLACK);
    assert_eq!(result.pixel(1, 3), Color::BLACK);

    let untouched = composite(&base, &overlay, Point::new(10, 10), false);
    assert_eq!(untouched, base);
}

#[test]
fn base_is_not_modified() {
    let base = uniform(3, 3, Color::BLACK);
    let copy = base.clone();
    let _ = composite(&base, &uniform(3, 3, Color::WHITE), Point::new(0, 0), false);
    assert_eq!(base, copy);
}

#[test]
fn powers_of_two() {
    assert_eq!(larger_power_of_two(0).unwrap(), 1);
    assert_eq!(larger_power_of_two(1).unwrap(), 2);
    assert_eq!(larger_power_of_two(7).unwrap(), 8);
    assert_eq!(larger_power_of_two(8).unwrap(), 16);
    assert_eq!(larger_power_of_two(1000).unwrap(), 1024);
    assert_eq!(larger_power_of_two(1 << 30).unwrap(), 1 << 31);
    assert!(larger_power_of_two(1 << 31).is_err());
    assert!(larger_power_of_two(u32::MAX).is_err());
}

#[test]
fn forge_composite_matches_free_function() {
    let forge = texforge::Forge::new(texforge::ForgeConfig {
        threads: 2,
        ..Default::default()
    })
    .unwrap();
    let base = checkerboard(5, 5);
    let overlay = uniform(3, 2, Color::new(0.9, 0.1, 0.1, 0.4));
    assert_eq!(
        forge.composite(&base, &overlay, Point::new(3, -1), false),
        composite(&base, &overlay, Point::new(3, -1), false)
    );
}
