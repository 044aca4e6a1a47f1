use super::{assert_buffers_close, checkerboard, gradient};
use texforge::{
    color::{grayscale, negate, Channel},
    Color, Error, Forge, ForgeConfig,
};

#[test]
fn alpha_grayscale_of_opaque_buffer_is_white() {
    let result = grayscale(&checkerboard(4, 4), Channel::default());
    assert!(result.pixels().iter().all(|px| *px == Color::WHITE));
}

#[test]
fn grayscale_copies_selected_channel() {
    let source = gradient(5, 4);
    for index in 0..4 {
        let channel = Channel::try_from(index).unwrap();
        let result = grayscale(&source, channel);
        assert_eq!(result.dimensions(), source.dimensions());
        for (out, src) in result.pixels().iter().zip(source.pixels()) {
            let expected = src.into_array()[index];
            assert_eq!(*out, Color::splat(expected));
        }
    }
}

#[test]
fn channel_index_out_of_range() {
    assert!(matches!(
        Channel::try_from(4),
        Err(Error::InvalidChannel(4))
    ));
    assert_eq!(Channel::default(), Channel::Alpha);
}

#[test]
fn negation_inverts_every_channel() {
    let source = checkerboard(2, 2);
    let result = negate(&source);
    assert_eq!(result.pixel(0, 0), Color::new(1.0, 1.0, 1.0, 0.0));
    assert_eq!(result.pixel(1, 0), Color::new(0.0, 0.0, 0.0, 0.0));
}

#[test]
fn negation_is_its_own_inverse() {
    let source = gradient(7, 3);
    assert_buffers_close(&negate(&negate(&source)), &source, 1e-6);
}

#[test]
fn forge_pool_matches_global_pool() {
    let forge = Forge::new(ForgeConfig {
        threads: 2,
        ..ForgeConfig::default()
    })
    .unwrap();
    let source = gradient(9, 9);
    assert_eq!(
        forge.grayscale(&source, Channel::Red),
        grayscale(&source, Channel::Red)
    );
    assert_eq!(forge.negate(&source), negate(&source));
}
