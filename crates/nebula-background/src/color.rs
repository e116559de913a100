//! Color palettes for background animations.

use nebula_core::Rgb;
use rand::Rng;

/// Node and particle colors.
pub const SPACE_PALETTE: [Rgb; 8] = [
    Rgb::new(0, 212, 255),   // Cyan
    Rgb::new(123, 97, 255),  // Purple
    Rgb::new(255, 100, 200), // Pink
    Rgb::new(255, 160, 60),  // Nebula orange
    Rgb::new(80, 200, 255),  // Light blue
    Rgb::new(180, 80, 255),  // Violet
    Rgb::new(100, 255, 200), // Mint
    Rgb::new(255, 80, 120),  // Hot pink
];

/// Pick a palette color uniformly.
pub fn random_space_color<R: Rng + ?Sized>(rng: &mut R) -> Rgb {
    SPACE_PALETTE[rng.gen_range(0..SPACE_PALETTE.len())]
}

/// Star color: mostly cool white/blue, some warm, a few blue-violet.
pub fn random_star_color<R: Rng + ?Sized>(rng: &mut R) -> Rgb {
    let roll: f32 = rng.gen_range(0.0..1.0);
    if roll < 0.6 {
        Rgb::new(channel(rng, 200.0, 55.0), channel(rng, 210.0, 45.0), 255)
    } else if roll < 0.8 {
        Rgb::new(255, channel(rng, 200.0, 40.0), channel(rng, 150.0, 50.0))
    } else {
        Rgb::new(channel(rng, 150.0, 50.0), channel(rng, 180.0, 50.0), 255)
    }
}

fn channel<R: Rng + ?Sized>(rng: &mut R, base: f32, spread: f32) -> u8 {
    (base + rng.gen_range(0.0..spread)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_space_color_from_palette() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            assert!(SPACE_PALETTE.contains(&random_space_color(&mut rng)));
        }
    }

    #[test]
    fn test_star_colors_are_tri_modal() {
        let mut rng = StdRng::seed_from_u64(9);
        let (mut cool, mut warm, mut violet) = (0, 0, 0);
        for _ in 0..500 {
            let c = random_star_color(&mut rng);
            match c {
                Rgb { r: 255, g, b } => {
                    assert!((200..240).contains(&g) && (150..200).contains(&b));
                    warm += 1;
                }
                Rgb { r, g, b: 255 } if r >= 200 => {
                    assert!(g >= 210);
                    cool += 1;
                }
                Rgb { r, g, b: 255 } => {
                    assert!((150..200).contains(&r) && (180..230).contains(&g));
                    violet += 1;
                }
                other => panic!("unexpected star color {other:?}"),
            }
        }
        assert!(cool > warm && cool > violet);
        assert!(warm > 0 && violet > 0);
    }
}
