//! Answer placement on the wall
//!
//! The wall is an inset rectangle of the play surface. Three fixed zones
//! (left-low, center-high, right-low) are shuffled per question, then each
//! tile gets a little positional jitter and a slight tilt.

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;

use super::erosion::{ErosionSurface, GraffitiColor};
use super::facts::AnswerCandidate;
use super::glyph::GlyphRenderer;
use crate::consts::*;

/// Zone centers as fractions of the wall rectangle
const ZONE_FRACTIONS: [(f32, f32); 3] = [(0.2, 0.55), (0.5, 0.35), (0.8, 0.65)];

/// The paintable wall inside the play surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub min: Vec2,
    pub max: Vec2,
}

impl Wall {
    pub fn for_surface(width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(width * WALL_LEFT, height * WALL_TOP),
            max: Vec2::new(width * WALL_RIGHT, height * WALL_BOTTOM),
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// The three unshuffled zone centers
    pub fn zones(&self) -> [Vec2; 3] {
        ZONE_FRACTIONS.map(|(fx, fy)| self.min + self.size() * Vec2::new(fx, fy))
    }
}

/// Symmetric random offset in `[-span/2, span/2)`
fn jitter<R: Rng + ?Sized>(rng: &mut R, span: f32) -> f32 {
    (rng.random::<f32>() - 0.5) * span
}

/// Place three answers on the wall, one per zone, with distinct colors
pub fn place_answers<R: Rng + ?Sized>(
    answers: &[AnswerCandidate; 3],
    width: f32,
    height: f32,
    renderer: &dyn GlyphRenderer,
    rng: &mut R,
) -> Vec<ErosionSurface> {
    let mut zones = Wall::for_surface(width, height).zones();
    zones.shuffle(rng);
    let mut colors = GraffitiColor::ALL;
    colors.shuffle(rng);

    answers
        .iter()
        .zip(zones)
        .zip(colors)
        .map(|((answer, zone), color)| {
            let rotation = jitter(rng, ROTATION_SPAN);
            let pos = zone + Vec2::new(jitter(rng, JITTER_X), jitter(rng, JITTER_Y));
            ErosionSurface::new(answer.value.to_string(), color, renderer)
                .placed(pos, rotation)
                .with_role(answer.is_correct)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::glyph::BlockFont;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn candidates() -> [AnswerCandidate; 3] {
        [
            AnswerCandidate { value: 42, is_correct: true },
            AnswerCandidate { value: 48, is_correct: false },
            AnswerCandidate { value: 36, is_correct: false },
        ]
    }

    #[test]
    fn test_wall_zones() {
        let wall = Wall::for_surface(1000.0, 1000.0);
        assert!(wall.min.abs_diff_eq(Vec2::new(120.0, 250.0), 1e-3));
        let zones = wall.zones();
        assert!((zones[1].x - 500.0).abs() < 1e-3);
        assert!((zones[0].y - (250.0 + 470.0 * 0.55)).abs() < 1e-3);
    }

    #[test]
    fn test_placement_keeps_roles_and_colors() {
        let mut rng = Pcg32::seed_from_u64(11);
        let tiles = place_answers(&candidates(), 1280.0, 720.0, &BlockFont::default(), &mut rng);
        assert_eq!(tiles.len(), 3);
        assert_eq!(tiles.iter().filter(|t| t.is_correct).count(), 1);
        assert_eq!(tiles[0].text, "42");
        assert!(tiles[0].is_correct);

        let mut colors: Vec<_> = tiles.iter().map(|t| t.color).collect();
        colors.sort_by_key(|c| c.hex());
        colors.dedup();
        assert_eq!(colors.len(), 3);
    }

    #[test]
    fn test_placement_stays_near_zones() {
        let zones = Wall::for_surface(1280.0, 720.0).zones();
        for seed in 0..20 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let tiles = place_answers(&candidates(), 1280.0, 720.0, &BlockFont::default(), &mut rng);
            for t in &tiles {
                assert!(t.rotation.abs() <= ROTATION_SPAN / 2.0);
                let near = zones.iter().any(|z| {
                    (t.pos.x - z.x).abs() <= JITTER_X / 2.0 && (t.pos.y - z.y).abs() <= JITTER_Y / 2.0
                });
                assert!(near, "tile at {:?} not near a zone", t.pos);
            }
            // One tile per zone: centers are far apart
            for i in 0..3 {
                for j in (i + 1)..3 {
                    assert!(tiles[i].pos.distance(tiles[j].pos) > 200.0);
                }
            }
        }
    }

    #[test]
    fn test_zone_assignment_varies() {
        let zones = Wall::for_surface(1280.0, 720.0).zones();
        let mut correct_zone_seen = [false; 3];
        for seed in 0..60 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let tiles = place_answers(&candidates(), 1280.0, 720.0, &BlockFont::default(), &mut rng);
            let zone = zones
                .iter()
                .position(|z| (tiles[0].pos.x - z.x).abs() <= JITTER_X)
                .unwrap();
            correct_zone_seen[zone] = true;
        }
        assert_eq!(correct_zone_seen, [true; 3]);
    }
}
