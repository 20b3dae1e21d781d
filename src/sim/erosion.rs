//! Per-pixel erosion of a graffiti answer tile
//!
//! Each tile keeps two grids of the same size:
//! - an immutable ink mask, classified once from the glyph opacity field
//! - a mutable wear mask (255 = intact paint, 0 = washed away)
//!
//! Water impacts lower wear inside a circle, strongest at the center. Wash
//! progress is the fraction of ink cells whose wear fell below
//! [`ERASED_WEAR`]. Crossing [`WASH_THRESHOLD`] latches the tile as washed and
//! wipes the whole wear mask.
//!
//! Erosion runs in the tile's local, unrotated frame: world points are only
//! translated, never rotated, matching the axis-aligned hit box.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::glyph::{GlyphRaster, GlyphRenderer, render_tile};
use crate::consts::*;

/// Wall paint colors (one per answer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraffitiColor {
    Lime,
    Magenta,
    Yellow,
}

impl GraffitiColor {
    pub const ALL: [GraffitiColor; 3] = [Self::Lime, Self::Magenta, Self::Yellow];

    pub fn rgb(&self) -> [u8; 3] {
        match self {
            GraffitiColor::Lime => [0x39, 0xff, 0x14],
            GraffitiColor::Magenta => [0xff, 0x00, 0xff],
            GraffitiColor::Yellow => [0xff, 0xff, 0x00],
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            GraffitiColor::Lime => "#39ff14",
            GraffitiColor::Magenta => "#ff00ff",
            GraffitiColor::Yellow => "#ffff00",
        }
    }
}

/// Erosion state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WashState {
    /// No paint removed yet
    Intact,
    /// Some wear, below the wash threshold
    Eroding,
    /// Threshold crossed; terminal
    Washed,
}

/// Color band of the wash progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressBand {
    Low,
    Mid,
    High,
}

/// Progress bar drawn above a tile while it is being washed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressBar {
    /// Fill fraction (progress relative to the wash threshold)
    pub fill: f32,
    pub band: ProgressBand,
}

impl ProgressBar {
    pub fn percent(&self) -> u32 {
        (self.fill * 100.0).floor() as u32
    }
}

/// One answer tile and its erosion masks
#[derive(Debug, Clone)]
pub struct ErosionSurface {
    /// Answer text painted on the tile
    pub text: String,
    pub is_correct: bool,
    /// Tile center in world space
    pub pos: Vec2,
    /// Visual rotation (radians); not used by erosion or hit testing
    pub rotation: f32,
    pub color: GraffitiColor,
    width: usize,
    height: usize,
    /// Glyph opacity, kept for drawing
    alpha: Vec<u8>,
    /// Cells that count as visible ink
    ink: Vec<bool>,
    /// Ink cell total, at least 1
    ink_total: usize,
    wear: Vec<u8>,
    wash_progress: f32,
    state: WashState,
    dirty: bool,
}

impl ErosionSurface {
    /// Render `text` with `renderer` and build an intact surface
    pub fn new(text: impl Into<String>, color: GraffitiColor, renderer: &dyn GlyphRenderer) -> Self {
        let text = text.into();
        let raster = render_tile(renderer, &text);
        Self::from_raster(text, color, raster)
    }

    /// Build an intact surface from an already rendered opacity field
    pub fn from_raster(text: impl Into<String>, color: GraffitiColor, raster: GlyphRaster) -> Self {
        let GlyphRaster { width, height, alpha } = raster;
        let ink: Vec<bool> = alpha.iter().map(|&a| a > INK_ALPHA_THRESHOLD).collect();
        let ink_total = ink.iter().filter(|&&i| i).count().max(1);

        Self {
            text: text.into(),
            is_correct: false,
            pos: Vec2::ZERO,
            rotation: 0.0,
            color,
            width,
            height,
            wear: vec![WEAR_INTACT; alpha.len()],
            alpha,
            ink,
            ink_total,
            wash_progress: 0.0,
            state: WashState::Intact,
            dirty: true,
        }
    }

    /// Set world placement
    pub fn placed(mut self, pos: Vec2, rotation: f32) -> Self {
        self.pos = pos;
        self.rotation = rotation;
        self
    }

    /// Mark as the correct answer (or not)
    pub fn with_role(mut self, is_correct: bool) -> Self {
        self.is_correct = is_correct;
        self
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Half extents of the tile bitmap
    #[inline]
    pub fn half_size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) / 2.0
    }

    /// World point to tile-local bitmap coordinates (translation only)
    #[inline]
    pub fn to_local(&self, world: Vec2) -> Vec2 {
        world - (self.pos - self.half_size())
    }

    /// Tile-local bitmap coordinates to world point
    #[inline]
    pub fn to_world(&self, local: Vec2) -> Vec2 {
        local + (self.pos - self.half_size())
    }

    /// Spray water at `world` with the given radius.
    ///
    /// Returns true when any cell lost paint. Impacts whose circle misses the
    /// bitmap entirely are silent no-ops.
    pub fn apply_impact(&mut self, world: Vec2, radius: f32) -> bool {
        if !(radius > 0.0) || !world.is_finite() {
            return false;
        }
        let local = self.to_local(world);
        let (w, h) = (self.width as f32, self.height as f32);
        if local.x < -radius || local.x > w + radius || local.y < -radius || local.y > h + radius {
            return false;
        }

        // Cell math in f64 so erosion amounts are exact integers at the rim
        let (lx, ly, r) = (f64::from(local.x), f64::from(local.y), f64::from(radius));
        let min_x = (lx - r).floor().max(0.0) as usize;
        let max_x = (lx + r).ceil().min(self.width as f64 - 1.0);
        let min_y = (ly - r).floor().max(0.0) as usize;
        let max_y = (ly + r).ceil().min(self.height as f64 - 1.0);
        if max_x < 0.0 || max_y < 0.0 {
            return false;
        }
        let (max_x, max_y) = (max_x as usize, max_y as usize);

        let r2 = r * r;
        let mut changed = false;
        for py in min_y..=max_y {
            for px in min_x..=max_x {
                let dx = px as f64 - lx;
                let dy = py as f64 - ly;
                let d2 = dx * dx + dy * dy;
                if d2 > r2 {
                    continue;
                }
                let idx = py * self.width + px;
                let current = self.wear[idx];
                if current == 0 {
                    continue;
                }
                let dist = d2.sqrt() / r;
                let erosion = (IMPACT_STRENGTH * (1.0 - dist * IMPACT_FALLOFF)).floor() as u8;
                let mut next = current.saturating_sub(erosion);
                if next < SNAP_WEAR {
                    next = 0;
                }
                if next != current {
                    self.wear[idx] = next;
                    changed = true;
                }
            }
        }

        if changed {
            self.dirty = true;
            if self.state == WashState::Intact {
                self.state = WashState::Eroding;
            }
            self.recalc_wash();
        }
        changed
    }

    /// Recompute wash progress from the wear mask and latch the washed state
    pub fn recalc_wash(&mut self) {
        let erased = self
            .ink
            .iter()
            .zip(&self.wear)
            .filter(|&(&ink, &wear)| ink && wear < ERASED_WEAR)
            .count();
        self.wash_progress = (erased as f32 / self.ink_total as f32).min(1.0);

        if self.wash_progress >= WASH_THRESHOLD && self.state != WashState::Washed {
            self.state = WashState::Washed;
            self.wear.fill(0);
            self.dirty = true;
        }
    }

    #[inline]
    pub fn is_completely_washed(&self) -> bool {
        self.state == WashState::Washed
    }

    #[inline]
    pub fn state(&self) -> WashState {
        self.state
    }

    #[inline]
    pub fn wash_progress(&self) -> f32 {
        self.wash_progress
    }

    /// Axis-aligned hit box with tolerance; ignores rotation and wash state
    pub fn hit_test(&self, point: Vec2) -> bool {
        let d = (point - self.pos).abs();
        let half = self.half_size() + Vec2::splat(HIT_TOLERANCE);
        d.x < half.x && d.y < half.y
    }

    /// Remaining paint at a local cell (255 = intact)
    #[inline]
    pub fn wear_at(&self, x: usize, y: usize) -> u8 {
        self.wear[y * self.width + x]
    }

    /// Whole wear mask (row-major)
    #[inline]
    pub fn wear(&self) -> &[u8] {
        &self.wear
    }

    #[inline]
    pub fn is_ink(&self, x: usize, y: usize) -> bool {
        self.ink[y * self.width + x]
    }

    /// Number of ink cells used as the wash denominator
    #[inline]
    pub fn ink_total(&self) -> usize {
        self.ink_total
    }

    /// Drawn opacity of a local cell
    #[inline]
    pub fn cell_opacity(&self, x: usize, y: usize) -> u8 {
        let i = y * self.width + x;
        ((u16::from(self.alpha[i]) * u16::from(self.wear[i])) >> 8) as u8
    }

    /// Drawn opacity of every cell (row-major)
    pub fn opacity(&self) -> Vec<u8> {
        self.alpha
            .iter()
            .zip(&self.wear)
            .map(|(&a, &w)| ((u16::from(a) * u16::from(w)) >> 8) as u8)
            .collect()
    }

    /// Progress bar, shown only while actively washing
    pub fn progress_bar(&self) -> Option<ProgressBar> {
        if self.wash_progress <= PROGRESS_BAR_MIN || self.is_completely_washed() {
            return None;
        }
        let fill = (self.wash_progress / WASH_THRESHOLD).min(1.0);
        let band = if fill < 0.5 {
            ProgressBand::Low
        } else if fill < 0.85 {
            ProgressBand::Mid
        } else {
            ProgressBand::High
        };
        Some(ProgressBar { fill, band })
    }

    /// Return and clear the redraw flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Local bounding box of the ink cells `(min, max)`, inclusive
    pub fn ink_bounds(&self) -> Option<(Vec2, Vec2)> {
        let mut bounds: Option<(usize, usize, usize, usize)> = None;
        for (i, _) in self.ink.iter().enumerate().filter(|&(_, &ink)| ink) {
            let (x, y) = (i % self.width, i / self.width);
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
        bounds.map(|(x0, y0, x1, y1)| {
            (Vec2::new(x0 as f32, y0 as f32), Vec2::new(x1 as f32, y1 as f32))
        })
    }

    /// World positions of ink cells not yet erased, in raster order
    pub fn remaining_ink(&self) -> impl Iterator<Item = Vec2> + '_ {
        let washed = self.is_completely_washed();
        self.ink
            .iter()
            .zip(&self.wear)
            .enumerate()
            .filter(move |&(_, (&ink, &wear))| !washed && ink && wear >= ERASED_WEAR)
            .map(move |(i, _)| {
                let local = Vec2::new((i % self.width) as f32, (i / self.width) as f32);
                self.to_world(local)
            })
    }

    /// World position of the first ink cell not yet erased (raster order)
    pub fn first_remaining_ink(&self) -> Option<Vec2> {
        self.remaining_ink().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::glyph::BlockFont;
    use proptest::prelude::*;

    /// 20x10 raster with a solid 10x4 ink block at (5..15, 3..7)
    fn block_raster() -> GlyphRaster {
        let mut r = GlyphRaster::blank(20, 10);
        for y in 3..7 {
            for x in 5..15 {
                r.alpha[y * 20 + x] = 255;
            }
        }
        // Faint glow row that must not count as ink
        for x in 5..15 {
            r.alpha[2 * 20 + x] = 40;
        }
        r
    }

    fn block_surface() -> ErosionSurface {
        // Local origin at world (0, 0)
        ErosionSurface::from_raster("7", GraffitiColor::Lime, block_raster()).placed(Vec2::new(10.0, 5.0), 0.0)
    }

    #[test]
    fn test_construction_counts_ink() {
        let s = block_surface();
        assert_eq!(s.ink_total(), 40);
        assert!(!s.is_ink(6, 2));
        assert!(s.is_ink(6, 3));
        assert_eq!(s.state(), WashState::Intact);
        assert_eq!(s.wear_at(0, 0), WEAR_INTACT);
    }

    #[test]
    fn test_blank_raster_never_divides_by_zero() {
        let mut s = ErosionSurface::from_raster("", GraffitiColor::Yellow, GlyphRaster::blank(8, 8))
            .placed(Vec2::new(4.0, 4.0), 0.0);
        assert_eq!(s.ink_total(), 1);
        assert!(s.apply_impact(Vec2::new(4.0, 4.0), 5.0));
        assert_eq!(s.wash_progress(), 0.0);
        assert!(!s.is_completely_washed());
    }

    #[test]
    fn test_impact_erodes_by_distance() {
        let mut s = block_surface();
        assert!(s.apply_impact(Vec2::new(10.0, 5.0), 5.0));
        // Center: 255 - 150
        assert_eq!(s.wear_at(10, 5), 105);
        // Distance 3 -> d = 0.6, erosion floor(150 * 0.64) = 96
        assert_eq!(s.wear_at(13, 5), 255 - 96);
        // Rim at distance 5 -> erosion 60
        assert_eq!(s.wear_at(15, 5), 195);
        // Outside the circle
        assert_eq!(s.wear_at(16, 5), WEAR_INTACT);
        assert_eq!(s.state(), WashState::Eroding);
    }

    #[test]
    fn test_low_wear_snaps_to_zero() {
        // No ink, so the tile never washes and wear is observable
        let mut s = ErosionSurface::from_raster("", GraffitiColor::Lime, GlyphRaster::blank(20, 10))
            .placed(Vec2::new(10.0, 5.0), 0.0);
        let hit = Vec2::new(10.0, 5.0);
        s.apply_impact(hit, 5.0);
        assert_eq!(s.wear_at(15, 5), 195);
        // 105 - 150 saturates to 0
        s.apply_impact(hit, 5.0);
        assert_eq!(s.wear_at(10, 5), 0);
        assert_eq!(s.wear_at(15, 5), 135);
        s.apply_impact(hit, 5.0);
        assert_eq!(s.wear_at(15, 5), 75);
        // 75 - 60 = 15 snaps to 0
        s.apply_impact(hit, 5.0);
        assert_eq!(s.wear_at(15, 5), 0);
        // Everything in reach is gone; repeating is a no-op
        while s.apply_impact(hit, 5.0) {}
        let settled = s.wear().to_vec();
        assert!(!s.apply_impact(hit, 5.0));
        assert_eq!(s.wear(), &settled[..]);
    }

    #[test]
    fn test_far_impact_is_noop() {
        let mut s = block_surface();
        let before = s.opacity();
        assert!(!s.apply_impact(Vec2::new(100.0, 100.0), 10.0));
        assert!(!s.apply_impact(Vec2::new(-11.0, 5.0), 10.0));
        assert_eq!(s.opacity(), before);
        assert_eq!(s.wash_progress(), 0.0);
        assert_eq!(s.state(), WashState::Intact);
    }

    #[test]
    fn test_impact_just_outside_edge_still_reaches() {
        let mut s = block_surface();
        // Circle centered 3px left of the bitmap reaches column 0
        assert!(s.apply_impact(Vec2::new(-3.0, 5.0), 5.0));
        assert!(s.wear_at(0, 5) < WEAR_INTACT);
    }

    #[test]
    fn test_wash_latches_and_wipes() {
        let mut s = block_surface();
        for _ in 0..4 {
            s.apply_impact(Vec2::new(10.0, 5.0), 12.0);
        }
        assert!(s.is_completely_washed());
        assert_eq!(s.state(), WashState::Washed);
        assert!(s.wash_progress() >= WASH_THRESHOLD);
        assert!(s.opacity().iter().all(|&o| o == 0));
        assert!(s.wear().iter().all(|&w| w == 0));
        // Further impacts change nothing and the latch holds
        assert!(!s.apply_impact(Vec2::new(10.0, 5.0), 12.0));
        s.recalc_wash();
        assert!(s.is_completely_washed());
    }

    #[test]
    fn test_partial_wash_stays_unwashed() {
        let mut s = block_surface();
        // Two hits on the left edge erase only part of the block
        s.apply_impact(Vec2::new(5.0, 5.0), 3.0);
        s.apply_impact(Vec2::new(5.0, 5.0), 3.0);
        assert!(s.wash_progress() > 0.0);
        assert!(s.wash_progress() < WASH_THRESHOLD);
        assert!(!s.is_completely_washed());
    }

    #[test]
    fn test_hit_test_ignores_rotation_and_wash() {
        let mut s = ErosionSurface::new("42", GraffitiColor::Magenta, &BlockFont::default())
            .placed(Vec2::new(300.0, 200.0), 0.07);
        // Half extents 100x65 plus 20 tolerance
        assert!(s.hit_test(Vec2::new(419.0, 200.0)));
        assert!(!s.hit_test(Vec2::new(420.0, 200.0)));
        assert!(s.hit_test(Vec2::new(300.0, 284.0)));
        assert!(!s.hit_test(Vec2::new(300.0, 285.0)));
        for _ in 0..200 {
            if let Some(p) = s.first_remaining_ink() {
                s.apply_impact(p, 30.0);
            }
        }
        assert!(s.is_completely_washed());
        assert!(s.hit_test(Vec2::new(300.0, 200.0)));
    }

    #[test]
    fn test_progress_bar_visibility() {
        let mut s = block_surface();
        assert!(s.progress_bar().is_none());
        s.apply_impact(Vec2::new(5.0, 5.0), 3.0);
        s.apply_impact(Vec2::new(5.0, 5.0), 3.0);
        let bar = s.progress_bar().expect("bar while washing");
        assert!(bar.fill > 0.0 && bar.fill < 1.0);
        assert_eq!(bar.band, ProgressBand::Low);
    }

    #[test]
    fn test_dirty_flag() {
        let mut s = block_surface();
        assert!(s.take_dirty());
        assert!(!s.take_dirty());
        s.apply_impact(Vec2::new(10.0, 5.0), 2.0);
        assert!(s.take_dirty());
        s.apply_impact(Vec2::new(500.0, 5.0), 2.0);
        assert!(!s.take_dirty());
    }

    #[test]
    fn test_cell_opacity_scales_alpha_by_wear() {
        let mut s = block_surface();
        assert_eq!(s.cell_opacity(10, 5), 254);
        s.apply_impact(Vec2::new(10.0, 5.0), 5.0);
        assert_eq!(s.cell_opacity(10, 5), ((255u16 * 105) >> 8) as u8);
    }

    #[test]
    fn test_ink_bounds() {
        let s = block_surface();
        let (min, max) = s.ink_bounds().unwrap();
        assert_eq!(min, Vec2::new(5.0, 3.0));
        assert_eq!(max, Vec2::new(14.0, 6.0));
        assert_eq!(s.first_remaining_ink(), Some(Vec2::new(5.0, 3.0)));
    }

    proptest! {
        #[test]
        fn prop_impacts_never_add_paint(
            hits in prop::collection::vec((-30.0f32..50.0, -30.0f32..40.0, 1.0f32..15.0), 1..30)
        ) {
            let mut s = block_surface();
            let mut last_progress = s.wash_progress();
            let mut was_washed = false;
            for (x, y, r) in hits {
                let before = s.wear().to_vec();
                s.apply_impact(Vec2::new(x, y), r);
                let after = s.wear().to_vec();
                prop_assert!(before.iter().zip(&after).all(|(b, a)| a <= b));

                let p = s.wash_progress();
                prop_assert!((0.0..=1.0).contains(&p));
                prop_assert!(p >= last_progress);
                last_progress = p;

                if was_washed {
                    prop_assert!(s.is_completely_washed());
                }
                if s.is_completely_washed() {
                    prop_assert!(after.iter().all(|&w| w == 0));
                    was_washed = true;
                }
            }
        }
    }
}
