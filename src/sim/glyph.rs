//! Glyph rasterization for answer tiles
//!
//! Produces the opacity field an erosion surface derives its ink mask from.
//! The built-in [`BlockFont`] paints digits from a 5x7 bitmap font, with a
//! solid outline band around each stroke and a faint glow beyond it.

use crate::consts::{TILE_HEIGHT, TILE_WIDTH};

/// Per-cell opacity of rendered text (row-major, 0..=255)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphRaster {
    pub width: usize,
    pub height: usize,
    pub alpha: Vec<u8>,
}

impl GlyphRaster {
    /// Fully transparent raster
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            alpha: vec![0; width * height],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.alpha[y * self.width + x]
    }
}

/// Renders answer text into a tile-sized opacity field
pub trait GlyphRenderer: std::fmt::Debug {
    fn render(&self, text: &str, width: usize, height: usize) -> GlyphRaster;
}

/// 5x7 bitmap digits, MSB is the leftmost column
const DIGITS: [[u8; 7]; 10] = [
    [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
    [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
    [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
    [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
    [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
    [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
    [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
    [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
    [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
];

const FONT_COLS: usize = 5;
const FONT_ROWS: usize = 7;

/// Scaled bitmap-font renderer for digit strings
#[derive(Debug, Clone, Copy)]
pub struct BlockFont {
    /// Pixels per font cell
    pub scale: usize,
    /// Gap between characters (pixels)
    pub spacing: usize,
    /// Outline band width (pixels); outline is strong enough to count as ink
    pub outline: f32,
    /// Glow band width beyond the outline (pixels)
    pub glow: f32,
}

impl Default for BlockFont {
    fn default() -> Self {
        Self {
            scale: 8,
            spacing: 8,
            outline: 3.0,
            glow: 4.0,
        }
    }
}

const CORE_ALPHA: u8 = 255;
const OUTLINE_ALPHA: u8 = 220;
const GLOW_ALPHA_MAX: f32 = 72.0;

impl BlockFont {
    /// Filled font cells as pixel rects `(x0, y0, x1, y1)`, exclusive max
    fn stroke_rects(&self, text: &str, width: usize, height: usize) -> Vec<(i32, i32, i32, i32)> {
        let glyphs: Vec<&[u8; 7]> = text
            .chars()
            .filter_map(|c| c.to_digit(10).map(|d| &DIGITS[d as usize]))
            .collect();
        if glyphs.is_empty() {
            return Vec::new();
        }

        let s = self.scale as i32;
        let advance = (FONT_COLS * self.scale + self.spacing) as i32;
        let text_w = advance * glyphs.len() as i32 - self.spacing as i32;
        let text_h = (FONT_ROWS * self.scale) as i32;
        // Text sits slightly above center
        let left = (width as i32 - text_w) / 2;
        let top = (height as i32 / 2 - 5) - text_h / 2;

        let mut rects = Vec::new();
        for (i, rows) in glyphs.iter().enumerate() {
            let gx = left + advance * i as i32;
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..FONT_COLS {
                    if bits & (1 << (FONT_COLS - 1 - col)) != 0 {
                        let x0 = gx + col as i32 * s;
                        let y0 = top + row as i32 * s;
                        rects.push((x0, y0, x0 + s, y0 + s));
                    }
                }
            }
        }
        rects
    }

    fn alpha_at_distance(&self, dist: f32) -> u8 {
        if dist <= 0.0 {
            CORE_ALPHA
        } else if dist <= self.outline {
            OUTLINE_ALPHA
        } else if dist <= self.outline + self.glow {
            let t = (dist - self.outline) / self.glow;
            (GLOW_ALPHA_MAX * (1.0 - t)).round() as u8
        } else {
            0
        }
    }
}

impl GlyphRenderer for BlockFont {
    fn render(&self, text: &str, width: usize, height: usize) -> GlyphRaster {
        let mut raster = GlyphRaster::blank(width, height);
        let reach = (self.outline + self.glow).ceil() as i32;

        for (x0, y0, x1, y1) in self.stroke_rects(text, width, height) {
            let min_x = (x0 - reach).max(0);
            let max_x = (x1 + reach).min(width as i32);
            let min_y = (y0 - reach).max(0);
            let max_y = (y1 + reach).min(height as i32);

            for py in min_y..max_y {
                for px in min_x..max_x {
                    // Distance from the cell to the rect (0 inside)
                    let dx = (x0 - px).max(px - (x1 - 1)).max(0) as f32;
                    let dy = (y0 - py).max(py - (y1 - 1)).max(0) as f32;
                    let a = self.alpha_at_distance((dx * dx + dy * dy).sqrt());
                    let idx = py as usize * width + px as usize;
                    if a > raster.alpha[idx] {
                        raster.alpha[idx] = a;
                    }
                }
            }
        }
        raster
    }
}

/// Render with the default font at tile size
pub fn render_tile(renderer: &dyn GlyphRenderer, text: &str) -> GlyphRaster {
    renderer.render(text, TILE_WIDTH, TILE_HEIGHT)
}
