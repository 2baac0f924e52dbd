#![forbid(unsafe_code)]

//! Deterministic pseudo code image.
//!
//! A 25×25 grid of on/off modules derived from a string seed. It only has to
//! look like a scannable code and be identical for identical seeds.

/// Modules per side.
pub const GRID: usize = 25;

/// Background color, `#020617`.
pub const BACKGROUND: [u8; 4] = [0x02, 0x06, 0x17, 0xff];
/// Module color, `#f9fafb`.
pub const FOREGROUND: [u8; 4] = [0xf9, 0xfa, 0xfb, 0xff];

/// The module grid for one seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeImage {
    modules: [[bool; GRID]; GRID],
}

/// `h = h * 31 + byte` over the seed bytes, wrapping at 32 bits.
#[must_use]
pub fn seed_hash(seed: &str) -> u32 {
    seed.bytes()
        .fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(u32::from(b)))
}

impl CodeImage {
    #[must_use]
    pub fn new(seed: &str) -> Self {
        let hash = seed_hash(seed);
        let mut modules = [[false; GRID]; GRID];
        for (y, row) in modules.iter_mut().enumerate() {
            for (x, module) in row.iter_mut().enumerate() {
                let v = hash
                    .wrapping_add((x as u32).wrapping_mul(374_761_393))
                    .wrapping_add((y as u32).wrapping_mul(668_265_263));
                *module = (v & 7) > 2;
            }
        }
        Self { modules }
    }

    #[must_use]
    pub fn is_on(&self, x: usize, y: usize) -> bool {
        self.modules
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(false)
    }

    /// Rows of modules, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool; GRID]> {
        self.modules.iter()
    }

    /// Number of modules that are on.
    #[must_use]
    pub fn lit(&self) -> usize {
        self.modules.iter().flatten().filter(|on| **on).count()
    }

    /// Rasterize to a `size`×`size` RGBA buffer, row-major. Each module is
    /// inset by one pixel on every side.
    #[must_use]
    pub fn paint(&self, size: usize) -> Vec<u8> {
        let mut pixels = BACKGROUND.repeat(size * size);
        let cell = size as f64 / GRID as f64;
        for (my, row) in self.modules.iter().enumerate() {
            for (mx, on) in row.iter().enumerate() {
                if !on {
                    continue;
                }
                let x0 = (mx as f64 * cell + 1.0).round() as usize;
                let y0 = (my as f64 * cell + 1.0).round() as usize;
                let x1 = ((mx + 1) as f64 * cell - 1.0).round().max(0.0) as usize;
                let y1 = ((my + 1) as f64 * cell - 1.0).round().max(0.0) as usize;
                for py in y0..y1.min(size) {
                    for px in x0..x1.min(size) {
                        let at = (py * size + px) * 4;
                        pixels[at..at + 4].copy_from_slice(&FOREGROUND);
                    }
                }
            }
        }
        pixels
    }
}
