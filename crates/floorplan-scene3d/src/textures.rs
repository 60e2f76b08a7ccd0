//! Procedural textures for 3D materials.
//!
//! Textures are generated on the CPU as square RGBA images, once per kind and
//! resolution, and shared by every material that references them.

use floorplan_core::{Rgba, TextureResolution};
use kurbo::{CubicBez, ParamCurve, Point};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    Wood,
    Tile,
    Brick,
    Marble,
    Leather,
}

impl TextureKind {
    pub const ALL: [TextureKind; 5] = [
        TextureKind::Wood,
        TextureKind::Tile,
        TextureKind::Brick,
        TextureKind::Marble,
        TextureKind::Leather,
    ];

    fn seed(self) -> u32 {
        match self {
            TextureKind::Wood => 0x5eed_0001,
            TextureKind::Tile => 0x5eed_0002,
            TextureKind::Brick => 0x5eed_0003,
            TextureKind::Marble => 0x5eed_0004,
            TextureKind::Leather => 0x5eed_0005,
        }
    }
}

/// Simple xorshift RNG so textures are identical across runs.
struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Random float in range [0, 1]
    fn unit(&mut self) -> f64 {
        self.next_u32() as f64 / u32::MAX as f64
    }
}

/// A square, tileable RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProceduralTexture {
    kind: TextureKind,
    size: u32,
    data: Vec<u8>,
}

impl ProceduralTexture {
    /// Generate a texture of the given kind at `size`×`size` pixels.
    pub fn generate(kind: TextureKind, size: u32) -> Self {
        let mut tex = Self {
            kind,
            size,
            data: vec![0; (size as usize) * (size as usize) * 4],
        };
        let mut rng = SimpleRng::new(kind.seed());
        let s = size as f64;
        match kind {
            TextureKind::Wood => {
                tex.fill_rect(0.0, 0.0, s, s, Rgba::from_u32(0x8b5a2b));
                let grain = Rgba::new(0, 0, 0, 26);
                for _ in 0..100 {
                    let y = rng.unit() * s;
                    let h = rng.unit() * (s / 100.0);
                    tex.fill_rect(0.0, y, s, h, grain);
                }
            }
            TextureKind::Tile => {
                tex.fill_rect(0.0, 0.0, s, s, Rgba::from_u32(0xf0f0f0));
                let grout = Rgba::from_u32(0xcccccc);
                let step = s / 16.0;
                let mut i = 0.0;
                while i <= s {
                    tex.fill_rect(i, 0.0, 4.0, s, grout);
                    tex.fill_rect(0.0, i, s, 4.0, grout);
                    i += step;
                }
            }
            TextureKind::Brick => {
                tex.fill_rect(0.0, 0.0, s, s, Rgba::from_u32(0xa04040));
                let mortar_gap = 2.0;
                let brick = Rgba::from_u32(0x803030);
                let bh = s / 32.0;
                let bw = s / 16.0;
                for row in 0..32 {
                    let y = row as f64 * bh;
                    let mut x = if row % 2 == 0 { 0.0 } else { bw / 2.0 };
                    while x < s {
                        tex.fill_rect(x, y, bw - mortar_gap, bh - mortar_gap, brick);
                        x += bw;
                    }
                }
            }
            TextureKind::Marble => {
                tex.fill_rect(0.0, 0.0, s, s, Rgba::white());
                let vein = Rgba::from_u32(0xaaaaaa);
                for _ in 0..20 {
                    let mut p = || Point::new(rng.unit() * s, rng.unit() * s);
                    let curve = CubicBez::new(p(), p(), p(), p());
                    tex.stroke_curve(&curve, 2.0, vein);
                }
            }
            TextureKind::Leather => {
                tex.fill_rect(0.0, 0.0, s, s, Rgba::from_u32(0x3d2817));
                for px in tex.data.chunks_exact_mut(4) {
                    let noise = ((rng.unit() - 0.5) * 20.0) as i16;
                    for c in &mut px[..3] {
                        *c = (*c as i16 + noise).clamp(0, 255) as u8;
                    }
                }
            }
        }
        tex
    }

    pub fn kind(&self) -> TextureKind {
        self.kind
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// RGBA8 pixels, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size || y >= self.size {
            return None;
        }
        let i = ((y * self.size + x) * 4) as usize;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    fn blend(&mut self, x: u32, y: u32, color: Rgba) {
        let i = ((y * self.size + x) * 4) as usize;
        let a = color.a as u32;
        let src = [color.r, color.g, color.b];
        for (c, s) in self.data[i..i + 3].iter_mut().zip(src) {
            *c = ((s as u32 * a + *c as u32 * (255 - a)) / 255) as u8;
        }
        self.data[i + 3] = 255;
    }

    /// Fill the pixels whose centers fall inside the rectangle.
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let size = self.size as f64;
        let x0 = (x - 0.5).ceil().clamp(0.0, size) as u32;
        let x1 = (x + w - 0.5).ceil().clamp(0.0, size) as u32;
        let y0 = (y - 0.5).ceil().clamp(0.0, size) as u32;
        let y1 = (y + h - 0.5).ceil().clamp(0.0, size) as u32;
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, color);
            }
        }
    }

    fn stroke_curve(&mut self, curve: &CubicBez, width: f64, color: Rgba) {
        let steps = (self.size / 4).max(16);
        let half = width / 2.0;
        let mut last: Option<(i64, i64)> = None;
        for i in 0..=steps {
            let p = curve.eval(i as f64 / steps as f64);
            let cell = (p.x.floor() as i64, p.y.floor() as i64);
            if last == Some(cell) {
                continue;
            }
            last = Some(cell);
            self.fill_rect(p.x - half, p.y - half, width, width, color);
        }
    }
}

/// Lazily generated textures for one resolution.
#[derive(Debug, Default)]
pub struct TextureCache {
    size: u32,
    textures: HashMap<TextureKind, Arc<ProceduralTexture>>,
}

impl TextureCache {
    pub fn new(resolution: TextureResolution) -> Self {
        Self::with_size(resolution.pixels())
    }

    /// Cache producing textures of an explicit edge length.
    pub fn with_size(size: u32) -> Self {
        Self {
            size,
            textures: HashMap::new(),
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Texture of the given kind, generating it on first use.
    pub fn get(&mut self, kind: TextureKind) -> Arc<ProceduralTexture> {
        let size = self.size;
        self.textures
            .entry(kind)
            .or_insert_with(|| {
                log::debug!("Generating {kind:?} texture at {size}px");
                Arc::new(ProceduralTexture::generate(kind, size))
            })
            .clone()
    }

    /// Texture of the given kind if it has been generated.
    pub fn peek(&self, kind: TextureKind) -> Option<&Arc<ProceduralTexture>> {
        self.textures.get(&kind)
    }

    /// Switch resolution, dropping textures generated at the old one.
    pub fn set_resolution(&mut self, resolution: TextureResolution) {
        let size = resolution.pixels();
        if size != self.size {
            self.size = size;
            self.textures.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_deterministic() {
        let a = ProceduralTexture::generate(TextureKind::Marble, 64);
        let b = ProceduralTexture::generate(TextureKind::Marble, 64);
        assert_eq!(a, b);
        assert_eq!(a.data().len(), 64 * 64 * 4);
    }

    #[test]
    fn test_tile_has_grout_lines() {
        let tex = ProceduralTexture::generate(TextureKind::Tile, 128);
        assert_eq!(tex.pixel(0, 10), Some([0xcc, 0xcc, 0xcc, 255]));
        assert_eq!(tex.pixel(2, 2), Some([0xcc, 0xcc, 0xcc, 255]));
        assert_eq!(tex.pixel(6, 6), Some([0xf0, 0xf0, 0xf0, 255]));
    }

    #[test]
    fn test_brick_rows_are_staggered() {
        let tex = ProceduralTexture::generate(TextureKind::Brick, 256);
        // Row 0 starts at x=0, row 1 at half a brick.
        assert_eq!(tex.pixel(1, 1), Some([0x80, 0x30, 0x30, 255]));
        assert_eq!(tex.pixel(1, 9), Some([0xa0, 0x40, 0x40, 255]));
    }

    #[test]
    fn test_leather_noise_stays_near_base() {
        let tex = ProceduralTexture::generate(TextureKind::Leather, 32);
        for px in tex.data().chunks_exact(4) {
            assert!((px[0] as i16 - 0x3d).abs() <= 10);
            assert_eq!(px[3], 255);
        }
    }

    #[test]
    fn test_cache_regenerates_on_resolution_change() {
        let mut cache = TextureCache::with_size(32);
        let wood = cache.get(TextureKind::Wood);
        assert!(Arc::ptr_eq(&wood, &cache.get(TextureKind::Wood)));
        assert_eq!(cache.len(), 1);

        cache.set_resolution(TextureResolution::K2);
        assert!(cache.is_empty());
        assert_eq!(cache.size(), 1024);
    }
}
