//! Surface materials for 3D meshes.

use crate::textures::TextureKind;
use floorplan_core::{Material, RenderSettings, Rgba};

/// Named material presets used by the mesh factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    Wood,
    WoodDark,
    Concrete,
    White,
    Glass,
    Metal,
    Chrome,
    Fabric,
    Leather,
    Water,
    Ceramic,
    Marble,
    Brick,
    Tile,
    RoofTile,
    Grass,
    Asphalt,
    /// Plain surface in the element's own color.
    Solid(Rgba),
}

/// Resolved shading parameters for one material under given settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialParams {
    pub color: Rgba,
    pub roughness: f32,
    pub metalness: f32,
    /// Light passing through the surface, `0..=1`.
    pub transmission: f32,
    pub opacity: f32,
    pub transparent: bool,
    pub double_sided: bool,
    pub texture: Option<TextureKind>,
}

impl MaterialParams {
    const fn opaque(color: u32, roughness: f32, metalness: f32) -> Self {
        Self {
            color: Rgba::from_u32(color),
            roughness,
            metalness,
            transmission: 0.0,
            opacity: 1.0,
            transparent: false,
            double_sided: true,
            texture: None,
        }
    }

    const fn textured(mut self, texture: TextureKind) -> Self {
        self.texture = Some(texture);
        self
    }
}

/// Color used when an element carries none.
pub const DEFAULT_SOLID: Rgba = Rgba::from_u32(0xcccccc);

impl MaterialKind {
    /// Solid material from an optional element color.
    pub fn solid(color: Option<Rgba>) -> Self {
        MaterialKind::Solid(color.unwrap_or(DEFAULT_SOLID))
    }

    /// Preset for a material hint stored on an element.
    pub fn from_hint(hint: Material) -> Self {
        match hint {
            Material::Concrete | Material::AacBlock | Material::Stone | Material::Soil => {
                MaterialKind::Concrete
            }
            Material::Brick => MaterialKind::Brick,
            Material::Gypsum | Material::PlasticPvc | Material::PlasticUpvc => MaterialKind::White,
            Material::Glass => MaterialKind::Glass,
            Material::WoodTeak | Material::Plywood => MaterialKind::Wood,
            Material::WoodOak => MaterialKind::WoodDark,
            Material::TileVitrified => MaterialKind::Tile,
            Material::MarbleItalian | Material::Granite => MaterialKind::Marble,
            Material::Ceramic => MaterialKind::Ceramic,
            Material::FabricVelvet | Material::FabricCotton => MaterialKind::Fabric,
            Material::Leather => MaterialKind::Leather,
            Material::MetalSteel | Material::MetalAlum => MaterialKind::Metal,
            Material::MetalBrass => MaterialKind::Chrome,
            Material::Water => MaterialKind::Water,
            Material::Grass => MaterialKind::Grass,
            Material::Asphalt => MaterialKind::Asphalt,
        }
    }

    /// Shading parameters, adjusted for the active render settings.
    ///
    /// With PBR off every surface is fully rough and non-metallic. With glass
    /// transparency off, glass and water render as opaque tinted panes.
    pub fn params(self, settings: &RenderSettings) -> MaterialParams {
        let mut params = match self {
            MaterialKind::Wood => {
                MaterialParams::opaque(0x8b5a2b, 0.6, 0.1).textured(TextureKind::Wood)
            }
            MaterialKind::WoodDark => MaterialParams::opaque(0x5c4033, 0.7, 0.1),
            MaterialKind::Concrete => MaterialParams::opaque(0xaaaaaa, 0.9, 0.1),
            MaterialKind::White => MaterialParams::opaque(0xffffff, 0.5, 0.1),
            MaterialKind::Glass => MaterialParams {
                transmission: 0.95,
                opacity: 0.3,
                transparent: true,
                ..MaterialParams::opaque(0xffffff, 0.0, 0.0)
            },
            MaterialKind::Metal => MaterialParams::opaque(0xcccccc, 0.2, 0.8),
            MaterialKind::Chrome => MaterialParams::opaque(0xffffff, 0.1, 1.0),
            MaterialKind::Fabric => MaterialParams::opaque(0x606080, 1.0, 0.0),
            MaterialKind::Leather => {
                MaterialParams::opaque(0x3d2817, 0.4, 0.0).textured(TextureKind::Leather)
            }
            MaterialKind::Water => MaterialParams {
                transmission: 0.9,
                ..MaterialParams::opaque(0x00aaff, 0.1, 0.0)
            },
            MaterialKind::Ceramic => MaterialParams::opaque(0xffffff, 0.1, 0.0),
            MaterialKind::Marble => {
                MaterialParams::opaque(0xffffff, 0.1, 0.0).textured(TextureKind::Marble)
            }
            MaterialKind::Brick => {
                MaterialParams::opaque(0xa04040, 0.9, 0.0).textured(TextureKind::Brick)
            }
            MaterialKind::Tile => {
                MaterialParams::opaque(0xf0f0f0, 0.3, 0.0).textured(TextureKind::Tile)
            }
            MaterialKind::RoofTile => MaterialParams::opaque(0x9c4a32, 0.8, 0.0),
            MaterialKind::Grass => MaterialParams::opaque(0x3f7d3a, 1.0, 0.0),
            MaterialKind::Asphalt => MaterialParams::opaque(0x333333, 0.95, 0.0),
            MaterialKind::Solid(color) => MaterialParams::opaque(color.to_u32(), 0.5, 0.0),
        };

        if !settings.pbr {
            params.roughness = 1.0;
            params.metalness = 0.0;
        }
        if !settings.glass_transparency && params.transmission > 0.0 {
            params.transmission = 0.0;
            params.opacity = 1.0;
            params.transparent = false;
        }
        params
    }
}
