//! Render passes and lights derived from the render settings.

use floorplan_core::{RenderSettings, Rgba};
use glam::Vec3;

/// One stage of the post-processing chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderPass {
    /// Plain scene render. Always first.
    Scene,
    /// Screen-space ambient occlusion.
    Ssao {
        kernel_radius: f32,
        min_distance: f32,
        max_distance: f32,
    },
    Bloom {
        strength: f32,
        radius: f32,
        threshold: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Sky/ground ambient fill.
    Hemisphere {
        sky: Rgba,
        ground: Rgba,
        intensity: f32,
    },
    /// Sun.
    Directional {
        color: Rgba,
        intensity: f32,
        position: Vec3,
        cast_shadow: bool,
        shadow_map_size: u32,
        shadow_bias: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToneMapping {
    #[default]
    AcesFilmic,
}

pub const BACKGROUND: Rgba = Rgba::from_u32(0x0f172a);
pub const SHADOW_MAP_SIZE: u32 = 4096;

/// Frame description handed to a scene backend.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPipeline {
    pub passes: Vec<RenderPass>,
    pub lights: Vec<Light>,
    pub background: Rgba,
    pub tone_mapping: ToneMapping,
    pub exposure: f32,
    pub shadows: bool,
    /// Edge length of procedural textures.
    pub texture_size: u32,
}

impl RenderPipeline {
    pub fn from_settings(settings: &RenderSettings) -> Self {
        let mut passes = vec![RenderPass::Scene];
        if settings.ambient_occlusion {
            passes.push(RenderPass::Ssao {
                kernel_radius: 16.0,
                min_distance: 0.005,
                max_distance: 0.1,
            });
        }
        if settings.bloom {
            passes.push(RenderPass::Bloom {
                strength: 0.3,
                radius: 0.5,
                threshold: 0.5,
            });
        }

        let mut lights = Vec::with_capacity(2);
        if settings.environment {
            lights.push(Light::Hemisphere {
                sky: Rgba::from_u32(0xddeeff),
                ground: Rgba::from_u32(0x0f0e0d),
                intensity: 0.3,
            });
        }
        lights.push(Light::Directional {
            color: Rgba::from_u32(0xfffaed),
            intensity: 1.5,
            position: Vec3::new(1000.0, 1500.0, 1000.0),
            cast_shadow: settings.shadows,
            shadow_map_size: SHADOW_MAP_SIZE,
            shadow_bias: -0.0001,
        });

        Self {
            passes,
            lights,
            background: BACKGROUND,
            tone_mapping: ToneMapping::AcesFilmic,
            exposure: 1.0,
            shadows: settings.shadows,
            texture_size: settings.texture_resolution.pixels(),
        }
    }

    pub fn has_pass(&self, matches: impl Fn(&RenderPass) -> bool) -> bool {
        self.passes.iter().any(matches)
    }
}
