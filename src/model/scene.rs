use glam::{Vec3, Vec4};

use crate::config::DemoConfig;
use crate::utils::Mesh;

/// Solid-colored mesh
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub mesh: Mesh,
    pub diffuse: Vec4,
}

#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    pub color: Vec3,
    pub direction: Vec3,
}

#[derive(Debug, Clone, Copy)]
pub struct Environment {
    pub ambient: Vec4,
    pub sun: DirectionalLight,
}

impl Environment {
    pub fn from_config(config: &DemoConfig) -> Self {
        Self {
            ambient: config.ambient_light,
            sun: DirectionalLight {
                color: config.sun_color,
                direction: config.sun_direction.normalize_or_zero(),
            },
        }
    }
}

/// Static geometry, built once at startup
#[derive(Debug, Clone)]
pub struct SceneGeometry {
    pub block: SceneObject,
    pub floor: SceneObject,
}

impl SceneGeometry {
    pub fn from_config(config: &DemoConfig) -> Self {
        Self {
            block: SceneObject {
                mesh: Mesh::cuboid(config.block_size),
                diffuse: config.block_color,
            },
            floor: SceneObject {
                mesh: Mesh::cuboid(config.floor_size),
                diffuse: config.floor_color,
            },
        }
    }
}
