/// Resource-level material type.
///
/// A material is five fixed components (diffuse, specular, normal,
/// roughness, emission). Each component carries an optional texture, a color
/// and a scalar factor. Components are addressed with `ComponentKind`, never
/// by position arithmetic.
///
/// Materials built from an imported scene upload their textures immediately;
/// a texture that fails to decode or upload is logged and the component
/// stays textureless.

use std::ops::{Index, IndexMut};
use std::path::Path;

use crate::graphics_device::SharedGraphicsDevice;
use crate::import::{ColorKey, ImportedMaterial, ScalarKey, TextureType};
use crate::resource::{Color, Texture};

const SOURCE: &str = "ember3d::Material";

// ===== COMPONENT KIND =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Diffuse,
    Specular,
    Normal,
    Roughness,
    Emission,
}

impl ComponentKind {
    /// Every kind, in component order
    pub const ALL: [ComponentKind; 5] = [
        ComponentKind::Diffuse,
        ComponentKind::Specular,
        ComponentKind::Normal,
        ComponentKind::Roughness,
        ComponentKind::Emission,
    ];

    pub fn index(self) -> usize {
        match self {
            ComponentKind::Diffuse => 0,
            ComponentKind::Specular => 1,
            ComponentKind::Normal => 2,
            ComponentKind::Roughness => 3,
            ComponentKind::Emission => 4,
        }
    }

    /// Sampler uniform the component texture is bound to when drawing
    pub fn sampler_name(self) -> &'static str {
        match self {
            ComponentKind::Diffuse => "diffuseTex",
            ComponentKind::Specular => "specularTex",
            ComponentKind::Normal => "normalTex",
            ComponentKind::Roughness => "roughTex",
            ComponentKind::Emission => "emissionTex",
        }
    }

    /// Imported texture type feeding this component
    pub fn texture_type(self) -> TextureType {
        match self {
            ComponentKind::Diffuse => TextureType::Diffuse,
            ComponentKind::Specular => TextureType::Specular,
            ComponentKind::Normal => TextureType::Normals,
            ComponentKind::Roughness => TextureType::DiffuseRoughness,
            ComponentKind::Emission => TextureType::EmissionColor,
        }
    }
}

// ===== COMPONENT =====

#[derive(Debug)]
pub struct MaterialComponent {
    pub texture: Option<Texture>,
    pub color: Color,
    pub factor: f32,
}

impl MaterialComponent {
    fn defaulted(kind: ComponentKind) -> Self {
        let color = match kind {
            ComponentKind::Specular | ComponentKind::Emission => Color::BLACK,
            _ => Color::WHITE,
        };
        Self {
            texture: None,
            color,
            factor: 1.0,
        }
    }
}

// ===== MATERIAL =====

#[derive(Debug)]
pub struct Material {
    components: [MaterialComponent; 5],
}

impl Material {
    /// Material without textures: white diffuse, black specular and
    /// emission, every factor 1
    pub fn new() -> Self {
        Self {
            components: ComponentKind::ALL.map(MaterialComponent::defaulted),
        }
    }

    pub fn with_color(mut self, kind: ComponentKind, color: Color) -> Self {
        self[kind].color = color;
        self
    }

    pub fn with_factor(mut self, kind: ComponentKind, factor: f32) -> Self {
        self[kind].factor = factor;
        self
    }

    pub fn with_texture(mut self, kind: ComponentKind, texture: Texture) -> Self {
        self[kind].texture = Some(texture);
        self
    }

    /// Build a material from an imported one.
    ///
    /// Diffuse, specular and emission colors come from the imported keys.
    /// The specular factor is the shininess and the roughness factor is
    /// `1 - reflectivity`. For each component only the first texture of its
    /// type is loaded, resolved against `base_dir`.
    pub fn from_imported(
        graphics_device: &SharedGraphicsDevice,
        imported: &ImportedMaterial,
        base_dir: &Path,
    ) -> Self {
        let mut material = Self::new();

        let colors = [
            (ComponentKind::Diffuse, ColorKey::Diffuse),
            (ComponentKind::Specular, ColorKey::Specular),
            (ComponentKind::Emission, ColorKey::Emissive),
        ];
        for (kind, key) in colors {
            if let Some(color) = imported.color(key) {
                material[kind].color = Color::from(color);
            }
        }

        material[ComponentKind::Specular].factor =
            imported.scalar(ScalarKey::Shininess).unwrap_or(0.0);
        material[ComponentKind::Roughness].factor =
            1.0 - imported.scalar(ScalarKey::Reflectivity).unwrap_or(0.0);

        for kind in ComponentKind::ALL {
            let Some(relative) = imported.texture(kind.texture_type(), 0) else {
                continue;
            };
            let path = base_dir.join(relative);
            match Texture::from_file(graphics_device, &path) {
                Ok(texture) => material[kind].texture = Some(texture),
                Err(e) => crate::engine_warn!(SOURCE,
                    "Material '{}': {:?} texture '{}' not loaded: {}",
                    imported.name, kind, path.display(), e),
            }
        }

        material
    }

    pub fn component(&self, kind: ComponentKind) -> &MaterialComponent {
        &self.components[kind.index()]
    }

    pub fn components(&self) -> &[MaterialComponent; 5] {
        &self.components
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<ComponentKind> for Material {
    type Output = MaterialComponent;

    fn index(&self, kind: ComponentKind) -> &MaterialComponent {
        &self.components[kind.index()]
    }
}

impl IndexMut<ComponentKind> for Material {
    fn index_mut(&mut self, kind: ComponentKind) -> &mut MaterialComponent {
        &mut self.components[kind.index()]
    }
}

#[cfg(test)]
#[path = "material_tests.rs"]
mod tests;
