/// Model resource: the meshes and materials of one imported scene.
///
/// Loading goes file → `ImportedScene` (through a `SceneImporter`) →
/// materials → meshes. Meshes are uploaded as they are extracted. Meshes
/// and materials are owned together and released together.

use std::fmt;
use std::path::Path;

use crate::engine_err;
use crate::error::Result;
use crate::graphics_device::SharedGraphicsDevice;
use crate::import::{ImportFlags, ImportedNode, ImportedScene, SceneImporter};
use crate::render::RenderContext;
use crate::resource::{ComponentKind, Material, Mesh, Texture};

const SOURCE: &str = "ember3d::Model";

pub struct Model {
    meshes: Vec<Mesh>,
    materials: Vec<Material>,
    /// Bound for every component without a texture
    blank: Texture,
}

impl Model {
    /// Import `path` and build a model from it.
    ///
    /// The importer is asked to triangulate and to generate smooth normals
    /// and tangents; `flip_uv` additionally flips the V coordinate.
    ///
    /// # Errors
    ///
    /// `Import` if the importer fails, the scene is incomplete or has no
    /// root node. Mesh conversion and upload errors are propagated.
    pub fn load(
        graphics_device: &SharedGraphicsDevice,
        importer: &dyn SceneImporter,
        path: impl AsRef<Path>,
        flip_uv: bool,
    ) -> Result<Self> {
        let path = path.as_ref();

        let mut flags = ImportFlags::TRIANGULATE
            | ImportFlags::GEN_SMOOTH_NORMALS
            | ImportFlags::CALC_TANGENT_SPACE;
        if flip_uv {
            flags |= ImportFlags::FLIP_UVS;
        }

        let scene = importer.import(path, flags).map_err(|e| {
            engine_err!(SOURCE, Import, "Failed to import '{}': {}", path.display(), e)
        })?;

        if scene.is_incomplete() {
            return Err(engine_err!(SOURCE, Import, "Scene '{}' is incomplete", path.display()));
        }

        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let model = Self::from_scene(graphics_device, &scene, base_dir)?;

        crate::engine_info!(SOURCE, "Loaded '{}': {} meshes, {} materials",
            path.display(), model.mesh_count(), model.material_count());
        Ok(model)
    }

    /// Build a model from an already imported scene.
    ///
    /// Texture paths are resolved against `base_dir`. Meshes are collected
    /// by a pre-order walk of the node tree, children in declaration order.
    pub fn from_scene(
        graphics_device: &SharedGraphicsDevice,
        scene: &ImportedScene,
        base_dir: &Path,
    ) -> Result<Self> {
        let Some(root) = &scene.root else {
            return Err(engine_err!(SOURCE, Import, "Scene has no root node"));
        };

        let materials: Vec<Material> = scene
            .materials
            .iter()
            .map(|imported| Material::from_imported(graphics_device, imported, base_dir))
            .collect();

        let mut meshes = Vec::new();
        let mut pending: Vec<&ImportedNode> = vec![root];

        while let Some(node) = pending.pop() {
            for &mesh_index in &node.meshes {
                let Some(imported) = scene.meshes.get(mesh_index) else {
                    return Err(engine_err!(SOURCE, Import,
                        "Node '{}' references mesh {} ({} meshes in scene)",
                        node.name, mesh_index, scene.meshes.len()));
                };

                let mut mesh = Mesh::from_imported(imported)?;
                if let Some(material_id) = mesh.material_id() {
                    if material_id >= materials.len() {
                        crate::engine_warn!(SOURCE, "Mesh '{}' uses material {} ({} materials), drawing without material",
                            imported.name, material_id, materials.len());
                        mesh.clear_material_id();
                    }
                }
                mesh.upload(graphics_device)?;
                meshes.push(mesh);
            }

            // reversed so the first child is popped first
            pending.extend(node.children.iter().rev());
        }

        Ok(Self {
            meshes,
            materials,
            blank: Texture::blank(graphics_device)?,
        })
    }

    /// Draw every mesh with the active program.
    ///
    /// Each mesh binds its five material textures (or the blank texture) to
    /// the `diffuseTex`, `specularTex`, `normalTex`, `roughTex` and
    /// `emissionTex` samplers, starting from the slot that was free when
    /// `draw` was called, then issues one indexed draw.
    pub fn draw(&self, ctx: &mut RenderContext) -> Result<()> {
        let Some(program) = ctx.active_program() else {
            return Err(engine_err!(SOURCE, InvalidResource, "Cannot draw a model without an active program"));
        };

        let mark = ctx.next_texture_slot();
        for mesh in &self.meshes {
            ctx.rewind_texture_slots(mark);

            let material = mesh.material_id().and_then(|id| self.materials.get(id));
            for kind in ComponentKind::ALL {
                let texture = material
                    .and_then(|material| material[kind].texture.as_ref())
                    .unwrap_or(&self.blank);
                ctx.bind_program_texture(program, kind.sampler_name(), texture)?;
            }

            mesh.draw(ctx)?;
        }
        Ok(())
    }

    // ===== ACCESSORS =====

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("meshes", &self.meshes.len())
            .field("materials", &self.materials.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
