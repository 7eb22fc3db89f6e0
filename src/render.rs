//! Per-frame scene pass.
//!
//! [`SceneRenderer`] walks the camera state and scene and issues an ordered
//! stream of immediate-mode style calls to a [`RenderBackend`]: a transform
//! stack, one light, materials, spheres and lines. The GPU backend in the
//! binary turns that stream into instanced draws; [`RecordingBackend`] keeps
//! it for inspection.

use glam::{Mat4, Vec3, Vec4};
use log::trace;

use crate::camera::{CameraState, Viewport};
use crate::element::element_color;
use crate::error::Result;
use crate::scene::Scene;
use crate::trackball::rotation_matrix;

pub const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
pub const FIELD_OF_VIEW_DEGREES: f32 = 60.0;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 10_000.0;
pub const PULL_BACK: f32 = 70.0;
pub const ATOM_SHININESS: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    /// Homogeneous position, interpreted in the space current when the light
    /// is set.
    pub position: Vec4,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            ambient: [0.2, 0.2, 0.2, 1.0],
            diffuse: [0.2, 0.2, 0.2, 1.0],
            specular: [0.2, 0.2, 0.2, 1.0],
            position: Vec4::new(0.0, 0.0, 100.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub shininess: f32,
}

impl Material {
    pub fn for_element(atomic_number: u32) -> Self {
        let [r, g, b] = element_color(atomic_number);
        let color = [r, g, b, 1.0];
        Self {
            ambient: color,
            diffuse: color,
            shininess: ATOM_SHININESS,
        }
    }
}

/// Receiver of the draw stream. Transform calls post-multiply onto the top of
/// the stack, so later calls apply to geometry first.
pub trait RenderBackend {
    fn clear(&mut self, color: [f32; 4]);
    fn set_projection(&mut self, projection: Mat4);
    fn push_transform(&mut self);
    fn pop_transform(&mut self);
    fn translate(&mut self, offset: Vec3);
    fn scale(&mut self, factor: f32);
    fn multiply(&mut self, matrix: Mat4);
    fn set_light(&mut self, light: &Light);
    fn set_material(&mut self, material: &Material);
    fn draw_sphere(&mut self, radius: f32);
    fn draw_line(&mut self, from: Vec3, to: Vec3);
    fn present(&mut self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub pull_back: f32,
    pub clear_color: [f32; 4],
    pub light: Light,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            fov_y_degrees: FIELD_OF_VIEW_DEGREES,
            near: NEAR_PLANE,
            far: FAR_PLANE,
            pull_back: PULL_BACK,
            clear_color: CLEAR_COLOR,
            light: Light::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SceneRenderer {
    settings: RenderSettings,
}

impl SceneRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn projection(&self, viewport: Viewport) -> Mat4 {
        Mat4::perspective_rh(
            self.settings.fov_y_degrees.to_radians(),
            viewport.aspect(),
            self.settings.near,
            self.settings.far,
        )
    }

    /// Draws one frame: every atom in order, then every bond in order.
    ///
    /// Bonds are validated before anything is drawn, so a scene with a
    /// dangling bond produces no partial frame.
    pub fn render_frame<B: RenderBackend>(
        &self,
        state: &CameraState,
        scene: &Scene,
        viewport: Viewport,
        backend: &mut B,
    ) -> Result<()> {
        scene.validate_bonds()?;

        backend.clear(self.settings.clear_color);
        backend.set_projection(self.projection(viewport));

        backend.push_transform();
        backend.translate(Vec3::new(0.0, 0.0, -self.settings.pull_back));
        backend.scale(state.scale());
        backend.set_light(&self.settings.light);
        backend.multiply(rotation_matrix(state.orientation()));
        backend.translate(-state.origin());

        for atom in scene.atoms() {
            backend.push_transform();
            backend.translate(atom.position);
            backend.set_material(&Material::for_element(atom.atomic_number));
            backend.draw_sphere(atom.radius);
            backend.pop_transform();
        }

        let atoms = scene.atoms();
        for bond in scene.bonds() {
            backend.draw_line(atoms[bond.a].position, atoms[bond.b].position);
        }

        backend.pop_transform();
        trace!(
            "frame issued {} spheres and {} lines",
            scene.atom_count(),
            scene.bond_count()
        );
        backend.present()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear([f32; 4]),
    SetProjection(Mat4),
    PushTransform,
    PopTransform,
    Translate(Vec3),
    Scale(f32),
    Multiply(Mat4),
    SetLight(Light),
    SetMaterial(Material),
    Sphere(f32),
    Line(Vec3, Vec3),
    Present,
}

/// Backend that records every call instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    commands: Vec<DrawCommand>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn frames_presented(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Present))
            .count()
    }
}

impl RenderBackend for RecordingBackend {
    fn clear(&mut self, color: [f32; 4]) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn set_projection(&mut self, projection: Mat4) {
        self.commands.push(DrawCommand::SetProjection(projection));
    }

    fn push_transform(&mut self) {
        self.commands.push(DrawCommand::PushTransform);
    }

    fn pop_transform(&mut self) {
        self.commands.push(DrawCommand::PopTransform);
    }

    fn translate(&mut self, offset: Vec3) {
        self.commands.push(DrawCommand::Translate(offset));
    }

    fn scale(&mut self, factor: f32) {
        self.commands.push(DrawCommand::Scale(factor));
    }

    fn multiply(&mut self, matrix: Mat4) {
        self.commands.push(DrawCommand::Multiply(matrix));
    }

    fn set_light(&mut self, light: &Light) {
        self.commands.push(DrawCommand::SetLight(*light));
    }

    fn set_material(&mut self, material: &Material) {
        self.commands.push(DrawCommand::SetMaterial(*material));
    }

    fn draw_sphere(&mut self, radius: f32) {
        self.commands.push(DrawCommand::Sphere(radius));
    }

    fn draw_line(&mut self, from: Vec3, to: Vec3) {
        self.commands.push(DrawCommand::Line(from, to));
    }

    fn present(&mut self) -> Result<()> {
        self.commands.push(DrawCommand::Present);
        Ok(())
    }
}
