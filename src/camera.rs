use glam::{Quat, Vec2, Vec3};
use log::debug;

use crate::error::{Result, ViewerError};
use crate::scene::Scene;

/// Framebuffer size in physical pixels. Both dimensions are non-zero, so
/// normalized-coordinate math and aspect ratios never divide by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ViewerError::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(self) -> u32 {
        self.width
    }

    pub fn height(self) -> u32 {
        self.height
    }

    pub fn aspect(self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    Idle,
    Rotating,
    Zooming,
    RotatingAndZooming,
}

/// Camera orientation, zoom and pivot for one viewing session.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraState {
    pub(crate) orientation: Quat,
    pub(crate) scale: f32,
    pub(crate) origin: Vec3,
    pub(crate) rotating: bool,
    pub(crate) zooming: bool,
    pub(crate) last_cursor: Vec2,
    pub(crate) should_exit: bool,
}

impl CameraState {
    /// Identity orientation and unit scale around `origin`.
    pub fn new(origin: Vec3) -> Self {
        Self {
            orientation: Quat::IDENTITY,
            scale: 1.0,
            origin,
            rotating: false,
            zooming: false,
            last_cursor: Vec2::ZERO,
            should_exit: false,
        }
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn last_cursor(&self) -> Vec2 {
        self.last_cursor
    }

    pub fn is_rotating(&self) -> bool {
        self.rotating
    }

    pub fn is_zooming(&self) -> bool {
        self.zooming
    }

    pub fn mode(&self) -> InteractionMode {
        match (self.rotating, self.zooming) {
            (false, false) => InteractionMode::Idle,
            (true, false) => InteractionMode::Rotating,
            (false, true) => InteractionMode::Zooming,
            (true, true) => InteractionMode::RotatingAndZooming,
        }
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }
}

/// Starts a viewing session: the camera pivots around the centroid of the
/// scene, with no rotation and unit scale.
pub fn initialize_session(scene: &Scene) -> Result<CameraState> {
    scene.validate_bonds()?;
    let origin = scene.centroid()?;
    debug!(
        "session started for {:?}: {} atoms, {} bonds, origin {origin}",
        scene.name,
        scene.atom_count(),
        scene.bond_count()
    );
    Ok(CameraState::new(origin))
}

/// A camera bound to a scene it borrows but does not own.
#[derive(Debug)]
pub struct ViewerSession<'a> {
    scene: &'a Scene,
    pub camera: CameraState,
}

impl<'a> ViewerSession<'a> {
    pub fn new(scene: &'a Scene) -> Result<Self> {
        let camera = initialize_session(scene)?;
        Ok(Self { scene, camera })
    }

    pub fn scene(&self) -> &'a Scene {
        self.scene
    }

    pub fn should_exit(&self) -> bool {
        self.camera.should_exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Atom, Bond};

    #[test]
    fn viewport_rejects_zero_dimensions() {
        assert!(matches!(
            Viewport::new(0, 600),
            Err(ViewerError::InvalidViewport {
                width: 0,
                height: 600
            })
        ));
        assert!(Viewport::new(800, 0).is_err());
        let viewport = Viewport::new(800, 400).unwrap();
        assert_eq!(viewport.aspect(), 2.0);
    }

    #[test]
    fn session_starts_at_centroid_with_identity() {
        let scene = Scene::from_parts(
            "hydroxyl",
            vec![
                Atom::new(Vec3::ZERO, 1, 0.3),
                Atom::new(Vec3::new(1.0, 0.0, 0.0), 8, 0.6),
            ],
            vec![Bond::new(0, 1)],
        );
        let camera = initialize_session(&scene).unwrap();
        assert_eq!(camera.origin(), Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(camera.orientation(), Quat::IDENTITY);
        assert_eq!(camera.scale(), 1.0);
        assert_eq!(camera.mode(), InteractionMode::Idle);
        assert!(!camera.should_exit());
    }

    #[test]
    fn session_rejects_empty_scene() {
        let scene = Scene::new("empty");
        assert!(matches!(
            initialize_session(&scene),
            Err(ViewerError::InvalidScene(_))
        ));
    }

    #[test]
    fn session_rejects_dangling_bond() {
        let scene = Scene::from_parts(
            "dangling",
            vec![Atom::new(Vec3::ZERO, 6, 0.7)],
            vec![Bond::new(0, 1)],
        );
        assert!(ViewerSession::new(&scene).is_err());
    }

    #[test]
    fn mode_reflects_both_buttons() {
        let mut camera = CameraState::new(Vec3::ZERO);
        camera.rotating = true;
        assert_eq!(camera.mode(), InteractionMode::Rotating);
        camera.zooming = true;
        assert_eq!(camera.mode(), InteractionMode::RotatingAndZooming);
        camera.rotating = false;
        assert_eq!(camera.mode(), InteractionMode::Zooming);
    }
}
