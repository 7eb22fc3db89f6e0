//! Trackball camera and scene pass for an interactive molecule viewer.
//!
//! A session starts from a borrowed [`Scene`] with [`initialize_session`],
//! input is fed through [`InteractionController::handle_event`], and each
//! frame is drawn by [`SceneRenderer::render_frame`] into any
//! [`RenderBackend`]. [`ViewLoop`] ties the three together once per frame.

pub mod camera;
pub mod config;
pub mod controller;
pub mod element;
pub mod error;
pub mod io;
pub mod render;
pub mod scene;
pub mod trackball;
pub mod view_loop;

pub use camera::{initialize_session, CameraState, InteractionMode, ViewerSession, Viewport};
pub use config::ViewerConfig;
pub use controller::{ControllerSettings, InputEvent, InteractionController, PointerButton};
pub use element::element_color;
pub use error::{Result, ViewerError};
pub use io::{load_scene, parse_pdb, parse_xyz, StructureFormat};
pub use render::{
    DrawCommand, Light, Material, RecordingBackend, RenderBackend, RenderSettings, SceneRenderer,
};
pub use scene::{Atom, Bond, Scene};
pub use view_loop::{EventQueue, EventSource, FramePacer, FrameReport, FrameTiming, ViewLoop};
