mod gpu;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use log::{debug, error, info};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

use molview::{
    load_scene, EventQueue, FrameTiming, InputEvent, InteractionController, PointerButton,
    SceneRenderer, ViewLoop, ViewerConfig, ViewerError, ViewerSession, Viewport,
};

use crate::gpu::{GpuBackend, Overlay};

/// Interactive trackball viewer for small molecular structures.
#[derive(Debug, Parser)]
#[command(name = "molview", version, about)]
struct Cli {
    /// Structure file (.xyz, .pdb, .pqr or .pdbqt).
    structure: PathBuf,

    /// TOML file overriding the built-in viewer settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frame-rate cap; 0 disables it.
    #[arg(long)]
    target_fps: Option<u32>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run(Cli::parse()) {
        error!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), ViewerError> {
    let mut config = match &cli.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    if let Some(target_fps) = cli.target_fps {
        config.pacing.target_fps = target_fps;
    }

    let scene = load_scene(&cli.structure)?;
    info!(
        "loaded {} ({} atoms, {} bonds)",
        scene.name,
        scene.atom_count(),
        scene.bond_count()
    );
    let mut session = ViewerSession::new(&scene)?;

    let event_loop = EventLoop::new().map_err(|err| ViewerError::Gpu(err.to_string()))?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(format!("{} - {}", config.window.title, scene.name))
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.window.width,
                config.window.height,
            ))
            .build(&event_loop)
            .map_err(|err| ViewerError::Gpu(err.to_string()))?,
    );

    let mut backend = pollster::block_on(GpuBackend::new(window.clone(), &config.render))?;
    let egui_ctx = egui::Context::default();
    let mut egui_state = egui_winit::State::new(
        egui_ctx.clone(),
        egui_ctx.viewport_id(),
        &*window,
        Some(window.scale_factor() as f32),
        None,
    );

    let mut view_loop = ViewLoop::new(
        InteractionController::new(config.controller_settings()),
        SceneRenderer::new(config.render_settings()),
        FrameTiming::with_target_fps(config.pacing.target_fps),
    );
    let mut queue = EventQueue::new();
    let mut failure = None;

    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop
        .run(|event, target| match event {
            Event::WindowEvent { event, window_id } if window_id == window.id() => {
                let consumed = egui_state.on_window_event(&window, &event).consumed;
                match event {
                    WindowEvent::CloseRequested => queue.push(InputEvent::Quit),
                    WindowEvent::Resized(size) => {
                        backend.resize(size);
                        target.set_control_flow(control_flow_for(size));
                    }
                    WindowEvent::ScaleFactorChanged {
                        mut inner_size_writer,
                        ..
                    } => {
                        let new_size = window.inner_size();
                        let _ = inner_size_writer.request_inner_size(new_size);
                        backend.resize(new_size);
                        target.set_control_flow(control_flow_for(new_size));
                    }
                    WindowEvent::KeyboardInput { event, .. }
                        if !consumed
                            && event.state == ElementState::Pressed
                            && event.logical_key == Key::Named(NamedKey::Escape) =>
                    {
                        queue.push(InputEvent::Escape);
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        // Always tracked so a drag that crosses the HUD stays continuous.
                        queue.push(InputEvent::PointerMoved {
                            x: position.x as f32,
                            y: position.y as f32,
                        });
                    }
                    WindowEvent::MouseInput { state, button, .. } => {
                        if let Some(button) = pointer_button(button) {
                            match state {
                                ElementState::Pressed if !consumed => {
                                    queue.push(InputEvent::ButtonPressed(button));
                                }
                                ElementState::Pressed => {}
                                ElementState::Released => {
                                    queue.push(InputEvent::ButtonReleased(button));
                                }
                            }
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        let size = window.inner_size();
                        let viewport = match Viewport::new(size.width, size.height) {
                            Ok(viewport) => viewport,
                            Err(err) => {
                                debug!("skipping frame: {err}");
                                target.set_control_flow(ControlFlow::Wait);
                                return;
                            }
                        };

                        let raw_input = egui_state.take_egui_input(&window);
                        let fps = view_loop.pacer().fps();
                        let output = egui_ctx.run(raw_input, |ctx| draw_status(ctx, &session, fps));
                        egui_state.handle_platform_output(&window, output.platform_output);
                        let paint_jobs = egui_ctx.tessellate(output.shapes, output.pixels_per_point);
                        backend.set_overlay(Overlay {
                            paint_jobs,
                            textures_delta: output.textures_delta,
                            screen_descriptor: egui_wgpu::ScreenDescriptor {
                                size_in_pixels: [size.width, size.height],
                                pixels_per_point: output.pixels_per_point,
                            },
                        });

                        match view_loop.run_frame(&mut session, &mut queue, viewport, &mut backend)
                        {
                            Ok(report) if report.exit_requested => {
                                info!("exit requested");
                                target.exit();
                            }
                            Ok(_) => {}
                            Err(err) => {
                                failure = Some(err);
                                target.exit();
                            }
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                if target.control_flow() == ControlFlow::Poll {
                    window.request_redraw();
                }
            }
            _ => {}
        })
        .map_err(|err| ViewerError::Gpu(err.to_string()))?;

    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Redraw continuously while there is something to draw; sleep until the
/// next window event while minimized.
fn control_flow_for(size: PhysicalSize<u32>) -> ControlFlow {
    if Viewport::new(size.width, size.height).is_ok() {
        ControlFlow::Poll
    } else {
        ControlFlow::Wait
    }
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

fn draw_status(ctx: &egui::Context, session: &ViewerSession<'_>, fps: f32) {
    let scene = session.scene();
    let camera = &session.camera;
    egui::Window::new("molview")
        .default_pos(egui::pos2(10.0, 10.0))
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(format!("Structure: {}", scene.name));
            ui.label(format!("Atoms: {}", scene.atom_count()));
            ui.label(format!("Bonds: {}", scene.bond_count()));
            ui.separator();
            ui.label(format!("Scale: {:.3}", camera.scale()));
            ui.label(format!("Mode: {:?}", camera.mode()));
            ui.label(format!("FPS: {fps:.1}"));
            ui.separator();
            ui.label("Left drag: rotate");
            ui.label("Right drag: zoom");
            ui.label("Esc: quit");
        });
}
