use std::collections::VecDeque;
use std::time::{Duration, Instant};

use log::trace;

use crate::camera::{Viewport, ViewerSession};
use crate::controller::{InputEvent, InteractionController};
use crate::error::Result;
use crate::render::{RenderBackend, SceneRenderer};

/// Non-blocking source of input events. An empty batch is not an error.
pub trait EventSource {
    fn poll_events(&mut self) -> Vec<InputEvent>;
}

/// FIFO buffer filled by the windowing layer and drained once per frame.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    pending: VecDeque<InputEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.pending.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl EventSource for EventQueue {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        self.pending.drain(..).collect()
    }
}

/// Decides how long to wait between frames.
pub trait FramePacer {
    /// Called once after each frame has been presented.
    fn end_frame(&mut self);
}

/// Frame timing with FPS smoothing and an optional frame-rate cap.
#[derive(Debug, Clone)]
pub struct FrameTiming {
    /// Minimum frame duration; `None` renders as fast as possible.
    target_frame: Option<Duration>,
    frame_start: Instant,
    smoothed_fps: f32,
    /// Weight of the newest sample in the moving average.
    smoothing: f32,
}

impl FrameTiming {
    pub fn unlimited() -> Self {
        Self::with_frame_duration(None)
    }

    /// Caps the frame rate; 0 means unlimited.
    pub fn with_target_fps(target_fps: u32) -> Self {
        if target_fps == 0 {
            return Self::unlimited();
        }
        Self::with_frame_duration(Some(Duration::from_secs(1) / target_fps))
    }

    pub fn with_frame_duration(target_frame: Option<Duration>) -> Self {
        Self {
            target_frame,
            frame_start: Instant::now(),
            smoothed_fps: 0.0,
            smoothing: 0.1,
        }
    }

    pub fn target_frame(&self) -> Option<Duration> {
        self.target_frame
    }

    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Time left before the next frame is due.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.target_frame {
            Some(target) => target.saturating_sub(now.duration_since(self.frame_start)),
            None => Duration::ZERO,
        }
    }

    fn record_frame(&mut self, now: Instant) {
        let frame_seconds = now.duration_since(self.frame_start).as_secs_f32();
        self.frame_start = now;
        if frame_seconds > 0.0 {
            let fps = 1.0 / frame_seconds;
            self.smoothed_fps = if self.smoothed_fps == 0.0 {
                fps
            } else {
                self.smoothed_fps * (1.0 - self.smoothing) + fps * self.smoothing
            };
        }
    }
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl FramePacer for FrameTiming {
    fn end_frame(&mut self) {
        let wait = self.remaining(Instant::now());
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }
        self.record_frame(Instant::now());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub events_handled: usize,
    pub exit_requested: bool,
}

/// Drives one session frame at a time: drain input, update the camera,
/// render once, pace. Stopping is left to the caller.
#[derive(Debug, Clone)]
pub struct ViewLoop<P = FrameTiming> {
    controller: InteractionController,
    renderer: SceneRenderer,
    pacer: P,
}

impl<P: FramePacer> ViewLoop<P> {
    pub fn new(controller: InteractionController, renderer: SceneRenderer, pacer: P) -> Self {
        Self {
            controller,
            renderer,
            pacer,
        }
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn renderer(&self) -> &SceneRenderer {
        &self.renderer
    }

    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    pub fn run_frame<S, B>(
        &mut self,
        session: &mut ViewerSession<'_>,
        source: &mut S,
        viewport: Viewport,
        backend: &mut B,
    ) -> Result<FrameReport>
    where
        S: EventSource,
        B: RenderBackend,
    {
        let events = source.poll_events();
        for event in &events {
            self.controller
                .handle_event(&mut session.camera, *event, viewport);
        }

        self.renderer
            .render_frame(&session.camera, session.scene(), viewport, backend)?;
        self.pacer.end_frame();

        trace!("frame handled {} events", events.len());
        Ok(FrameReport {
            events_handled: events.len(),
            exit_requested: session.should_exit(),
        })
    }
}

#[cfg(test)]
mod tests {
    use glam::{Quat, Vec3};

    use super::*;
    use crate::controller::PointerButton;
    use crate::render::{DrawCommand, RecordingBackend};
    use crate::scene::{Atom, Bond, Scene};

    #[derive(Debug, Default)]
    struct CountingPacer {
        frames: usize,
    }

    impl FramePacer for CountingPacer {
        fn end_frame(&mut self) {
            self.frames += 1;
        }
    }

    fn hydroxyl() -> Scene {
        Scene::from_parts(
            "hydroxyl",
            vec![
                Atom::new(Vec3::ZERO, 1, 0.3),
                Atom::new(Vec3::new(1.0, 0.0, 0.0), 8, 0.6),
            ],
            vec![Bond::new(0, 1)],
        )
    }

    fn view_loop() -> ViewLoop<CountingPacer> {
        ViewLoop::new(
            InteractionController::default(),
            SceneRenderer::default(),
            CountingPacer::default(),
        )
    }

    fn viewport() -> Viewport {
        Viewport::new(800, 600).unwrap()
    }

    #[test]
    fn queue_drains_in_arrival_order() {
        let mut queue = EventQueue::new();
        queue.push(InputEvent::ButtonPressed(PointerButton::Primary));
        queue.push(InputEvent::PointerMoved { x: 1.0, y: 2.0 });
        assert_eq!(queue.len(), 2);
        assert_eq!(
            queue.poll_events(),
            vec![
                InputEvent::ButtonPressed(PointerButton::Primary),
                InputEvent::PointerMoved { x: 1.0, y: 2.0 },
            ]
        );
        assert!(queue.is_empty());
        assert!(queue.poll_events().is_empty());
    }

    #[test]
    fn frame_without_events_still_renders_once() {
        let scene = hydroxyl();
        let mut session = ViewerSession::new(&scene).unwrap();
        let mut queue = EventQueue::new();
        let mut backend = RecordingBackend::new();
        let mut view_loop = view_loop();

        let report = view_loop
            .run_frame(&mut session, &mut queue, viewport(), &mut backend)
            .unwrap();
        assert_eq!(report.events_handled, 0);
        assert!(!report.exit_requested);
        assert_eq!(backend.frames_presented(), 1);
        assert_eq!(view_loop.pacer().frames, 1);
    }

    #[test]
    fn batch_is_applied_before_the_single_render() {
        let scene = hydroxyl();
        let mut session = ViewerSession::new(&scene).unwrap();
        let mut queue = EventQueue::new();
        queue.push(InputEvent::PointerMoved { x: 400.0, y: 100.0 });
        queue.push(InputEvent::ButtonPressed(PointerButton::Secondary));
        queue.push(InputEvent::PointerMoved { x: 400.0, y: 400.0 });
        let mut backend = RecordingBackend::new();

        let report = view_loop()
            .run_frame(&mut session, &mut queue, viewport(), &mut backend)
            .unwrap();
        assert_eq!(report.events_handled, 3);
        assert!((session.camera.scale() - 1.5).abs() < 1e-6);
        assert_eq!(backend.frames_presented(), 1);
        assert!(backend
            .commands()
            .contains(&DrawCommand::Scale(session.camera.scale())));
    }

    #[test]
    fn exit_is_reported_but_frame_completes() {
        let scene = hydroxyl();
        let mut session = ViewerSession::new(&scene).unwrap();
        let mut queue = EventQueue::new();
        queue.push(InputEvent::Escape);
        let mut backend = RecordingBackend::new();

        let report = view_loop()
            .run_frame(&mut session, &mut queue, viewport(), &mut backend)
            .unwrap();
        assert!(report.exit_requested);
        assert!(session.should_exit());
        assert_eq!(backend.frames_presented(), 1);
    }

    #[test]
    fn end_to_end_session() {
        let scene = hydroxyl();
        let mut session = ViewerSession::new(&scene).unwrap();
        assert_eq!(session.camera.origin(), Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(session.camera.orientation(), Quat::IDENTITY);
        assert_eq!(session.camera.scale(), 1.0);

        let mut view_loop = view_loop();
        let mut backend = RecordingBackend::new();
        let mut queue = EventQueue::new();
        queue.push(InputEvent::PointerMoved { x: 200.0, y: 200.0 });
        queue.push(InputEvent::ButtonPressed(PointerButton::Primary));
        queue.push(InputEvent::PointerMoved { x: 200.0, y: 200.0 });
        queue.push(InputEvent::ButtonReleased(PointerButton::Primary));
        view_loop
            .run_frame(&mut session, &mut queue, viewport(), &mut backend)
            .unwrap();
        assert_eq!(session.camera.orientation(), Quat::IDENTITY);

        queue.push(InputEvent::ButtonPressed(PointerButton::Secondary));
        queue.push(InputEvent::PointerMoved { x: 200.0, y: 500.0 });
        queue.push(InputEvent::ButtonReleased(PointerButton::Secondary));
        view_loop
            .run_frame(&mut session, &mut queue, viewport(), &mut backend)
            .unwrap();
        assert!((session.camera.scale() - 1.5).abs() < 1e-6);
        assert_eq!(view_loop.pacer().frames, 2);
        assert_eq!(backend.frames_presented(), 2);
    }

    #[test]
    fn frame_timing_caps_rate() {
        let timing = FrameTiming::with_target_fps(50);
        assert_eq!(timing.target_frame(), Some(Duration::from_millis(20)));
        assert!(timing.remaining(Instant::now()) <= Duration::from_millis(20));
        assert_eq!(FrameTiming::with_target_fps(0).target_frame(), None);
        assert_eq!(
            FrameTiming::unlimited().remaining(Instant::now()),
            Duration::ZERO
        );
    }

    #[test]
    fn frame_timing_waits_out_the_interval() {
        let mut timing = FrameTiming::with_frame_duration(Some(Duration::from_millis(10)));
        let start = Instant::now();
        timing.end_frame();
        timing.end_frame();
        assert!(start.elapsed() >= Duration::from_millis(10));
        assert!(timing.fps() > 0.0);
    }
}
