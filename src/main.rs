//! Freqbars - a scrolling bar-graph visualizer driven by a synthetic signal.
//!
//! Hold the left mouse button to push the amplitude envelope up; release
//! to let the bars shrink back and fade out as they drift left.

mod bars;
mod params;
mod rendering;
mod signal;

use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Icon, Window, WindowId},
};

use bars::Visualizer;
use params::*;
use rendering::RenderSystem;
use signal::SignalSource;

/// Icon file loaded at startup when present; absence is ignored
const ICON_PATH: &str = "icon.png";

/// A resize waiting out the debounce period before it resets the bar field
struct PendingResize {
    width: u32,
    height: u32,
    deadline: Instant,
}

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Animation state
    visualizer: Visualizer,

    // Configuration
    timing: TimingConfig,
    window_config: WindowConfig,

    // Scheduling
    next_tick: Instant,
    pending_resize: Option<PendingResize>,
}

impl App {
    fn new() -> Self {
        let timing = TimingConfig::default();
        let window_config = WindowConfig::default();

        let signal = SignalSource::new(&SignalParams::default());
        let visualizer = Visualizer::new(
            window_config.width as f32,
            window_config.height as f32,
            LayoutParams::default(),
            BarDynamics::default(),
            AmplitudeParams::default(),
            signal,
        );

        Self {
            window: None,
            render_system: None,
            visualizer,
            timing,
            window_config,
            next_tick: Instant::now(),
            pending_resize: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        // Create window
        let window_attributes = Window::default_attributes()
            .with_title(self.window_config.title)
            .with_inner_size(LogicalSize::new(
                self.window_config.width,
                self.window_config.height,
            ))
            .with_min_inner_size(LogicalSize::new(
                self.window_config.min_width,
                self.window_config.min_height,
            ))
            .with_window_icon(load_window_icon(ICON_PATH));

        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());

        // Initialize rendering system
        let render_system = pollster::block_on(RenderSystem::new(Arc::clone(&window))).unwrap();

        // Sync geometry with the actual surface size before the first tick
        let size = window.inner_size();
        self.visualizer
            .on_resize(size.width as f32, size.height as f32);

        println!("\nFreqbars is running!");
        println!("Hold the left mouse button to drive the bars; close the window to quit\n");

        self.window = Some(window);
        self.render_system = Some(render_system);
        self.next_tick = Instant::now();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => self.visualizer.on_press(),
                ElementState::Released => self.visualizer.on_release(),
            },
            WindowEvent::Resized(size) => {
                // The surface has to follow the window immediately or it
                // goes stale; the geometry/bar reset is debounced instead.
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(size.width, size.height);
                }

                let geometry = self.visualizer.geometry();
                if size.width as f32 != geometry.width || size.height as f32 != geometry.height {
                    self.pending_resize = Some(PendingResize {
                        width: size.width,
                        height: size.height,
                        deadline: Instant::now() + self.timing.resize_debounce(),
                    });
                }
            }
            WindowEvent::RedrawRequested => {
                self.render_frame();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();

        // Apply a resize once the event storm has been quiet long enough
        if let Some(pending) = &self.pending_resize {
            if now >= pending.deadline {
                self.visualizer
                    .on_resize(pending.width as f32, pending.height as f32);
                self.pending_resize = None;
            }
        }

        // Fixed-cadence tick: one update per wakeup, never overlapping.
        // A late tick reschedules from now rather than bursting to catch up.
        if now >= self.next_tick {
            self.visualizer.on_tick();
            if let Some(render_system) = &mut self.render_system {
                render_system.update_bars(&self.visualizer.vertices);
            }
            if let Some(window) = &self.window {
                window.request_redraw();
            }
            self.next_tick = now + self.timing.tick_interval();
        }

        let mut wake_at = self.next_tick;
        if let Some(pending) = &self.pending_resize {
            wake_at = wake_at.min(pending.deadline);
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(wake_at));
    }
}

impl App {
    /// Render a single frame
    fn render_frame(&mut self) {
        let Some(ref mut render_system) = self.render_system else {
            return;
        };

        match render_system.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_system.reconfigure();
            }
            Err(e) => eprintln!("Render error: {:?}", e),
        }
    }
}

/// Load the window icon, silently ignoring a missing or unreadable file
fn load_window_icon(path: &str) -> Option<Icon> {
    let image = image::open(path).ok()?.into_rgba8();
    let (width, height) = image.dimensions();
    Icon::from_rgba(image.into_raw(), width, height).ok()
}

fn main() {
    println!("Freqbars - synthetic frequency bar visualizer");
    println!("Initializing window...\n");

    let mut app = App::new();
    let event_loop = EventLoop::new().unwrap();
    let _ = event_loop.run_app(&mut app);
}
