//! Scrolling bar field: amplitude envelope, bar aging, and vertex building.
//!
//! The `Visualizer` is the single owner of all animation state. The
//! windowing layer only ever calls its four event methods (`on_press`,
//! `on_release`, `on_resize`, `on_tick`) and reads back `vertices`.

use bytemuck::{Pod, Zeroable};

use crate::params::{AmplitudeParams, BarDynamics, LayoutParams};
use crate::signal::SignalSource;

/// Vertex data for bar quads (pixel-space position, y-down)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct BarVertex {
    pub position: [f32; 2],
}

/// One rendered bar: band-local x position and full height, both in pixels
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bar {
    pub position: f32,
    pub height: f32,
}

/// Smoothed amplitude envelope chasing a press/release target
#[derive(Copy, Clone, Debug, Default)]
pub struct AmplitudeEnvelope {
    pub current: f32,
    pub target: f32,
}

impl AmplitudeEnvelope {
    /// Step `current` toward `target` by a fixed increment, saturating at
    /// the target from either side and never dropping below zero. The
    /// release ramp mirrors the attack: 300 -> 0 takes the same 20 ticks
    /// as 0 -> 300.
    fn step(&mut self, step_px: f32) {
        if self.current < self.target {
            self.current = (self.current + step_px).min(self.target);
        } else {
            self.current = (self.current - step_px).max(self.target);
        }
        self.current = self.current.max(0.0);
    }
}

/// Derived band geometry, recomputed on resize
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewportGeometry {
    /// Window width (pixels, clamped to >= 1)
    pub width: f32,

    /// Window height (pixels, clamped to >= 1)
    pub height: f32,

    /// Width of the centered bar band (pixels)
    pub band_width: f32,

    /// Width of a single bar (pixels, clamped to >= 0)
    pub bar_width: f32,

    /// Left edge of the band within the window (pixels)
    pub x_offset: f32,
}

impl ViewportGeometry {
    /// Derive band geometry from the window size; degenerate sizes from a
    /// misbehaving host are clamped rather than propagated
    pub fn compute(width: f32, height: f32, layout: &LayoutParams) -> Self {
        let width = width.max(1.0);
        let height = height.max(1.0);

        let band_width = width * layout.band_fraction;
        let bar_width =
            (band_width / layout.num_bars.max(1) as f32 - layout.bar_spacing_px).max(0.0);
        let x_offset = (width - band_width) / 2.0;

        Self {
            width,
            height,
            band_width,
            bar_width,
            x_offset,
        }
    }
}

/// Animation loop controller owning the bar field
pub struct Visualizer {
    bars: Vec<Bar>,
    envelope: AmplitudeEnvelope,
    geometry: ViewportGeometry,
    signal: SignalSource,
    pressed: bool,

    layout: LayoutParams,
    dynamics: BarDynamics,
    amplitude: AmplitudeParams,

    /// Bar quads rebuilt on every tick, consumed by the render system
    pub vertices: Vec<BarVertex>,
}

impl Visualizer {
    /// Create a controller for the given initial window size
    pub fn new(
        width: f32,
        height: f32,
        layout: LayoutParams,
        dynamics: BarDynamics,
        amplitude: AmplitudeParams,
        signal: SignalSource,
    ) -> Self {
        let geometry = ViewportGeometry::compute(width, height, &layout);

        Self {
            bars: Vec::new(),
            envelope: AmplitudeEnvelope::default(),
            geometry,
            signal,
            pressed: false,
            layout,
            dynamics,
            amplitude,
            vertices: Vec::new(),
        }
    }

    /// Left button pressed: envelope chases the maximum amplitude
    pub fn on_press(&mut self) {
        self.pressed = true;
        self.envelope.target = self.amplitude.max_amplitude_px;
    }

    /// Left button released: envelope falls back toward zero
    pub fn on_release(&mut self) {
        self.pressed = false;
        self.envelope.target = 0.0;
    }

    /// Window resized: recompute geometry and reset the bar field.
    /// Clearing is deliberate; bars are not interpolated across resizes.
    pub fn on_resize(&mut self, width: f32, height: f32) {
        self.geometry = ViewportGeometry::compute(width, height, &self.layout);
        self.bars.clear();
        self.vertices.clear();
    }

    /// Advance the animation by one tick: step the envelope, age and prune
    /// the bars, emit one new bar, and rebuild the vertex list
    pub fn on_tick(&mut self) {
        self.envelope.step(self.amplitude.step_px);
        self.age_bars();
        self.emit_bar();
        self.rebuild_vertices();
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn envelope(&self) -> AmplitudeEnvelope {
        self.envelope
    }

    pub fn geometry(&self) -> ViewportGeometry {
        self.geometry
    }

    /// Drift every bar left and decay its height, then prune bars that
    /// left the band or reached the height floor
    fn age_bars(&mut self) {
        let speed = self.dynamics.movement_speed_px;
        let decay = self.dynamics.decay_rate;
        let floor = self.dynamics.min_height_px;

        for bar in &mut self.bars {
            bar.position -= speed;
            bar.height = (bar.height * decay).max(floor);
        }

        let left_edge = -self.geometry.bar_width;
        self.bars
            .retain(|bar| bar.position > left_edge && bar.height > floor);
    }

    /// Append one bar at the band's right edge, scaled by the current
    /// amplitude and capped while the mouse is up
    fn emit_bar(&mut self) {
        let sample = self.signal.next_sample();
        let peak = sample.max(1.0);
        let mut height = (sample / peak) * self.envelope.current;

        if !self.pressed {
            height = height.min(self.dynamics.idle_cap_px);
        }

        // A bar at the height floor would be pruned on the next tick
        // anyway; skip it at the source so every live bar is visible
        if height > self.dynamics.min_height_px {
            self.bars.push(Bar {
                position: self.geometry.band_width,
                height,
            });
        }
    }

    /// Rebuild the quad list from the current bar field. Pure function of
    /// state: rebuilding twice without a tick in between yields identical
    /// vertices, so a repeated render draws the exact same frame.
    fn rebuild_vertices(&mut self) {
        self.vertices.clear();

        let mid_y = self.geometry.height / 2.0;
        for bar in &self.bars {
            let x0 = self.geometry.x_offset + bar.position;
            let x1 = x0 + self.geometry.bar_width;
            let y0 = mid_y - bar.height / 2.0;
            let y1 = mid_y + bar.height / 2.0;

            self.vertices.extend_from_slice(&[
                BarVertex { position: [x0, y0] },
                BarVertex { position: [x0, y1] },
                BarVertex { position: [x1, y0] },
                BarVertex { position: [x1, y0] },
                BarVertex { position: [x0, y1] },
                BarVertex { position: [x1, y1] },
            ]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::SignalParams;

    fn test_visualizer(width: f32, height: f32) -> Visualizer {
        Visualizer::new(
            width,
            height,
            LayoutParams::default(),
            BarDynamics::default(),
            AmplitudeParams::default(),
            SignalSource::new(&SignalParams::default()),
        )
    }

    #[test]
    fn test_amplitude_reaches_max_in_twenty_ticks() {
        let mut vis = test_visualizer(800.0, 600.0);
        vis.on_press();

        // Attack climbs by exactly one step per tick, saturating at 300
        for tick in 1..=20u32 {
            vis.on_tick();
            assert_eq!(
                vis.envelope().current,
                (15.0 * tick as f32).min(300.0),
                "wrong amplitude at tick {}",
                tick
            );
        }

        assert_eq!(vis.envelope().current, 300.0);
    }

    #[test]
    fn test_amplitude_returns_to_zero_in_twenty_ticks() {
        let mut vis = test_visualizer(800.0, 600.0);
        vis.on_press();
        for _ in 0..20 {
            vis.on_tick();
        }
        assert_eq!(vis.envelope().current, 300.0);

        // Release descends by exactly one step per tick: 285, 270, ..., 0
        vis.on_release();
        for tick in 1..=20u32 {
            vis.on_tick();
            assert_eq!(
                vis.envelope().current,
                300.0 - 15.0 * tick as f32,
                "wrong amplitude at tick {}",
                tick
            );
        }

        assert_eq!(vis.envelope().current, 0.0);
        vis.on_tick();
        assert_eq!(vis.envelope().current, 0.0);
    }

    #[test]
    fn test_release_ramps_down_without_snapping() {
        let mut vis = test_visualizer(800.0, 600.0);
        vis.on_press();
        for _ in 0..20 {
            vis.on_tick();
        }
        assert_eq!(vis.envelope().current, 300.0);

        // One tick after release the envelope has shed one step, not
        // collapsed to zero
        vis.on_release();
        vis.on_tick();
        assert_eq!(vis.envelope().current, 285.0);
    }

    #[test]
    fn test_bar_decay_is_geometric() {
        let mut vis = test_visualizer(800.0, 600.0);
        vis.on_press();
        vis.on_tick();

        // Grab the bar emitted on the first tick and follow it: each later
        // tick moves it 2px left and shrinks it by the decay factor.
        let h0 = vis.bars().last().unwrap().height;
        let band_width = vis.geometry().band_width;
        assert!(h0 > 0.0);

        for n in 1..=40u32 {
            vis.on_tick();
            let expected_pos = band_width - 2.0 * n as f32;
            let tracked = vis
                .bars()
                .iter()
                .find(|b| (b.position - expected_pos).abs() < 1e-3)
                .expect("tracked bar disappeared early");
            let expected_height = h0 * 0.95f32.powi(n as i32);
            assert!(
                (tracked.height - expected_height).abs() < 1e-2,
                "tick {}: height {} expected {}",
                n,
                tracked.height,
                expected_height
            );
        }
    }

    #[test]
    fn test_bar_positions_monotonically_non_increasing() {
        let mut vis = test_visualizer(800.0, 600.0);
        vis.on_press();
        vis.on_tick();

        // Every bar alive after a tick either drifted exactly one step left
        // from a bar of the previous tick, or was freshly emitted at the
        // band's right edge. No bar ever moves right.
        let band_width = vis.geometry().band_width;
        for _ in 0..50 {
            let previous: Vec<f32> = vis.bars().iter().map(|b| b.position).collect();
            vis.on_tick();
            for bar in vis.bars() {
                let drifted = previous
                    .iter()
                    .any(|&p| (p - (bar.position + 2.0)).abs() < 1e-3);
                let freshly_emitted = (bar.position - band_width).abs() < 1e-3;
                assert!(
                    drifted || freshly_emitted,
                    "bar at {} has no left-drift ancestor",
                    bar.position
                );
            }
        }
    }

    #[test]
    fn test_bars_pruned_at_left_edge() {
        // A tiny window makes the band short enough that bars march off
        // within a few ticks.
        let mut vis = test_visualizer(10.0, 100.0);
        vis.on_press();

        for _ in 0..200 {
            vis.on_tick();
            let left_edge = -vis.geometry().bar_width;
            for bar in vis.bars() {
                assert!(bar.position > left_edge);
                assert!(bar.height > 0.0);
            }
        }

        // Band is 8px, drift 2px/tick: nothing lives longer than ~5 ticks
        assert!(vis.bars().len() <= 6);
    }

    #[test]
    fn test_idle_start_emits_no_zero_height_bars() {
        let mut vis = test_visualizer(800.0, 600.0);

        // Never pressed: the envelope stays at zero, so every would-be
        // emission is zero-height and must be dropped at the source
        for _ in 0..30 {
            vis.on_tick();
            assert!(vis.bars().iter().all(|b| b.height > 0.0));
        }
        assert!(vis.bars().is_empty());
        assert!(vis.vertices.is_empty());
    }

    #[test]
    fn test_idle_emission_is_capped() {
        let mut vis = test_visualizer(800.0, 600.0);
        vis.on_press();
        for _ in 0..20 {
            vis.on_tick();
        }

        // Envelope is still high right after release, but idle emissions
        // must not exceed the cap.
        vis.on_release();
        vis.on_tick();
        let newest = vis.bars().last().unwrap();
        assert!(newest.height <= 20.0);
        assert!(vis.envelope().current > 20.0);
    }

    #[test]
    fn test_resize_clears_bars_and_recomputes_geometry() {
        let mut vis = test_visualizer(800.0, 600.0);
        vis.on_press();
        for _ in 0..10 {
            vis.on_tick();
        }
        assert!(!vis.bars().is_empty());

        vis.on_resize(1000.0, 500.0);

        assert!(vis.bars().is_empty());
        assert!(vis.vertices.is_empty());
        let geometry = vis.geometry();
        assert_eq!(geometry.band_width, 800.0);
        assert_eq!(geometry.bar_width, 800.0 / 200.0 - 1.0);
        assert_eq!(geometry.x_offset, 100.0);
        assert_eq!(geometry.height, 500.0);
    }

    #[test]
    fn test_geometry_clamps_degenerate_sizes() {
        let geometry = ViewportGeometry::compute(0.0, 0.0, &LayoutParams::default());

        assert_eq!(geometry.width, 1.0);
        assert_eq!(geometry.height, 1.0);
        assert!(geometry.bar_width >= 0.0);
        assert!(geometry.band_width > 0.0);
    }

    #[test]
    fn test_vertex_building_is_idempotent() {
        let mut vis = test_visualizer(800.0, 600.0);
        vis.on_press();
        for _ in 0..15 {
            vis.on_tick();
        }

        let first = vis.vertices.clone();
        vis.rebuild_vertices();

        assert_eq!(first, vis.vertices);
        assert_eq!(first.len(), vis.bars().len() * 6);
    }

    #[test]
    fn test_bars_are_centered_on_the_vertical_midline() {
        let mut vis = test_visualizer(800.0, 600.0);
        vis.on_press();
        for _ in 0..10 {
            vis.on_tick();
        }

        let mid_y = vis.geometry().height / 2.0;
        for quad in vis.vertices.chunks(6) {
            let y0 = quad[0].position[1];
            let y1 = quad[5].position[1];
            assert!((mid_y - y0 - (y1 - mid_y)).abs() < 1e-3);
            assert!(y1 >= y0);
        }
    }
}
