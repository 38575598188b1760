//! Parameter definitions with physical units and documented semantics.
//!
//! All tunables live here with:
//! - Physical units (pixels, ticks, milliseconds)
//! - Documented ranges and meanings
//! - `Default` impls carrying the reference values

use std::time::Duration;

/// Bar layout parameters (horizontal band geometry)
#[derive(Debug, Clone)]
pub struct LayoutParams {
    /// Number of bar slots across the band
    pub num_bars: usize,

    /// Gap between adjacent bars (pixels)
    pub bar_spacing_px: f32,

    /// Fraction of the window width occupied by the bar band
    /// (the band is centered; the rest is margin)
    pub band_fraction: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            num_bars: 200,
            bar_spacing_px: 1.0,
            band_fraction: 0.8,
        }
    }
}

/// Per-tick bar motion and decay parameters
#[derive(Debug, Clone)]
pub struct BarDynamics {
    /// Leftward drift per tick (pixels)
    pub movement_speed_px: f32,

    /// Multiplicative height decay per tick (0.95 = 5% shrink per tick)
    pub decay_rate: f32,

    /// Height floor; a bar at or below this is pruned (pixels)
    pub min_height_px: f32,

    /// Emission height cap while the mouse is up (pixels)
    pub idle_cap_px: f32,
}

impl Default for BarDynamics {
    fn default() -> Self {
        Self {
            movement_speed_px: 2.0,
            decay_rate: 0.95,
            min_height_px: 0.0,
            idle_cap_px: 20.0,
        }
    }
}

/// Amplitude envelope parameters
#[derive(Debug, Clone)]
pub struct AmplitudeParams {
    /// Envelope target while the mouse is down (pixels)
    pub max_amplitude_px: f32,

    /// Envelope step toward the target per tick (pixels)
    pub step_px: f32,
}

impl Default for AmplitudeParams {
    fn default() -> Self {
        Self {
            max_amplitude_px: 300.0,
            step_px: 15.0,
        }
    }
}

/// Synthetic signal source parameters
#[derive(Debug, Clone)]
pub struct SignalParams {
    /// Number of precomputed samples; the table is consumed cyclically
    pub table_len: usize,

    /// Seed for the procedural value table
    pub seed: u32,

    /// Output scale; samples leave the source in `[0, scale]`
    pub scale: f32,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            table_len: 1000,
            seed: 42,
            scale: 100.0,
        }
    }
}

/// Tick scheduling and resize coalescing
#[derive(Debug, Clone)]
pub struct TimingConfig {
    /// Target tick rate (ticks per second, best-effort)
    pub target_tps: u32,

    /// Quiet period before a resize takes effect (milliseconds);
    /// coalesces the event storm of a continuous drag-resize
    pub resize_debounce_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            target_tps: 120,
            resize_debounce_ms: 100,
        }
    }
}

impl TimingConfig {
    /// Interval between ticks at the target rate
    pub fn tick_interval(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / self.target_tps.max(1) as u64)
    }

    /// Quiet period before a pending resize is applied
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

/// Window configuration
#[derive(Debug, Clone)]
pub struct WindowConfig {
    /// Initial window width (pixels)
    pub width: u32,

    /// Initial window height (pixels)
    pub height: u32,

    /// Minimum window width (pixels)
    pub min_width: u32,

    /// Minimum window height (pixels)
    pub min_height: u32,

    /// Window title
    pub title: &'static str,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            min_width: 400,
            min_height: 300,
            title: "Frequency Visualizer",
        }
    }
}

impl WindowConfig {
    /// Corner radius of the rounded background panel for a given
    /// window width: 1/20th of the width, capped at 50 px
    pub fn corner_radius(width: f32) -> f32 {
        (width / 20.0).min(50.0)
    }
}
