//! Freqbars library - scrolling bar-graph visualizer over a synthetic signal

pub mod bars;
pub mod echo;
pub mod params;
pub mod rendering;
pub mod signal;
