//! Standalone audio loopback echo: copies a loopback capture device
//! straight back to the default output until interrupted.
//!
//! Entirely independent of the visualizer; it ships as its own binary and
//! shares no state with the animation loop.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// True for device names that expose system output as a capture stream
/// (e.g. "Monitor of Built-in Audio", "Stereo Mix (loopback)")
pub fn is_loopback_name(name: &str) -> bool {
    let name = name.to_lowercase();
    name.contains("loopback") || name.contains("monitor")
}

/// Find a loopback-capable capture device; `name_hint` overrides the
/// default name matching with a caller-provided substring
fn find_loopback_device(
    host: &cpal::Host,
    name_hint: Option<&str>,
) -> Result<cpal::Device, String> {
    let devices = host
        .input_devices()
        .map_err(|e| format!("Failed to enumerate capture devices: {}", e))?;

    for device in devices {
        let Ok(name) = device.name() else {
            continue;
        };
        let matches = match name_hint {
            Some(hint) => name.to_lowercase().contains(&hint.to_lowercase()),
            None => is_loopback_name(&name),
        };
        if matches {
            return Ok(device);
        }
    }

    Err("No loopback capture device found".to_string())
}

/// Open the duplex pair and echo input frames to the output until the
/// process is interrupted
pub fn run(name_hint: Option<&str>) -> Result<(), String> {
    let host = cpal::default_host();

    let input_device = find_loopback_device(&host, name_hint)?;
    let output_device = host
        .default_output_device()
        .ok_or("No audio output device found")?;

    let config: cpal::StreamConfig = input_device
        .default_input_config()
        .map_err(|e| format!("Failed to get capture config: {}", e))?
        .into();

    println!(
        "Echo: {} -> {} @ {}Hz",
        input_device.name().unwrap_or_else(|_| "Unknown".to_string()),
        output_device.name().unwrap_or_else(|_| "Unknown".to_string()),
        config.sample_rate.0
    );

    // Captured frames queue up here; the output callback drains them and
    // zero-fills when the queue runs dry.
    let buffer = Arc::new(Mutex::new(VecDeque::<f32>::new()));

    let producer = Arc::clone(&buffer);
    let input_stream = input_device
        .build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                producer.lock().unwrap().extend(data.iter().copied());
            },
            |err| eprintln!("Capture stream error: {}", err),
            None,
        )
        .map_err(|e| format!("Failed to build capture stream: {}", e))?;

    let consumer = Arc::clone(&buffer);
    let output_stream = output_device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let mut queued = consumer.lock().unwrap();
                for sample in data.iter_mut() {
                    *sample = queued.pop_front().unwrap_or(0.0);
                }
            },
            |err| eprintln!("Playback stream error: {}", err),
            None,
        )
        .map_err(|e| format!("Failed to build playback stream: {}", e))?;

    input_stream
        .play()
        .map_err(|e| format!("Failed to start capture stream: {}", e))?;
    output_stream
        .play()
        .map_err(|e| format!("Failed to start playback stream: {}", e))?;

    println!("Listening and playing back system audio... Press Ctrl+C to stop.");

    loop {
        thread::sleep(Duration::from_millis(100));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loopback_names_match() {
        assert!(is_loopback_name("Monitor of Built-in Audio Analog Stereo"));
        assert!(is_loopback_name("Speakers (WASAPI loopback)"));
        assert!(is_loopback_name("LOOPBACK device"));
    }

    #[test]
    fn test_plain_capture_names_do_not_match() {
        assert!(!is_loopback_name("Built-in Microphone"));
        assert!(!is_loopback_name("USB Audio Device"));
        assert!(!is_loopback_name(""));
    }
}
