//! Loopback echo utility entry point.

use clap::Parser;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "freqbars-echo")]
#[command(about = "Echo a loopback capture device back to the output", long_about = None)]
struct Args {
    /// Substring to match against capture device names
    /// (default: any name containing "loopback" or "monitor")
    #[arg(long, value_name = "NAME")]
    device: Option<String>,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = freqbars::echo::run(args.device.as_deref()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
