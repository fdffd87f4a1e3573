//! hand_input — demo entry point.
//!
//! Usage: `hand_input [config.toml]`

use hand_input::app::{run, AppConfig};
use hand_input::InputConfig;

fn main() {
    env_logger::init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          Hand Input — gesture cursor & click demo            ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let input = match std::env::args().nth(1) {
        Some(path) => match InputConfig::load(&path) {
            Ok(cfg) => {
                println!("  Config: {}", path);
                cfg
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => InputConfig::default(),
    };
    let cfg = AppConfig { input, ..AppConfig::default() };

    println!("  Opening window…  (Q or Esc to quit)");
    println!();

    #[cfg(feature = "leap")]
    let result = match hand_input::LeapDetector::open() {
        Ok(leap) => {
            println!("  Mode: LeapMotion hardware");
            run(cfg, leap)
        }
        Err(e) => {
            println!("  LeapMotion unavailable ({}); using the mouse", e);
            run(cfg, hand_input::NoCapture)
        }
    };
    #[cfg(not(feature = "leap"))]
    let result = {
        println!("  Mode: mouse  (build with --features leap for hardware)");
        run(cfg, hand_input::NoCapture)
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
