//! track_replay — run a recorded detection trace through the tracker and
//! print the id each hand received.
//!
//! Input is JSON lines, one frame per line:
//!
//! ```text
//! {"t_ms": 0,  "hands": [{"x": 0.20, "y": 0.20, "gesture": "Open_Palm"}]}
//! {"t_ms": 33, "hands": [{"x": 0.21, "y": 0.20, "gesture": "Pointing_Up"}]}
//! ```
//!
//! Usage: `track_replay [TRACE] [--threshold F] [--timeout-ms N] [--max-hands N]`
//! (reads stdin when no trace path is given).

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::time::Duration;

use glam::Vec2;
use hand_tracker::{GestureLabel, HandTracker, RawObservation, TrackerConfig};
use serde::Deserialize;

#[derive(Deserialize)]
struct TraceFrame {
    t_ms:  u64,
    #[serde(default)]
    hands: Vec<TraceHand>,
}

#[derive(Deserialize)]
struct TraceHand {
    x: f32,
    y: f32,
    #[serde(default)]
    gesture: String,
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut config = TrackerConfig::default();
    let mut path: Option<String> = None;

    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--threshold" => {
                config.association_threshold = parse_or_exit(it.next(), "--threshold");
            }
            "--timeout-ms" => {
                config.stale_timeout = Duration::from_millis(parse_or_exit(it.next(), "--timeout-ms"));
            }
            "--max-hands" => {
                config.max_hands = parse_or_exit(it.next(), "--max-hands");
            }
            other => path = Some(other.to_string()),
        }
    }

    let reader: Box<dyn BufRead> = match &path {
        Some(p) => match File::open(p) {
            Ok(f)  => Box::new(BufReader::new(f)),
            Err(e) => {
                eprintln!("Error: cannot open {}: {}", p, e);
                std::process::exit(1);
            }
        },
        None => Box::new(BufReader::new(io::stdin())),
    };

    println!(
        "  threshold={}  timeout={:?}  max_hands={}",
        config.association_threshold, config.stale_timeout, config.max_hands
    );
    println!();

    let mut tracker = HandTracker::new(config);
    for (lineno, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(l)  => l,
            Err(e) => {
                eprintln!("Error: read failed: {}", e);
                std::process::exit(1);
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let frame: TraceFrame = match serde_json::from_str(&line) {
            Ok(f)  => f,
            Err(e) => {
                log::warn!("line {}: skipped ({})", lineno + 1, e);
                continue;
            }
        };

        let observations = frame.hands.iter()
            .map(|h| RawObservation::at(Vec2::new(h.x, h.y), GestureLabel::from_detector(&h.gesture)))
            .collect();
        let update = tracker.update(observations, Duration::from_millis(frame.t_ms));

        let mut cells: Vec<String> = update.fresh.iter()
            .map(|a| format!(
                "{}{} ({:.2},{:.2}) {}",
                a.id,
                if a.born { "*" } else { "" },
                a.observation.position.x,
                a.observation.position.y,
                a.observation.gesture,
            ))
            .collect();
        cells.extend(update.stale.iter().map(|s| format!("{} stale", s.id)));
        cells.extend(update.purged.iter().map(|id| format!("{} purged", id)));

        println!("  [{:>6} ms]  {}", frame.t_ms, cells.join("  |  "));
    }
}

fn parse_or_exit<T: std::str::FromStr>(value: Option<&String>, flag: &str) -> T {
    match value.and_then(|v| v.parse().ok()) {
        Some(v) => v,
        None => {
            eprintln!("Error: {} needs a numeric value", flag);
            std::process::exit(2);
        }
    }
}
