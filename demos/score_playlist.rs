//! Example: Score a playlist of feature records
//!
//! Loads one JSON feature record per argument, in playlist order, and
//! prints every transition plus the playlist summary.
//!
//! ```text
//! cargo run --example score_playlist -- tests/fixtures/house_a.json tests/fixtures/house_b.json
//! ```

use segue::{FeatureRecord, TransitionEngine};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        eprintln!("Usage: score_playlist <record.json> [<record.json> ...]");
        std::process::exit(1);
    }

    let mut tracks = Vec::with_capacity(paths.len());
    for path in &paths {
        let text = std::fs::read_to_string(path)?;
        let record: FeatureRecord = serde_json::from_str(&text)?;
        tracks.push(record);
    }

    let engine = TransitionEngine::new();
    let validation = engine.validate_playlist(&tracks)?;

    for (i, transition) in validation.transitions.iter().enumerate() {
        println!(
            "#{} {} -> {}: P={:.2} ({})",
            i,
            tracks[i].display_name(),
            tracks[i + 1].display_name(),
            transition.probability,
            if transition.is_compatible { "compatible" } else { "incompatible" }
        );
        for line in transition.explanation.lines() {
            println!("    {}", line);
        }
        for violation in &transition.violations {
            println!("    ! {}", violation);
        }
    }

    println!("Playlist Results:");
    println!("  Tracks: {}", tracks.len());
    println!("  Overall probability: {:.2}", validation.overall_probability);
    println!("  Valid: {}", validation.is_valid);
    if let Some(weakest) = validation.weakest_transition {
        println!("  Weakest transition: #{} (P={:.2})", weakest.index, weakest.probability);
    }
    println!("  Violations: {}", validation.total_violations);

    Ok(())
}
