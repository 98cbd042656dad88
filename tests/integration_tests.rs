//! Integration tests for the transition scoring engine

use segue::{
    score_transition, validate_playlist, DimensionWeights, FeatureRecord, Scale, ScoringConfig,
    ScoringError, TransitionEngine, UserPreferences,
};
use std::path::PathBuf;

fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(filename)
}

/// Load a feature record from a JSON fixture
fn load_record(filename: &str) -> Result<FeatureRecord, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(fixture_path(filename))?;
    Ok(serde_json::from_str(&text)?)
}

fn tempo_only_preferences() -> UserPreferences {
    UserPreferences {
        weights: DimensionWeights {
            key: 0.0,
            tempo: 1.0,
            energy: 0.0,
            loudness: 0.0,
            mood: 0.0,
            timbre: 0.0,
            genre: 0.0,
        },
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> (UserPreferences, ScoringConfig) {
        (UserPreferences::default(), ScoringConfig::default())
    }

    #[test]
    fn test_fixtures_load_and_validate() {
        for name in [
            "house_a.json",
            "house_b.json",
            "classical.json",
            "scenario_a.json",
            "scenario_b.json",
            "sparse.json",
        ] {
            let record = load_record(name).expect("fixture should deserialize");
            assert!(record.validate().is_ok(), "{} should validate", name);
        }

        let sparse = load_record("sparse.json").unwrap();
        assert_eq!(sparse.key.key, "C");
        assert_eq!(sparse.tempo.bpm, 0.0);
        assert_eq!(sparse.energy_score(), 0.0);
        assert!(sparse.loudness.is_none());
        assert!(sparse.timbre.is_none());
    }

    #[test]
    fn test_self_comparison() {
        let track = load_record("house_a.json").unwrap();
        let (prefs, config) = defaults();
        let result = score_transition(&track, &track.clone(), &prefs, &config).unwrap();

        assert!((result.scores.key - 1.0).abs() < 1e-9);
        assert!((result.scores.tempo - 1.0).abs() < 1e-9);
        assert!((result.scores.energy - 1.0).abs() < 1e-9);
        assert!((result.scores.loudness - 1.0).abs() < 1e-9);
        assert!((result.scores.timbre - 1.0).abs() < 1e-6);
        assert!(result.probability > 0.7);
        assert!(result.is_compatible);
        assert!(result.violations.is_empty());
    }

    #[test]
    fn test_example_scenario_c_to_g() {
        let a = load_record("scenario_a.json").unwrap();
        let b = load_record("scenario_b.json").unwrap();
        let (prefs, config) = defaults();
        let result = score_transition(&a, &b, &prefs, &config).unwrap();

        assert_eq!(result.evidence.circle_distance, 1);
        assert!(result.scores.key > 0.75, "key {}", result.scores.key);
        assert!(result.scores.tempo > 0.9, "tempo {}", result.scores.tempo);
        // 0.020 -> 0.021 sits a third of a sigma apart
        assert!(result.scores.energy > 0.94, "energy {}", result.scores.energy);
        assert!(result.scores.loudness > 0.95, "loudness {}", result.scores.loudness);
        assert!(result.probability >= 0.3);
        assert!(result.is_compatible);
        assert!(result.violations.is_empty(), "{:?}", result.violations);

        let lines: Vec<&str> = result.explanation.lines().collect();
        assert_eq!(lines[0], "Key: C major -> G major (dist=1, P=80%)");
        assert_eq!(lines[1], "Tempo: 120 -> 122 BPM (diff=2, P=99%)");
        assert_eq!(lines[3], "Loudness: 0.30 -> 0.31 (diff=0.01, P=100%)");
    }

    #[test]
    fn test_double_time_scenario() {
        let mut a = FeatureRecord::new("slow");
        a.tempo.bpm = 90.0;
        let mut b = FeatureRecord::new("fast");
        b.tempo.bpm = 181.0;
        let mut c = FeatureRecord::new("fast-ish");
        c.tempo.bpm = 179.5;
        let mut unrelated = FeatureRecord::new("unrelated");
        unrelated.tempo.bpm = 135.0;
        let (prefs, config) = defaults();

        let doubled = score_transition(&a, &b, &prefs, &config).unwrap();
        assert!(doubled.evidence.double_time);
        assert!(doubled.scores.tempo > 0.99);
        assert!(doubled.explanation.contains("[double-time]"));

        let near_doubled = score_transition(&a, &c, &prefs, &config).unwrap();
        assert!(near_doubled.evidence.double_time);
        assert!(near_doubled.scores.tempo > 0.99);

        let mismatch = score_transition(&a, &unrelated, &prefs, &config).unwrap();
        assert!(!mismatch.evidence.double_time);
        assert!(mismatch.scores.tempo < 0.1);
        assert!(doubled.scores.tempo > mismatch.scores.tempo + 0.8);
    }

    #[test]
    fn test_house_pair_is_smooth() {
        let a = load_record("house_a.json").unwrap();
        let b = load_record("house_b.json").unwrap();
        let (prefs, config) = defaults();
        let result = score_transition(&a, &b, &prefs, &config).unwrap();

        assert!(result.probability > 0.9, "P = {}", result.probability);
        assert!(result.violations.is_empty(), "{:?}", result.violations);
        assert!(result.scores.timbre > 0.9);
        assert!(result.scores.genre > 0.95);
        assert!((result.scores.mood - 0.99).abs() < 1e-9);
        assert!(result.evidence.timbre_distance.is_some());
    }

    #[test]
    fn test_house_to_classical_reports_every_dimension() {
        let house = load_record("house_a.json").unwrap();
        let classical = load_record("classical.json").unwrap();
        let (prefs, config) = defaults();
        let result = score_transition(&house, &classical, &prefs, &config).unwrap();
        let house_b = load_record("house_b.json").unwrap();
        let smooth = score_transition(&house, &house_b, &prefs, &config).unwrap();

        assert!(result.probability < smooth.probability);
        assert!(result.probability < 0.5);
        assert_eq!(result.violations.len(), 8, "{:?}", result.violations);
        assert_eq!(result.violations[0], "Key incompatible: C major -> F# major (distance 6)");
        assert_eq!(result.violations[1], "Tempo jump: 124 -> 95 BPM");
        assert!(result.violations[4].starts_with("Mood incompatible: party -> relaxed"));
        assert!(result.violations[6].starts_with("Genre mismatch: house -> classical"));
        assert!(result.violations[7].starts_with("Energy jump exceeds preference"));
        assert!(result.evidence.timbre_distance.unwrap() > 10.0);
    }

    #[test]
    fn test_playlist_weakest_link() {
        let tracks = vec![
            load_record("house_a.json").unwrap(),
            load_record("house_b.json").unwrap(),
            load_record("classical.json").unwrap(),
        ];
        let (prefs, config) = defaults();
        let validation = validate_playlist(&tracks, &prefs, &config).unwrap();

        assert_eq!(validation.transitions.len(), 2);
        let weakest = validation.weakest_transition.unwrap();
        assert_eq!(weakest.index, 1);
        assert_eq!(weakest.probability, validation.transitions[1].probability);

        let mean =
            (validation.transitions[0].probability + validation.transitions[1].probability) / 2.0;
        assert!((validation.overall_probability - mean).abs() < 1e-12);
        assert!((validation.overall_penalty - (1.0 - mean)).abs() < 1e-12);
        assert_eq!(
            validation.total_violations,
            validation.transitions.iter().map(|t| t.violations.len()).sum::<usize>()
        );
    }

    #[test]
    fn test_playlist_invalid_under_tempo_weighting() {
        let tracks = vec![
            load_record("house_a.json").unwrap(),
            load_record("house_b.json").unwrap(),
            load_record("classical.json").unwrap(),
        ];
        let prefs = tempo_only_preferences();
        let validation = validate_playlist(&tracks, &prefs, &ScoringConfig::default()).unwrap();
        assert!(validation.transitions[0].is_compatible);
        assert!(!validation.transitions[1].is_compatible);
        assert!(!validation.is_valid);
    }

    #[test]
    fn test_two_track_playlist_matches_pairwise() {
        let a = load_record("house_a.json").unwrap();
        let b = load_record("house_b.json").unwrap();
        let (prefs, config) = defaults();
        let pair = score_transition(&a, &b, &prefs, &config).unwrap();
        let validation = validate_playlist(&[a, b], &prefs, &config).unwrap();

        assert_eq!(validation.transitions, vec![pair.clone()]);
        assert_eq!(validation.overall_probability, pair.probability);
        assert_eq!(validation.is_valid, pair.is_compatible);
        assert_eq!(validation.total_violations, pair.violations.len());
    }

    #[test]
    fn test_short_playlists() {
        let (prefs, config) = defaults();
        for tracks in [vec![], vec![load_record("house_a.json").unwrap()]] {
            let validation = validate_playlist(&tracks, &prefs, &config).unwrap();
            assert_eq!(validation.overall_probability, 1.0);
            assert_eq!(validation.overall_penalty, 0.0);
            assert!(validation.is_valid);
            assert!(validation.transitions.is_empty());
            assert!(validation.weakest_transition.is_none());
            assert_eq!(validation.total_violations, 0);
        }
    }

    #[test]
    fn test_unknown_key_scores_at_maximum_distance() {
        let (prefs, config) = defaults();
        let names = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

        for known_scale in [Scale::Major, Scale::Minor] {
            for unknown_scale in [Scale::Major, Scale::Minor] {
                let mut a = load_record("scenario_a.json").unwrap();
                a.key.scale = known_scale;
                let mut unknown = load_record("scenario_b.json").unwrap();
                unknown.key.key = "H".to_string();
                unknown.key.scale = unknown_scale;

                let floor = names
                    .iter()
                    .map(|name| {
                        let mut candidate = unknown.clone();
                        candidate.key.key = name.to_string();
                        score_transition(&a, &candidate, &prefs, &config).unwrap().scores.key
                    })
                    .fold(1.0, f64::min);

                let result = score_transition(&a, &unknown, &prefs, &config).unwrap();
                assert_eq!(result.evidence.circle_distance, 6);
                assert!((result.scores.key - floor).abs() < 1e-12);

                let expected = format!(
                    "Key incompatible: C {} -> H {}",
                    known_scale.as_str(),
                    unknown_scale.as_str()
                );
                assert!(
                    result.violations.iter().any(|v| v.starts_with(&expected)),
                    "missing key violation in {:?}",
                    result.violations
                );
            }
        }
    }

    #[test]
    fn test_sparse_records_use_neutral_scores() {
        let sparse = load_record("sparse.json").unwrap();
        let (prefs, config) = defaults();
        let result = score_transition(&sparse, &sparse, &prefs, &config).unwrap();

        assert_eq!(result.scores.tempo, 0.5);
        assert_eq!(result.scores.loudness, 0.7);
        assert_eq!(result.scores.timbre, 0.6);
        assert_eq!(result.scores.genre, 0.5);
        assert!((result.scores.mood - 0.6).abs() < 1e-12);
        assert!(result.is_compatible);
    }

    #[test]
    fn test_invalid_covariance_is_rejected() {
        let bad = load_record("invalid_covariance.json").unwrap();
        let good = load_record("scenario_a.json").unwrap();
        let (prefs, config) = defaults();

        let err = score_transition(&good, &bad, &prefs, &config).unwrap_err();
        assert!(matches!(err, ScoringError::InvalidInput(_)));
        assert!(validate_playlist(&[good, bad], &prefs, &config).is_err());
    }

    #[test]
    fn test_engine_session() {
        let a = load_record("house_a.json").unwrap();
        let b = load_record("house_b.json").unwrap();
        let classical = load_record("classical.json").unwrap();

        let mut engine = TransitionEngine::new();
        let before = engine.penalty(&b, &classical).unwrap();
        engine.set_preferences(tempo_only_preferences()).unwrap();
        let after = engine.penalty(&b, &classical).unwrap();
        assert!(after > before);

        let validation = engine.validate_playlist(&[a, b, classical]).unwrap();
        assert!(!validation.is_valid);
        assert_eq!(engine.evaluations(), 4);

        engine.clear();
        assert_eq!(engine.evaluations(), 0);
        assert_eq!(engine.preferences(), &tempo_only_preferences());
    }

    #[test]
    fn test_results_serialize() {
        let a = load_record("house_a.json").unwrap();
        let b = load_record("house_b.json").unwrap();
        let (prefs, config) = defaults();
        let validation = validate_playlist(&[a, b], &prefs, &config).unwrap();

        let json = serde_json::to_value(&validation).unwrap();
        assert!(json["overall_probability"].as_f64().is_some());
        assert_eq!(json["transitions"][0]["from_id"], "house-a");
        assert_eq!(json["transitions"][0]["to_id"], "house-b");
        assert!(json["transitions"][0]["scores"]["timbre"].as_f64().is_some());
    }
}
