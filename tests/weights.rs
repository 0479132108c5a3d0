use roster_draw::{
    compute_probabilities, compute_weight, normalize, Candidate, DrawError, WeightConfig, WeightModel,
};

fn candidate(id: u64, name: &str, draw_count: u32) -> Candidate {
    let mut candidate = Candidate::new(id, name);
    candidate.draw_count = draw_count;
    candidate
}

#[test]
fn weight_decays_with_each_draw() {
    let config = WeightConfig::default();
    let mut previous = f64::INFINITY;
    for draws in 0..12 {
        let weight = compute_weight(&candidate(1, "A", draws), &config);
        assert!(weight > 0.0);
        assert!(weight < previous, "weight did not drop at {} draws", draws);
        previous = weight;
    }
}

#[test]
fn fresh_candidate_outweighs_repeat_pick() {
    let config = WeightConfig::default();
    let a = candidate(1, "A", 0);
    let b = candidate(2, "B", 3);

    let weight_a = compute_weight(&a, &config);
    let weight_b = compute_weight(&b, &config);

    assert!(weight_a > weight_b);
    assert!((weight_a - 1.0).abs() < 1e-9);
    assert!((weight_b - 0.216).abs() < 1e-9);
}

#[test]
fn low_grade_boosts_weight() {
    let config = WeightConfig::default();
    let mut struggling = candidate(1, "A", 0);
    struggling.last_grade = Some(10.0);
    let mut perfect = candidate(2, "B", 0);
    perfect.last_grade = Some(20.0);

    assert!((compute_weight(&struggling, &config) - 1.75).abs() < 1e-9);
    assert!((compute_weight(&perfect, &config) - 1.0).abs() < 1e-9);
}

#[test]
fn out_of_range_grades_are_not_clamped() {
    let config = WeightConfig::default();
    let mut above = candidate(1, "A", 0);
    above.last_grade = Some(30.0);
    let mut below = candidate(2, "B", 0);
    below.last_grade = Some(-20.0);

    assert!((compute_weight(&above, &config) - 0.25).abs() < 1e-9);
    assert!((compute_weight(&below, &config) - 4.0).abs() < 1e-9);
}

#[test]
fn manual_weight_overrides_history() {
    let config = WeightConfig::default();
    let mut manual = candidate(1, "A", 5);
    manual.last_grade = Some(0.0);
    manual.weight = Some(0.3);

    assert!((compute_weight(&manual, &config) - 0.3).abs() < 1e-9);

    manual.weight = Some(0.0);
    assert!((compute_weight(&manual, &config) - config.min_weight_floor).abs() < 1e-12);
}

#[test]
fn floor_keeps_heavy_repeaters_in_play() {
    let config = WeightConfig::default();
    let weight = compute_weight(&candidate(1, "A", 200), &config);
    assert!((weight - 0.0001).abs() < 1e-12);
}

#[test]
fn probabilities_sum_to_one_in_input_order() {
    let config = WeightConfig::default();
    let pool = vec![
        candidate(1, "A", 0),
        candidate(2, "B", 3),
        candidate(3, "C", 1),
        candidate(4, "D", 7),
    ];

    let probs = compute_probabilities(&pool, &config).unwrap();

    assert_eq!(probs.len(), pool.len());
    assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    assert!(probs[0] > probs[2]);
    assert!(probs[2] > probs[1]);
    assert!(probs[1] > probs[3]);
}

#[test]
fn normalize_divides_by_total() {
    let probs = normalize(&[1.0, 3.0]).unwrap();
    assert!((probs[0] - 0.25).abs() < 1e-12);
    assert!((probs[1] - 0.75).abs() < 1e-12);
}

#[test]
fn normalize_empty_is_empty() {
    assert!(normalize(&[]).unwrap().is_empty());
}

#[test]
fn zero_weights_are_a_degenerate_distribution() {
    let err = normalize(&[0.0, 0.0]).unwrap_err();
    assert!(matches!(err, DrawError::DegenerateDistribution { .. }));
}

#[test]
fn misconfigured_floor_surfaces_as_degenerate() {
    let config = WeightConfig {
        min_weight_floor: 0.0,
        ..WeightConfig::default()
    };
    let mut a = candidate(1, "A", 0);
    a.weight = Some(0.0);
    let mut b = candidate(2, "B", 0);
    b.weight = Some(0.0);

    let err = compute_probabilities(&[a, b], &config).unwrap_err();
    assert!(matches!(err, DrawError::DegenerateDistribution { .. }));
}

#[test]
fn borrowed_model_matches_free_function() {
    let config = WeightConfig {
        past_draw_penalty: 0.5,
        ..WeightConfig::default()
    };
    let mut graded = candidate(2, "B", 1);
    graded.last_grade = Some(8.0);
    let pool = vec![candidate(1, "A", 0), graded, candidate(3, "C", 4)];

    let model = WeightModel::new(&config);
    let weights = model.weights(&pool);

    assert_eq!(weights.len(), pool.len());
    for (weight, candidate) in weights.iter().zip(&pool) {
        assert!((weight - compute_weight(candidate, &config)).abs() < 1e-12);
    }
    assert!((weights[2] - 0.0625).abs() < 1e-12);
    assert_eq!(model.config().past_draw_penalty, 0.5);
}
