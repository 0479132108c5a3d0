use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};

use roster_draw::reel::Mulberry32;
use roster_draw::{build_reel, build_reel_with, winner_index, Candidate, ReelConfig, ReelSeed};

fn pool(size: u64) -> Vec<Candidate> {
    (1..=size)
        .map(|id| Candidate::new(id, format!("student-{}", id)))
        .collect()
}

fn has_adjacent_repeat(reel: &[Candidate]) -> bool {
    reel.windows(2).any(|pair| pair[0].id == pair[1].id)
}

#[test]
fn mulberry32_matches_reference_sequence() {
    let mut rng = Mulberry32::new(42);
    assert_eq!(rng.next_u32(), 2_581_720_956);
    assert_eq!(rng.next_u32(), 1_925_393_290);
    assert_eq!(rng.next_u32(), 3_661_312_704);

    let mut rng = Mulberry32::new(0);
    assert_eq!(rng.next_u32(), 1_144_304_738);
}

#[test]
fn seeded_shuffle_is_a_stable_permutation() {
    let shuffled = |seed: u64| {
        let mut ids: Vec<u32> = (0..20).collect();
        ids.shuffle(&mut Mulberry32::seed_from_u64(seed));
        ids
    };

    let first = shuffled(7);
    assert_eq!(first, shuffled(7));
    assert_ne!(first, shuffled(8));

    let mut sorted = first.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..20).collect::<Vec<u32>>());
}

#[test]
fn same_inputs_build_the_same_reel() {
    let candidates = pool(3);
    let winner = candidates[1].clone();

    let first = build_reel(&candidates, Some(&winner), 42);
    let second = build_reel(&candidates, Some(&winner), 42);

    assert_eq!(first, second);
}

#[test]
fn different_seeds_build_different_reels() {
    let candidates = pool(6);
    let first = build_reel(&candidates, None, 1);
    let second = build_reel(&candidates, None, 2);
    assert_ne!(first, second);
}

#[test]
fn winner_appears_once_without_adjacent_repeats() {
    for size in 3..12u64 {
        let candidates = pool(size);
        for seed in 0..40u64 {
            let winner = &candidates[(seed % size) as usize];
            let reel = build_reel(&candidates, Some(winner), seed);

            let occurrences = reel.iter().filter(|candidate| candidate.id == winner.id).count();
            assert_eq!(occurrences, 1, "size {} seed {}", size, seed);
            assert!(!has_adjacent_repeat(&reel), "size {} seed {}", size, seed);
        }
    }
}

#[test]
fn idle_reel_has_no_adjacent_repeats() {
    for size in 2..10u64 {
        let candidates = pool(size);
        for seed in 0..40u64 {
            let reel = build_reel(&candidates, None, seed);
            assert!(!has_adjacent_repeat(&reel), "size {} seed {}", size, seed);
            assert!(reel.iter().all(|candidate| candidate.id >= 1 && candidate.id <= size));
        }
    }
}

#[test]
fn winner_lands_at_the_centred_insertion_index() {
    let candidates = pool(3);
    let winner = candidates[0].clone();

    let reel = build_reel(&candidates, Some(&winner), 9);

    // window 3: 40 items before the winner, 6 after, winner centred two back
    assert_eq!(reel.len(), 47);
    assert_eq!(winner_index(&reel, &winner), Some(38));
}

#[test]
fn large_pools_cycle_at_least_three_times() {
    let candidates = pool(30);
    let winner = candidates[7].clone();
    let config = ReelConfig::default();

    let reel = build_reel_with(&candidates, Some(&winner), 5, &config);

    assert_eq!(config.items_before_winner(30), 90);
    assert_eq!(reel.len(), 90 + config.buffer_after_winner() + 1);
    assert_eq!(winner_index(&reel, &winner), Some(88));
}

#[test]
fn even_window_is_widened_to_odd() {
    let config = ReelConfig {
        visible_items: 4,
        ..ReelConfig::default()
    };
    assert_eq!(config.window(), 5);
    assert_eq!(config.buffer_after_winner(), 10);
    assert_eq!(config.insertion_index(3, 100), 37);
}

#[test]
fn idle_reel_has_no_winner_slot() {
    let candidates = pool(4);
    let reel = build_reel(&candidates, None, 3);
    assert_eq!(reel.len(), 46);
}

#[test]
fn empty_pool_builds_an_empty_reel() {
    let winner = Candidate::new(1, "A");
    assert!(build_reel(&[], Some(&winner), 1).is_empty());
    assert!(build_reel(&[], None, 1).is_empty());
}

#[test]
fn lone_winner_builds_a_single_slot() {
    let candidates = pool(1);
    let reel = build_reel(&candidates, Some(&candidates[0]), 11);
    assert_eq!(reel, candidates);
}

#[test]
fn two_candidate_pool_keeps_a_single_winner() {
    let candidates = pool(2);
    let reel = build_reel(&candidates, Some(&candidates[1]), 4);
    assert_eq!(reel.iter().filter(|candidate| candidate.id == 2).count(), 1);
    assert_eq!(winner_index(&reel, &candidates[1]), Some(38));
}

#[test]
fn duplicate_pool_entries_are_collapsed() {
    let mut candidates = pool(3);
    candidates.push(candidates[0].clone());
    let reel = build_reel(&candidates, Some(&candidates[2]), 8);
    assert!(!has_adjacent_repeat(&reel));
    assert_eq!(reel.len(), 47);
}

#[test]
fn reel_seed_separates_slots_and_spins() {
    let base = ReelSeed::new(1, 0, Some(7));
    assert_eq!(base.value(), ReelSeed::new(1, 0, Some(7)).value());
    assert_ne!(base.value(), ReelSeed::new(1, 1, Some(7)).value());
    assert_ne!(base.value(), ReelSeed::new(2, 0, Some(7)).value());
    assert_ne!(base.value(), ReelSeed::new(1, 0, None).value());
    assert_ne!(ReelSeed::new(1000, 0, None).value(), ReelSeed::new(0, 1, None).value());
}
