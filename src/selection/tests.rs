use super::*;
use crate::catalog;
use crate::config::ShuffleMode;
use crate::error::Error;
use crate::library::{Index, IndexFingerprint, rescan};
use crate::testutil::Collection;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

const ALL_MODES: [ShuffleMode; 4] = [
    ShuffleMode::Default,
    ShuffleMode::Basic,
    ShuffleMode::Full,
    ShuffleMode::SinglePool,
];

/// Two packs with every non-extended track plus a few extended ones.
fn full_collection() -> Collection {
    let c = Collection::new();
    for pool in ["a", "b"] {
        for id in 1..=34 {
            c.track(pool, id);
        }
    }
    c.track("a", 35);
    c.track("b", 47);
    c
}

#[test]
fn non_looping_tracks_keep_their_own_number_in_every_mode() {
    let c = full_collection();
    let mut rng = StdRng::seed_from_u64(1);

    for mode in ALL_MODES {
        let index = rescan(&c.settings(mode)).unwrap();
        for _ in 0..20 {
            let plan = select(&index, mode, &mut rng);
            for pick in plan.picks.iter().filter(|p| !catalog::is_looping(p.dest)) {
                assert_eq!(pick.src, pick.dest, "{mode:?}");
                assert!(index.candidates(pick.dest).contains(&pick.path));
            }
        }
    }
}

#[test]
fn basic_mode_keeps_every_track_in_place() {
    let c = full_collection();
    let index = rescan(&c.settings(ShuffleMode::Basic)).unwrap();
    let mut rng = StdRng::seed_from_u64(2);

    let plan = select(&index, ShuffleMode::Basic, &mut rng);
    assert!(plan.skipped.is_empty());
    assert_eq!(plan.picks.len(), index.len());
    for pick in &plan.picks {
        assert_eq!(pick.src, pick.dest);
        assert!(index.candidates(pick.dest).contains(&pick.path));
    }
}

#[test]
fn full_mode_permutes_the_looping_tracks() {
    let c = full_collection();
    let index = rescan(&c.settings(ShuffleMode::Full)).unwrap();
    let mut rng = StdRng::seed_from_u64(3);

    let plan = select(&index, ShuffleMode::Full, &mut rng);
    let looping: HashSet<u8> = index.track_ids().filter(|id| catalog::is_looping(*id)).collect();
    let sources: Vec<u8> = plan
        .picks
        .iter()
        .filter(|p| catalog::is_looping(p.dest))
        .map(|p| p.src)
        .collect();

    assert_eq!(sources.len(), looping.len());
    assert_eq!(sources.iter().copied().collect::<HashSet<_>>(), looping);
    for pick in &plan.picks {
        assert!(index.candidates(pick.src).contains(&pick.path));
    }
}

#[test]
fn full_mode_does_not_favor_any_source() {
    let c = Collection::new();
    let looping = [2u8, 3, 4, 5];
    for id in looping {
        c.track("a", id);
    }
    let index = rescan(&c.settings(ShuffleMode::Full)).unwrap();
    let mut rng = StdRng::seed_from_u64(4);

    let trials = 4000;
    let mut counts: HashMap<(u8, u8), usize> = HashMap::new();
    let mut fixed_points = 0;
    for _ in 0..trials {
        let plan = select(&index, ShuffleMode::Full, &mut rng);
        for pick in &plan.picks {
            *counts.entry((pick.dest, pick.src)).or_default() += 1;
            if pick.dest == pick.src {
                fixed_points += 1;
            }
        }
    }

    // Each of the 4 sources should land on each destination about 1/4 of the time.
    for dest in looping {
        for src in looping {
            let n = counts.get(&(dest, src)).copied().unwrap_or(0);
            assert!((800..1200).contains(&n), "{dest} <- {src}: {n}");
        }
    }
    // A plain shuffle, not a derangement.
    assert!(fixed_points > 0);
}

#[test]
fn default_mode_draws_evenly_from_packs_with_the_same_track() {
    let c = Collection::new();
    let a2 = c.track("a", 2);
    let b2 = c.track("b", 2);
    let index = rescan(&c.settings(ShuffleMode::Default)).unwrap();
    let mut rng = StdRng::seed_from_u64(5);

    let mut from_a = 0;
    for _ in 0..1000 {
        let plan = select(&index, ShuffleMode::Default, &mut rng);
        let pick = plan.pick(2).unwrap();
        assert_eq!(pick.src, 2);
        if pick.path == a2 {
            from_a += 1;
        } else {
            assert_eq!(pick.path, b2);
        }
    }
    assert!((400..=600).contains(&from_a), "{from_a}");
}

#[test]
fn default_mode_fills_a_missing_extended_track_from_its_generic_backup() {
    let c = Collection::new();
    let a17 = c.track("a", 17);
    let b17 = c.track("b", 17);
    let index = rescan(&c.settings(ShuffleMode::Default)).unwrap();
    let mut rng = StdRng::seed_from_u64(6);

    for _ in 0..50 {
        let plan = select(&index, ShuffleMode::Default, &mut rng);
        let pick = plan.pick(35).unwrap();
        assert_eq!(pick.src, 17);
        assert!(pick.path == a17 || pick.path == b17);
    }
}

#[test]
fn default_mode_prefers_a_packs_own_extended_track() {
    let c = Collection::new();
    let a35 = c.track("a", 35);
    c.track("a", 17);
    let index = rescan(&c.settings(ShuffleMode::Default)).unwrap();
    let mut rng = StdRng::seed_from_u64(7);

    let plan = select(&index, ShuffleMode::Default, &mut rng);
    let pick = plan.pick(35).unwrap();
    assert_eq!(pick.src, 35);
    assert_eq!(pick.path, a35);
}

#[test]
fn default_mode_mixes_own_and_generic_extended_tracks_across_packs() {
    let c = Collection::new();
    let a47 = c.track("a", 47);
    let b21 = c.track("b", 21);
    let index = rescan(&c.settings(ShuffleMode::Default)).unwrap();
    let mut rng = StdRng::seed_from_u64(8);

    let mut own = 0;
    let mut generic = 0;
    for _ in 0..400 {
        let plan = select(&index, ShuffleMode::Default, &mut rng);
        let pick = plan.pick(47).unwrap();
        match pick.src {
            47 => {
                assert_eq!(pick.path, a47);
                own += 1;
            }
            21 => {
                assert_eq!(pick.path, b21);
                generic += 1;
            }
            other => panic!("unexpected source {other}"),
        }
    }
    assert!(own > 100 && generic > 100, "{own} / {generic}");
}

#[test]
fn extended_track_is_skipped_when_no_pack_can_supply_it() {
    let pools = vec![PathBuf::from("/packs/a")];
    let fingerprint = IndexFingerprint {
        collection_root: PathBuf::from("/packs"),
        single_pool: None,
        extended_backups: true,
    };
    let mut index = Index::new(fingerprint, pools);
    // A stale entry pointing outside every known pack.
    index.add_candidates(35, vec![PathBuf::from("/elsewhere/x-35.pcm")]);
    index.add_candidates(2, vec![PathBuf::from("/packs/a/a-2.pcm")]);
    let mut rng = StdRng::seed_from_u64(9);

    let plan = select(&index, ShuffleMode::Default, &mut rng);
    assert_eq!(plan.picks.len(), 1);
    assert_eq!(plan.picks[0].dest, 2);
    assert_eq!(plan.skipped.len(), 1);
    assert_eq!(plan.skipped[0].id, 35);
    assert!(matches!(
        plan.skipped[0].reason,
        Error::ExtendedFallbackExhausted { id: 35, attempts: EXTENDED_ATTEMPTS }
    ));
    assert!(!plan.skipped[0].reason.is_fatal());
}

#[test]
fn seeded_generators_give_identical_plans() {
    let c = full_collection();
    let index = rescan(&c.settings(ShuffleMode::Full)).unwrap();

    let first = select(&index, ShuffleMode::Full, &mut StdRng::seed_from_u64(42));
    let second = select(&index, ShuffleMode::Full, &mut StdRng::seed_from_u64(42));
    assert_eq!(first.picks, second.picks);
}
