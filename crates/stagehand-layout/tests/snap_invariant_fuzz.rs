//! Property/fuzz-style invariants for zone snapping.
//!
//! Random streams of bounds updates, gesture ends, focus changes and
//! unmounts are fed to a zone; structural invariants of the registry and
//! snap set are checked after every step.

use proptest::prelude::*;
use stagehand_core::{Point, Scale, Size, StageFrame};
use stagehand_layout::{BoundsReport, PaneId, SnapKey, Zone, ZoneConfig, ZoneId};

#[derive(Debug, Clone)]
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x9E37_79B9_7F4A_7C15,
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }

    fn next_f64_range(&mut self, min: f64, max: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        min + unit * (max - min)
    }

    fn choose_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        (self.next_u64() % len as u64) as usize
    }

    fn choose_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 0
    }
}

fn id(raw: u64) -> PaneId {
    PaneId::new(raw).expect("ids in this suite are non-zero")
}

fn random_report(rng: &mut Lcg) -> BoundsReport {
    // Coarse grid so adjacency actually happens.
    let x = (rng.next_f64_range(0.0, 12.0)).floor() * 110.0;
    let y = (rng.next_f64_range(0.0, 3.0)).floor() * 40.0;
    let w = 80.0 + (rng.next_f64_range(0.0, 3.0)).floor() * 10.0;
    let h = 200.0 + (rng.next_f64_range(0.0, 3.0)).floor() * 20.0;
    BoundsReport::new(Point::new(x, y), Size::new(w, h))
}

fn assert_zone_invariants(zone: &Zone) {
    for snap in zone.snaps().iter() {
        assert_ne!(snap.left, snap.right, "snap must relate two windows");
        let left = zone.window(snap.left).expect("snap left must be registered");
        let right = zone.window(snap.right).expect("snap right must be registered");
        assert!(!left.staged && !right.staged, "staged windows never snap");
        assert_eq!(snap.key(), SnapKey::new(snap.right, snap.left));
    }
    if let Some(candidate) = zone.candidate() {
        assert_ne!(candidate.left, candidate.right);
    }
    if let Some(ts) = zone.pending_to_snap() {
        assert!(ts.windows.contains(&ts.target));
        assert!(zone.window(ts.target).is_some());
    }
    assert!(zone.pending_unmounts().is_empty());
}

fn run_stream(seed: u64, steps: usize, frame: &StageFrame) -> Vec<(SnapKey, PaneId, PaneId)> {
    let mut rng = Lcg::new(seed);
    let mut zone = Zone::new(ZoneId::new(1), ZoneConfig::default());
    let mut live: Vec<u64> = Vec::new();
    let mut next_id = 1u64;

    for _ in 0..steps {
        match rng.choose_index(6) {
            0 if live.len() < 8 => {
                let raw = next_id;
                next_id += 1;
                let report = random_report(&mut rng);
                zone.on_window_bounds_changed(frame, id(raw), report.moving(true));
                zone.on_user_bounds_change_end(frame, id(raw), report);
                live.push(raw);
            }
            1 | 2 if !live.is_empty() => {
                let raw = live[rng.choose_index(live.len())];
                let report = random_report(&mut rng);
                let moving = rng.choose_bool();
                zone.on_window_bounds_changed(
                    frame,
                    id(raw),
                    report.moving(moving).resizing(!moving),
                );
                if rng.choose_bool() {
                    zone.on_user_bounds_change_end(frame, id(raw), report);
                }
            }
            3 if !live.is_empty() => {
                let raw = live[rng.choose_index(live.len())];
                let staged = rng.choose_bool();
                let report = random_report(&mut rng).staged(staged);
                zone.on_window_bounds_changed(frame, id(raw), report.moving(true));
                zone.on_user_bounds_change_end(frame, id(raw), report);
            }
            4 if !live.is_empty() => {
                let raw = live[rng.choose_index(live.len())];
                zone.focus_window(id(raw), rng.choose_bool());
            }
            5 if !live.is_empty() => {
                let idx = rng.choose_index(live.len());
                let raw = live.swap_remove(idx);
                zone.queue_unmount(id(raw));
            }
            _ => {}
        }
        zone.flush_unmounted();
        assert_zone_invariants(&zone);
    }

    zone.snaps()
        .iter()
        .map(|snap| (snap.key(), snap.left, snap.right))
        .collect()
}

#[test]
fn random_streams_preserve_invariants() {
    let frame = StageFrame::unscaled(Size::new(1600.0, 900.0));
    for seed in 0..64 {
        run_stream(seed, 400, &frame);
    }
}

#[test]
fn random_streams_are_deterministic() {
    let frame = StageFrame::new(
        Size::new(1600.0, 900.0),
        Scale::new(1.25, 1.25).expect("valid scale"),
    );
    for seed in [3, 17, 99, 1024] {
        assert_eq!(run_stream(seed, 300, &frame), run_stream(seed, 300, &frame));
    }
}

proptest! {
    #[test]
    fn snap_is_symmetric_in_interaction_order(
        gap in 0.0f64..49.0,
        dy in -49.0f64..49.0,
        w in 100.0f64..400.0,
    ) {
        let frame = StageFrame::unscaled(Size::new(4000.0, 2000.0));
        let a = BoundsReport::new(Point::new(100.0, 200.0), Size::new(w, 300.0));
        let b = BoundsReport::new(Point::new(100.0 + w + gap, 200.0 + dy), Size::new(200.0, 300.0));

        let mut first = Zone::new(ZoneId::new(1), ZoneConfig::default());
        first.on_window_bounds_changed(&frame, id(2), b);
        first.on_window_bounds_changed(&frame, id(1), a.moving(true));
        first.on_user_bounds_change_end(&frame, id(1), a);

        let mut second = Zone::new(ZoneId::new(1), ZoneConfig::default());
        second.on_window_bounds_changed(&frame, id(1), a);
        second.on_window_bounds_changed(&frame, id(2), b.moving(true));
        second.on_user_bounds_change_end(&frame, id(2), b);

        let from_a: Vec<_> = first.snaps().iter().map(|s| (s.left, s.right)).collect();
        let from_b: Vec<_> = second.snaps().iter().map(|s| (s.left, s.right)).collect();
        prop_assert_eq!(&from_a, &vec![(id(1), id(2))]);
        prop_assert_eq!(from_a, from_b);
    }

    #[test]
    fn repeated_gestures_keep_one_snap(repeats in 1usize..6) {
        let frame = StageFrame::unscaled(Size::new(4000.0, 2000.0));
        let a = BoundsReport::new(Point::new(0.0, 0.0), Size::new(200.0, 300.0));
        let b = BoundsReport::new(Point::new(230.0, 0.0), Size::new(200.0, 300.0));
        let mut zone = Zone::new(ZoneId::new(1), ZoneConfig::default());
        zone.on_window_bounds_changed(&frame, id(2), b);
        for _ in 0..repeats {
            zone.on_window_bounds_changed(&frame, id(1), a.moving(true));
            zone.on_user_bounds_change_end(&frame, id(1), a);
        }
        prop_assert_eq!(zone.snaps().len(), 1);
    }
}
