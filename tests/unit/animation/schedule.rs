use super::*;
use crate::foundation::math::approx_eq;

fn ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("p{i}")).collect()
}

#[test]
fn sequential_splits_evenly() {
    let s = schedule(&ids(4), 10.0, StaggerPolicy::Sequential, Ease::Linear).unwrap();
    assert_eq!(s.len(), 4);
    for (i, e) in s.entries().iter().enumerate() {
        assert!(approx_eq(e.start_fraction, i as f64 / 4.0));
        assert!(approx_eq(e.duration_fraction, 0.25));
        assert!(e.start_fraction + e.duration_fraction <= 1.0);
    }
    assert!(approx_eq(s.get("p2").unwrap().start_seconds(10.0), 5.0));
    assert!(approx_eq(s.get("p2").unwrap().duration_seconds(10.0), 2.5));
}

#[test]
fn sequential_with_awkward_counts_stays_in_window() {
    for n in 1..50 {
        let s = schedule(&ids(n), 1.0, StaggerPolicy::Sequential, Ease::Linear).unwrap();
        for (i, e) in s.entries().iter().enumerate() {
            assert_eq!(e.start_fraction, i as f64 / n as f64);
            assert!(e.start_fraction + e.duration_fraction <= 1.0);
        }
    }
}

#[test]
fn none_uses_full_window() {
    let s = schedule(&ids(3), 2.0, StaggerPolicy::None, Ease::EaseIn).unwrap();
    for e in s.entries() {
        assert_eq!(e.start_fraction, 0.0);
        assert_eq!(e.duration_fraction, 1.0);
        assert_eq!(e.easing, Ease::EaseIn);
    }
}

#[test]
fn overlapping_windows_overlap_by_fraction() {
    let policy = StaggerPolicy::Overlapping { fraction: 0.5 };
    let s = schedule(&ids(3), 1.0, policy, Ease::Linear).unwrap();
    let e = s.entries();
    // d = 1 / (2 * 0.5 + 1) = 0.5
    assert!(approx_eq(e[0].duration_fraction, 0.5));
    assert!(approx_eq(e[1].start_fraction, 0.25));
    assert!(approx_eq(e[2].start_fraction, 0.5));
    assert!(approx_eq(e[2].end_fraction(), 1.0));
    let overlap = e[0].end_fraction() - e[1].start_fraction;
    assert!(approx_eq(overlap, 0.5 * e[0].duration_fraction));
}

#[test]
fn overlapping_extremes() {
    let zero = schedule(&ids(5), 1.0, StaggerPolicy::Overlapping { fraction: 0.0 }, Ease::Linear).unwrap();
    let seq = schedule(&ids(5), 1.0, StaggerPolicy::Sequential, Ease::Linear).unwrap();
    for (a, b) in zero.entries().iter().zip(seq.entries()) {
        assert!(approx_eq(a.start_fraction, b.start_fraction));
        assert!(approx_eq(a.duration_fraction, b.duration_fraction));
    }
    let full = schedule(&ids(5), 1.0, StaggerPolicy::Overlapping { fraction: 1.0 }, Ease::Linear).unwrap();
    assert!(full.entries().iter().all(|e| e.start_fraction == 0.0 && e.duration_fraction == 1.0));
}

#[test]
fn later_paths_never_start_earlier() {
    for policy in [
        StaggerPolicy::None,
        StaggerPolicy::Sequential,
        StaggerPolicy::Overlapping { fraction: 0.3 },
    ] {
        let s = schedule(&ids(7), 3.0, policy, Ease::Linear).unwrap();
        assert!(
            s.entries()
                .windows(2)
                .all(|w| w[0].start_fraction <= w[1].start_fraction)
        );
    }
}

#[test]
fn empty_input_gives_empty_schedule() {
    let s = schedule::<&str>(&[], 1.0, StaggerPolicy::Sequential, Ease::Linear).unwrap();
    assert!(s.is_empty());
    assert!(s.get("anything").is_none());
}

#[test]
fn invalid_inputs_are_config_errors() {
    for d in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            schedule(&ids(2), d, StaggerPolicy::Sequential, Ease::Linear),
            Err(DrawonError::InvalidConfiguration(_))
        ));
    }
    assert!(schedule(&ids(2), 1.0, StaggerPolicy::Overlapping { fraction: 1.5 }, Ease::Linear).is_err());
    let err = schedule(&["a", "b", "a"], 1.0, StaggerPolicy::Sequential, Ease::Linear).unwrap_err();
    assert!(err.to_string().contains("duplicate path id 'a'"));
}

#[test]
fn policy_text_forms() {
    assert_eq!("none".parse::<StaggerPolicy>().unwrap(), StaggerPolicy::None);
    assert_eq!(
        "overlapping:0.25".parse::<StaggerPolicy>().unwrap(),
        StaggerPolicy::Overlapping { fraction: 0.25 }
    );
    assert!("overlapping:2".parse::<StaggerPolicy>().is_err());
    assert!("overlapping:abc".parse::<StaggerPolicy>().is_err());
    assert!("staggered".parse::<StaggerPolicy>().is_err());
    assert_eq!(StaggerPolicy::Overlapping { fraction: 0.25 }.to_string(), "overlapping:0.25");

    let json = serde_json::to_string(&StaggerPolicy::Sequential).unwrap();
    assert_eq!(json, "\"sequential\"");
    let back: StaggerPolicy = serde_json::from_str("\"overlapping:0.5\"").unwrap();
    assert_eq!(back, StaggerPolicy::Overlapping { fraction: 0.5 });
    assert!(serde_json::from_str::<StaggerPolicy>("\"sideways\"").is_err());
}
