use super::*;
use crate::animation::ease::Ease;
use crate::animation::schedule::StaggerPolicy;
use crate::animation::state::Phase;
use crate::engine::drawing::PathSource;
use crate::foundation::core::DocumentSize;

fn drawing() -> Drawing {
    Drawing::from_path_data(
        DocumentSize::new(100.0, 100.0).unwrap(),
        [
            PathSource::new("M0 0 L10 0", "line", Some(Rgba8::opaque(255, 0, 0))),
            PathSource::new("M0 0 H10 V10 H0 Z", "square", None),
        ],
    )
    .unwrap()
}

fn linear(policy: StaggerPolicy) -> AnimationConfig {
    AnimationConfig {
        duration: 1.0,
        stagger_policy: policy,
        easing_kind: Ease::Linear,
        ..AnimationConfig::default()
    }
}

#[test]
fn rejects_invalid_config_before_work() {
    let d = drawing();
    let cfg = AnimationConfig {
        fps: 0,
        ..AnimationConfig::default()
    };
    assert!(matches!(
        Animator::new(&d, cfg),
        Err(crate::foundation::error::DrawonError::InvalidConfiguration(_))
    ));
}

#[test]
fn evaluate_by_id() {
    let d = drawing();
    let anim = Animator::new(&d, linear(StaggerPolicy::None)).unwrap();
    let s = anim.evaluate("line", 0.5).unwrap();
    assert_eq!(s.drawn_length_fraction, 0.5);
    assert!(anim.evaluate("missing", 0.5).is_none());
}

#[test]
fn evaluate_all_covers_every_path() {
    let d = drawing();
    let anim = Animator::new(&d, linear(StaggerPolicy::Sequential)).unwrap();
    let all = anim.evaluate_all(0.5);
    assert_eq!(all.len(), 2);
    assert_eq!(all["line"].drawn_length_fraction, 1.0);
    assert_eq!(all["square"].drawn_length_fraction, 0.0);
    assert!(all["square"].is_visible);
}

#[test]
fn unfilled_paths_never_fill() {
    let d = drawing();
    let anim = Animator::new(&d, linear(StaggerPolicy::None)).unwrap();
    let all = anim.evaluate_all(1.0);
    assert_eq!(all["line"].fill_opacity, 1.0);
    assert_eq!(all["square"].fill_opacity, 0.0);
    assert_eq!(all["square"].phase, Phase::DrawnNoFill);
}

#[test]
fn snapshot_carries_geometry_and_dash() {
    let d = drawing();
    let anim = Animator::new(&d, linear(StaggerPolicy::None)).unwrap();
    let snap = anim.snapshot(0.5);
    assert_eq!(snap.paths.len(), 2);
    assert_eq!(snap.background, Rgba8::WHITE);

    let line = &snap.paths[0];
    assert_eq!(line.id, "line");
    assert_eq!(line.head, Point::new(5.0, 0.0));
    assert_eq!(line.dash, StrokeDash { dash_array: 10.0, dash_offset: 5.0 });
    assert!(line.fill_outline.is_none());
    assert_eq!(line.style.stroke, Rgba8::BLACK);
    assert_eq!(line.style.stroke_width, 2.0);

    let square = &snap.paths[1];
    assert_eq!(square.total_length, 40.0);
    assert_eq!(square.head, Point::new(10.0, 10.0));
    assert_eq!(square.tangent, Vec2::new(0.0, 1.0));
}

#[test]
fn fill_outline_appears_once_filling() {
    let d = drawing();
    let anim = Animator::new(&d, linear(StaggerPolicy::Sequential)).unwrap();
    let snap = anim.snapshot(0.55);
    assert!(snap.paths[0].fill_outline.is_some());
    assert_eq!(snap.paths[0].fill_outline.as_ref(), Some(&d.paths()[0].path().to_bezpath()));
}

#[test]
fn frames_map_to_time_fractions() {
    let d = drawing();
    let cfg = AnimationConfig {
        duration: 2.0,
        fps: 5,
        ..linear(StaggerPolicy::None)
    };
    let anim = Animator::new(&d, cfg).unwrap();
    assert_eq!(anim.frame_count(), 10);
    let last = anim.frame_snapshot(FrameIndex(9));
    assert_eq!(last.time_fraction, 1.0);
    assert!(last.paths.iter().all(|p| p.state.drawn_length_fraction == 1.0));
    assert_eq!(anim.time_fraction_at(1.0), 0.5);
    assert_eq!(anim.time_fraction_at(9.0), 1.0);
}
