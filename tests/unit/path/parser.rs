use super::*;

fn points(segments: &[PathSegment]) -> Vec<(f64, f64)> {
    segments
        .iter()
        .map(|s| {
            let p = s.end_point();
            (p.x, p.y)
        })
        .collect()
}

fn kinds(segments: &[PathSegment]) -> Vec<&'static str> {
    segments
        .iter()
        .map(|s| match s {
            PathSegment::MoveTo { .. } => "M",
            PathSegment::LineTo { .. } => "L",
            PathSegment::CubicCurve { .. } => "C",
            PathSegment::QuadraticCurve { .. } => "Q",
            PathSegment::ArcTo(_) => "A",
            PathSegment::Close { .. } => "Z",
        })
        .collect()
}

fn offset_of(err: DrawonError) -> usize {
    match err {
        DrawonError::MalformedPath { offset, .. } => offset,
        other => panic!("expected MalformedPath, got {other:?}"),
    }
}

#[test]
fn command_letters_map_to_kinds() {
    let c = Command::from_letter('m').unwrap();
    assert_eq!(c.kind, CommandKind::MoveTo);
    assert!(c.relative);
    assert_eq!(Command::from_letter('T').unwrap().kind, CommandKind::SmoothQuadratic);
    assert!(Command::from_letter('x').is_none());
}

#[test]
fn repetition_rule() {
    let m = Command::from_letter('M').unwrap();
    assert_eq!(
        m.repeated(),
        Some(Command {
            kind: CommandKind::LineTo,
            relative: false
        })
    );
    let m = Command::from_letter('m').unwrap();
    assert!(m.repeated().unwrap().relative);
    let c = Command::from_letter('c').unwrap();
    assert_eq!(c.repeated(), Some(c));
    assert_eq!(Command::from_letter('Z').unwrap().repeated(), None);
}

#[test]
fn close_subpath_adds_line_only_when_needed() {
    let mut b = PathBuilder::new();
    b.move_to(Point::new(0.0, 0.0));
    b.line_to(Point::new(10.0, 0.0));
    b.line_to(Point::new(10.0, 10.0));
    b.close_subpath();
    let segs = b.finish();
    assert_eq!(kinds(&segs), vec!["M", "L", "L", "L", "Z"]);
    assert_eq!(segs[3].end_point(), Point::new(0.0, 0.0));

    let mut b = PathBuilder::new();
    b.move_to(Point::new(0.0, 0.0));
    b.line_to(Point::new(10.0, 0.0));
    b.line_to(Point::new(0.0, 0.0));
    b.close_subpath();
    b.close_subpath();
    assert_eq!(kinds(&b.finish()), vec!["M", "L", "L", "Z"]);
}

#[test]
fn absolute_and_relative_lines() {
    let segs = parse_path_data("M10 10 l5 0 L0 0 h3 v-4 H1 V2").unwrap();
    assert_eq!(
        points(&segs),
        vec![
            (10.0, 10.0),
            (15.0, 10.0),
            (0.0, 0.0),
            (3.0, 0.0),
            (3.0, -4.0),
            (1.0, -4.0),
            (1.0, 2.0)
        ]
    );
    assert_eq!(kinds(&segs), vec!["M", "L", "L", "L", "L", "L", "L"]);
    match &segs[1] {
        PathSegment::LineTo { from, .. } => assert_eq!(*from, Point::new(10.0, 10.0)),
        other => panic!("{other:?}"),
    }
}

#[test]
fn implicit_repetition_after_moveto_is_lineto() {
    let segs = parse_path_data("M0 0 10 0 10 10").unwrap();
    assert_eq!(kinds(&segs), vec!["M", "L", "L"]);
    let segs = parse_path_data("m1 1 2 0 0 2").unwrap();
    assert_eq!(points(&segs), vec![(1.0, 1.0), (3.0, 1.0), (3.0, 3.0)]);
}

#[test]
fn implicit_repetition_of_curves() {
    let segs = parse_path_data("M0 0 c1 1 2 2 3 3 1 1 2 2 3 3").unwrap();
    assert_eq!(kinds(&segs), vec!["M", "C", "C"]);
    assert_eq!(segs[2].end_point(), Point::new(6.0, 6.0));
    match &segs[2] {
        PathSegment::CubicCurve { ctrl1, .. } => assert_eq!(*ctrl1, Point::new(4.0, 4.0)),
        other => panic!("{other:?}"),
    }
}

#[test]
fn close_inserts_line_and_reopens_at_start() {
    let segs = parse_path_data("M0 0 L10 0 L10 10 Z l5 5").unwrap();
    assert_eq!(kinds(&segs), vec!["M", "L", "L", "L", "Z", "M", "L"]);
    assert_eq!(segs[3].end_point(), Point::new(0.0, 0.0));
    assert_eq!(segs[5].end_point(), Point::new(0.0, 0.0));
    assert_eq!(segs[6].end_point(), Point::new(5.0, 5.0));
}

#[test]
fn close_after_return_to_start_has_no_extra_line() {
    let segs = parse_path_data("M0 0 L10 0 L0 0 z").unwrap();
    assert_eq!(kinds(&segs), vec!["M", "L", "L", "Z"]);
}

#[test]
fn smooth_curves_reflect_previous_control() {
    let segs = parse_path_data("M0 0 C0 10 10 10 10 0 S20 -10 20 0").unwrap();
    match &segs[2] {
        PathSegment::CubicCurve { ctrl1, .. } => assert_eq!(*ctrl1, Point::new(10.0, -10.0)),
        other => panic!("{other:?}"),
    }

    let segs = parse_path_data("M0 0 Q5 5 10 0 T20 0").unwrap();
    match &segs[2] {
        PathSegment::QuadraticCurve { ctrl, .. } => assert_eq!(*ctrl, Point::new(15.0, -5.0)),
        other => panic!("{other:?}"),
    }

    // S after a line has no control to reflect and uses the current point.
    let segs = parse_path_data("M0 0 L5 0 S10 5 10 0").unwrap();
    match &segs[2] {
        PathSegment::CubicCurve { ctrl1, .. } => assert_eq!(*ctrl1, Point::new(5.0, 0.0)),
        other => panic!("{other:?}"),
    }

    // T after a cubic does not reflect the cubic control.
    let segs = parse_path_data("M0 0 C0 10 10 10 10 0 T20 0").unwrap();
    match &segs[2] {
        PathSegment::QuadraticCurve { ctrl, .. } => assert_eq!(*ctrl, Point::new(10.0, 0.0)),
        other => panic!("{other:?}"),
    }
}

#[test]
fn arcs_are_center_parameterized() {
    let segs = parse_path_data("M0 0 A10 10 0 0 1 20 0").unwrap();
    match &segs[1] {
        PathSegment::ArcTo(arc) => {
            assert!((arc.center.x - 10.0).abs() < 1e-9);
            assert!(arc.center.y.abs() < 1e-9);
            assert!((arc.sweep_angle.abs() - std::f64::consts::PI).abs() < 1e-9);
        }
        other => panic!("{other:?}"),
    }
}

#[test]
fn packed_arc_flags() {
    let packed = parse_path_data("M0 0 a10 10 0 0120 0").unwrap();
    let spaced = parse_path_data("M0 0 a10 10 0 0 1 20 0").unwrap();
    assert_eq!(packed, spaced);
}

#[test]
fn arc_special_cases() {
    let segs = parse_path_data("M0 0 A0 5 0 0 1 10 0").unwrap();
    assert_eq!(kinds(&segs), vec!["M", "L"]);
    let segs = parse_path_data("M3 3 A5 5 0 0 1 3 3 L4 4").unwrap();
    assert_eq!(kinds(&segs), vec!["M", "L"]);
}

#[test]
fn number_separators() {
    let segs = parse_path_data("M10-5L.5.5,1e1-2").unwrap();
    assert_eq!(points(&segs), vec![(10.0, -5.0), (0.5, 0.5), (10.0, -2.0)]);
}

#[test]
fn errors_carry_offsets() {
    assert_eq!(offset_of(parse_path_data("").unwrap_err()), 0);
    assert_eq!(offset_of(parse_path_data("   ").unwrap_err()), 0);
    assert_eq!(offset_of(parse_path_data("L0 0").unwrap_err()), 0);
    assert_eq!(offset_of(parse_path_data("M0 0 X1 1").unwrap_err()), 5);
    assert_eq!(offset_of(parse_path_data("M0 0 L1").unwrap_err()), 7);
    assert_eq!(offset_of(parse_path_data("M0 0 L1 q").unwrap_err()), 8);
    assert_eq!(offset_of(parse_path_data("M0 0 Z 5 5").unwrap_err()), 7);
    assert_eq!(offset_of(parse_path_data("M0 0 A1 1 0 2 0 5 5").unwrap_err()), 12);
}

#[test]
fn error_messages_name_the_problem() {
    let err = parse_path_data("M0 0 X1 1").unwrap_err();
    assert!(err.to_string().contains("unknown path command 'X'"), "{err}");
    let err = parse_path_data("M0 0 L1").unwrap_err().with_path_id("outline");
    let msg = err.to_string();
    assert!(msg.contains("in path 'outline'"), "{msg}");
    assert!(msg.contains("end of data"), "{msg}");
}

#[test]
fn serialization_reproduces_absolute_points() {
    let inputs = [
        "M0 0 L10 0",
        "m1 1 l2 3 h4 v-5 z m10 10 c1 2 3 4 5 6 s7 8 9 10",
        "M0 0 q5 5 10 0 t10 0 Z L3 3",
        "M0 0 a10 5 30 1 0 20 5 A3 3 0 0 1 25 10",
        "M-1.5e1,2 .5.5 -3-3Z",
    ];
    for d in inputs {
        let segs = parse_path_data(d).unwrap();
        let text = segments_to_svg_d(&segs);
        let again = parse_path_data(&text).unwrap();
        assert_eq!(points(&segs), points(&again), "{d} -> {text}");
        assert_eq!(kinds(&segs), kinds(&again), "{d} -> {text}");
    }
}

#[test]
fn serialization_format() {
    let segs = parse_path_data("m1 1 l2 0 z").unwrap();
    assert_eq!(segments_to_svg_d(&segs), "M1 1 L3 1 L1 1 Z");
}
