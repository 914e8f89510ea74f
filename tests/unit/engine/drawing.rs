use super::*;

const SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 200 100" width="400" height="200">
  <path id="a" d="M10 10 L110 10" fill="#ff0000"/>
  <g>
    <path d="M0 50 H100" fill="none" stroke="blue" stroke-width="3"/>
  </g>
  <defs><path id="hidden" d="M0 0 L5 5"/></defs>
  <path id="dot" d="M5 5 L5 5"/>
  <path id="styled" d="M0 0 L0 10" style="fill: #00ff00; stroke:#000; fill-rule: evenodd"/>
</svg>"##;

#[test]
fn loads_paths_in_document_order() {
    let d = Drawing::from_svg_str(SVG).unwrap();
    assert_eq!(d.path_ids(), vec!["a", "path1", "styled"]);
    assert_eq!(d.size(), DocumentSize { width: 200.0, height: 100.0 });
    assert_eq!(d.get("a").unwrap().total_length(), 100.0);
}

#[test]
fn degenerate_paths_are_skipped_not_fatal() {
    let d = Drawing::from_svg_str(SVG).unwrap();
    assert_eq!(d.skipped().len(), 1);
    assert_eq!(d.skipped()[0].id, "dot");
    assert!(d.skipped()[0].reason.contains("degenerate path 'dot'"));
    assert!(d.get("dot").is_none());
}

#[test]
fn reads_presentation_attributes_and_style() {
    let d = Drawing::from_svg_str(SVG).unwrap();
    let a = d.get("a").unwrap().path().style();
    assert_eq!(a.fill, Some(Rgba8::opaque(255, 0, 0)));
    assert_eq!(a.stroke, None);

    let unnamed = d.get("path1").unwrap().path().style();
    assert_eq!(unnamed.fill, None);
    assert_eq!(unnamed.stroke, Some(Rgba8::opaque(0, 0, 255)));
    assert_eq!(unnamed.stroke_width, Some(3.0));

    let styled = d.get("styled").unwrap().path().style();
    assert_eq!(styled.fill, Some(Rgba8::opaque(0, 255, 0)));
    assert_eq!(styled.stroke, Some(Rgba8::BLACK));
    assert_eq!(styled.fill_rule, FillRule::EvenOdd);
}

#[test]
fn missing_fill_defaults_to_black_and_bad_paint_is_ignored() {
    let svg = r#"<svg width="10px" height="20"><path id="p" d="M0 0 L1 1"/><path id="g" d="M0 0 L2 2" fill="url(#grad)"/></svg>"#;
    let d = Drawing::from_svg_str(svg).unwrap();
    assert_eq!(d.get("p").unwrap().path().style().fill, Some(Rgba8::BLACK));
    assert_eq!(d.get("g").unwrap().path().style().fill, Some(Rgba8::BLACK));
    assert_eq!(d.size(), DocumentSize { width: 10.0, height: 20.0 });
}

#[test]
fn listing_reports_source_data() {
    let d = Drawing::from_svg_str(SVG).unwrap();
    let listing = d.path_listing();
    assert_eq!(listing.len(), 3);
    assert_eq!(listing[0].id, "a");
    assert_eq!(listing[0].d, "M10 10 L110 10");
    assert_eq!(listing[0].fill.as_deref(), Some("#ff0000"));
    assert_eq!(listing[1].fill, None);
}

#[test]
fn malformed_path_aborts_with_id() {
    let svg = r#"<svg viewBox="0 0 10 10"><path id="bad" d="M0 0 L1"/></svg>"#;
    match Drawing::from_svg_str(svg).unwrap_err() {
        DrawonError::MalformedPath { path_id, .. } => assert_eq!(path_id.as_deref(), Some("bad")),
        other => panic!("{other:?}"),
    }
}

#[test]
fn document_errors() {
    for svg in [
        "not xml at all <",
        r#"<html><path d="M0 0 L1 1"/></html>"#,
        r#"<svg><path d="M0 0 L1 1"/></svg>"#,
        r#"<svg width="100%" height="50%"><path d="M0 0 L1 1"/></svg>"#,
        r#"<svg viewBox="0 0 10 10"><path id="x" d="M0 0 L1 1"/><path id="x" d="M0 0 L2 2"/></svg>"#,
    ] {
        assert!(
            matches!(Drawing::from_svg_str(svg), Err(DrawonError::Document(_))),
            "{svg}"
        );
    }
}

#[test]
fn empty_path_data_is_skipped() {
    let svg = r#"<svg viewBox="0 0 10 10"><path id="e" d=""/><path id="ok" d="M0 0 L1 0"/></svg>"#;
    let d = Drawing::from_svg_str(svg).unwrap();
    assert_eq!(d.path_ids(), vec!["ok"]);
    assert_eq!(d.skipped()[0].id, "e");
}

#[test]
fn view_box_origin_is_translated() {
    let svg = r#"<svg viewBox="10 20 100 50"><path d="M10 20 L110 70"/></svg>"#;
    let d = Drawing::from_svg_str(svg).unwrap();
    let a = d.to_canvas(Canvas { width: 200, height: 100 });
    assert_eq!(a * Point::new(10.0, 20.0), Point::new(0.0, 0.0));
    assert_eq!(a * Point::new(110.0, 70.0), Point::new(200.0, 100.0));
}

#[test]
fn from_path_data_uses_given_fill() {
    let size = DocumentSize::new(50.0, 50.0).unwrap();
    let d = Drawing::from_path_data(
        size,
        [
            PathSource::new("M0 0 L10 0", "line", Some(Rgba8::WHITE)),
            PathSource::new("M1 1 L1 1", "zero", None),
            PathSource::new("M0 0 L0 10", "plain", None),
        ],
    )
    .unwrap();
    assert_eq!(d.path_ids(), vec!["line", "plain"]);
    assert_eq!(d.get("line").unwrap().path().style().fill, Some(Rgba8::WHITE));
    assert_eq!(d.get("plain").unwrap().path().style().fill, None);
    assert_eq!(d.skipped()[0].id, "zero");
}

#[test]
fn measured_path_queries() {
    let size = DocumentSize::new(50.0, 50.0).unwrap();
    let d = Drawing::from_path_data(size, [PathSource::new("M0 0 L10 0", "l", None)]).unwrap();
    let m = &d.paths()[0];
    assert_eq!(m.point_at(0.5), Point::new(5.0, 0.0));
    assert_eq!(m.tangent_at(0.5), Vec2::new(1.0, 0.0));
    assert_eq!(m.partial(0.0).elements().len(), 0);
}

#[test]
fn fallback_ids_avoid_explicit_ids() {
    let svg = r#"<svg viewBox="0 0 20 20">
  <path id="path1" d="M0 0 L10 0"/>
  <path d="M0 10 L10 10"/>
</svg>"#;
    let d = Drawing::from_svg_str(svg).unwrap();
    assert_eq!(d.path_ids(), vec!["path1", "path1_1"]);

    let svg = r#"<svg viewBox="0 0 20 20">
  <path d="M0 0 L10 0"/>
  <path id="path0" d="M0 10 L10 10"/>
  <path id="path0_1" d="M0 5 L10 5"/>
</svg>"#;
    let d = Drawing::from_svg_str(svg).unwrap();
    assert_eq!(d.path_ids(), vec!["path0_2", "path0", "path0_1"]);
}

#[test]
fn explicit_duplicate_ids_are_rejected() {
    let svg = r#"<svg viewBox="0 0 20 20">
  <path id="a" d="M0 0 L10 0"/>
  <path id="a" d="M0 10 L10 10"/>
</svg>"#;
    let err = Drawing::from_svg_str(svg).unwrap_err();
    assert!(matches!(err, DrawonError::Document(ref m) if m.contains("duplicate path id 'a'")));
}
