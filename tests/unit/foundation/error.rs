use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        DrawonError::malformed(3, "x")
            .to_string()
            .contains("malformed path data")
    );
    assert!(
        DrawonError::degenerate("p0")
            .to_string()
            .contains("degenerate path 'p0'")
    );
    assert!(
        DrawonError::config("x")
            .to_string()
            .contains("invalid configuration:")
    );
    assert!(
        DrawonError::document("x")
            .to_string()
            .contains("document error:")
    );
    assert!(
        DrawonError::encoder_unavailable("x")
            .to_string()
            .contains("encoder unavailable:")
    );
    assert!(DrawonError::render("x").to_string().contains("render error:"));
}

#[test]
fn malformed_path_reports_offset_and_id() {
    let err = DrawonError::malformed(7, "expected number").with_path_id("outline");
    let msg = err.to_string();
    assert!(msg.contains("in path 'outline'"));
    assert!(msg.contains("at byte 7"));
    assert!(msg.contains("expected number"));
}

#[test]
fn with_path_id_keeps_existing_id_and_other_variants() {
    let err = DrawonError::MalformedPath {
        path_id: Some("a".to_owned()),
        offset: 0,
        message: "m".to_owned(),
    }
    .with_path_id("b");
    assert!(matches!(err, DrawonError::MalformedPath { path_id: Some(ref id), .. } if id == "a"));

    let err = DrawonError::Cancelled.with_path_id("b");
    assert!(matches!(err, DrawonError::Cancelled));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = DrawonError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
