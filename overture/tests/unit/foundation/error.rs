use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        OvertureError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        OvertureError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        OvertureError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(
        OvertureError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = OvertureError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
