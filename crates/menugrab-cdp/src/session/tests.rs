use super::core::PageSession;

#[test]
fn test_quad_center() {
    let quad = vec![0.0, 0.0, 100.0, 0.0, 100.0, 100.0, 0.0, 100.0];
    let (x, y) = PageSession::quad_center(&quad);
    assert_eq!(x, 50.0);
    assert_eq!(y, 50.0);
}

#[test]
fn test_quad_center_short_quad() {
    let (x, y) = PageSession::quad_center(&[1.0, 2.0]);
    assert_eq!((x, y), (0.0, 0.0));
}

#[test]
fn test_attr_from_pairs() {
    let pairs = vec![
        "class".to_string(),
        "styles__ToggleContainer-abc".to_string(),
        "aria-labelledby".to_string(),
        "optionList_123".to_string(),
    ];
    assert_eq!(
        PageSession::attr_from_pairs(&pairs, "aria-labelledby").as_deref(),
        Some("optionList_123")
    );
    assert_eq!(PageSession::attr_from_pairs(&pairs, "id"), None);
}

#[test]
fn test_attr_from_pairs_odd_list() {
    // A trailing name with no value must not panic or match
    let pairs = vec!["role".to_string()];
    assert_eq!(PageSession::attr_from_pairs(&pairs, "role"), None);
}
