//! Tests for pagination module

use super::*;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use test_case::test_case;

fn name(raw: &str) -> HeaderName {
    HeaderName::from_bytes(raw.as_bytes()).unwrap()
}

fn headers(has_next: Option<&str>, current: Option<&str>) -> HeaderMap {
    let mut map = HeaderMap::new();
    if let Some(value) = has_next {
        map.insert(name("LU-Has-Next-Page"), HeaderValue::from_str(value).unwrap());
    }
    if let Some(value) = current {
        map.insert(name("LU-Current-Page"), HeaderValue::from_str(value).unwrap());
    }
    map
}

// ============================================================================
// HeaderPaginator Tests
// ============================================================================

#[test_case(Some("true"), Some("1") => Some(2); "next page after first")]
#[test_case(Some("true"), Some("41") => Some(42); "next page after forty one")]
#[test_case(Some("TRUE"), Some("3") => Some(4); "flag is case insensitive")]
#[test_case(Some(" true "), Some(" 5 ") => Some(6); "whitespace is ignored")]
#[test_case(Some("true"), None => Some(1); "missing current page counts as zero")]
#[test_case(Some("true"), Some("abc") => Some(1); "non numeric current page counts as zero")]
#[test_case(Some("false"), Some("1") => None; "false flag stops")]
#[test_case(None, Some("1") => None; "missing flag stops")]
#[test_case(Some("yes"), Some("1") => None; "unknown flag stops")]
#[test_case(Some(""), Some("1") => None; "empty flag stops")]
fn test_header_paginator_first_page(has_next: Option<&str>, current: Option<&str>) -> Option<u64> {
    HeaderPaginator::default().next_token(&headers(has_next, current), None)
}

#[test]
fn test_header_paginator_advances_from_previous() {
    let paginator = HeaderPaginator::default();
    assert_eq!(
        paginator.next_token(&headers(Some("true"), Some("2")), Some(2)),
        Some(3)
    );
}

#[test]
fn test_header_paginator_stops_when_token_does_not_advance() {
    let paginator = HeaderPaginator::default();

    // Server keeps claiming more pages but never reports a usable page number.
    let stuck = headers(Some("true"), Some("garbage"));
    assert_eq!(paginator.next_token(&stuck, None), Some(1));
    assert_eq!(paginator.next_token(&stuck, Some(1)), None);
}

#[test]
fn test_header_paginator_handles_non_utf8_flag() {
    let mut map = HeaderMap::new();
    map.insert(
        name("LU-Has-Next-Page"),
        HeaderValue::from_bytes(b"tr\xffue").unwrap(),
    );
    map.insert(name("LU-Current-Page"), HeaderValue::from_static("1"));

    assert_eq!(HeaderPaginator::default().next_token(&map, None), None);
}

#[test]
fn test_header_paginator_custom_header_names() {
    let paginator = HeaderPaginator::new("X-More", "X-Page");
    let mut map = HeaderMap::new();
    map.insert(name("X-More"), HeaderValue::from_static("true"));
    map.insert(name("X-Page"), HeaderValue::from_static("7"));

    assert!(paginator.has_next_page(&map));
    assert_eq!(paginator.current_page(&map), 7);
    assert_eq!(paginator.next_token(&map, Some(7)), Some(8));

    // Default LearnUpon headers are ignored by this paginator.
    assert_eq!(paginator.next_token(&headers(Some("true"), Some("1")), None), None);
}

#[test]
fn test_header_names_are_case_insensitive() {
    let mut map = HeaderMap::new();
    map.insert(name("lu-has-next-page"), HeaderValue::from_static("true"));
    map.insert(name("LU-CURRENT-PAGE"), HeaderValue::from_static("9"));

    assert_eq!(HeaderPaginator::default().next_token(&map, None), Some(10));
}

// ============================================================================
// SinglePagePaginator Tests
// ============================================================================

#[test]
fn test_single_page_paginator_always_stops() {
    let paginator = SinglePagePaginator;
    assert_eq!(
        paginator.next_token(&headers(Some("true"), Some("1")), None),
        None
    );
}
