//! Name Pattern Tests
//!
//! Tests verify:
//! - Classification into all / exact / glob
//! - Glob matching semantics
//! - Translation to SQL LIKE expressions

use addressbook::pattern::{check_name, has_wildcard, NamePattern};
use addressbook::ErrorKind;

// =============================================================================
// Classification Tests
// =============================================================================

#[test]
fn test_empty_and_star_select_everything() {
    for raw in ["", "   ", "*", " * "] {
        let pattern = NamePattern::parse(raw).unwrap();
        assert!(pattern.is_all(), "{:?} should select everything", raw);
        assert!(pattern.matches("anyone"));
    }
}

#[test]
fn test_plain_name_is_exact() {
    let pattern = NamePattern::parse("  Bob ").unwrap();
    assert!(matches!(pattern, NamePattern::Exact(ref name) if name == "bob"));
    assert!(pattern.matches("bob"));
    assert!(!pattern.matches("bobby"));
}

#[test]
fn test_wildcards_make_a_glob() {
    for raw in ["j*", "?ob", "[br]ob", "*son"] {
        let pattern = NamePattern::parse(raw).unwrap();
        assert!(matches!(pattern, NamePattern::Glob { .. }), "{:?}", raw);
    }
}

#[test]
fn test_pattern_is_normalized() {
    let pattern = NamePattern::parse("  J*N ").unwrap();
    assert_eq!(pattern.as_str(), "j*n");
    assert!(pattern.matches("john"));
}

#[test]
fn test_repeated_stars_collapse() {
    let pattern = NamePattern::parse("a***b").unwrap();
    assert_eq!(pattern.as_str(), "a*b");

    for raw in ["jo**", "**hn", "j**n"] {
        let pattern = NamePattern::parse(raw).unwrap();
        assert!(pattern.matches("john"), "{:?}", raw);
    }

    assert!(NamePattern::parse("**").unwrap().is_all());
    assert_eq!(NamePattern::parse("jo**").unwrap().to_sql_like().unwrap(), "jo%");
}

#[test]
fn test_unterminated_class_is_invalid() {
    let err = NamePattern::parse("[abc").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(err.to_string().contains("[abc"));
}

#[test]
fn test_has_wildcard() {
    assert!(has_wildcard("a*"));
    assert!(has_wildcard("a?"));
    assert!(has_wildcard("[a]"));
    assert!(!has_wildcard("plain name"));
    assert!(!has_wildcard("100%"));
}

#[test]
fn test_check_name() {
    assert!(check_name("bob smith").is_ok());
    assert!(check_name("100%_off").is_ok());

    for name in ["", "a*", "a?", "a[b", "x[1]", "b]"] {
        let err = check_name(name).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{:?}", name);
    }
}

// =============================================================================
// Matching Tests
// =============================================================================

#[test]
fn test_star_matches_any_run() {
    let pattern = NamePattern::parse("j*").unwrap();
    assert!(pattern.matches("j"));
    assert!(pattern.matches("john"));
    assert!(pattern.matches("jane doe"));
    assert!(!pattern.matches("bob"));
}

#[test]
fn test_star_in_the_middle() {
    let pattern = NamePattern::parse("j*n").unwrap();
    assert!(pattern.matches("john"));
    assert!(pattern.matches("jn"));
    assert!(!pattern.matches("jane"));
}

#[test]
fn test_question_mark_matches_one_char() {
    let pattern = NamePattern::parse("?ob").unwrap();
    assert!(pattern.matches("bob"));
    assert!(pattern.matches("rob"));
    assert!(!pattern.matches("ob"));
    assert!(!pattern.matches("robb"));
}

#[test]
fn test_character_class() {
    let pattern = NamePattern::parse("[br]ob").unwrap();
    assert!(pattern.matches("bob"));
    assert!(pattern.matches("rob"));
    assert!(!pattern.matches("tob"));
}

// =============================================================================
// SQL LIKE Translation Tests
// =============================================================================

#[test]
fn test_like_for_all() {
    assert_eq!(NamePattern::All.to_sql_like().unwrap(), "%");
}

#[test]
fn test_like_translates_wildcards() {
    let pattern = NamePattern::parse("j*n?").unwrap();
    assert_eq!(pattern.to_sql_like().unwrap(), "j%n_");
}

#[test]
fn test_like_escapes_sql_wildcards() {
    let pattern = NamePattern::parse("50%_off*").unwrap();
    assert_eq!(pattern.to_sql_like().unwrap(), "50\\%\\_off%");

    let pattern = NamePattern::parse("back\\slash").unwrap();
    assert_eq!(pattern.to_sql_like().unwrap(), "back\\\\slash");
}

#[test]
fn test_like_rejects_character_class() {
    let pattern = NamePattern::parse("[br]ob").unwrap();
    let err = pattern.to_sql_like().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}
