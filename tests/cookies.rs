use tiktok_uploader::cookies::{parse_file, parse_str, save_file, Cookie};
use tiktok_uploader::Error;

const JAR: &str = "# Netscape HTTP Cookie File\n\
    .tiktok.com\tTRUE\t/\tTRUE\t1999999999\tsessionid\tabc123\n\
    .tiktok.com\tTRUE\t/\tTRUE\t1999999999\tmsToken\txyz\n";

#[test]
fn parses_well_formed_lines() {
    let cookies = parse_str(JAR);
    assert_eq!(cookies.len(), 2);
    assert_eq!(cookies[0].name, "sessionid");
    assert_eq!(cookies[0].value, "abc123");
    assert_eq!(cookies[0].domain, ".tiktok.com");
    assert_eq!(cookies[0].path, "/");
    assert_eq!(cookies[0].expiry, Some(1_999_999_999));
}

#[test]
fn skips_lines_with_fewer_than_six_fields() {
    let text = "garbage\n\
        only\ttwo\n\
        a\tb\tc\td\te\n\
        .tiktok.com\tTRUE\t/\tTRUE\t0\tsessionid\tok\n";
    let cookies = parse_str(text);
    assert_eq!(cookies.len(), 1);
    assert_eq!(cookies[0].name, "sessionid");
}

#[test]
fn six_field_line_parses_with_empty_value() {
    let cookies = parse_str(".tiktok.com\tTRUE\t/\tTRUE\t123456\tsessionid");
    assert_eq!(cookies.len(), 1);
    assert_eq!(cookies[0].name, "sessionid");
    assert_eq!(cookies[0].value, "");
}

#[test]
fn non_numeric_expiry_becomes_session_cookie() {
    let cookies = parse_str(".tiktok.com\tTRUE\t/\tTRUE\tnever\tsessionid\tabc");
    assert_eq!(cookies[0].expiry, None);
}

#[test]
fn zero_expiry_becomes_session_cookie() {
    let cookies = parse_str(".tiktok.com\tTRUE\t/\tTRUE\t0\tsessionid\tabc");
    assert_eq!(cookies[0].expiry, None);
}

#[test]
fn fields_are_trimmed() {
    let cookies = parse_str(" .tiktok.com \tTRUE\t / \tTRUE\t 123 \t sessionid \t abc ");
    assert_eq!(cookies[0].domain, ".tiktok.com");
    assert_eq!(cookies[0].path, "/");
    assert_eq!(cookies[0].name, "sessionid");
    assert_eq!(cookies[0].value, "abc");
    assert_eq!(cookies[0].expiry, Some(123));
}

#[test]
fn round_trip_preserves_cookies() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("cookies.txt");

    let original = parse_str(JAR);
    save_file(&path, &original).expect("save");
    let reread = parse_file(&path).expect("parse");

    assert_eq!(original, reread);
}

#[test]
fn round_trip_preserves_session_cookies() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("cookies.txt");

    let cookies = vec![Cookie::new("sessionid", "abc", ".tiktok.com", "/")];
    save_file(&path, &cookies).expect("save");
    let reread = parse_file(&path).expect("parse");

    assert_eq!(cookies, reread);
    assert_eq!(reread[0].expiry, None);
}

#[test]
fn save_overwrites_existing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("cookies.txt");

    save_file(&path, &parse_str(JAR)).expect("first save");
    let one = vec![Cookie::new("sessionid", "new", ".tiktok.com", "/")];
    save_file(&path, &one).expect("second save");

    let reread = parse_file(&path).expect("parse");
    assert_eq!(reread.len(), 1);
    assert_eq!(reread[0].value, "new");
}

#[test]
fn missing_file_is_a_parse_error() {
    let err = parse_file("/definitely/not/here/cookies.txt").unwrap_err();
    assert!(matches!(err, Error::CookieParse(_)), "got: {err}");
}
