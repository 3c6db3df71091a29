use tiktok_uploader::{AuthBackend, Cookie, Error};

#[test]
fn no_material_at_all_is_insufficient() {
    let err = AuthBackend::builder().build().unwrap_err();
    assert!(matches!(err, Error::InsufficientAuth), "got: {err}");
}

#[test]
fn username_without_password_is_insufficient() {
    let err = AuthBackend::builder().username("user").build().unwrap_err();
    assert!(matches!(err, Error::InsufficientAuth), "got: {err}");
}

#[test]
fn password_without_username_is_insufficient() {
    let err = AuthBackend::builder().password("pass").build().unwrap_err();
    assert!(matches!(err, Error::InsufficientAuth), "got: {err}");
}

#[test]
fn credentials_alone_are_enough() {
    let auth = AuthBackend::builder()
        .credentials("user", "pass")
        .build()
        .expect("credentials should build");
    assert!(auth.cookies().is_empty());
}

#[test]
fn session_id_alone_is_enough() {
    let auth = AuthBackend::builder()
        .session_id("abc123")
        .build()
        .expect("sessionid should build");
    assert_eq!(auth.cookies().len(), 1);
    assert_eq!(auth.cookies()[0].name, "sessionid");
    assert_eq!(auth.cookies()[0].value, "abc123");
}

#[test]
fn raw_cookie_text_alone_is_enough() {
    let auth = AuthBackend::builder()
        .cookies_str(".tiktok.com\tTRUE\t/\tTRUE\t1999999999\tsessionid\tabc")
        .build()
        .expect("cookie text should build");
    assert_eq!(auth.cookies().len(), 1);
}

#[test]
fn cookie_sources_accumulate() {
    let auth = AuthBackend::builder()
        .cookies_str(".tiktok.com\tTRUE\t/\tTRUE\t1999999999\tmsToken\txyz")
        .cookies([Cookie::new("ttwid", "w", ".tiktok.com", "/")])
        .session_id("abc")
        .build()
        .expect("should build");
    let names: Vec<&str> = auth.cookies().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["msToken", "ttwid", "sessionid"]);
}

#[test]
fn unreadable_cookie_file_fails_the_build() {
    let err = AuthBackend::builder()
        .cookies_file("/definitely/not/here/cookies.txt")
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::CookieParse(_)), "got: {err}");
}
