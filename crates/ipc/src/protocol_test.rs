//! Tests for request line parsing

use super::*;

#[test]
fn test_parse_activate() {
    assert_eq!(Request::parse("Activate").unwrap(), Request::Activate);
    assert_eq!(Request::parse("  Activate  ").unwrap(), Request::Activate);
}

#[test]
fn test_parse_activate_ignores_extra_parameters() {
    assert_eq!(Request::parse("Activate now please").unwrap(), Request::Activate);
}

#[test]
fn test_parse_log_file_full() {
    let request =
        Request::parse("LogFile file=/var/log/build.log solution=MyApp skip_existing=true")
            .unwrap();
    assert_eq!(
        request,
        Request::LogFile {
            file: "/var/log/build.log".into(),
            solution: "MyApp".into(),
            skip_existing: true,
        }
    );
}

#[test]
fn test_parse_log_file_defaults() {
    let request = Request::parse("LogFile file=/var/log/build.log").unwrap();
    assert_eq!(
        request,
        Request::LogFile {
            file: "/var/log/build.log".into(),
            solution: String::new(),
            skip_existing: false,
        }
    );
}

#[test]
fn test_parse_skip_existing_as_bare_switch() {
    let request = Request::parse("LogFile file=/a/b skip_existing").unwrap();
    assert!(matches!(request, Request::LogFile { skip_existing: true, .. }));

    let request = Request::parse("LogFile file=/a/b skip_existing=false").unwrap();
    assert!(matches!(request, Request::LogFile { skip_existing: false, .. }));
}

#[test]
fn test_parse_drops_empty_tokens() {
    let request = Request::parse("LogFile    file=/a/b     solution=X").unwrap();
    assert!(matches!(request, Request::LogFile { .. }));
}

#[test]
fn test_parse_unknown_parameters_are_ignored() {
    let request = Request::parse("LogFile file=/a/b color=green").unwrap();
    assert!(matches!(request, Request::LogFile { .. }));
}

// ============================================================================
// Protocol errors
// ============================================================================

#[test]
fn test_parse_empty_line_is_an_error() {
    assert!(matches!(Request::parse(""), Err(ProtocolError::EmptyRequest)));
    assert!(matches!(Request::parse("   "), Err(ProtocolError::EmptyRequest)));
}

#[test]
fn test_parse_unknown_verb_is_an_error() {
    assert!(matches!(
        Request::parse("Reticulate splines"),
        Err(ProtocolError::UnknownVerb(v)) if v == "Reticulate"
    ));
}

#[test]
fn test_parse_log_file_requires_file() {
    assert!(matches!(
        Request::parse("LogFile solution=MyApp"),
        Err(ProtocolError::MissingParameter("file"))
    ));
    assert!(matches!(
        Request::parse("LogFile file="),
        Err(ProtocolError::MissingParameter("file"))
    ));
}

#[test]
fn test_parse_log_file_requires_absolute_path() {
    assert!(matches!(
        Request::parse("LogFile file=relative/path.log"),
        Err(ProtocolError::NotAbsolute(p)) if p == "relative/path.log"
    ));
}

#[test]
fn test_parse_bad_skip_existing_value() {
    assert!(matches!(
        Request::parse("LogFile file=/a/b skip_existing=maybe"),
        Err(ProtocolError::InvalidValue { name: "skip_existing", .. })
    ));
}

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_to_line_round_trips() {
    let requests = [
        Request::Activate,
        Request::LogFile {
            file: "/var/log/app.log".into(),
            solution: String::new(),
            skip_existing: false,
        },
        Request::LogFile {
            file: "/var/log/app.log".into(),
            solution: "MyApp".into(),
            skip_existing: true,
        },
    ];
    for request in requests {
        assert_eq!(Request::parse(&request.to_line()).unwrap(), request);
    }
}
