//! Policy file loading and registry resolution tests.

use std::io::Write;

use oplog::policy::{
    LoggingMode, OperationKey, Policy, PolicyFile, PolicyFileError, PolicyRegistry, PolicySource,
    ResolveError,
};
use tempfile::NamedTempFile;

fn write_policy_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const SERVICE_POLICIES: &str = r#"
[[operations]]
service = "AccountService"
operation = "GetBalance"
mode = "max_count"
parameter = 5

[[operations]]
service = "AccountService"
operation = "Heartbeat"
mode = "disabled"

[[operations]]
service = "AccountService"
operation = "GetRates"
mode = "time_interval"
parameter = 300

[[operations]]
service = "AccountService"
operation = "GetStatus"
mode = "ReturnChangedOnly"
"#;

// =============================================================================
// Loading
// =============================================================================

#[test]
fn load_resolves_every_declared_operation() {
    let file = write_policy_file(SERVICE_POLICIES);
    let registry = PolicyRegistry::load(file.path()).unwrap();

    assert_eq!(registry.len(), 4);
    let resolve = |op: &str| {
        registry
            .resolve(&OperationKey::new("AccountService", op))
            .unwrap()
    };
    assert_eq!(resolve("GetBalance"), Some(Policy::max_count(5)));
    assert_eq!(resolve("Heartbeat"), Some(Policy::disabled()));
    assert_eq!(resolve("GetRates"), Some(Policy::time_interval(300)));
    assert_eq!(resolve("GetStatus"), Some(Policy::return_changed_only()));
    assert_eq!(resolve("Unlisted"), None);
}

#[test]
fn mode_names_accept_pascal_case() {
    let parsed = PolicyFile::parse(SERVICE_POLICIES).unwrap();
    assert_eq!(parsed.operations[3].mode, LoggingMode::ReturnChangedOnly);
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    match PolicyRegistry::load(&path) {
        Err(PolicyFileError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected Io error, got {:?}", other.map(|r| r.len())),
    }
}

#[test]
fn unknown_mode_is_parse_error() {
    let file = write_policy_file(
        r#"
[[operations]]
service = "AccountService"
operation = "GetBalance"
mode = "sometimes"
"#,
    );
    let err = PolicyRegistry::load(file.path()).unwrap_err();
    assert!(matches!(err, PolicyFileError::Parse(_)));
}

#[test]
fn missing_operation_field_is_parse_error() {
    let file = write_policy_file(
        r#"
[[operations]]
service = "AccountService"
mode = "disabled"
"#,
    );
    assert!(matches!(
        PolicyRegistry::load(file.path()),
        Err(PolicyFileError::Parse(_))
    ));
}

// =============================================================================
// Conflicts
// =============================================================================

#[test]
fn duplicate_declarations_fail_resolution() {
    let file = write_policy_file(
        r#"
[[operations]]
service = "AccountService"
operation = "GetBalance"
mode = "max_count"
parameter = 1

[[operations]]
service = "AccountService"
operation = "GetBalance"
mode = "max_count"
parameter = 1
"#,
    );
    let registry = PolicyRegistry::load(file.path()).unwrap();
    let key = OperationKey::new("AccountService", "GetBalance");

    assert!(registry.has_conflicts());
    assert_eq!(registry.conflicts().collect::<Vec<_>>(), vec![&key]);
    assert_eq!(
        registry.resolve(&key),
        Err(ResolveError::Conflicting(key.clone()))
    );
}

#[test]
fn policy_file_reports_unsupported_modes() {
    let file = write_policy_file(
        r#"
[[operations]]
service = "AccountService"
operation = "GetBalance"
mode = "count_interval"
parameter = 10
"#,
    );
    let parsed = PolicyFile::load(file.path()).unwrap();
    let unsupported: Vec<_> = parsed.unsupported().map(|e| e.key()).collect();
    assert_eq!(
        unsupported,
        vec![OperationKey::new("AccountService", "GetBalance")]
    );
}
