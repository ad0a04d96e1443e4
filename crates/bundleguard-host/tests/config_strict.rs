#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use bundleguard_host::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
field_limit:
  record_type: "opportunity"
  limt: 500 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.kind().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.install.required_feature, "ISSUEDB");
    assert_eq!(cfg.install.sample_record_type, "issue");
    assert_eq!(cfg.field_limit.field, "projectedtotal");
    assert_eq!(cfg.field_limit.limit, 500.0);
    assert_eq!(
        cfg.records.gated_types.get("issue").map(String::as_str),
        Some("ISSUEDB")
    );
}

#[test]
fn full_config_overrides_defaults() {
    let ok = r#"
version: 1
install:
  script_id: "crm_bundle"
  required_feature: "CRM"
field_limit:
  record_type: "estimate"
  field: "total"
  limit: 1250.5
records:
  gated_types:
    issue: "CRM"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.install.script_id, "crm_bundle");
    assert_eq!(cfg.install.sample_field, "issueabstract");
    assert_eq!(cfg.field_limit.record_type, "estimate");
    assert_eq!(cfg.field_limit.limit, 1250.5);
}

#[test]
fn unsupported_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.kind().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn empty_names_are_rejected() {
    let bad = r#"
version: 1
install:
  required_feature: "  "
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("install.required_feature"));
}

#[test]
fn non_finite_limit_is_rejected() {
    let bad = r#"
version: 1
field_limit:
  limit: .inf
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.kind().as_str(), "BAD_REQUEST");
    assert!(err.to_string().contains("field_limit.limit"));
}
