mod common;

use common::{ValidatorProcess, fixture_path};

const EXIT_INVALID: i32 = 1;
const EXIT_PARSE: i32 = 2;
const EXIT_IO: i32 = 3;
const EXIT_USAGE: i32 = 64;

// ============================================================================
// Valid configurations
// ============================================================================

#[test]
fn valid_plist_reports_success() {
    let output = ValidatorProcess::validate_fixtures(&["valid_install.plist"], &[]);
    assert_eq!(output.code(), 0, "stderr: {}", output.stderr());

    let expected = format!(
        "SUCCESS: {} is a valid configuration",
        fixture_path("valid_install.plist").display()
    );
    assert_eq!(output.stdout().trim(), expected);
}

#[test]
fn script_with_url_only_is_valid() {
    let output = ValidatorProcess::validate_fixtures(&["script_url_only.yaml"], &[]);
    assert_eq!(output.code(), 0, "stderr: {}", output.stderr());
    assert!(output.stdout().starts_with("SUCCESS: "));
}

#[test]
fn several_valid_sources() {
    let output = ValidatorProcess::validate_fixtures(
        &["valid_install.plist", "script_url_only.yaml"],
        &[],
    );
    assert_eq!(output.code(), 0, "stderr: {}", output.stderr());
    assert_eq!(output.stdout().lines().count(), 2);
}

// ============================================================================
// Rule violations
// ============================================================================

#[test]
fn empty_password_fails_before_script() {
    let output = ValidatorProcess::validate_fixtures(&["empty_password.plist"], &[]);
    assert_eq!(output.code(), EXIT_INVALID);
    assert_eq!(output.stderr().trim(), "ERROR: password is set but empty");
    assert!(output.stdout().is_empty());
}

#[test]
fn zero_workflows_reported_over_empty_password() {
    let output = ValidatorProcess::validate_fixtures(&["no_workflows.plist"], &[]);
    assert_eq!(output.code(), EXIT_INVALID);
    assert_eq!(output.stderr().trim(), "ERROR: No workflows are defined");
}

#[test]
fn duplicate_name_reported_before_component_errors() {
    let output = ValidatorProcess::validate_fixtures(&["duplicate_names.plist"], &[]);
    assert_eq!(output.code(), EXIT_INVALID);
    assert_eq!(
        output.stderr().trim(),
        "ERROR: Workflow name 'Install' is used more than once"
    );
}

#[test]
fn image_url_suffix() {
    let output = ValidatorProcess::validate_fixtures(&["bad_image_suffix.plist"], &[]);
    assert_eq!(output.code(), EXIT_INVALID);
    let stderr = output.stderr();
    assert!(stderr.contains("Workflow 'Imaging'"), "{stderr}");
    assert!(stderr.contains("base.iso"), "{stderr}");
    assert!(stderr.contains(".dmg or .sparseimage"), "{stderr}");
}

#[test]
fn partition_with_two_targets() {
    let output = ValidatorProcess::validate_fixtures(&["partition_two_targets.yaml"], &[]);
    assert_eq!(output.code(), EXIT_INVALID);
    assert_eq!(
        output.stderr().trim(),
        "ERROR: Workflow 'Imaging' has a partition component with 2 target partitions; \
         exactly one is allowed"
    );
}

#[test]
fn default_workflow_must_exist() {
    let output = ValidatorProcess::validate_fixtures(&["default_workflow_missing.plist"], &[]);
    assert_eq!(output.code(), EXIT_INVALID);
    assert_eq!(
        output.stderr().trim(),
        "ERROR: default_workflow 'Nonexistent' does not match the name of any workflow"
    );
}

#[test]
fn first_failing_source_stops_the_run() {
    let output = ValidatorProcess::validate_fixtures(
        &["valid_install.plist", "bad_image_suffix.plist", "empty_password.plist"],
        &[],
    );
    assert_eq!(output.code(), EXIT_INVALID);
    assert_eq!(output.stdout().lines().count(), 1);
    assert!(!output.stderr().contains("password"), "{}", output.stderr());
}

// ============================================================================
// Report-all and legacy rules
// ============================================================================

#[test]
fn report_all_lists_every_violation_in_order() {
    let output = ValidatorProcess::validate_fixtures(&["many_problems.yaml"], &["--report-all"]);
    assert_eq!(output.code(), EXIT_INVALID);

    let stderr = output.stderr();
    let lines: Vec<&str> = stderr.lines().collect();
    assert_eq!(lines.len(), 5, "{stderr}");
    assert!(lines.iter().all(|line| line.starts_with("ERROR: ")));
    assert_eq!(lines[0], "ERROR: password is set but empty");
    assert!(lines[1].contains("restart_action 'reboot'"));
    assert!(lines[2].contains("tool.zip"));
    assert!(lines[3].contains("eraseVolume"));
    assert!(lines[4].starts_with("ERROR: autorun 'Missing'"));
}

#[test]
fn fail_fast_reports_only_first_of_many() {
    let output = ValidatorProcess::validate_fixtures(&["many_problems.yaml"], &[]);
    assert_eq!(output.code(), EXIT_INVALID);
    assert_eq!(output.stderr().trim(), "ERROR: password is set but empty");
}

#[test]
fn legacy_password_rule_requires_key() {
    let output = ValidatorProcess::validate_fixtures(
        &["script_url_only.yaml"],
        &["--password-rule", "required"],
    );
    assert_eq!(output.code(), EXIT_INVALID);
    assert_eq!(output.stderr().trim(), "ERROR: No password is set");
}

#[test]
fn legacy_script_rule_requires_content() {
    let output = ValidatorProcess::validate_fixtures(
        &["script_url_only.yaml"],
        &["--script-rule", "content-required"],
    );
    assert_eq!(output.code(), EXIT_INVALID);
    assert_eq!(
        output.stderr().trim(),
        "ERROR: Workflow 'Bootstrap' has a script component with no content"
    );
}

// ============================================================================
// JSON output
// ============================================================================

#[test]
fn json_output_for_valid_source() {
    let output =
        ValidatorProcess::validate_fixtures(&["valid_install.plist"], &["--format", "json"]);
    assert_eq!(output.code(), 0, "stderr: {}", output.stderr());

    let reports = output.json_lines();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["valid"], true);
    assert_eq!(reports[0]["format"], "xml-plist");
    assert_eq!(reports[0]["violations"].as_array().map(Vec::len), Some(0));
}

#[test]
fn json_output_for_invalid_source() {
    let output = ValidatorProcess::validate_fixtures(
        &["many_problems.yaml"],
        &["--format", "json", "--report-all"],
    );
    assert_eq!(output.code(), EXIT_INVALID);
    assert!(output.stderr().is_empty(), "{}", output.stderr());

    let reports = output.json_lines();
    assert_eq!(reports[0]["valid"], false);
    assert_eq!(reports[0]["format"], "yaml");

    let violations = reports[0]["violations"].as_array().unwrap();
    let rules: Vec<&str> = violations
        .iter()
        .map(|v| v["rule"].as_str().unwrap())
        .collect();
    assert_eq!(
        rules,
        [
            "password-not-empty",
            "restart-action",
            "package-url-suffix",
            "erase-volume-first-boot",
            "autorun-reference",
        ]
    );
    assert_eq!(violations[1]["workflow"], "Imaging");
    assert!(violations[0].get("workflow").is_none());
}

#[test]
fn json_output_for_load_failure() {
    let output = ValidatorProcess::validate_fixtures(&["malformed.plist"], &["--format", "json"]);
    assert_eq!(output.code(), EXIT_PARSE);

    let reports = output.json_lines();
    assert_eq!(reports[0]["valid"], false);
    assert!(reports[0]["format"].is_null());
    assert!(reports[0]["error"].as_str().unwrap().contains("could not parse"));
}

// ============================================================================
// Load failures
// ============================================================================

#[test]
fn malformed_plist_is_parse_error() {
    let output = ValidatorProcess::validate_fixtures(&["malformed.plist"], &[]);
    assert_eq!(output.code(), EXIT_PARSE);
    assert!(output.stderr().starts_with("ERROR: could not parse"));
}

#[test]
fn empty_file_is_lint_error() {
    let output = ValidatorProcess::validate_fixtures(&["empty.plist"], &[]);
    assert_eq!(output.code(), EXIT_PARSE);
    assert!(output.stderr().contains("empty"), "{}", output.stderr());
}

#[test]
fn array_root_is_lint_error() {
    let output = ValidatorProcess::validate_fixtures(&["array_root.plist"], &[]);
    assert_eq!(output.code(), EXIT_PARSE);
    assert!(
        output.stderr().contains("must be a dictionary, found array"),
        "{}",
        output.stderr()
    );
}

#[test]
fn missing_file_is_io_error() {
    let output = ValidatorProcess::validate_fixtures(&["does_not_exist.plist"], &[]);
    assert_eq!(output.code(), EXIT_IO);
    assert!(output.stderr().contains("does not exist"));
}

#[test]
fn oversized_file_is_io_error() {
    let output =
        ValidatorProcess::validate_fixtures(&["valid_install.plist"], &["--max-size", "64"]);
    assert_eq!(output.code(), EXIT_IO);
    assert!(output.stderr().contains("64 byte limit"), "{}", output.stderr());
}

#[test]
fn binary_plist_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("imagr_config.plist");

    let xml = std::fs::read(fixture_path("valid_install.plist")).unwrap();
    let value = plist::Value::from_reader_xml(xml.as_slice()).unwrap();
    value.to_file_binary(&path).unwrap();

    let output = ValidatorProcess::spawn_command(&[
        "validate",
        path.to_str().unwrap(),
        "--format",
        "json",
    ]);
    assert_eq!(output.code(), 0, "stderr: {}", output.stderr());
    assert_eq!(output.json_lines()[0]["format"], "binary-plist");
}

#[test]
fn deeply_nested_plist_is_lint_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deep.plist");
    let depth = 200_000;
    let xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<plist version=\"1.0\">{}{}</plist>\n",
        "<array>".repeat(depth),
        "</array>".repeat(depth)
    );
    std::fs::write(&path, xml).unwrap();

    let output = ValidatorProcess::spawn_command(&["validate", path.to_str().unwrap()]);
    assert_eq!(output.code(), EXIT_PARSE, "stderr: {}", output.stderr());
    assert!(
        output.stderr().contains("more than 64 levels deep"),
        "{}",
        output.stderr()
    );
}

// ============================================================================
// Usage errors
// ============================================================================

#[test]
fn missing_source_is_usage_error() {
    let output = ValidatorProcess::spawn_command(&["validate"]);
    assert_eq!(output.code(), EXIT_USAGE);
}

#[test]
fn unknown_rule_variant_is_usage_error() {
    let output = ValidatorProcess::spawn_command(&[
        "validate",
        "x.plist",
        "--script-rule",
        "anything",
    ]);
    assert_eq!(output.code(), EXIT_USAGE);
}
