//! Unit tests for CLI commands.

use super::*;
use crate::commands::check::{CheckArgs, ReportFormat};
use crate::commands::fmt::FmtArgs;
use crate::commands::list::{collect_groups, render_groups};
use crate::output::colors::ColorSupport;
use crate::output::errors::ErrorFormatter;
use reqlint_manifest::parse_manifest;
use reqlint_rules::lint_source;
use tempfile::TempDir;

/// Create a temporary directory for testing
fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Create a test command context in a temporary directory
fn create_test_context(temp_dir: &TempDir) -> CommandContext {
    CommandContext {
        cwd: Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).unwrap(),
        output: OutputHandler::plain(),
        env: HashMap::new(),
        use_global_config: false,
    }
}

async fn write(ctx: &CommandContext, file: &str, content: &str) {
    let path = ctx.cwd.join(file);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.unwrap();
    }
    tokio::fs::write(path, content).await.unwrap();
}

async fn read(ctx: &CommandContext, file: &str) -> String {
    tokio::fs::read_to_string(ctx.cwd.join(file)).await.unwrap()
}

fn check_args(paths: &[&str]) -> CheckArgs {
    CheckArgs {
        paths: paths.iter().map(|p| p.to_string()).collect(),
        format: ReportFormat::Json,
        ..CheckArgs::default()
    }
}

#[tokio::test]
async fn test_suggest_similar_command() {
    assert_eq!(suggest_similar_command("check"), Some("check".to_string()));
    assert_eq!(suggest_similar_command("chek"), Some("check".to_string()));
    assert_eq!(suggest_similar_command("lst"), Some("list".to_string()));
    assert_eq!(suggest_similar_command("remve"), Some("remove".to_string()));
    assert_eq!(suggest_similar_command("xyz"), None);
    assert_eq!(suggest_similar_command("completely-different"), None);
}

#[tokio::test]
async fn test_edit_distance() {
    assert_eq!(edit_distance("", ""), 0);
    assert_eq!(edit_distance("", "abc"), 3);
    assert_eq!(edit_distance("abc", ""), 3);
    assert_eq!(edit_distance("abc", "abc"), 0);
    assert_eq!(edit_distance("abc", "abd"), 1);
    assert_eq!(edit_distance("kitten", "sitting"), 3);
    assert_eq!(edit_distance("format", "fmt"), 3);
}

#[tokio::test]
async fn test_unknown_command_is_usage_error() {
    let err = unknown_command(&["chek".to_string()]);
    assert_eq!(err.exit_code(), 2);
    assert_eq!(err.to_string(), "Unknown command 'chek' (did you mean 'check'?)");

    let formatted = ErrorFormatter::with_colors(ColorSupport::disabled()).format_error(&err);
    assert_eq!(formatted.matches("Unknown command").count(), 1);

    let err = unknown_command(&["xyz".to_string()]);
    assert_eq!(err.to_string(), "Unknown command 'xyz'");
}

#[tokio::test]
async fn test_init_writes_default_config_once() {
    let temp_dir = create_temp_dir();
    let ctx = create_test_context(&temp_dir);

    init::execute(&ctx).await.unwrap();
    let written = read(&ctx, "reqlint.toml").await;
    assert!(reqlint_config::parse_reqlint_toml(&written).is_ok());

    write(&ctx, "reqlint.toml", "[rules]\n").await;
    init::execute(&ctx).await.unwrap();
    assert_eq!(read(&ctx, "reqlint.toml").await, "[rules]\n");
}

#[tokio::test]
async fn test_check_clean_and_failing_manifests() {
    let temp_dir = create_temp_dir();
    let ctx = create_test_context(&temp_dir);

    write(&ctx, "requirements.txt", "# Core\npandas==2.2.2\nnumpy>=1.26\n").await;
    check::execute(check_args(&[]), &ctx).await.unwrap();

    write(&ctx, "requirements.txt", "pandas==2.2.2\nPandas==2.2.2\nflask\n").await;
    let err = check::execute(check_args(&[]), &ctx).await.unwrap_err();
    match err {
        ReqlintError::LintFailed { errors, warnings } => {
            assert_eq!(errors, 1);
            assert_eq!(warnings, 1);
        },
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(ReqlintError::LintFailed { errors: 1, warnings: 0 }.exit_code(), 1);
}

#[tokio::test]
async fn test_check_severity_flags() {
    let temp_dir = create_temp_dir();
    let ctx = create_test_context(&temp_dir);
    write(&ctx, "requirements.txt", "flask\n").await;

    // Warnings pass unless denied
    check::execute(check_args(&[]), &ctx).await.unwrap();

    let mut args = check_args(&[]);
    args.deny_warnings = true;
    assert!(check::execute(args.clone(), &ctx).await.is_err());

    args.allow = vec!["unpinned".to_string()];
    check::execute(args, &ctx).await.unwrap();

    let mut args = check_args(&[]);
    args.deny = vec!["unpinned".to_string()];
    assert!(matches!(
        check::execute(args, &ctx).await,
        Err(ReqlintError::LintFailed { errors: 1, .. })
    ));

    let mut args = check_args(&[]);
    args.deny = vec!["no-such-rule".to_string()];
    assert!(matches!(
        check::execute(args, &ctx).await,
        Err(ReqlintError::ConfigValidation { .. })
    ));
}

#[tokio::test]
async fn test_check_uses_project_config() {
    let temp_dir = create_temp_dir();
    let ctx = create_test_context(&temp_dir);

    write(&ctx, "reqlint.toml", "[rules]\nunpinned = \"error\"\n[manifest]\nfiles = [\"deps/requirements.txt\"]\n").await;
    write(&ctx, "deps/requirements.txt", "flask\n").await;

    assert!(matches!(
        check::execute(check_args(&[]), &ctx).await,
        Err(ReqlintError::LintFailed { errors: 1, .. })
    ));
}

#[tokio::test]
async fn test_check_directories_and_missing_files() {
    let temp_dir = create_temp_dir();
    let ctx = create_test_context(&temp_dir);

    write(&ctx, "svc/requirements.txt", "a==1.0\n").await;
    write(&ctx, "svc/requirements-dev.txt", "a==1.0\na==2.0\n").await;
    assert!(matches!(
        check::execute(check_args(&["svc"]), &ctx).await,
        Err(ReqlintError::LintFailed { errors: 2, .. })
    ));

    assert!(matches!(
        check::execute(check_args(&["missing.txt"]), &ctx).await,
        Err(ReqlintError::Io { .. })
    ));

    // Empty directory: nothing to check
    tokio::fs::create_dir_all(ctx.cwd.join("empty")).await.unwrap();
    check::execute(check_args(&["empty"]), &ctx).await.unwrap();
}

#[tokio::test]
async fn test_check_summary() {
    let clean = lint_source("a.txt", "a==1.0\n", &Default::default());
    assert_eq!(
        check::summary(&[clean]),
        "No problems found in 1 file(s) (1 requirement(s))"
    );

    let dirty = lint_source("b.txt", "a\na\n", &Default::default());
    assert_eq!(
        check::summary(&[dirty]),
        "Found 1 error(s) and 2 warning(s) in 1 file(s)"
    );
}

#[tokio::test]
async fn test_fmt_check_then_write() {
    let temp_dir = create_temp_dir();
    let ctx = create_test_context(&temp_dir);
    let messy = "Flask == 3.0  \n\n\n# Web\nrequests>=2.0\n\n";
    write(&ctx, "requirements.txt", messy).await;

    let check = FmtArgs {
        check: true,
        ..FmtArgs::default()
    };
    assert!(matches!(
        fmt::execute(check.clone(), &ctx).await,
        Err(ReqlintError::FormatCheckFailed { count: 1 })
    ));
    assert_eq!(read(&ctx, "requirements.txt").await, messy);

    fmt::execute(FmtArgs::default(), &ctx).await.unwrap();
    assert_eq!(
        read(&ctx, "requirements.txt").await,
        "Flask==3.0\n\n# Web\nrequests>=2.0\n"
    );

    fmt::execute(check, &ctx).await.unwrap();
}

#[tokio::test]
async fn test_fmt_sort_and_normalize() {
    let temp_dir = create_temp_dir();
    let ctx = create_test_context(&temp_dir);
    write(&ctx, "requirements.txt", "Zope.Interface==6.0\nalpha==1.0\n").await;

    let args = FmtArgs {
        sort: true,
        normalize_names: true,
        ..FmtArgs::default()
    };
    fmt::execute(args, &ctx).await.unwrap();

    assert_eq!(
        read(&ctx, "requirements.txt").await,
        "alpha==1.0\nzope-interface==6.0\n"
    );
}

#[tokio::test]
async fn test_add_creates_updates_and_groups() {
    let temp_dir = create_temp_dir();
    let ctx = create_test_context(&temp_dir);

    let args = |requirement: &str, group: Option<&str>| add::AddArgs {
        requirement: requirement.to_string(),
        group: group.map(str::to_string),
        file: None,
    };

    add::execute(args("pandas == 2.2.2", None), &ctx).await.unwrap();
    assert_eq!(read(&ctx, "requirements.txt").await, "pandas==2.2.2\n");

    add::execute(args("Pandas>=2.0", None), &ctx).await.unwrap();
    assert_eq!(read(&ctx, "requirements.txt").await, "Pandas>=2.0\n");

    add::execute(args("pytest", Some("Testing")), &ctx).await.unwrap();
    assert_eq!(
        read(&ctx, "requirements.txt").await,
        "Pandas>=2.0\n\n# Testing\npytest\n"
    );

    assert!(matches!(
        add::execute(args("pandas~=2.0", None), &ctx).await,
        Err(ReqlintError::UnsupportedOperator { .. })
    ));
}

#[tokio::test]
async fn test_remove() {
    let temp_dir = create_temp_dir();
    let ctx = create_test_context(&temp_dir);
    write(&ctx, "reqs.txt", "# Data\npandas==2.2.2  # pinned\npython-docx>=1.1\n").await;

    let args = |name: &str| remove::RemoveArgs {
        name: name.to_string(),
        file: Some("reqs.txt".to_string()),
    };

    remove::execute(args("Python_Docx"), &ctx).await.unwrap();
    assert_eq!(read(&ctx, "reqs.txt").await, "# Data\npandas==2.2.2  # pinned\n");

    assert!(matches!(
        remove::execute(args("flask"), &ctx).await,
        Err(ReqlintError::PackageNotFound { .. })
    ));
    assert!(matches!(
        remove::execute(args("-bad-"), &ctx).await,
        Err(ReqlintError::InvalidName { .. })
    ));
}

#[tokio::test]
async fn test_list_groups() {
    let manifest = parse_manifest("streamlit\n\n# Testing\npytest>=8.0\nbroken line\n");

    let groups = collect_groups(&manifest, None).unwrap();
    assert_eq!(
        render_groups(&groups),
        "(ungrouped)\n  streamlit\n\nTesting\n  pytest>=8.0\n\n"
    );

    let only = collect_groups(&manifest, Some("testing")).unwrap();
    assert_eq!(only.len(), 1);
    assert_eq!(only[0].requirements[0].line, 4);

    let json = serde_json::to_value(&only).unwrap();
    assert_eq!(json[0]["label"], "Testing");
    assert_eq!(json[0]["requirements"][0]["name"], "pytest");
    assert_eq!(json[0]["requirements"][0]["spec"]["kind"], "minimum");

    assert!(collect_groups(&manifest, Some("Docs")).is_err());
}

#[tokio::test]
async fn test_requirement_error_mapping() {
    assert!(matches!(
        parse_requirement("pkg==one"),
        Err(ReqlintError::InvalidVersion { .. })
    ));
    assert!(matches!(
        parse_requirement("pkg>=1,<2"),
        Err(ReqlintError::UnsupportedOperator { .. })
    ));
    assert!(matches!(
        parse_requirement("==1.0"),
        Err(ReqlintError::InvalidName { .. })
    ));
    assert!(matches!(
        parse_requirement("pkg 1.0"),
        Err(ReqlintError::ManifestParse { column: 5, .. })
    ));
}
