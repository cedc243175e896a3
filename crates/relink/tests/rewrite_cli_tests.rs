use assert_cmd::assert::OutputAssertExt;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// Integration tests for the relink binary
///
/// Covers the invocation surface end to end:
/// 1. Rewrite and write-back of qualifying links
/// 2. Dry-run preview (no file modification) and diff output
/// 3. Exit codes (0 = processed, 2 = usage error, 3 = no documents)
/// 4. Glob expansion and missing-path warnings
/// 5. Per-document skip policy (non-UTF-8 input)
/// 6. JSON output and quiet mode
struct TestContext {
    #[allow(dead_code)]
    temp_dir: TempDir,
    root: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let root = temp_dir.path().to_path_buf();
        Self { temp_dir, root }
    }

    fn write_doc(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn read_doc(&self, rel: &str) -> String {
        fs::read_to_string(self.root.join(rel)).unwrap()
    }

    fn run_relink(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        Command::new(assert_cmd::cargo::cargo_bin!("relink"))
            .current_dir(&self.root)
            .args(args)
            .assert()
    }
}

#[test]
fn rewrites_qualifying_links_and_writes_back() {
    let ctx = TestContext::new();
    ctx.write_doc(
        "usage.md",
        "See [Button](/components/button/usage.md) for details.",
    );

    ctx.run_relink(&["usage.md"])
        .success()
        .stdout(predicate::str::contains("Updated 1 link"));

    assert_eq!(
        ctx.read_doc("usage.md"),
        "See [Button]({get_link_resource: /components/button/usage.md}) for details."
    );
}

#[test]
fn dry_run_previews_without_modifying_the_file() {
    let ctx = TestContext::new();
    let input = "[A](/foundation/colors#hex)";
    ctx.write_doc("usage.md", input);

    ctx.run_relink(&["--dry-run", "usage.md"])
        .success()
        .stdout(predicate::str::contains("DRY RUN"))
        .stdout(predicate::str::contains("Would update 1 link"));

    assert_eq!(ctx.read_doc("usage.md"), input);
}

#[test]
fn no_documents_found_exits_3() {
    let ctx = TestContext::new();

    ctx.run_relink(&[])
        .code(3)
        .stdout(predicate::str::contains("No documents found to process"));
}

#[test]
fn document_without_qualifying_links_is_left_byte_identical() {
    let ctx = TestContext::new();
    let input = "[docs](/docs/intro) and [site](https://example.com)\n";
    ctx.write_doc("usage.md", input);

    ctx.run_relink(&["usage.md"]).success();

    assert_eq!(ctx.read_doc("usage.md"), input);
}

#[test]
fn glob_arguments_process_every_match() {
    let ctx = TestContext::new();
    ctx.write_doc("button/usage.md", "[B](/components/button)");
    ctx.write_doc("card/usage.md", "[C](/components/card)");

    ctx.run_relink(&["*/usage.md"])
        .success()
        .stdout(predicate::str::contains("button/usage.md"))
        .stdout(predicate::str::contains("card/usage.md"));

    assert!(ctx.read_doc("button/usage.md").contains("{get_link_resource:"));
    assert!(ctx.read_doc("card/usage.md").contains("{get_link_resource:"));
}

#[test]
fn missing_path_warns_but_processing_continues() {
    let ctx = TestContext::new();
    ctx.write_doc("real.md", "[P](/patterns/p)");

    ctx.run_relink(&["absent.md", "real.md"])
        .success()
        .stderr(predicate::str::contains("File not found: absent.md"))
        .stdout(predicate::str::contains("Updated 1 link"));
}

#[test]
fn non_utf8_document_is_skipped_with_a_warning() {
    let ctx = TestContext::new();
    fs::write(ctx.root.join("binary.md"), [0xff, 0xfe, 0x00, 0x41]).unwrap();
    ctx.write_doc("valid.md", "[E](/examples/e)");

    ctx.run_relink(&["binary.md", "valid.md"])
        .success()
        .stderr(predicate::str::contains("UTF-8"))
        .stdout(predicate::str::contains("Updated 1 link"));

    assert!(ctx.read_doc("valid.md").contains("{get_link_resource:"));
}

#[test]
fn second_run_reports_zero_replacements() {
    let ctx = TestContext::new();
    ctx.write_doc("usage.md", "[B](/components/button)");

    ctx.run_relink(&["usage.md"]).success();
    let after_first = ctx.read_doc("usage.md");

    ctx.run_relink(&["usage.md"])
        .success()
        .stdout(predicate::str::contains("Links replaced: 0"));

    assert_eq!(ctx.read_doc("usage.md"), after_first);
}

#[test]
fn json_output_wraps_the_run_report() {
    let ctx = TestContext::new();
    ctx.write_doc("usage.md", "[a](/components/a) [b](/patterns/b)");

    let output = Command::new(assert_cmd::cargo::cargo_bin!("relink"))
        .current_dir(&ctx.root)
        .args(["--json", "usage.md"])
        .output()
        .expect("run relink");
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["summary"]["links_replaced"], 2);
    assert_eq!(json["data"]["documents"][0]["status"], "updated");
    assert_eq!(json["metadata"]["command"], "relink");
}

#[test]
fn json_error_for_empty_run_exits_3() {
    let ctx = TestContext::new();

    let output = Command::new(assert_cmd::cargo::cargo_bin!("relink"))
        .current_dir(&ctx.root)
        .args(["--json"])
        .output()
        .expect("run relink");
    assert_eq!(output.status.code(), Some(3));

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "NO_DOCUMENTS");
}

#[test]
fn diff_without_dry_run_is_a_usage_error() {
    let ctx = TestContext::new();
    ctx.write_doc("usage.md", "[B](/components/button)");

    ctx.run_relink(&["--diff", "usage.md"]).code(2);
}

#[test]
fn dry_run_diff_prints_old_and_new_lines() {
    let ctx = TestContext::new();
    ctx.write_doc("usage.md", "intro\n[B](/components/b)\n");

    ctx.run_relink(&["--dry-run", "--diff", "usage.md"])
        .success()
        .stdout(predicate::str::contains("-[B](/components/b)"))
        .stdout(predicate::str::contains(
            "+[B]({get_link_resource: /components/b})",
        ));
}

#[test]
fn verbose_lists_documents_without_links() {
    let ctx = TestContext::new();
    ctx.write_doc("plain.md", "nothing here");

    ctx.run_relink(&["--verbose", "plain.md"])
        .success()
        .stdout(predicate::str::contains("no internal links found"));
}

#[test]
fn quiet_keeps_per_document_results_but_drops_the_summary() {
    let ctx = TestContext::new();
    ctx.write_doc("usage.md", "[B](/components/b)");

    ctx.run_relink(&["--quiet", "usage.md"])
        .success()
        .stdout(predicate::str::contains("Updated 1 link"))
        .stdout(predicate::str::contains("Summary:").not());
}

#[test]
fn sample_of_changes_is_shown_after_a_real_run() {
    let ctx = TestContext::new();
    ctx.write_doc("usage.md", "[B](/components/b)");

    ctx.run_relink(&["usage.md"])
        .success()
        .stdout(predicate::str::contains("Sample of changes made:"))
        .stdout(predicate::str::contains("usage.md:1:"));
}

#[test]
fn default_glob_can_come_from_config_file() {
    let ctx = TestContext::new();
    ctx.write_doc("docs/guide/usage.md", "[B](/components/b)");
    fs::write(
        ctx.root.join("relink.toml"),
        "default_glob = \"docs/*/usage.md\"\n",
    )
    .unwrap();

    ctx.run_relink(&[])
        .success()
        .stdout(predicate::str::contains("Updated 1 link"));

    assert!(ctx.read_doc("docs/guide/usage.md").contains("{get_link_resource:"));
}

#[test]
fn invalid_glob_pattern_is_a_usage_error() {
    let ctx = TestContext::new();

    ctx.run_relink(&["docs/["])
        .code(2)
        .stderr(predicate::str::contains("invalid glob pattern"));
}

#[test]
fn malformed_config_file_is_a_usage_error() {
    let ctx = TestContext::new();
    fs::write(ctx.root.join("relink.toml"), "default_glob = [broken").unwrap();
    ctx.write_doc("usage.md", "[B](/components/b)");

    ctx.run_relink(&["usage.md"])
        .code(2)
        .stderr(predicate::str::contains("failed to parse config file"));
}
