// End-to-end tests of the `bmad-resolver` binary.

use assert_cmd::Command;
use bmad_resolver::test_utils::ContentTreeFixture;
use predicates::prelude::*;

fn bmad_resolver() -> Command {
    let mut cmd = Command::cargo_bin("bmad-resolver").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("BMAD_RESOLVER_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn sample_tree() -> ContentTreeFixture {
    let tree = ContentTreeFixture::new().unwrap();
    tree.add_file("core/agents/a.md", "---\ndependencies: [\"{project-root}/bmad/core/tasks/b.md\"]\n---\n# A\n")
        .unwrap();
    tree.add_file("core/tasks/b.md", "Then @task-c and @task-gone").unwrap();
    tree.add_file("bmm/tasks/c.md", "# C").unwrap();
    tree
}

#[test]
fn test_resolve_text_report() {
    let tree = sample_tree();

    bmad_resolver()
        .arg("resolve")
        .arg(tree.root())
        .args(["-m", "bmm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolved 3 files for modules: core, bmm"))
        .stdout(predicate::str::contains("CORE"))
        .stdout(predicate::str::contains("Agents: 1"))
        .stdout(predicate::str::contains("core/tasks/b.md -> @task-gone"));
}

#[test]
fn test_resolve_json_output() {
    let tree = sample_tree();

    let output = bmad_resolver()
        .arg("--quiet")
        .arg("resolve")
        .arg(tree.root())
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    // Without -m bmm, @task-c only searches core
    assert_eq!(json["all_files"].as_array().unwrap().len(), 2);
    assert_eq!(json["missing"].as_array().unwrap().len(), 2);
    assert_eq!(json["modules"], serde_json::json!(["core"]));
}

#[test]
fn test_bundle_written_to_file() {
    let tree = sample_tree();
    let out = tree.path("out/bundle.json");

    bmad_resolver()
        .arg("bundle")
        .arg(tree.root())
        .args(["-m", "bmm", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote 3 files"));

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["metadata"]["total_files"], 3);
    assert_eq!(json["tasks"].as_array().unwrap().len(), 2);
    assert_eq!(json["agents"][0]["path"], "core/agents/a.md");
}

#[test]
fn test_tree_command() {
    let tree = sample_tree();

    bmad_resolver()
        .arg("tree")
        .arg(tree.root())
        .arg("core/agents/a.md")
        .args(["-m", "bmm"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("core/agents/a.md\n"))
        .stdout(predicate::str::contains("└── core/tasks/b.md"))
        .stdout(predicate::str::contains("    └── bmm/tasks/c.md"));
}

#[test]
fn test_tree_rejects_unresolved_file() {
    let tree = sample_tree();

    bmad_resolver()
        .arg("tree")
        .arg(tree.root())
        .arg("bmm/tasks/c.md")
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not part of the resolution"));
}

#[test]
fn test_refs_command() {
    let tree = sample_tree();

    bmad_resolver()
        .arg("refs")
        .arg(tree.path("core/tasks/b.md"))
        .assert()
        .success()
        .stdout(predicate::str::diff("@task-c\n@task-gone\n"));
}

#[test]
fn test_unknown_module_suggestion() {
    let tree = sample_tree();

    bmad_resolver()
        .arg("resolve")
        .arg(tree.root())
        .args(["-m", "bmn"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Module 'bmn' not found"))
        .stderr(predicate::str::contains("did you mean 'bmm'?"));
}

#[test]
fn test_invalid_root_fails_with_suggestion() {
    let tree = ContentTreeFixture::new().unwrap();

    bmad_resolver()
        .arg("resolve")
        .arg(tree.path("does-not-exist"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Content root not found"))
        .stderr(predicate::str::contains("suggestion"));
}

#[test]
fn test_invalid_format_and_config() {
    let tree = sample_tree();

    bmad_resolver()
        .arg("resolve")
        .arg(tree.root())
        .args(["--format", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid format 'yaml'"));

    bmad_resolver()
        .arg("--config")
        .arg(tree.path("missing.toml"))
        .arg("resolve")
        .arg(tree.root())
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration file not found"));
}
