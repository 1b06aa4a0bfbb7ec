//! End-to-end tests for the `lineref` binary.
//!
//! Every command runs inside a temp project with an isolated
//! XDG_CONFIG_HOME so no user config leaks in.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct TestProject {
    root: TempDir,
    xdg: TempDir,
}

impl TestProject {
    fn new() -> Self {
        Self {
            root: TempDir::new().expect("project dir"),
            xdg: TempDir::new().expect("xdg dir"),
        }
    }

    fn path(&self) -> &Path {
        self.root.path()
    }

    fn file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).expect("create parent");
        fs::write(&path, content).expect("write file");
        path
    }

    fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("lineref").expect("Failed to locate lineref binary");
        cmd.current_dir(self.path())
            .env("XDG_CONFIG_HOME", self.xdg.path())
            .env_remove("LINEREF_ROOTS")
            .env("NO_COLOR", "1");
        cmd
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read file")
}

#[test]
fn given_app_and_config_when_run_without_args_then_rewrites_and_lists_names() {
    // Arrange
    let project = TestProject::new();
    let handler = project.file(
        "app/controllers/handler.js",
        "a\nb\nreq.err = \"foo.js, Line: 7: bad input\";\n",
    );
    let util = project.file("app/util.js", "module.exports = {};");
    let notes = project.file("app/notes.txt", "req.err = \"notes.txt, Line: 1\"");
    let db = project.file("config/database/Database.js", "req.err = 'x.js, Line: 40';\n");

    // Act + Assert
    project
        .cli()
        .assert()
        .success()
        .stdout("handler.js\nutil.js\nDatabase.js\n");

    assert_eq!(read(&handler), "a\nb\nreq.err = \"handler.js, Line: 3: bad input\";\n");
    assert_eq!(read(&util), "module.exports = {};\n");
    assert_eq!(read(&notes), "req.err = \"notes.txt, Line: 1\"");
    assert_eq!(read(&db), "req.err = 'Database.js, Line: 1';\n");
}

#[test]
fn given_missing_config_root_when_run_then_fails_with_ioerr_after_app() {
    let project = TestProject::new();
    let app = project.file("app/main.js", "req.err = 'x.js, Line: 3';\n");

    project
        .cli()
        .assert()
        .code(74)
        .stdout("main.js\n")
        .stderr(predicate::str::contains("error").and(predicate::str::contains("config")));

    assert_eq!(read(&app), "req.err = 'main.js, Line: 1';\n");
}

#[test]
fn given_explicit_roots_when_run_then_only_those_are_processed() {
    let project = TestProject::new();
    let src = project.file("src/index.js", "req.err = 'x.js, Line: 3';\n");
    let app = project.file("app/other.js", "req.err = 'x.js, Line: 3';\n");

    project
        .cli()
        .args(["run", "src"])
        .assert()
        .success()
        .stdout("index.js\n");

    assert_eq!(read(&src), "req.err = 'index.js, Line: 1';\n");
    assert_eq!(read(&app), "req.err = 'x.js, Line: 3';\n");
}

#[test]
fn given_project_dir_flag_when_run_then_roots_resolve_against_it() {
    let project = TestProject::new();
    let elsewhere = TempDir::new().unwrap();
    let file = project.file("lib/a.js", "req.err = 'z.js, Line: 8';");

    project
        .cli()
        .current_dir(elsewhere.path())
        .arg("-C")
        .arg(project.path())
        .args(["run", "lib"])
        .assert()
        .success()
        .stdout("a.js\n");

    assert_eq!(read(&file), "req.err = 'a.js, Line: 1';\n");
}

#[test]
fn given_local_config_roots_when_run_then_uses_them() {
    let project = TestProject::new();
    project.file(".lineref.toml", r#"roots = ["server"]"#);
    let file = project.file("server/api.js", "\n\nreq.err = 'x.js, Line: 1';\n");

    project.cli().assert().success().stdout("api.js\n");

    assert_eq!(read(&file), "\n\nreq.err = 'api.js, Line: 3';\n");
}

#[test]
fn given_env_roots_when_run_then_override_config() {
    let project = TestProject::new();
    project.file(".lineref.toml", r#"roots = ["server"]"#);
    project.file("server/api.js", "");
    project.file("web/ui.js", "");

    project
        .cli()
        .env("LINEREF_ROOTS", "web")
        .assert()
        .success()
        .stdout("ui.js\n");
}

#[test]
fn given_missing_project_dir_when_run_then_usage_error() {
    let project = TestProject::new();

    project
        .cli()
        .args(["-C", "does/not/exist", "run"])
        .assert()
        .code(64)
        .stderr(predicate::str::contains("project directory does not exist"));
}

#[test]
fn given_malformed_config_when_run_then_config_error() {
    let project = TestProject::new();
    project.file(".lineref.toml", "roots = [");

    project
        .cli()
        .assert()
        .code(78)
        .stderr(predicate::str::contains("config error"));
}

#[test]
fn given_no_local_config_when_config_init_then_creates_template_once() {
    let project = TestProject::new();

    project
        .cli()
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".lineref.toml"));

    let created = read(&project.path().join(".lineref.toml"));
    assert!(created.contains("# roots = [\"./app/\", \"./config/\"]"));

    project
        .cli()
        .args(["config", "init"])
        .assert()
        .code(64)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn given_defaults_when_config_show_then_prints_roots() {
    let project = TestProject::new();

    project
        .cli()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("./app/").and(predicate::str::contains("./config/")));
}

#[test]
fn given_project_when_config_path_then_lists_local_file() {
    let project = TestProject::new();

    project
        .cli()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".lineref.toml").and(predicate::str::contains("LINEREF_ROOTS")));
}

#[test]
fn given_bash_when_completion_then_prints_script() {
    let project = TestProject::new();

    project
        .cli()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lineref"));
}
