//! Integration tests for the besu-dist binary
//!
//! Everything here runs offline: Besu artifacts come from a local repository
//! laid out in a temporary directory.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn besu_dist(project: &Path) -> Command {
    let mut cmd = Command::cargo_bin("besu-dist").unwrap();
    cmd.arg("--project")
        .arg(project)
        .env_remove("BESU_VERSION")
        .env_remove("BESU_REPO")
        .env_remove("RUST_LOG");
    cmd
}

/// Local repository with the 24.1.0 BOM (managing libA) and a besu-app jar
/// providing libA and libB
fn besu_repository() -> TempDir {
    let repo = TempDir::new().unwrap();

    let bom = repo.path().join("org/hyperledger/besu/bom/24.1.0/bom-24.1.0.pom");
    std::fs::create_dir_all(bom.parent().unwrap()).unwrap();
    std::fs::write(
        &bom,
        r#"<project>
  <dependencyManagement>
    <dependencies>
      <dependency><groupId>com.example</groupId><artifactId>libA</artifactId><version>1.0</version></dependency>
    </dependencies>
  </dependencyManagement>
</project>"#,
    )
    .unwrap();

    let app = repo
        .path()
        .join("org/hyperledger/besu/internal/besu-app/24.1.0/besu-app-24.1.0.jar");
    std::fs::create_dir_all(app.parent().unwrap()).unwrap();
    let mut zip = zip::ZipWriter::new(File::create(&app).unwrap());
    zip.start_file(
        "META-INF/besu-artifacts-catalog.json",
        zip::write::SimpleFileOptions::default(),
    )
    .unwrap();
    zip.write_all(
        br#"[{"group":"com.example","name":"libA","version":"1.0","filename":"libA-1.0.jar"},
            {"group":"com.example","name":"libB","version":"2.0","filename":"libB-2.0.jar"}]"#,
    )
    .unwrap();
    zip.finish().unwrap();

    repo
}

/// Plugin project with a runtime graph of libA -> libB and libC
fn plugin_project() -> TempDir {
    let project = TempDir::new().unwrap();
    std::fs::write(project.path().join("besu-plugin.yml"), "name: demo-plugin\n").unwrap();

    let libs = project.path().join("libs");
    std::fs::create_dir_all(&libs).unwrap();
    for jar in ["libA-1.0.jar", "libB-2.0.jar", "libC-3.0.jar", "demo-plugin.jar"] {
        std::fs::write(libs.join(jar), jar).unwrap();
    }

    let file = |name: &str| libs.join(name).display().to_string();
    let graph = serde_json::json!({
        "firstLevel": ["a", "c"],
        "nodes": [
            {"id": "a", "group": "com.example", "name": "libA", "version": "1.0",
             "artifacts": [{"file": file("libA-1.0.jar")}], "children": ["b"]},
            {"id": "b", "group": "com.example", "name": "libB", "version": "2.0",
             "artifacts": [{"file": file("libB-2.0.jar")}]},
            {"id": "c", "group": "com.example", "name": "libC", "version": "3.0",
             "artifacts": [{"file": file("libC-3.0.jar")}]}
        ]
    });
    std::fs::write(
        project.path().join("runtime-graph.json"),
        serde_json::to_string_pretty(&graph).unwrap(),
    )
    .unwrap();

    project
}

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("besu-dist")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("dependencies"))
        .stdout(predicate::str::contains("collect"))
        .stdout(predicate::str::contains("dist"))
        .stdout(predicate::str::contains("cache"));
}

#[test]
fn test_schema_describes_config_keys() {
    let project = TempDir::new().unwrap();
    besu_dist(project.path())
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("besuVersion"))
        .stdout(predicate::str::contains("coordinatesMapping"));
}

#[test]
fn test_missing_besu_version_is_reported() {
    let project = plugin_project();
    besu_dist(project.path())
        .args(["collect", "--graph", "runtime-graph.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No Besu version configured"));
}

#[test]
fn test_collect_requires_graph() {
    let project = TempDir::new().unwrap();
    besu_dist(project.path())
        .arg("collect")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_unknown_config_key_is_rejected() {
    let project = TempDir::new().unwrap();
    std::fs::write(project.path().join("besu-plugin.yml"), "besuVersions: 24.1.0\n").unwrap();
    besu_dist(project.path())
        .arg("dependencies")
        .assert()
        .failure()
        .stderr(predicate::str::contains("besu-plugin.yml"));
}

#[test]
fn test_empty_cache() {
    let project = TempDir::new().unwrap();
    besu_dist(project.path())
        .args(["cache", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No cached artifacts found."));

    besu_dist(project.path())
        .args(["cache", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Artifact cache cleared"));
}

#[test]
fn test_dependencies_json() {
    let repo = besu_repository();
    let project = plugin_project();

    let output = besu_dist(project.path())
        .args(["--besu-version", "24.1.0", "--besu-repo"])
        .arg(repo.path())
        .args(["dependencies", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["besuVersion"], "24.1.0");
    assert_eq!(result["bomCount"], 1);
    assert_eq!(result["providedCount"], 2);
    assert_eq!(result["merged"].as_array().unwrap().len(), 2);
}

#[test]
fn test_besu_version_from_environment() {
    let repo = besu_repository();
    let project = plugin_project();

    besu_dist(project.path())
        .env("BESU_VERSION", "24.1.0")
        .env("BESU_REPO", repo.path())
        .arg("dependencies")
        .assert()
        .success()
        .stdout(predicate::str::contains("com.example:libB:2.0!!"))
        .stdout(predicate::str::contains(
            "enforcedPlatform(org.hyperledger.besu:bom:24.1.0)",
        ));
}

#[test]
fn test_dist_install() {
    let repo = besu_repository();
    let project = plugin_project();

    besu_dist(project.path())
        .args(["--besu-version", "24.1.0", "--besu-repo"])
        .arg(repo.path())
        .args(["dist", "--graph"])
        .arg(project.path().join("runtime-graph.json"))
        .arg("--jar")
        .arg(project.path().join("libs/demo-plugin.jar"))
        .arg("--install")
        .assert()
        .success()
        .stdout(predicate::str::contains("libC-3.0.jar"))
        .stdout(predicate::str::contains("com.example:libB:2.0"));

    let install = project.path().join("build/install/demo-plugin");
    assert!(install.join("demo-plugin.jar").is_file());
    assert!(install.join("libC-3.0.jar").is_file());
    assert!(!install.join("libA-1.0.jar").exists());
    assert!(install.join("META-INF/plugin-artifacts-catalog.json").is_file());

    let catalog: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(
            project
                .path()
                .join("build/reports/dependencies/plugin-artifacts-catalog.json"),
        )
        .unwrap(),
    )
    .unwrap();
    assert_eq!(catalog["dependencies"].as_array().unwrap().len(), 1);
    assert_eq!(catalog["dependencies"][0]["filename"], "libC-3.0.jar");
}
