use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;

const SOURCE: &str = "package net.minecraft.src;\n\
\n\
public class mod_Sample {\n\
    // obf: Minecraft.getMinecraft\n\
    Minecraft mc = Minecraft.getMinecraft();\n\
    // obf: Entity.posX, Entity.posY, Entity.posZ\n\
    double d = e.posX + e.posY + e.posZ;\n\
}\n";

#[test]
fn transforms_file_and_reports() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("mod_Sample.java");
    let output = dir.path().join("gen.java");
    fs::write(&input, SOURCE).unwrap();

    Command::cargo_bin("source-obfuscator")
        .unwrap()
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .arg("--editable-source")
        .arg("src/mod_Sample.java")
        .assert()
        .success()
        .stdout(predicate::str::contains("input:  "))
        .stdout(predicate::str::contains("output: "))
        .stdout(predicate::str::contains("3 lines adjusted"));

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("// THIS SOURCE FILE WAS AUTOMATICALLY GENERATED. DO NOT MANUALLY EDIT.\n// Edit src/mod_Sample.java\n"));
    assert!(written.contains("Minecraft mc = Minecraft.x();\n"));
    assert!(written.contains("double d = e.t + e.u + e.v;\n"));
}

#[test]
fn unknown_identifier_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.java");
    let output = dir.path().join("out.java");
    fs::write(&input, "// obf: Entity.noSuchField\nnoSuchField = 1;\n").unwrap();

    Command::cargo_bin("source-obfuscator")
        .unwrap()
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Entity.noSuchField"));

    assert!(!output.exists());
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("source-obfuscator")
        .unwrap()
        .arg("--root")
        .arg(dir.path())
        .assert()
        .failure();
}

#[test]
fn dry_run_prints_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.java");
    let output = dir.path().join("out.java");
    fs::write(&input, SOURCE).unwrap();

    let assert = Command::cargo_bin("source-obfuscator")
        .unwrap()
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .arg("--dry-run")
        .assert()
        .success();

    let report: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(report["dry_run"], true);
    assert_eq!(report["stats"]["adjusted_lines"], 3);
    assert_eq!(report["stats"]["package_lines_dropped"], 1);
    assert_eq!(report["stats"]["replacements"], 4);
    assert!(!output.exists());
}

#[test]
fn custom_mapping_table() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.java");
    let output = dir.path().join("out.java");
    let mappings = dir.path().join("map.json");
    fs::write(&input, "// obf: Widget.size\nint s = w.size;\n").unwrap();
    fs::write(&mappings, r#"[{"token": "q", "name": "Widget.size"}]"#).unwrap();

    Command::cargo_bin("source-obfuscator")
        .unwrap()
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .arg("--mappings")
        .arg(&mappings)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 lines adjusted"));

    assert!(fs::read_to_string(&output).unwrap().ends_with("int s = w.q;\n"));
}

#[test]
fn strict_rejects_conflicting_table() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.java");
    let mappings = dir.path().join("map.json");
    fs::write(&input, "class A {}\n").unwrap();
    fs::write(
        &mappings,
        r#"[{"token": "q", "name": "Widget.size"}, {"token": "r", "name": "Widget.size"}]"#,
    )
    .unwrap();

    Command::cargo_bin("source-obfuscator")
        .unwrap()
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(dir.path().join("out.java"))
        .arg("--mappings")
        .arg(&mappings)
        .arg("--strict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate identifier"));
}

#[test]
fn strict_applies_to_builtin_table() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.java");
    let output = dir.path().join("out.java");
    fs::write(&input, "// obf: Entity.posX\nposX\n").unwrap();

    Command::cargo_bin("source-obfuscator")
        .unwrap()
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .arg("--strict")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 lines adjusted"));

    assert!(fs::read_to_string(&output).unwrap().ends_with("// obf: Entity.posX\nt\n"));
}

#[test]
fn help_explains_root_default() {
    Command::cargo_bin("source-obfuscator")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("current"))
        .stdout(predicate::str::contains("working"))
        .stdout(predicate::str::contains("repository"));
}
