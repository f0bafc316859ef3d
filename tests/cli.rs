//! End-to-end runs of the `fmaxgen` binary.

use object::{File, Object, ObjectSection};
use std::fs;
use std::process::{Command, Output};

fn fmaxgen(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fmaxgen"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run fmaxgen")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_asm_to_stdout() {
    let output = fmaxgen(&["--min-n", "2", "--max-n", "2"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        ".section CODE_MAX_OF_2\n\
         vmovsd 0x00(%rdi),%xmm3\n\
         vmovsd 0x08(%rdi),%xmm4\n\
         \n\
         vmaxsd %xmm4,%xmm3,%xmm3\n\
         \n"
    );
}

#[test]
fn test_object_requires_output_file() {
    let output = fmaxgen(&["--emit", "object"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert_eq!(
        stderr(&output).trim_end(),
        "Error: Output format object requires an output file"
    );
}

#[test]
fn test_object_written_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("max.o");
    let path_str = path.to_str().unwrap();

    let output = fmaxgen(&["--emit", "object", "--max-n", "3", "-o", path_str]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), format!("wrote {}\n", path.display()));

    let bytes = fs::read(&path).unwrap();
    let file = File::parse(&*bytes).unwrap();
    for n in 0..=3 {
        assert!(file.section_by_name(&format!("CODE_MAX_OF_{n}")).is_some());
    }
    assert!(file.section_by_name("CODE_MAX_OF_4").is_none());
    assert!(file.sections().any(|s| s.size() > 0));
}

#[test]
fn test_header_guard_from_output_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("max_tree.h");
    let path_str = path.to_str().unwrap();

    let output = fmaxgen(&["--emit", "header", "--max-n", "1", "--out", path_str]);
    assert!(output.status.success(), "{}", stderr(&output));

    let guard = fmaxgen::header::guard_name(path_str);
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with(&format!("\n#ifndef {guard}\n#define {guard} 1\n")));
    assert!(guard.ends_with("_MAX_TREE_H"));
}

#[test]
fn test_header_explicit_guard() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("max_tree.h");

    let output = fmaxgen(&[
        "--emit",
        "header",
        "--guard",
        "FMAX_H",
        "-o",
        path.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{}", stderr(&output));
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("\n#ifndef FMAX_H\n#define FMAX_H 1\n"));
}

#[test]
fn test_header_default_guard_on_stdout() {
    let output = fmaxgen(&["--emit", "header", "--max-n", "0"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    let guard = fmaxgen::header::DEFAULT_GUARD;
    assert!(text.starts_with(&format!("\n#ifndef {guard}\n#define {guard} 1\n")));
    assert!(text.contains("const unsigned char CODE_MAX_OF_0[] = {"));
}

#[test]
fn test_unmappable_range_fails() {
    let output = fmaxgen(&["--min-n", "11", "--max-n", "14"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let err = stderr(&output);
    assert!(err.starts_with("Error: Slot 13 does not fit"), "{err}");
}

#[test]
fn test_inverted_range_fails() {
    let output = fmaxgen(&["--min-n", "5", "--max-n", "2"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr(&output).trim_end(), "Error: Invalid input range: 5 > 2");
}

#[test]
fn test_unwritable_output_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("max.h");

    let output = fmaxgen(&["--emit", "header", "-o", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("Error: "));
    assert!(!path.exists());
}
