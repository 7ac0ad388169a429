//! Runs the built binary end to end.

use std::process::{Command, Output};

fn run(vars: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_fib-native"));
    for var in ["FIB_ARG", "FIB_METHOD", "FIB_STATS", "RUST_LOG"] {
        cmd.env_remove(var);
    }
    cmd.envs(vars.iter().copied());
    cmd.output().expect("failed to run fib-native")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn prints_34_by_default() {
    let out = run(&[]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out).trim(), "34");
    assert!(stderr(&out).is_empty(), "stderr: {}", stderr(&out));
}

#[test]
fn every_method_prints_the_same_value() {
    for method in ["naive", "iter", "fast"] {
        let out = run(&[("FIB_ARG", "25"), ("FIB_METHOD", method)]);
        assert!(out.status.success(), "{method}: {}", stderr(&out));
        assert_eq!(stdout(&out).trim(), "75025", "{method}");
    }
}

#[test]
fn negative_argument_fails() {
    let out = run(&[("FIB_ARG", "-1")]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("invalid argument"), "{}", stderr(&out));
}

#[test]
fn malformed_argument_fails() {
    let out = run(&[("FIB_ARG", "nine")]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("FIB_ARG"), "{}", stderr(&out));
}

#[test]
fn overflow_fails() {
    let out = run(&[("FIB_ARG", "94"), ("FIB_METHOD", "iter")]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("does not fit"), "{}", stderr(&out));
}

#[test]
fn large_argument_fails_with_default_method() {
    let out = run(&[("FIB_ARG", "100000000")]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("does not fit"), "{}", stderr(&out));
}

#[test]
fn info_logging_goes_to_stderr() {
    let out = run(&[("RUST_LOG", "info")]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "34\n");
    assert!(stderr(&out).contains("fib(9) = 34"), "{}", stderr(&out));
}

#[test]
fn stats_line_is_json() {
    let out = run(&[("FIB_STATS", "1")]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out).trim(), "34");

    let err = stderr(&out);
    let line = err.lines().last().expect("no stats line");
    let stats: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(stats["program"], "fib-native");
    assert_eq!(stats["method"], "naive");
    assert_eq!(stats["n"], 9);
    assert_eq!(stats["result"], 34);
    assert!(stats["compute_secs"].as_f64().unwrap() >= 0.0);
}
