// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::FileMode;
use std::path::PathBuf;
use yare::parameterized;

fn path_of(redirect: &Redirect) -> Option<(PathBuf, FileMode)> {
    match redirect {
        Redirect::Path { path, mode } => Some((path.clone(), *mode)),
        _ => None,
    }
}

#[test]
fn single_command_with_output_redirect() {
    let p = Pipeline::from_args(&["echo", "foo", ">f1"]).unwrap();
    assert_eq!(p.commands, vec![Command::new("echo").arg("foo")]);
    assert_eq!(path_of(&p.stdout), Some(("f1".into(), FileMode::Write)));
    assert!(p.stdin.is_inherit());
}

#[test]
fn pipes_and_all_redirect_forms() {
    let p = Pipeline::from_args(&[
        "sort", "<", "in.txt", "|", "uniq", "-c", ">>out.txt", "2>", "err.txt",
    ])
    .unwrap();
    assert_eq!(p.commands.len(), 2);
    assert_eq!(p.commands[1], Command::new("uniq").arg("-c"));
    assert_eq!(path_of(&p.stdin), Some(("in.txt".into(), FileMode::Read)));
    assert_eq!(path_of(&p.stdout), Some(("out.txt".into(), FileMode::Append)));
    assert_eq!(path_of(&p.stderr), Some(("err.txt".into(), FileMode::Write)));
}

#[test]
fn stderr_append_and_dup() {
    let p = Pipeline::from_args(&["make", "2>>log"]).unwrap();
    assert_eq!(path_of(&p.stderr), Some(("log".into(), FileMode::Append)));
    let p = Pipeline::from_args(&["make", "2>&1"]).unwrap();
    assert!(matches!(p.stderr, Redirect::ToStdout));
}

#[parameterized(
    leading_pipe = { &["|", "cat"] },
    trailing_pipe = { &["cat", "|"] },
    double_pipe = { &["cat", "|", "|", "cat"] },
    dangling_redirect = { &["cat", ">"] },
    redirect_to_operator = { &["cat", ">", "|", "wc"] },
    empty = { &[] },
)]
fn malformed_args(args: &[&str]) {
    assert!(matches!(
        Pipeline::from_args(args),
        Err(ShellError::Parse { .. })
    ));
}

#[test]
fn parse_template_keeps_values_literal() {
    let vars: HashMap<String, String> = [
        ("pattern".to_string(), "a|b".to_string()),
        ("out".to_string(), "my out.txt".to_string()),
    ]
    .into_iter()
    .collect();
    let p = Pipeline::parse("grep -E %(pattern)s /etc/hosts | wc -l > %(out)s", &vars).unwrap();
    assert_eq!(
        p.commands,
        vec![
            Command::new("grep").args(["-E", "a|b", "/etc/hosts"]),
            Command::new("wc").arg("-l"),
        ]
    );
    assert_eq!(path_of(&p.stdout), Some(("my out.txt".into(), FileMode::Write)));
}

#[test]
fn quoted_operators_are_arguments() {
    let p = Pipeline::parse("echo '>x' \"|\" 2\\>y", &HashMap::new()).unwrap();
    assert_eq!(p.commands, vec![Command::new("echo").args([">x", "|", "2>y"])]);
    assert!(p.stdout.is_inherit());
}

#[test]
fn run_collects_pipelines() {
    let run: Run = ["a", "b"]
        .into_iter()
        .map(|name| Pipeline::new(Command::new(name)))
        .collect();
    assert_eq!(run.len(), 2);
    assert_eq!(Run::from(Pipeline::new(Command::new("c"))).len(), 1);
}
