//! Shell runner specs

use crate::prelude::*;
use nsk_shell::{Command, CommandStatus, Pipeline, Redirect, Run, RunConfig, Runner, ShellError};
use similar_asserts::assert_eq;
use std::collections::HashMap;
use std::time::Duration;

fn runner() -> Runner {
    Runner::new(
        RunConfig::default()
            .with_kill_grace(Duration::from_millis(200))
            .with_poll_interval(Duration::from_millis(5)),
    )
}

#[test]
fn a_failing_pipeline_fails_the_run() {
    let scratch = Scratch::new();
    let out = format!(">{}", scratch.join("f1").display());
    let run = Run::new()
        .with(Pipeline::from_args(&["echo", "foo", out.as_str()]).unwrap())
        .with(Pipeline::new(Command::new("false")));

    let error = match runner().run(run) {
        Err(ShellError::Failed(error)) => error,
        other => panic!("expected a pipeline failure, got {other:?}"),
    };
    let echo = &error.pipelines[0].commands[0];
    assert!(echo.status == CommandStatus::Exited(0) || echo.terminated);
    assert_eq!(error.pipelines[1].commands[0].status, CommandStatus::Exited(1));
    assert_eq!(error.failed_commands(), vec![(1, 0)]);
}

#[test]
fn collect_returns_what_the_last_command_wrote() {
    let pipeline = Pipeline::new(Command::new("printf").arg("3\\n1\\n2\\n"))
        .pipe(Command::new("sort").arg("-n"));
    let collected = runner().run_collect(pipeline).unwrap();
    assert_eq!(collected.stdout_str(), "1\n2\n3\n");
    assert_eq!(collected.stderr_str(), "");
}

#[test]
fn string_pipelines_substitute_quoted_values() {
    let scratch = Scratch::new();
    let input = scratch.file("in.txt", "b\na\n");
    let vars: HashMap<String, String> = [("file".to_string(), input.display().to_string())].into();
    let pipeline = Pipeline::parse("sort %(file)s | head -n 1", &vars).unwrap();
    assert_eq!(runner().run_collect(pipeline).unwrap().stdout_str(), "a\n");
}

#[test]
fn file_redirects_chain_runs() {
    let scratch = Scratch::new();
    let mid = scratch.join("mid.txt");
    runner()
        .run(Pipeline::new(Command::new("echo").arg("flow")).stdout(Redirect::write(&mid)))
        .unwrap();
    let collected = runner()
        .run_collect(Pipeline::new(Command::new("cat")).stdin(Redirect::read(&mid)))
        .unwrap();
    assert_eq!(collected.stdout_str(), "flow\n");
}
