// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runs a [`Run`] to completion
//!
//! FIFOs written inside the run are opened for reading first, without
//! blocking, then every output redirect is opened write-only, then the
//! remaining inputs. A writer whose reader exits gets EPIPE the usual way.
//! Every pipeline is then spawned before any is waited on. Children are polled;
//! the first command that breaks its exit policy starts the teardown, which
//! sends SIGTERM to everything still alive and SIGKILL after the grace
//! period.

use crate::{
    Command, CommandReport, CommandStatus, FileMode, PipelineError, PipelineReport,
    Redirect, Run, RunConfig, RunReport, ShellError,
};
use nix::errno::Errno;
use nix::fcntl::{fcntl, FcntlArg, OFlag};
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::borrow::Cow;
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom};
use std::os::fd::{AsFd, OwnedFd};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, ExitStatus, Stdio};
use std::time::Instant;

/// Standard output and error captured by [`Runner::run_collect`], byte for byte
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Collected {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl Collected {
    /// Standard output as text, invalid UTF-8 replaced
    pub fn stdout_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    pub fn stderr_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }
}

/// Starts runs with a fixed [`RunConfig`]
#[derive(Clone, Debug, Default)]
pub struct Runner {
    config: RunConfig,
}

/// An opened stream end that can be handed to any number of children
enum Endpoint {
    Inherit,
    Null,
    Fd(OwnedFd),
}

impl Endpoint {
    fn stdio(&self) -> io::Result<Stdio> {
        Ok(match self {
            Endpoint::Inherit => Stdio::inherit(),
            Endpoint::Null => Stdio::null(),
            Endpoint::Fd(fd) => Stdio::from(fd.try_clone()?),
        })
    }

    /// The same destination again, for `2>&1`
    fn duplicate(&self) -> io::Result<Endpoint> {
        Ok(match self {
            Endpoint::Inherit => Endpoint::Fd(io::stdout().as_fd().try_clone_to_owned()?),
            Endpoint::Null => Endpoint::Null,
            Endpoint::Fd(fd) => Endpoint::Fd(fd.try_clone()?),
        })
    }
}

/// A pipeline with its streams opened, ready to spawn
struct Prepared {
    commands: Vec<Command>,
    stdin: Endpoint,
    stdout: Endpoint,
    stderr: Endpoint,
}

/// FIFO wiring of one pipeline, kept for collateral reporting
struct Wiring {
    reads: Option<PathBuf>,
    writes: Vec<PathBuf>,
}

struct Slot {
    command: Command,
    child: Option<Child>,
    status: CommandStatus,
    signalled: bool,
}

impl Slot {
    fn idle(command: Command, status: CommandStatus) -> Self {
        Self {
            command,
            child: None,
            status,
            signalled: false,
        }
    }

    fn report(&self) -> CommandReport {
        let stopped = [Signal::SIGTERM as i32, Signal::SIGKILL as i32];
        let terminated = self.signalled
            && matches!(self.status, CommandStatus::Signaled(s) if stopped.contains(&s));
        CommandReport {
            command: self.command.to_string(),
            status: self.status.clone(),
            accepted: self.command.policy.accepts(&self.status),
            terminated,
        }
    }
}

fn opening<'a>(
    stream: &'static str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> ShellError + 'a {
    move |source| ShellError::Open {
        stream,
        path: path.to_path_buf(),
        source,
    }
}

fn open_output(redirect: Redirect, stream: &'static str) -> Result<Endpoint, ShellError> {
    let file = match redirect {
        Redirect::Inherit => return Ok(Endpoint::Inherit),
        Redirect::Null => return Ok(Endpoint::Null),
        Redirect::File(file) => file,
        Redirect::Path { path, mode } => {
            let mut opts = OpenOptions::new();
            match mode {
                FileMode::Write => opts.write(true).create(true).truncate(true),
                FileMode::Append => opts.append(true).create(true),
                FileMode::Read => {
                    return Err(ShellError::InvalidRedirect {
                        stream,
                        reason: format!("{} is opened for input", path.display()),
                    })
                }
            };
            opts.open(&path).map_err(opening(stream, &path))?
        }
        // write-only; readers inside the run are already open
        Redirect::Fifo(path) => OpenOptions::new()
            .write(true)
            .open(&path)
            .map_err(opening(stream, &path))?,
        Redirect::ToStdout => {
            return Err(ShellError::InvalidRedirect {
                stream,
                reason: "no stdout to follow".to_string(),
            })
        }
    };
    Ok(Endpoint::Fd(file.into()))
}

/// Read end of a FIFO, opened without waiting for a writer
///
/// The descriptor is switched back to blocking so the child sees ordinary
/// pipe reads.
fn open_fifo_reader(path: &Path) -> Result<Endpoint, ShellError> {
    let file = OpenOptions::new()
        .read(true)
        .custom_flags(OFlag::O_NONBLOCK.bits())
        .open(path)
        .map_err(opening("stdin", path))?;
    let flags = fcntl(&file, FcntlArg::F_GETFL).map_err(|e| opening("stdin", path)(e.into()))?;
    let blocking = OFlag::from_bits_truncate(flags) - OFlag::O_NONBLOCK;
    fcntl(&file, FcntlArg::F_SETFL(blocking)).map_err(|e| opening("stdin", path)(e.into()))?;
    Ok(Endpoint::Fd(file.into()))
}

fn open_input(redirect: Redirect) -> Result<Endpoint, ShellError> {
    let file = match redirect {
        Redirect::Inherit => return Ok(Endpoint::Inherit),
        Redirect::Null => return Ok(Endpoint::Null),
        Redirect::File(file) => file,
        Redirect::Path { path, .. } | Redirect::Fifo(path) => {
            File::open(&path).map_err(opening("stdin", &path))?
        }
        Redirect::ToStdout => {
            return Err(ShellError::InvalidRedirect {
                stream: "stdin",
                reason: "stdin cannot follow stdout".to_string(),
            })
        }
    };
    Ok(Endpoint::Fd(file.into()))
}

fn validate(run: &Run) -> Result<(), ShellError> {
    for (index, pipeline) in run.pipelines.iter().enumerate() {
        if pipeline.commands.is_empty() {
            return Err(ShellError::EmptyPipeline { index });
        }
        if let Some(reason) = pipeline.stdin.input_problem() {
            return Err(ShellError::InvalidRedirect {
                stream: "stdin",
                reason,
            });
        }
        for (stream, redirect) in [("stdout", &pipeline.stdout), ("stderr", &pipeline.stderr)] {
            if let Some(reason) = redirect.output_problem(stream) {
                return Err(ShellError::InvalidRedirect { stream, reason });
            }
        }
    }
    Ok(())
}

fn prepare(run: Run) -> Result<(Vec<Prepared>, Vec<Wiring>), ShellError> {
    validate(&run)?;

    let mut staged = run.pipelines;
    let wiring: Vec<Wiring> = staged
        .iter()
        .map(|pipeline| Wiring {
            reads: pipeline.stdin.fifo_path().map(Path::to_path_buf),
            writes: [&pipeline.stdout, &pipeline.stderr]
                .into_iter()
                .filter_map(|r| r.fifo_path().map(Path::to_path_buf))
                .collect(),
        })
        .collect();
    let written: HashSet<&Path> = wiring
        .iter()
        .flat_map(|w| w.writes.iter().map(PathBuf::as_path))
        .collect();

    // read ends of FIFOs fed inside the run, so write-only opens return
    let early = staged
        .iter()
        .map(|pipeline| match pipeline.stdin.fifo_path() {
            Some(path) if written.contains(path) => open_fifo_reader(path).map(Some),
            _ => Ok(None),
        })
        .collect::<Result<Vec<_>, ShellError>>()?;

    let mut outputs = Vec::with_capacity(staged.len());
    for pipeline in &mut staged {
        let stdout = open_output(std::mem::take(&mut pipeline.stdout), "stdout")?;
        let stderr = match std::mem::take(&mut pipeline.stderr) {
            Redirect::ToStdout => stdout.duplicate()?,
            other => open_output(other, "stderr")?,
        };
        outputs.push((stdout, stderr));
    }

    let prepared = staged
        .into_iter()
        .zip(outputs)
        .zip(early)
        .map(|((pipeline, (stdout, stderr)), opened)| {
            let stdin = match opened {
                Some(endpoint) => endpoint,
                None => open_input(pipeline.stdin)?,
            };
            Ok(Prepared {
                commands: pipeline.commands,
                stdin,
                stdout,
                stderr,
            })
        })
        .collect::<Result<Vec<_>, ShellError>>()?;
    Ok((prepared, wiring))
}

fn stdio_for(
    position: usize,
    count: usize,
    prepared: &Prepared,
    upstream: &mut Option<ChildStdout>,
) -> io::Result<(Stdio, Stdio, Stdio)> {
    let stdin = match upstream.take() {
        Some(out) => Stdio::from(out),
        None => prepared.stdin.stdio()?,
    };
    let stdout = if position + 1 == count {
        prepared.stdout.stdio()?
    } else {
        Stdio::piped()
    };
    Ok((stdin, stdout, prepared.stderr.stdio()?))
}

fn start(command: &Command, (stdin, stdout, stderr): (Stdio, Stdio, Stdio)) -> io::Result<Child> {
    std::process::Command::new(&command.program)
        .args(&command.args)
        .stdin(stdin)
        .stdout(stdout)
        .stderr(stderr)
        .spawn()
}

/// Spawn one pipeline; false when a command could not be started
fn spawn_pipeline(mut prepared: Prepared, slots: &mut Vec<Slot>) -> bool {
    let commands = std::mem::take(&mut prepared.commands);
    let count = commands.len();
    let mut upstream = None;
    let mut ok = true;
    for (position, command) in commands.into_iter().enumerate() {
        if !ok {
            slots.push(Slot::idle(command, CommandStatus::NotRun));
            continue;
        }
        match stdio_for(position, count, &prepared, &mut upstream)
            .and_then(|stdio| start(&command, stdio))
        {
            Ok(mut child) => {
                if position + 1 < count {
                    upstream = child.stdout.take();
                }
                tracing::debug!(command = %command, pid = child.id(), "spawned");
                slots.push(Slot {
                    command,
                    child: Some(child),
                    status: CommandStatus::NotRun,
                    signalled: false,
                });
            }
            Err(e) => {
                tracing::warn!(command = %command, error = %e, "spawn failed");
                slots.push(Slot::idle(command, CommandStatus::SpawnFailed(e.to_string())));
                ok = false;
            }
        }
    }
    ok
}

fn status_of(status: ExitStatus) -> CommandStatus {
    status
        .code()
        .map(CommandStatus::Exited)
        .or_else(|| status.signal().map(CommandStatus::Signaled))
        .unwrap_or(CommandStatus::NotRun)
}

fn signal_all(pipelines: &mut [Vec<Slot>], signal: Signal) {
    for slot in pipelines.iter_mut().flatten() {
        let Some(child) = slot.child.as_ref() else {
            continue;
        };
        let Ok(pid) = i32::try_from(child.id()) else {
            continue;
        };
        match kill(Pid::from_raw(pid), signal) {
            Ok(()) => slot.signalled = true,
            // exited since the last poll
            Err(Errno::ESRCH) => {}
            Err(e) => tracing::warn!(pid, signal = ?signal, error = %e, "failed to signal"),
        }
    }
}

/// Pipelines, nearest first, whose failure reaches `index` through FIFOs
fn cause_chain(
    index: usize,
    wiring: &[Wiring],
    caused: &[bool],
    seen: &mut Vec<usize>,
) -> Vec<usize> {
    seen.push(index);
    let Some(fifo) = &wiring[index].reads else {
        return Vec::new();
    };
    let writer = wiring
        .iter()
        .enumerate()
        .find(|(w, wires)| !seen.contains(w) && wires.writes.contains(fifo))
        .map(|(w, _)| w);
    let Some(writer) = writer else {
        return Vec::new();
    };
    let upstream = cause_chain(writer, wiring, caused, seen);
    if caused[writer] || !upstream.is_empty() {
        let mut chain = vec![writer];
        chain.extend(upstream);
        chain
    } else {
        Vec::new()
    }
}

impl Runner {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run every pipeline and wait for all of them
    ///
    /// Setup problems (an empty pipeline, an unusable redirect, a file that
    /// cannot be opened) fail before anything is spawned. A command that
    /// breaks its exit policy fails the run with [`ShellError::Failed`].
    pub fn run(&self, run: impl Into<Run>) -> Result<RunReport, ShellError> {
        let run = run.into();
        let span = tracing::info_span!("shell.run", pipelines = run.len());
        let _guard = span.enter();
        let started = Instant::now();

        let (prepared, wiring) = prepare(run)?;
        tracing::info!(
            commands = prepared.iter().map(|p| p.commands.len()).sum::<usize>(),
            "starting run"
        );

        let mut pipelines: Vec<Vec<Slot>> = Vec::with_capacity(prepared.len());
        let mut failing = false;
        for pipeline in prepared {
            let mut slots = Vec::with_capacity(pipeline.commands.len());
            if failing {
                slots.extend(
                    pipeline
                        .commands
                        .into_iter()
                        .map(|c| Slot::idle(c, CommandStatus::NotRun)),
                );
            } else {
                failing = !spawn_pipeline(pipeline, &mut slots);
            }
            pipelines.push(slots);
        }

        self.wait_all(&mut pipelines, failing)?;

        let mut reports: Vec<PipelineReport> = pipelines
            .iter()
            .map(|slots| PipelineReport {
                commands: slots.iter().map(Slot::report).collect(),
                caused_by: Vec::new(),
            })
            .collect();
        let caused: Vec<bool> = reports
            .iter()
            .map(|p| p.commands.iter().any(CommandReport::is_cause))
            .collect();
        for (index, report) in reports.iter_mut().enumerate() {
            report.caused_by = cause_chain(index, &wiring, &caused, &mut Vec::new());
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        if reports.iter().all(PipelineReport::succeeded) {
            tracing::info!(elapsed_ms, "run completed");
            Ok(RunReport { pipelines: reports })
        } else {
            let error = PipelineError { pipelines: reports };
            tracing::error!(elapsed_ms, failed = ?error.failed_commands(), "run failed");
            Err(error.into())
        }
    }

    fn wait_all(&self, pipelines: &mut [Vec<Slot>], mut failing: bool) -> Result<(), ShellError> {
        let mut term_sent: Option<Instant> = None;
        let mut kill_sent = false;

        loop {
            let mut live = 0;
            for slot in pipelines.iter_mut().flatten() {
                let Some(child) = slot.child.as_mut() else {
                    continue;
                };
                match child.try_wait()? {
                    Some(status) => {
                        slot.status = status_of(status);
                        slot.child = None;
                        tracing::debug!(command = %slot.command, status = %slot.status, "exited");
                        if !failing && !slot.command.policy.accepts(&slot.status) {
                            tracing::warn!(
                                command = %slot.command,
                                status = %slot.status,
                                "command broke its exit policy"
                            );
                            failing = true;
                        }
                    }
                    None => live += 1,
                }
            }
            if live == 0 {
                return Ok(());
            }

            if failing {
                match term_sent {
                    None => {
                        signal_all(pipelines, Signal::SIGTERM);
                        term_sent = Some(Instant::now());
                    }
                    Some(at) if !kill_sent && at.elapsed() >= self.config.kill_grace => {
                        tracing::warn!(live, "grace period over, killing");
                        signal_all(pipelines, Signal::SIGKILL);
                        kill_sent = true;
                    }
                    Some(_) => {}
                }
            }
            std::thread::sleep(self.config.poll_interval);
        }
    }

    /// Run with unredirected stdout and stderr captured into temp files
    ///
    /// Both files are rewound to the start before they are returned.
    pub fn run_collect_files(&self, run: impl Into<Run>) -> Result<(File, File), ShellError> {
        let mut run = run.into();
        let stdout = tempfile::tempfile()?;
        let stderr = tempfile::tempfile()?;
        for pipeline in &mut run.pipelines {
            if pipeline.stdout.is_inherit() {
                pipeline.stdout = Redirect::File(stdout.try_clone()?);
            }
            if pipeline.stderr.is_inherit() {
                pipeline.stderr = Redirect::File(stderr.try_clone()?);
            }
        }
        self.run(run)?;

        let mut files = (stdout, stderr);
        files.0.seek(SeekFrom::Start(0))?;
        files.1.seek(SeekFrom::Start(0))?;
        Ok(files)
    }

    /// Run and return what unredirected stdout and stderr received
    pub fn run_collect(&self, run: impl Into<Run>) -> Result<Collected, ShellError> {
        let (mut stdout, mut stderr) = self.run_collect_files(run)?;
        Ok(Collected {
            stdout: read_all(&mut stdout)?,
            stderr: read_all(&mut stderr)?,
        })
    }
}

fn read_all(file: &mut File) -> io::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// [`Runner::run`] with the default config
pub fn run(run: impl Into<Run>) -> Result<RunReport, ShellError> {
    Runner::default().run(run)
}

/// [`Runner::run_collect`] with the default config
pub fn run_collect(run: impl Into<Run>) -> Result<Collected, ShellError> {
    Runner::default().run_collect(run)
}

/// [`Runner::run_collect_files`] with the default config
pub fn run_collect_files(run: impl Into<Run>) -> Result<(File, File), ShellError> {
    Runner::default().run_collect_files(run)
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
