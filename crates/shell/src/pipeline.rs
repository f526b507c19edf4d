// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipelines and runs

use crate::template::{split_words, substitute, Word};
use crate::{Command, Redirect, ShellError};
use std::collections::HashMap;

/// Commands joined by pipes, with redirections for the whole chain
///
/// `stdin` feeds the first command, `stdout` takes the last command's
/// output, and every command's standard error goes to `stderr`.
#[derive(Debug, Default)]
pub struct Pipeline {
    pub commands: Vec<Command>,
    pub stdin: Redirect,
    pub stdout: Redirect,
    pub stderr: Redirect,
}

impl Pipeline {
    pub fn new(command: Command) -> Self {
        Self::of([command])
    }

    pub fn of(commands: impl IntoIterator<Item = Command>) -> Self {
        Self {
            commands: commands.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Append a command reading the previous command's output
    pub fn pipe(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    pub fn stdin(mut self, redirect: Redirect) -> Self {
        self.stdin = redirect;
        self
    }

    pub fn stdout(mut self, redirect: Redirect) -> Self {
        self.stdout = redirect;
        self
    }

    pub fn stderr(mut self, redirect: Redirect) -> Self {
        self.stderr = redirect;
        self
    }

    /// Build a pipeline from argument tokens
    ///
    /// `|` separates commands. `<f`, `>f`, `>>f`, `2>f` and `2>>f` redirect
    /// the pipeline (the file may also be the following token) and `2>&1`
    /// sends standard error to standard output.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, ShellError> {
        Self::from_words(args.iter().map(|a| Word::plain(a.as_ref())).collect())
    }

    /// Expand a `%(name)s` template, split it into words and build a pipeline
    pub fn parse(template: &str, vars: &HashMap<String, String>) -> Result<Self, ShellError> {
        Self::from_words(split_words(&substitute(template, vars)?)?)
    }

    /// Build a pipeline from split words; quoted words are never operators
    pub fn from_words(words: Vec<Word>) -> Result<Self, ShellError> {
        let source = words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let parse_error = |reason: &str| ShellError::Parse {
            input: source.clone(),
            reason: reason.to_string(),
        };

        let mut pipeline = Pipeline::default();
        let mut current: Vec<String> = Vec::new();
        let mut words = words.into_iter();

        while let Some(word) = words.next() {
            if word.quoted {
                current.push(word.text);
                continue;
            }
            let text = word.text;
            if text == "|" {
                pipeline.push_command(std::mem::take(&mut current), &parse_error)?;
                continue;
            }
            if text == "2>&1" {
                pipeline.stderr = Redirect::ToStdout;
                continue;
            }
            let Some(op) = ["2>>", "2>", ">>", ">", "<"]
                .into_iter()
                .find(|op| text.starts_with(op))
            else {
                current.push(text);
                continue;
            };
            let target = match &text[op.len()..] {
                "" => match words.next() {
                    Some(next) if next.quoted || !is_operator(&next.text) => next.text,
                    _ => return Err(parse_error(&format!("{op} needs a file name"))),
                },
                rest => rest.to_string(),
            };
            match op {
                "<" => pipeline.stdin = Redirect::read(target),
                ">" => pipeline.stdout = Redirect::write(target),
                ">>" => pipeline.stdout = Redirect::append(target),
                "2>" => pipeline.stderr = Redirect::write(target),
                _ => pipeline.stderr = Redirect::append(target),
            }
        }
        pipeline.push_command(current, &parse_error)?;
        Ok(pipeline)
    }

    fn push_command(
        &mut self,
        words: Vec<String>,
        parse_error: &dyn Fn(&str) -> ShellError,
    ) -> Result<(), ShellError> {
        let mut words = words.into_iter();
        let program = words.next().ok_or_else(|| parse_error("empty command"))?;
        self.commands.push(Command::new(program).args(words));
        Ok(())
    }
}

fn is_operator(text: &str) -> bool {
    text == "|" || text.starts_with('<') || text.starts_with('>') || text.starts_with("2>")
}

/// Pipelines started together
#[derive(Debug, Default)]
pub struct Run {
    pub pipelines: Vec<Pipeline>,
}

impl Run {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, pipeline: Pipeline) -> Self {
        self.pipelines.push(pipeline);
        self
    }

    pub fn push(&mut self, pipeline: Pipeline) {
        self.pipelines.push(pipeline);
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}

impl FromIterator<Pipeline> for Run {
    fn from_iter<I: IntoIterator<Item = Pipeline>>(iter: I) -> Self {
        Self {
            pipelines: iter.into_iter().collect(),
        }
    }
}

impl From<Pipeline> for Run {
    fn from(pipeline: Pipeline) -> Self {
        Self::new().with(pipeline)
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
