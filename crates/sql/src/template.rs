// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Variant-aware query templates
//!
//! Each body is scanned once when it is added. Rendering chooses exactly one
//! body: the first runtime variant, in the caller's order, that the template
//! has a body for, else the base body. Unknown runtime variants are ignored.

use crate::scanner::{scan, Fragment};
use crate::{Bindings, ParamStyle, Params, SqlError};

#[derive(Clone, Debug, PartialEq)]
struct Body {
    text: String,
    fragments: Vec<Fragment>,
}

impl Body {
    fn parse(text: &str) -> Result<Self, SqlError> {
        Ok(Self {
            text: text.to_string(),
            fragments: scan(text)?,
        })
    }
}

/// A query rendered for one parameter style
#[derive(Clone, Debug, PartialEq)]
pub struct Rendered {
    pub sql: String,
    pub params: Params,
}

/// SQL with `:name` placeholders and per-dialect alternate bodies
#[derive(Clone, Debug, PartialEq)]
pub struct QueryTemplate {
    base: Body,
    variants: Vec<(String, Body)>,
}

impl QueryTemplate {
    pub fn new(base: &str) -> Result<Self, SqlError> {
        Ok(Self {
            base: Body::parse(base)?,
            variants: Vec::new(),
        })
    }

    /// Template with alternate bodies, later tags replacing earlier ones
    pub fn with_variants<I, T, B>(base: &str, variants: I) -> Result<Self, SqlError>
    where
        I: IntoIterator<Item = (T, B)>,
        T: Into<String>,
        B: AsRef<str>,
    {
        variants
            .into_iter()
            .try_fold(Self::new(base)?, |template, (tag, body)| {
                template.variant(tag, body.as_ref())
            })
    }

    /// Add or replace the body for `tag`
    pub fn variant(mut self, tag: impl Into<String>, body: &str) -> Result<Self, SqlError> {
        let tag = tag.into();
        let body = Body::parse(body)?;
        match self.variants.iter_mut().find(|(t, _)| *t == tag) {
            Some(slot) => slot.1 = body,
            None => self.variants.push((tag, body)),
        }
        Ok(self)
    }

    pub fn base(&self) -> &str {
        &self.base.text
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(|(tag, _)| tag.as_str())
    }

    fn body_for<S: AsRef<str>>(&self, runtime: &[S]) -> &Body {
        runtime
            .iter()
            .find_map(|wanted| {
                self.variants
                    .iter()
                    .find(|(tag, _)| tag == wanted.as_ref())
                    .map(|(_, body)| body)
            })
            .unwrap_or(&self.base)
    }

    /// The body chosen for `runtime`, unrendered
    pub fn select<S: AsRef<str>>(&self, runtime: &[S]) -> &str {
        &self.body_for(runtime).text
    }

    /// Parameter names of the chosen body, in first-occurrence order
    pub fn parameters<S: AsRef<str>>(&self, runtime: &[S]) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for fragment in &self.body_for(runtime).fragments {
            if let Fragment::Param(name) = fragment {
                if !names.contains(&name.as_str()) {
                    names.push(name.as_str());
                }
            }
        }
        names
    }

    /// Render the chosen body in `style`
    ///
    /// Mapping styles pass `bindings` through whole; list styles carry one
    /// value per placeholder (`qmark`, `format`) or per distinct name
    /// (`numeric`, `dollar`). Every placeholder must have a binding.
    pub fn render<S: AsRef<str>>(
        &self,
        style: ParamStyle,
        runtime: &[S],
        bindings: &Bindings,
    ) -> Result<Rendered, SqlError> {
        let body = self.body_for(runtime);
        let mut sql = String::with_capacity(body.text.len() + 8);
        let mut positional = Vec::new();
        let mut numbered: Vec<&str> = Vec::new();

        for fragment in &body.fragments {
            let name = match fragment {
                Fragment::Literal(text) if style.escapes_percent() => {
                    sql.push_str(&text.replace('%', "%%"));
                    continue;
                }
                Fragment::Literal(text) => {
                    sql.push_str(text);
                    continue;
                }
                Fragment::Param(name) => name,
            };
            let value = bindings
                .get(name)
                .ok_or_else(|| SqlError::MissingParam { name: name.clone() })?;

            match style {
                ParamStyle::Qmark => {
                    sql.push('?');
                    positional.push(value.clone());
                }
                ParamStyle::Format => {
                    sql.push_str("%s");
                    positional.push(value.clone());
                }
                ParamStyle::Numeric | ParamStyle::Dollar => {
                    let number = match numbered.iter().position(|n| *n == name.as_str()) {
                        Some(p) => p + 1,
                        None => {
                            numbered.push(name.as_str());
                            positional.push(value.clone());
                            numbered.len()
                        }
                    };
                    let sigil = if style == ParamStyle::Numeric { ':' } else { '$' };
                    sql.push_str(&format!("{sigil}{number}"));
                }
                ParamStyle::Named => {
                    sql.push(':');
                    sql.push_str(name);
                }
                ParamStyle::Pyformat => sql.push_str(&format!("%({name})s")),
            }
        }

        let params = if style.is_named() {
            Params::Named(bindings.clone())
        } else {
            Params::Positional(positional)
        };
        Ok(Rendered { sql, params })
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
