//! Secret references in configuration values.
//!
//! A value may point at its secret instead of containing it:
//!
//! - `env::VAR_NAME` reads `$VAR_NAME`
//! - `pass::path/in/store` takes the first line of `pass show path/in/store`
//! - anything else is the secret itself

use std::process::Command;

/// Where a configured value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretRef<'a> {
    Env(&'a str),
    Pass(&'a str),
    Plain(&'a str),
}

impl<'a> SecretRef<'a> {
    pub fn parse(value: &'a str) -> Self {
        if let Some(var) = value.strip_prefix("env::") {
            Self::Env(var)
        } else if let Some(path) = value.strip_prefix("pass::") {
            Self::Pass(path)
        } else {
            Self::Plain(value)
        }
    }

    pub fn resolve(&self) -> Result<String, String> {
        match *self {
            Self::Env(var) => std::env::var(var)
                .map_err(|_| format!("environment variable `{}` is not set", var)),
            Self::Pass(path) => pass_show(path),
            Self::Plain(value) => Ok(value.to_string()),
        }
    }
}

/// Resolves `value`, following a reference prefix if present.
pub fn resolve(value: &str) -> Result<String, String> {
    SecretRef::parse(value).resolve()
}

fn pass_show(path: &str) -> Result<String, String> {
    let output = Command::new("pass")
        .args(["show", path])
        .output()
        .map_err(|e| format!("failed to run `pass show {}`: {}", path, e))?;

    if !output.status.success() {
        return Err(format!(
            "`pass show {}` failed ({}): {}",
            path,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(str::to_string)
        .ok_or_else(|| format!("`pass show {}` produced no output", path))
}
