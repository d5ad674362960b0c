//! Error adapter for converting [`CliError`] to miette diagnostics.
//!
//! TOML errors in scenario and configuration files carry a byte span into
//! their source and are rendered with a labelled snippet. Everything else is
//! reported as a plain error with a diagnostic code.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use strata::StrataError;

use crate::{config::ConfigError, error::CliError};

/// Adapter for a TOML deserialization error and the text it was parsed from.
pub struct TomlAdapter<'a> {
    err: &'a toml::de::Error,
    src: &'a str,
    code: &'static str,
}

impl<'a> TomlAdapter<'a> {
    /// Create a new TOML adapter.
    pub fn new(err: &'a toml::de::Error, src: &'a str, code: &'static str) -> Self {
        Self { err, src, code }
    }
}

impl fmt::Debug for TomlAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TomlAdapter")
            .field("err", &self.err)
            .field("code", &self.code)
            .finish()
    }
}

impl fmt::Display for TomlAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.err.message())
    }
}

impl std::error::Error for TomlAdapter<'_> {}

impl MietteDiagnostic for TomlAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.err.span()?;
        let span = SourceSpan::new(span.start.into(), span.len());
        Some(Box::new(std::iter::once(LabeledSpan::new_primary_with_span(
            Some("here".to_string()),
            span,
        ))))
    }
}

/// Adapter for [`CliError`] variants without source information.
pub struct ErrorAdapter<'a>(pub &'a CliError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            CliError::Strata(StrataError::Io(_)) | CliError::Io(_) => "strata::io",
            CliError::Strata(StrataError::Config(_)) => "strata::config",
            CliError::Strata(StrataError::Snapshot(_)) => "strata::snapshot",
            CliError::Strata(StrataError::Export(_)) | CliError::Serialize(_) => "strata::export",
            CliError::Config(ConfigError::Io(_)) => "strata::io",
            CliError::Config(_) => "strata::config",
            CliError::Scenario { .. } => "strata::scenario",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            CliError::Config(ConfigError::MissingFile(_)) => Some(Box::new(
                "omit --config to search the default locations",
            )),
            _ => None,
        }
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A TOML error with a labelled source span.
    Toml(TomlAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Toml(t) => fmt::Display::fmt(t, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Toml(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Toml(t) => t.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Toml(t) => t.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Toml(t) => t.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Toml(t) => t.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a [`CliError`] into a list of reportable errors.
pub fn to_reportables(err: &CliError) -> Vec<Reportable<'_>> {
    match err {
        CliError::Scenario { src, err, .. } => {
            vec![Reportable::Toml(TomlAdapter::new(err, src, "strata::scenario"))]
        }
        CliError::Config(ConfigError::Parse { src, err, .. }) => {
            vec![Reportable::Toml(TomlAdapter::new(err, src, "strata::config"))]
        }
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn scenario_error(src: &str) -> CliError {
        let err = toml::from_str::<toml::Table>(src).unwrap_err();
        CliError::Scenario {
            path: PathBuf::from("broken.toml"),
            src: src.to_string(),
            err,
        }
    }

    #[test]
    fn test_scenario_error_is_labelled() {
        let err = scenario_error("[snapshot\nsource_uri = 1");

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        match &reportables[0] {
            Reportable::Toml(t) => {
                assert_eq!(t.code().unwrap().to_string(), "strata::scenario");
                assert!(t.source_code().is_some());
                let labels: Vec<_> = t.labels().unwrap().collect();
                assert_eq!(labels.len(), 1);
                assert!(labels[0].primary());
            }
            Reportable::Error(_) => panic!("Expected Toml"),
        }
    }

    #[test]
    fn test_snapshot_error_has_code() {
        let err = CliError::Strata(StrataError::Snapshot("duplicate node id `a`".to_string()));

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(
                    e.to_string(),
                    "Invalid model snapshot: duplicate node id `a`"
                );
                assert_eq!(e.code().unwrap().to_string(), "strata::snapshot");
                assert!(e.labels().is_none());
            }
            Reportable::Toml(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_missing_config_has_help() {
        let err = CliError::Config(ConfigError::MissingFile(PathBuf::from("nope.toml")));

        let reportables = to_reportables(&err);

        assert_eq!(reportables[0].code().unwrap().to_string(), "strata::config");
        assert!(reportables[0].help().is_some());
    }
}
