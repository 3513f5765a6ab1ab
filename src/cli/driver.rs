//! Top-level flow of one invocation
//!
//! parse → resolve format → configure → execute → finish. Every path ends
//! in an exit code: `0`, a taxonomy code, or nothing else.

use std::ffi::OsString;
use std::io::{self, Write};

use clap::error::ErrorKind as ClapErrorKind;
use clap::Command;
use tracing::{debug, info};

use crate::application::operation::{Namespace, OperationResult};
use crate::application::sink::{OutputFormat, OutputSink};
use crate::application::Registry;
use crate::cli::args::build_command;
use crate::cli::error::StartupError;
use crate::cli::output::{self, TextSink};
use crate::cli::parser_patterns::parser_patterns;
use crate::config::{Settings, SettingsError};
use crate::domain::{ClassifiedFailure, ErrorKind, TranslationSet};
use crate::exitcode;

pub struct Driver<'r> {
    registry: &'r Registry,
    command: Command,
    parser_patterns: TranslationSet,
    settings: Result<Settings, SettingsError>,
}

impl<'r> Driver<'r> {
    /// `settings` is reported as `CONFIG_INVALID` only once parsing succeeded.
    pub fn new(
        registry: &'r Registry,
        settings: Result<Settings, SettingsError>,
    ) -> Result<Self, StartupError> {
        Ok(Self {
            command: build_command(registry.tree()),
            parser_patterns: parser_patterns()?,
            registry,
            settings,
        })
    }

    /// Run against the process arguments and standard streams.
    pub fn run(&self, configure: impl FnOnce(u8, OutputFormat)) -> i32 {
        let mut stdout = io::stdout().lock();
        let mut stderr = io::stderr().lock();
        self.run_with(std::env::args_os(), &mut stdout, &mut stderr, configure)
    }

    /// Run one invocation; JSON goes to `output`, text and help-less
    /// diagnostics to `diagnostic`. Returns the exit code.
    pub fn run_with<I, T>(
        &self,
        argv: I,
        output: &mut dyn Write,
        diagnostic: &mut dyn Write,
        configure: impl FnOnce(u8, OutputFormat),
    ) -> i32
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args = match self.parse(argv, output, diagnostic) {
            Ok(args) => args,
            Err(code) => return code,
        };

        let settings = match &self.settings {
            Ok(settings) => *settings,
            Err(e) => {
                // Settings are unusable; only an explicit --format applies.
                let format = args.format().unwrap_or(OutputFormat::Text);
                let failure =
                    ClassifiedFailure::with_arguments(ErrorKind::ConfigInvalid, [("reason", e)]);
                return render(failure, format, output, diagnostic);
            }
        };

        let format = args.format().unwrap_or(settings.output_format);
        let verbosity = args.verbosity().saturating_add(settings.verbose);
        configure(verbosity, format);
        info!(?format, verbosity, "configured");

        self.execute(&args, format, output, diagnostic)
    }

    /// Parse `argv`; on failure the outcome is already rendered and the
    /// exit code is returned as the error.
    fn parse<I, T>(
        &self,
        argv: I,
        output: &mut dyn Write,
        diagnostic: &mut dyn Write,
    ) -> Result<Namespace, i32>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match self.command.clone().try_get_matches_from(argv) {
            Ok(matches) => Ok(self.registry.tree().resolve(&matches)),
            Err(e) if matches!(e.kind(), ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion) => {
                write!(output, "{}", e).ok();
                output.flush().ok();
                Err(exitcode::OK)
            }
            Err(e) => {
                let message = e.to_string();
                debug!(%message, "argument parsing failed");
                let failure = self
                    .parser_patterns
                    .translate(message.trim_end(), ErrorKind::ParserUnknown);
                Err(render_text(failure, diagnostic))
            }
        }
    }

    fn execute(
        &self,
        args: &Namespace,
        format: OutputFormat,
        output: &mut dyn Write,
        diagnostic: &mut dyn Write,
    ) -> i32 {
        let finished: io::Result<OperationResult> = {
            let mut sink = output::bind(format, &mut *output, &mut *diagnostic);
            let outcome = self.registry.tree().execute(args, sink.as_mut());
            let written = sink.finish(&outcome);
            written.map(|()| outcome)
        };

        match finished {
            Ok(Ok(_)) => exitcode::OK,
            Ok(Err(failure)) => {
                debug!(kind = %failure.kind(), code = failure.code(), "operation failed");
                failure.code()
            }
            Err(e) => render_text(
                ClassifiedFailure::caused_by(ErrorKind::InternalOutputFailure, e),
                diagnostic,
            ),
        }
    }
}

/// Render `failure` as text on `diagnostic` and return its exit code.
fn render_text(failure: ClassifiedFailure, diagnostic: &mut dyn Write) -> i32 {
    let code = failure.code();
    TextSink::new(diagnostic).finish(&Err(failure)).ok();
    code
}

/// Render `failure` through the sink for `format` and return its exit code.
fn render(
    failure: ClassifiedFailure,
    format: OutputFormat,
    output: &mut dyn Write,
    diagnostic: &mut dyn Write,
) -> i32 {
    let code = failure.code();
    output::bind(format, output, diagnostic)
        .finish(&Err(failure))
        .ok();
    code
}
