//! CLI binary entrypoint.

mod commands;
mod error;
mod format;
mod logging;
mod targets;

use clap::{Parser, Subcommand};
use commands::{
    DEMO_SORT_VALUE, RejectionPolicy, SortCheck, run_config_schema, run_config_show, run_fields,
    run_parse_tag, run_sort_check,
};
use error::{CliError, ExitCode};
use format::{OutputArgs, OutputMode};
use sortguard_config::{ValidatedSortguardConfig, load_config_std_env, parse_sort_request_json};
use sortguard_domain::TAG_SEPARATOR;
use sortguard_rules::{Locale, Validator, build_validator};
use sortguard_shared::ErrorEnvelope;
use std::io::{self, Write};
use std::path::PathBuf;
use targets::{TargetRegistry, resolve_target_name};

#[derive(Debug, Parser)]
#[command(
    name = "sortguard",
    version,
    about = "Validate sort columns against tagged reference structs",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    output: OutputArgs,

    /// Config file path (JSON/TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Message locale (`en` or `zh`); overrides the config.
    #[arg(long, global = true)]
    locale: Option<Locale>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate one sort value and always exit 0.
    Demo {
        /// Candidate sort value.
        #[arg(long, default_value = DEMO_SORT_VALUE)]
        value: String,
        /// Reference struct name.
        #[arg(long)]
        target: Option<String>,
    },
    /// Validate a sort value; exits 2 when it is rejected.
    Check {
        /// Reference struct name.
        #[arg(long)]
        target: Option<String>,
        /// Candidate sort value.
        #[arg(long, required_unless_present = "request", conflicts_with = "request")]
        value: Option<String>,
        /// Sort request encoded as JSON (`{"sortField": ..., "target": ...}`).
        #[arg(long)]
        request: Option<String>,
    },
    /// Show the allowed sort values of a reference struct.
    Fields {
        /// Reference struct name.
        #[arg(long)]
        target: Option<String>,
    },
    /// Parse a raw field tag into its settings.
    ParseTag {
        /// Raw tag text, e.g. `column:id;primaryKey`.
        #[arg(value_name = "RAW")]
        raw: String,
        /// Separator between settings.
        #[arg(long, default_value_t = TAG_SEPARATOR)]
        sep: char,
    },
    /// Config-related commands.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Show the effective config after env overrides.
    Show,
    /// Print the JSON Schema for `check --request` payloads.
    Schema,
}

pub(crate) struct CliOutput {
    stdout: String,
    stderr: String,
    exit_code: ExitCode,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let mode = OutputMode::from_args(&cli.output);

    match run(&cli, mode) {
        Ok(output) => match write_output(&output) {
            Ok(()) => std::process::ExitCode::from(output.exit_code.as_u8()),
            Err(error) => exit_with_error(&error),
        },
        Err(error) => exit_with_error(&error),
    }
}

fn exit_with_error(error: &CliError) -> std::process::ExitCode {
    let _ = writeln!(io::stderr(), "error: {error}");
    std::process::ExitCode::from(error.exit_code().as_u8())
}

fn run(cli: &Cli, mode: OutputMode) -> Result<CliOutput, CliError> {
    let config = load_config_std_env(cli.config.as_deref())?;
    logging::init_tracing(&config.log)?;
    let locale = cli.locale.unwrap_or(config.locale);

    match &cli.command {
        Commands::Demo { value, target } => {
            let validator = bootstrap_validator()?;
            let check = SortCheck {
                target: TargetRegistry::builtin()
                    .get(resolve_target_name(target.as_deref(), configured_target(&config)))?,
                value: value.as_str(),
                locale,
                policy: RejectionPolicy::Report,
            };
            run_sort_check(mode, &validator, check)
        },
        Commands::Check {
            target,
            value,
            request,
        } => {
            let validator = bootstrap_validator()?;
            run_check(
                mode,
                &validator,
                &config,
                locale,
                target.as_deref(),
                value.as_deref(),
                request.as_deref(),
            )
        },
        Commands::Fields { target } => {
            let entry = TargetRegistry::builtin()
                .get(resolve_target_name(target.as_deref(), configured_target(&config)))?;
            run_fields(mode, entry)
        },
        Commands::ParseTag { raw, sep } => run_parse_tag(mode, raw, *sep),
        Commands::Config { command } => match command {
            ConfigCommands::Show => run_config_show(mode, &config, cli.config.as_deref()),
            ConfigCommands::Schema => run_config_schema(),
        },
    }
}

fn run_check(
    mode: OutputMode,
    validator: &Validator,
    config: &ValidatedSortguardConfig,
    locale: Locale,
    target: Option<&str>,
    value: Option<&str>,
    request: Option<&str>,
) -> Result<CliOutput, CliError> {
    let registry = TargetRegistry::builtin();
    match (request, value) {
        (Some(json), _) => {
            let request = parse_sort_request_json(json)?;
            let name = resolve_target_name(
                target.or(request.target.as_deref()),
                configured_target(config),
            );
            let check = SortCheck {
                target: registry.get(name)?,
                value: &*request.sort_field,
                locale,
                policy: RejectionPolicy::Fail,
            };
            run_sort_check(mode, validator, check)
        },
        (None, Some(value)) => {
            let check = SortCheck {
                target: registry.get(resolve_target_name(target, configured_target(config)))?,
                value,
                locale,
                policy: RejectionPolicy::Fail,
            };
            run_sort_check(mode, validator, check)
        },
        (None, None) => Err(CliError::InvalidInput(
            "either --value or --request is required".to_owned(),
        )),
    }
}

fn configured_target(config: &ValidatedSortguardConfig) -> Option<&str> {
    config.default_target.as_deref()
}

fn bootstrap_validator() -> Result<Validator, CliError> {
    build_validator().map_err(|error| {
        let envelope = ErrorEnvelope::from(error);
        tracing::error!(
            target: "sortguard::cli",
            code = %envelope.code,
            error = %envelope,
            "validator bootstrap failed"
        );
        CliError::from(envelope)
    })
}

fn write_output(output: &CliOutput) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    stdout.write_all(output.stdout.as_bytes())?;

    if !output.stderr.is_empty() {
        let mut stderr = io::stderr();
        stderr.write_all(output.stderr.as_bytes())?;
        stderr.flush()?;
    }

    Ok(())
}
