use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glob::glob;

use tiptop_core::{Client, ConfigDocument, Simulation, validate};

#[derive(Parser, Debug)]
#[command(name = "tiptop")]
#[command(version)]
#[command(
    about = "Client for the ESO TIPTOP PSF-simulation service.",
    long_about = None,
    after_help = "Examples:\n  tiptop templates\n  tiptop validate my_config.ini\n  tiptop generate my_config.ini -o psf.fits --timeout 180\n  tiptop ping"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List bundled instrument templates.
    Templates,
    /// Parse a config file and print the normalized dialect text.
    Show {
        /// Path to a .ini config file
        input: PathBuf,

        /// Print a JSON rendering instead of dialect text
        #[arg(long)]
        json: bool,
    },
    /// Check a config file for problems without contacting the service.
    Validate {
        /// Path to a .ini config file
        input: PathBuf,

        /// Only report errors, not warnings
        #[arg(long)]
        quiet: bool,
    },
    /// Run the simulation and save the returned FITS container.
    Generate {
        /// Path to a .ini config file
        input: PathBuf,

        /// Output FITS path
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Request timeout in seconds
        #[arg(long, default_value_t = tiptop_core::DEFAULT_TIMEOUT.as_secs())]
        timeout: u64,

        /// Override the service endpoint URL
        #[arg(long)]
        endpoint: Option<String>,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
    /// Check whether the TIPTOP service is reachable.
    Ping {
        /// Override the service endpoint URL
        #[arg(long)]
        endpoint: Option<String>,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Templates => cmd_templates(),
        Commands::Show { input, json } => cmd_show(input, json),
        Commands::Validate { input, quiet } => cmd_validate(input, quiet),
        Commands::Generate {
            input,
            output,
            timeout,
            endpoint,
            quiet,
        } => cmd_generate(input, output, timeout, endpoint, quiet),
        Commands::Ping { endpoint } => cmd_ping(endpoint),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

fn cmd_templates() -> Result<(), CliError> {
    for name in tiptop_core::list_instruments() {
        println!("{name}");
    }
    Ok(())
}

fn cmd_show(input: PathBuf, json: bool) -> Result<(), CliError> {
    let input = resolve_input_path(&input)?;
    validate_input_file(&input)?;
    let document = load_document(&input)?;
    if json {
        let rendered = serde_json::to_string_pretty(&document)
            .context("JSON serialization failed")?;
        println!("{rendered}");
    } else {
        print!("{}", document.serialize());
    }
    Ok(())
}

fn cmd_validate(input: PathBuf, quiet: bool) -> Result<(), CliError> {
    let input = resolve_input_path(&input)?;
    validate_input_file(&input)?;
    let document = load_document(&input)?;
    let issues = validate(&document);

    let errors = issues.iter().filter(|issue| issue.is_error()).count();
    for issue in &issues {
        if issue.is_error() || !quiet {
            println!("{issue}");
        }
    }
    if errors > 0 {
        return Err(CliError::new(
            format!("config has {errors} error(s)"),
            Some("fix the ERROR entries above before sending".to_string()),
        ));
    }
    if !quiet {
        eprintln!("OK: {} issue(s), no errors", issues.len());
    }
    Ok(())
}

fn cmd_generate(
    input: PathBuf,
    output: PathBuf,
    timeout: u64,
    endpoint: Option<String>,
    quiet: bool,
) -> Result<(), CliError> {
    let input = resolve_input_path(&input)?;
    validate_input_file(&input)?;

    let simulation = Simulation::from_ini_path(&input)
        .with_context(|| format!("Failed to load config: {}", input.display()))
        .map_err(CliError::from)?;
    let client = match endpoint {
        Some(endpoint) => Client::with_endpoint(endpoint),
        None => Client::new(),
    };

    let result = simulation
        .generate_psf(&client, Duration::from_secs(timeout))
        .map_err(|err| {
            let hint = match &err {
                tiptop_core::SimulationError::InvalidConfig { .. } => {
                    Some("run `tiptop validate` for the full report".to_string())
                }
                tiptop_core::SimulationError::Protocol(
                    tiptop_core::ProtocolError::Transport(_),
                ) => Some(
                    "check network connectivity, or point --endpoint at a mirror".to_string(),
                ),
                _ => None,
            };
            CliError::new(err.to_string(), hint)
        })?;

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    result
        .save(&output)
        .with_context(|| format!("Failed to write result: {}", output.display()))?;

    if !quiet {
        eprintln!(
            "OK: {} wavelength(s), {} position(s) -> {}",
            result.n_wavelengths(),
            result.n_positions(),
            output.display()
        );
    }
    Ok(())
}

fn cmd_ping(endpoint: Option<String>) -> Result<(), CliError> {
    let client = match endpoint {
        Some(endpoint) => Client::with_endpoint(endpoint),
        None => Client::new(),
    };
    if client.ping() {
        println!("TIPTOP service is reachable: {}", client.endpoint());
        Ok(())
    } else {
        Err(CliError::new(
            format!("TIPTOP service is unreachable: {}", client.endpoint()),
            Some("check network connectivity, or pass --endpoint".to_string()),
        ))
    }
}

fn load_document(input: &PathBuf) -> Result<ConfigDocument, CliError> {
    ConfigDocument::from_path(input)
        .with_context(|| format!("Failed to load config: {}", input.display()))
        .map_err(CliError::from)
}

fn validate_input_file(input: &PathBuf) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a TIPTOP .ini config file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "ini" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .ini config file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &PathBuf) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.clone());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected a .ini file".to_string()),
        ));
    }
    if matches.len() > 1 {
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches)",
                pattern,
                matches.len()
            ),
            Some("pass a single config file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
