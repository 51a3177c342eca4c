// Command-line interface for pandoc-babel
//
// panbabel builds a pandoc command line from its arguments, runs it and prints the result.
// All of the work happens in the pandoc-babel library; this binary only maps arguments,
// configuration and standard streams onto it.
//
// Converting:
//
// Inputs are literal text by default and are piped to pandoc on stdin. With --path-mode, inputs
// that name existing files are passed to pandoc as paths instead, and --from is detected from the
// first file's extension when omitted.
// Usage:
//  panbabel <input>... [--from <reader>] [--to <writer>] [-o <file>]          - Convert (default)
//  panbabel convert <input>... [--from <reader>] [--to <writer>] [-o <file>]  - Same as above (explicit)
//  panbabel command <input>... [...]                                           - Print the pandoc command only
//  panbabel --list-formats [--json]                                            - List readers and writers
//
// Extra Parameters:
//
// Any other pandoc option is passed as --extra-<name> [value]. The "extra-" prefix is stripped and
// the rest becomes a pandoc option, in the order given on the command line.
// Example:
//  panbabel notes.md --path-mode --to html --extra-standalone --extra-toc-depth 2

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use pandoc_babel::options::{self, OptionDecl};
use pandoc_babel::{catalog, ConversionError, ConversionOutput, Converter, FormatRegistry, Settings};
use pandoc_config::{ConfigError, Loader, PandocConfig};
use std::io::{self, Read};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const SUBCOMMANDS: &[&str] = &["convert", "command", "help"];
const OUTPUT_OPTIONS: &[&str] = &["o", "output"];
const GLOBAL_VALUE_OPTIONS: &[&str] = &["--config", "--pandoc"];
const GLOBAL_FLAGS: &[&str] = &["--list-formats", "--json", "--path-mode", "--verbose", "-v"];

#[derive(Debug, Error)]
enum CliError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("Error reading standard input: {0}")]
    Stdin(#[source] io::Error),

    #[error("{0}")]
    Usage(String),
}

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_option_declarations)
///
/// Supports:
/// - `--extra-<name> <value>` (valued option)
/// - `--extra-<name>` (flag, when followed by another option or nothing)
/// - `--extras-<name>` (alias for `--extra-<name>`)
///
/// Declarations keep their command line order. Scanning stops at `--`: everything after it
/// goes to clap untouched, so a literal input starting with `--extra-` can be passed there.
/// Before `--`, an input following a valued `--extra-<name>` is taken as its value.
fn parse_extra_args(args: &[String]) -> (Vec<String>, Vec<OptionDecl>) {
    let mut cleaned_args = Vec::new();
    let mut extras = Vec::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        if arg == "--" {
            cleaned_args.extend_from_slice(&args[i..]);
            break;
        }

        let key_opt = if let Some(key) = arg.strip_prefix("--extra-") {
            Some(key)
        } else {
            arg.strip_prefix("--extras-")
        };

        if let Some(key) = key_opt {
            let value = args.get(i + 1).filter(|next| !next.starts_with('-'));
            match value {
                Some(value) => {
                    extras.push(OptionDecl::value(key, value));
                    i += 2;
                }
                None => {
                    extras.push(OptionDecl::flag(key));
                    i += 1;
                }
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extras)
}

fn conversion_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("input")
                .help("Literal text, file paths (with --path-mode) or '-' for stdin")
                .required(true)
                .num_args(1..)
                .index(1)
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("from")
                .long("from")
                .short('f')
                .help("Reader (auto-detected from the file extension in path mode)")
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("to")
                .long("to")
                .short('t')
                .help("Writer (pandoc defaults to html)")
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Output file path (defaults to stdout, required for binary writers)")
                .value_hint(ValueHint::FilePath),
        )
}

fn build_cli() -> Command {
    Command::new("panbabel")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Build and run pandoc command lines")
        .long_about(
            "panbabel drives the pandoc document converter.\n\n\
            Commands:\n  \
            - convert: Run a conversion and print the result (default command)\n  \
            - command: Print the pandoc command a conversion would run\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to pass any other pandoc option.\n  \
            Options without a value become flags.\n\n\
            Examples:\n  \
            panbabel '# Title' --to rst                          # Literal text to reStructuredText\n  \
            cat notes.md | panbabel - --to html                  # Read stdin\n  \
            panbabel --path-mode notes.md --to docx -o out.docx  # File to Word\n  \
            panbabel command '# x' --to html --extra-standalone  # Show the command line",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available readers and writers")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print --list-formats output as JSON")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a pandoc.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("pandoc")
                .long("pandoc")
                .value_name("PATH")
                .help("Command used to launch pandoc (e.g. '/usr/bin/env pandoc')")
                .value_hint(ValueHint::CommandString)
                .global(true),
        )
        .arg(
            Arg::new("path-mode")
                .long("path-mode")
                .help("Treat inputs naming existing files as paths")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log pandoc invocations to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(conversion_args(
            Command::new("convert")
                .about("Run a conversion (default command)")
                .long_about(
                    "Run pandoc and print its output.\n\n\
                    Inputs are joined with a blank line and piped to pandoc unless --path-mode\n\
                    is set and every input names an existing file.\n\
                    Binary writers (docx, odt, epub, epub3) need -o.\n\n\
                    Examples:\n  \
                    panbabel convert '# Title' --from markdown --to latex\n  \
                    panbabel '# Title' --to latex                     # 'convert' is optional",
                ),
        ))
        .subcommand(conversion_args(
            Command::new("command")
                .about("Print the pandoc command line without running it"),
        ))
}

/// Parse `args`, injecting `convert` after the leading global options when no subcommand is
/// given.
fn parse_cli(args: &[String]) -> Result<ArgMatches, clap::Error> {
    let cli = build_cli();
    match cli.clone().try_get_matches_from(args) {
        Ok(matches) => Ok(matches),
        Err(err)
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) =>
        {
            Err(err)
        }
        Err(err) => match subcommand_slot(args) {
            Some(index) if !SUBCOMMANDS.contains(&args[index].as_str()) => {
                let mut new_args = args[..index].to_vec();
                new_args.push("convert".to_string());
                new_args.extend_from_slice(&args[index..]);
                cli.try_get_matches_from(&new_args)
            }
            _ => Err(err),
        },
    }
}

/// Index of the first argument that is neither a global option nor its value. Conversion
/// options such as `-t rst` count, so they end up after the injected subcommand.
fn subcommand_slot(args: &[String]) -> Option<usize> {
    let mut i = 1;
    while i < args.len() {
        let arg = args[i].as_str();
        if GLOBAL_VALUE_OPTIONS.contains(&arg) {
            i += 2;
            continue;
        }
        let inline_value = GLOBAL_VALUE_OPTIONS
            .iter()
            .any(|option| arg.strip_prefix(option).is_some_and(|rest| rest.starts_with('=')));
        if !GLOBAL_FLAGS.contains(&arg) && !inline_value {
            return Some(i);
        }
        i += 1;
    }
    None
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    // Pull extra-* arguments out before clap sees them
    let (cleaned_args, extras) = parse_extra_args(&args);

    let matches = match parse_cli(&cleaned_args) {
        Ok(matches) => matches,
        Err(err) => err.exit(),
    };

    init_tracing(matches.get_flag("verbose"));

    if let Err(err) = run(&matches, extras) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches, extras: Vec<OptionDecl>) -> Result<(), CliError> {
    if matches.get_flag("list-formats") {
        return handle_list_formats_command(matches.get_flag("json"));
    }

    let mut config = load_cli_config(matches.get_one::<String>("config").map(String::as_str))?;
    apply_cli_overrides(&mut config, matches);

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let converter =
                build_converter(sub_matches, extras, &config, &mut io::stdin().lock())?;
            handle_convert_command(converter)
        }
        Some(("command", sub_matches)) => {
            let converter = build_converter(sub_matches, extras, &config, &mut io::empty())?;
            println!("{}", converter.command_line()?);
            Ok(())
        }
        _ => Err(CliError::Usage(
            "Unknown subcommand. Use --help for usage information.".to_string(),
        )),
    }
}

/// Handle the convert command
fn handle_convert_command(mut converter: Converter) -> Result<(), CliError> {
    match converter.convert(Vec::new())? {
        ConversionOutput::Text(text) => {
            print!("{text}");
            Ok(())
        }
        ConversionOutput::Binary(_) => Err(binary_needs_output()),
    }
}

/// Handle the list-formats command
fn handle_list_formats_command(json: bool) -> Result<(), CliError> {
    if json {
        let listing = serde_json::json!({
            "readers": catalog::readers(),
            "string_writers": catalog::string_writers(),
            "binary_writers": catalog::binary_writers(),
        });
        let text = serde_json::to_string_pretty(&listing)
            .map_err(|err| CliError::Usage(format!("could not render format list: {err}")))?;
        println!("{text}");
        return Ok(());
    }

    println!("Readers:");
    for entry in catalog::readers() {
        println!("  {:<14}{}", entry.name, entry.label);
    }
    println!("\nString writers:");
    for entry in catalog::string_writers() {
        println!("  {:<14}{}", entry.name, entry.label);
    }
    println!("\nBinary writers (require -o):");
    for entry in catalog::binary_writers() {
        println!("  {:<14}{}", entry.name, entry.label);
    }
    Ok(())
}

fn load_cli_config(explicit_path: Option<&str>) -> Result<PandocConfig, ConfigError> {
    let loader = Loader::new().with_optional_file("pandoc.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.with_env().build()
}

fn apply_cli_overrides(config: &mut PandocConfig, matches: &ArgMatches) {
    if let Some(path) = matches.get_one::<String>("pandoc") {
        config.pandoc.executable_path = path.clone();
    }
    if matches.get_flag("path-mode") {
        config.pandoc.allow_file_paths = true;
    }
}

/// Turn the convert/command arguments into a converter.
///
/// Option order: configured options, `--from`, extras, `--to`, `--output`.
fn build_converter(
    sub_matches: &ArgMatches,
    extras: Vec<OptionDecl>,
    config: &PandocConfig,
    stdin: &mut dyn Read,
) -> Result<Converter, CliError> {
    let settings = Settings::from(&config.pandoc);
    let registry = FormatRegistry::global();

    let raw_inputs: Vec<String> = sub_matches
        .get_many::<String>("input")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let inputs = expand_stdin(raw_inputs, stdin)?;

    let mut decls = config.convert.option_decls();

    let from = match sub_matches.get_one::<String>("from") {
        Some(from) => Some(from.clone()),
        None if settings.path_mode => inputs
            .first()
            .and_then(|first| registry.detect_reader_from_filename(first)),
        None => None,
    };
    if let Some(from) = from {
        registry.get_reader(base_format(&from))?;
        debug!(reader = %from, "reader selected");
        decls.push(OptionDecl::value("from", from));
    }

    decls.extend(extras);

    if let Some(to) = sub_matches.get_one::<String>("to") {
        registry.get_writer(base_format(to))?;
        decls.push(OptionDecl::value("to", to));
    }
    if let Some(output) = sub_matches.get_one::<String>("output") {
        decls.push(OptionDecl::value("output", output));
    }

    let converter = Converter::new(inputs, decls).with_settings(settings);

    let binary = converter
        .requested_writer()
        .is_some_and(catalog::is_binary_writer);
    if binary && !options::is_declared(converter.options(), OUTPUT_OPTIONS) {
        return Err(binary_needs_output());
    }

    Ok(converter)
}

/// Replace `-` inputs with the text read from standard input.
fn expand_stdin(inputs: Vec<String>, stdin: &mut dyn Read) -> Result<Vec<String>, CliError> {
    let mut piped: Option<String> = None;
    inputs
        .into_iter()
        .map(|input| -> Result<String, CliError> {
            if input != "-" {
                return Ok(input);
            }
            if piped.is_none() {
                let mut text = String::new();
                stdin.read_to_string(&mut text).map_err(CliError::Stdin)?;
                piped = Some(text);
            }
            Ok(piped.clone().unwrap_or_default())
        })
        .collect()
}

/// Format name without pandoc extension modifiers (`markdown+smart` -> `markdown`).
fn base_format(name: &str) -> &str {
    name.split(['+', '-']).next().unwrap_or(name)
}

fn binary_needs_output() -> CliError {
    CliError::Usage(
        "Binary writers (docx, odt, epub, epub3) cannot print to stdout. Use -o <path>."
            .to_string(),
    )
}
