use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the conversion arguments from src/main.rs
// We need to duplicate this here since build scripts can't access src/ modules
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

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("panbabel")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Build and run pandoc command lines")
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
                .help("Command used to launch pandoc")
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
            Command::new("convert").about("Run a conversion (default command)"),
        ))
        .subcommand(conversion_args(
            Command::new("command").about("Print the pandoc command line without running it"),
        ));

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "panbabel", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "panbabel", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "panbabel", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
