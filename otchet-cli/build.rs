use clap::{Arg, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the CLI surface from src/main.rs
// We need to duplicate this here since build scripts can't access src/ modules
fn build_cli() -> Command {
    Command::new("otchet")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Export GOST 7.32-2017 research reports to DOCX and PDF")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("export")
                .arg(
                    Arg::new("manifest")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output-dir")
                        .long("output-dir")
                        .short('o')
                        .value_hint(ValueHint::DirPath),
                ),
        )
        .subcommand(Command::new("formats"))
        .subcommand(Command::new("sections"))
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = build_cli();

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "otchet", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "otchet", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "otchet", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
