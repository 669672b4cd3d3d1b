use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the command tree in src/main.rs
// Build scripts can't reach into src/, so the shape is repeated here
fn build_cli() -> Command {
    let input = |help: &'static str| {
        Arg::new("input")
            .help(help)
            .required(true)
            .index(1)
            .value_hint(ValueHint::FilePath)
    };

    Command::new("markdeck")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert between editor markdown and HTML")
        .arg_required_else_help(true)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Path to a markdeck.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("images")
                .long("images")
                .help("JSON image store used to resolve stored: references")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between formats (default command)")
                .arg(input("Input file path"))
                .arg(
                    Arg::new("from")
                        .long("from")
                        .value_parser(["markdown", "html"]),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .required(true)
                        .value_parser(["markdown", "html"]),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("roundtrip")
                .about("Render markdown to HTML and reconstruct it")
                .arg(input("Markdown file path"))
                .arg(Arg::new("check").long("check").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("copy-script").about("Print the script backing code block copy buttons"),
        )
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = build_cli();

    generate_to(Bash, &mut cmd, "markdeck", &outdir)?;
    generate_to(Zsh, &mut cmd, "markdeck", &outdir)?;
    generate_to(Fish, &mut cmd, "markdeck", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
