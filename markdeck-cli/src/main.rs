// Command-line interface for markdeck
//
// A thin shell over markdeck-convert: render editor markdown to HTML, reconstruct markdown from
// HTML, and check that a document survives the trip both ways.
//
// Usage:
//  markdeck <input> --to <format> [--from <format>] [--output <file>]  - Convert (default)
//  markdeck convert <input> --to <format> [--from <format>] [--output <file>]
//  markdeck roundtrip <input.md> [--check]  - Markdown → HTML → Markdown
//  markdeck copy-script                     - Print the copy-button script
//  markdeck --list-formats                  - List available formats
//
// Stored images resolve against the JSON store given by --images, or `images.store` from the
// configuration. Without one, `stored:` references render as missing images.
//
// Extra Parameters:
//
// Configuration keys can be overridden with --extra-<name> [value]:
//  markdeck doc.md --to html --extra-hard-breaks false --extra-copy-label Kopieren

use clap::{Arg, ArgAction, Command, ValueHint};
use markdeck_config::{Loader, MarkdeckConfig, USER_CONFIG_FILE};
use markdeck_convert::{
    ConvertOptions, FormatRegistry, MemoryImageStore, Session, COPY_SCRIPT,
};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// `--extra-<key>` names and the configuration keys they override
const CONFIG_OVERRIDES: &[(&str, &str)] = &[
    ("hard-breaks", "render.hard_breaks"),
    ("copy-feedback-ms", "render.copy_feedback_ms"),
    ("copy-label", "render.copy_label"),
    ("list-indent", "reverse.list_indent"),
    ("full-scan-fallback", "reverse.full_scan_fallback"),
];

const BOOL_OVERRIDES: &[&str] = &["hard-breaks", "full-scan-fallback"];

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        if let Some(key) = arg.strip_prefix("--extra-") {
            let has_value = args.get(i + 1).is_some_and(|next| !next.starts_with("--"));

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn build_cli() -> Command {
    Command::new("markdeck")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert between editor markdown and HTML")
        .long_about(
            "markdeck converts markdown to the HTML shown by the editor and back again.\n\n\
            Commands:\n  \
            - convert:     Transform between formats (markdown, html)\n  \
            - roundtrip:   Render markdown to HTML and reconstruct it\n  \
            - copy-script: Print the script backing code block copy buttons\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to override configuration.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            markdeck notes.md --to html                       # HTML on stdout\n  \
            markdeck page.html --to markdown -o notes.md      # Back to markdown\n  \
            markdeck notes.md --to html --images images.json  # Resolve stored images\n  \
            markdeck roundtrip notes.md --check               # Fail if the trip is lossy",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
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
                .value_name("PATH")
                .help("Path to a markdeck.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("images")
                .long("images")
                .value_name("PATH")
                .help("JSON image store used to resolve stored: references")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between formats (default command)")
                .long_about(
                    "Convert documents between formats.\n\n\
                    Supported formats:\n  \
                    - markdown: Markdown (.md)\n  \
                    - html:     Editor HTML (.html)\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("roundtrip")
                .about("Render markdown to HTML and reconstruct it")
                .long_about(
                    "Runs the same cycle the editor does on every save and prints the\n\
                    reconstructed markdown.\n\n\
                    With --check nothing is printed on success; a reconstruction that\n\
                    differs from the input is reported and the command exits with status 1.",
                )
                .arg(
                    Arg::new("input")
                        .help("Markdown file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("check")
                        .long("check")
                        .help("Fail if the reconstruction differs from the input")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("copy-script")
                .about("Print the script backing code block copy buttons")
                .long_about(
                    "Rendered code blocks call markdeckCopyCode from their copy button.\n\
                    Include this script once in the page hosting the rendered HTML.",
                ),
        )
}

fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    let (cleaned_args, extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            // A bare file argument means the implicit convert command
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && !["convert", "roundtrip", "copy-script", "help"]
                    .contains(&cleaned_args[1].as_str())
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    let config = load_cli_config(
        matches.get_one::<String>("config").map(|s| s.as_str()),
        &extra_params,
    )
    .unwrap_or_else(|err| fail(&err));

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let Some(input) = sub_matches.get_one::<String>("input") else {
                fail("input is required");
            };
            let Some(to) = sub_matches.get_one::<String>("to") else {
                fail("--to is required");
            };
            let registry = FormatRegistry::default();

            let from = match sub_matches.get_one::<String>("from") {
                Some(f) => f.to_string(),
                None => registry.detect_format_from_filename(input).unwrap_or_else(|| {
                    fail(&format!(
                        "Could not detect format from filename '{input}'\n\
                         Please specify --from explicitly"
                    ))
                }),
            };

            let store = load_image_store(matches.get_one::<String>("images"), &config);
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(&registry, input, &from, to, output, &store, &config);
        }
        Some(("roundtrip", sub_matches)) => {
            let Some(input) = sub_matches.get_one::<String>("input") else {
                fail("input is required");
            };
            let store = load_image_store(matches.get_one::<String>("images"), &config);
            let check = sub_matches.get_flag("check");
            handle_roundtrip_command(input, check, &store, &config);
        }
        Some(("copy-script", _)) => {
            print!("{COPY_SCRIPT}");
        }
        _ => {
            fail("Unknown subcommand. Use --help for usage information.");
        }
    }
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();
}

/// Print an error and exit with status 1
fn fail(message: &str) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

fn read_input(path: &str) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| fail(&format!("Could not read file '{path}': {e}")))
}

/// Handle the convert command
fn handle_convert_command(
    registry: &FormatRegistry,
    input: &str,
    from: &str,
    to: &str,
    output: Option<&str>,
    store: &MemoryImageStore,
    config: &MarkdeckConfig,
) {
    let source = read_input(input);
    let mut session = Session::with_options(store, ConvertOptions::from(config));

    let result = registry
        .convert(&source, from, to, &mut session)
        .unwrap_or_else(|e| fail(&e.to_string()));

    write_output(output, &result);
}

/// Handle the roundtrip command
fn handle_roundtrip_command(
    input: &str,
    check: bool,
    store: &MemoryImageStore,
    config: &MarkdeckConfig,
) {
    let source = read_input(input);
    let mut session = Session::with_options(store, ConvertOptions::from(config));

    let html = session.markdown_to_html(&source);
    let markdown = session.html_to_markdown(&html);

    if !check {
        write_output(None, &markdown);
        return;
    }

    let expected = source.trim_end();
    if markdown != expected {
        eprintln!("Round trip changed '{input}':");
        for (line_no, (before, after)) in first_difference(expected, &markdown) {
            eprintln!("  line {line_no}:");
            eprintln!("    - {before}");
            eprintln!("    + {after}");
        }
        std::process::exit(1);
    }
}

/// Locate the first differing line, if any
fn first_difference<'a>(before: &'a str, after: &'a str) -> Option<(usize, (&'a str, &'a str))> {
    let mut left = before.lines();
    let mut right = after.lines();
    let mut line_no = 1;
    loop {
        match (left.next(), right.next()) {
            (None, None) => return None,
            (l, r) if l != r => return Some((line_no, (l.unwrap_or(""), r.unwrap_or("")))),
            _ => line_no += 1,
        }
    }
}

fn write_output(output: Option<&str>, text: &str) {
    match output {
        Some(path) => {
            fs::write(path, text)
                .unwrap_or_else(|e| fail(&format!("Could not write file '{path}': {e}")));
        }
        None if text.ends_with('\n') || text.is_empty() => print!("{text}"),
        None => println!("{text}"),
    }
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Available formats:\n");
    let registry = FormatRegistry::default();
    for name in registry.list_formats() {
        if let Ok(format) = registry.get(&name) {
            println!(
                "  {:<10} {} (.{})",
                name,
                format.description(),
                format.file_extensions().join(", .")
            );
        }
    }
}

fn load_cli_config(
    explicit_path: Option<&str>,
    extra_params: &HashMap<String, String>,
) -> Result<MarkdeckConfig, String> {
    let mut loader = Loader::new().with_optional_file(USER_CONFIG_FILE);
    if let Some(path) = explicit_path {
        loader = loader.with_file(path);
    }
    let loader = apply_config_overrides(loader, extra_params)?;

    loader
        .build()
        .map_err(|err| format!("Failed to load configuration: {err}"))
}

fn apply_config_overrides(
    mut loader: Loader,
    extra_params: &HashMap<String, String>,
) -> Result<Loader, String> {
    for (key, raw) in extra_params {
        let Some((_, config_key)) = CONFIG_OVERRIDES.iter().find(|(name, _)| name == key) else {
            log::warn!("Ignoring unknown option --extra-{key}");
            continue;
        };

        let applied = if BOOL_OVERRIDES.contains(&key.as_str()) {
            loader.set_override(config_key, parse_bool_arg(key, raw)?)
        } else {
            loader.set_override(config_key, raw.as_str())
        };
        loader = applied.map_err(|err| format!("Invalid value for --extra-{key}: {err}"))?;
    }
    Ok(loader)
}

fn parse_bool_arg(flag: &str, raw: &str) -> Result<bool, String> {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" => Ok(false),
        other => Err(format!("Invalid boolean value '{other}' for --extra-{flag}")),
    }
}

/// Image store from --images, falling back to the configured one
fn load_image_store(explicit_path: Option<&String>, config: &MarkdeckConfig) -> MemoryImageStore {
    let path = explicit_path
        .map(Path::new)
        .or(config.images.store.as_deref());

    match path {
        Some(path) => MemoryImageStore::load(path).unwrap_or_else(|err| {
            fail(&format!("{err} ({})", path.display()))
        }),
        None => {
            log::debug!("No image store configured");
            MemoryImageStore::new()
        }
    }
}
