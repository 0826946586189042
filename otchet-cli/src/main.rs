// Command-line interface for otchet
//
// This binary exports research reports described by a JSON manifest into
// finished DOCX and PDF files following GOST 7.32-2017 formatting.
//
// The manifest is the hand-off format from the editing layer: a document id,
// a title and the ordered sections with their raw markup content. Section
// name and order may be omitted when the code is in the built-in catalog.
//
// Usage:
//  otchet export <manifest.json> [-o <dir>]   - Render every registered format
//  otchet formats                             - List registered export formats
//  otchet sections                            - List the built-in section catalog
//
// Configuration is layered: embedded defaults, then ./otchet.toml if present
// (or the file given via --config), then flags.

use std::fs;
use std::path::PathBuf;

use clap::{Arg, Command, ValueHint};
use serde::Deserialize;

use otchet_config::{Loader, OtchetConfig};
use otchet_export::formats::docx::DocxFormat;
use otchet_export::formats::pdf::PdfFormat;
use otchet_export::templates::SECTION_TEMPLATES;
use otchet_export::{export_document, Document, FormatRegistry, GostProfile, SectionInput};

/// The JSON hand-off from the editing layer.
#[derive(Debug, Deserialize)]
struct Manifest {
    id: String,
    title: String,
    sections: Vec<SectionInput>,
}

fn build_cli() -> Command {
    Command::new("otchet")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Export GOST 7.32-2017 research reports to DOCX and PDF")
        .long_about(
            "otchet renders research reports into GOST 7.32-2017 formatted files.\n\n\
            Commands:\n  \
            - export:   Render a report manifest into every registered format\n  \
            - formats:  List registered export formats\n  \
            - sections: List the built-in section catalog\n\n\
            The manifest is a JSON file:\n  \
            { \"id\": \"42\", \"title\": \"...\",\n    \
            \"sections\": [ { \"code\": \"В\", \"content\": \"<p>...</p>\" }, ... ] }\n\n\
            Examples:\n  \
            otchet export report.json                # Write into the configured directory\n  \
            otchet export report.json -o /tmp/out    # Write into an explicit directory",
        )
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to an otchet.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("export")
                .about("Render a report manifest into every registered format")
                .arg(
                    Arg::new("manifest")
                        .help("Path to the report manifest (JSON)")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output-dir")
                        .long("output-dir")
                        .short('o')
                        .help("Directory to write the finished files into (overrides config)")
                        .value_hint(ValueHint::DirPath),
                ),
        )
        .subcommand(Command::new("formats").about("List registered export formats"))
        .subcommand(Command::new("sections").about("List the built-in section catalog"))
}

fn main() {
    env_logger::init();
    let matches = build_cli().get_matches();
    let config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));

    match matches.subcommand() {
        Some(("export", sub_matches)) => {
            let manifest = sub_matches
                .get_one::<String>("manifest")
                .expect("manifest is required");
            let output_dir = sub_matches.get_one::<String>("output-dir").map(PathBuf::from);
            handle_export_command(manifest, output_dir, &config);
        }
        Some(("formats", _)) => handle_formats_command(&config),
        Some(("sections", _)) => handle_sections_command(),
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn load_cli_config(path: Option<&str>) -> OtchetConfig {
    let loader = match path {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_optional_file("otchet.toml"),
    };
    loader.build().unwrap_or_else(|e| {
        eprintln!("Configuration error: {e}");
        std::process::exit(1);
    })
}

fn build_registry(config: &OtchetConfig) -> FormatRegistry {
    let mut registry = FormatRegistry::new();
    registry.register(DocxFormat);
    registry.register(PdfFormat::with_font_dirs(
        config.export.fonts.directories.clone(),
    ));
    registry
}

fn handle_export_command(manifest_path: &str, output_dir: Option<PathBuf>, config: &OtchetConfig) {
    let source = fs::read_to_string(manifest_path).unwrap_or_else(|e| {
        eprintln!("Error reading manifest '{manifest_path}': {e}");
        std::process::exit(1);
    });
    let manifest: Manifest = serde_json::from_str(&source).unwrap_or_else(|e| {
        eprintln!("Error parsing manifest '{manifest_path}': {e}");
        std::process::exit(1);
    });

    let document = Document::assemble(manifest.title, manifest.sections).unwrap_or_else(|e| {
        eprintln!("Error assembling document: {e}");
        std::process::exit(1);
    });

    let registry = build_registry(config);
    let output_dir = output_dir.unwrap_or_else(|| config.export.output_dir.clone());
    let files = export_document(
        &document,
        &GostProfile::default(),
        &manifest.id,
        &output_dir,
        &registry,
    )
    .unwrap_or_else(|e| {
        eprintln!("Export error: {e}");
        std::process::exit(1);
    });

    for file in files {
        println!("{}\t{}", file.format, file.path.display());
    }
}

fn handle_formats_command(config: &OtchetConfig) {
    let registry = build_registry(config);
    for name in registry.list_formats() {
        // registered above, lookup cannot fail
        if let Ok(format) = registry.get(&name) {
            println!(
                "{}\t.{}\t{}",
                format.name(),
                format.file_extension(),
                format.description()
            );
        }
    }
}

fn handle_sections_command() {
    for template in SECTION_TEMPLATES {
        let kind = if template.title_like { "title" } else { "body" };
        println!(
            "{}\t{}\t{}\t{}\t{}",
            template.code, template.order, template.slug, kind, template.name
        );
    }
}
