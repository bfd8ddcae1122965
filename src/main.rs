//! togglegen CLI
//!
//! Entry point for the `togglegen` command-line tool.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use togglegen::catalog::{DeclBase, OptionKind};
use togglegen::check;
use togglegen::config::GeneratorConfig;
use togglegen::emit;
use togglegen::pipeline::{
    generate, load_project, GenerateError, GenerateRequest, ResolvedProject, Selection,
};
use togglegen::resolve::{resolve_value, ResolveError, ResolvedOption};

#[derive(Parser)]
#[command(name = "togglegen")]
#[command(about = "Build-time feature toggle generator for C projects", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the toggle header/source artifacts
    Generate {
        /// Path to config file (default: toggle.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Defaults table path (overrides config)
        #[arg(long)]
        defaults: Option<PathBuf>,

        /// Characterization table path (overrides config)
        #[arg(long)]
        characterizations: Option<PathBuf>,

        /// Write include/ and src/ under this directory (overrides config)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Emit per-characterization files for this characterization only
        #[arg(long)]
        char_id: Option<String>,

        /// Output the summary in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Validate both tables without writing anything
    Verify {
        /// Path to config file (default: toggle.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },

    /// List characterizations with their numeric IDs
    List {
        /// Path to config file (default: toggle.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Explain how one option resolves
    Explain {
        /// Option name
        option: String,

        /// Characterization to resolve against (defaults-only view when
        /// omitted)
        #[arg(long)]
        char_id: Option<String>,

        /// Path to config file (default: toggle.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            config,
            defaults,
            characterizations,
            out_dir,
            char_id,
            json,
        } => run_generate(config, defaults, characterizations, out_dir, char_id, json),
        Commands::Verify { config } => run_verify(config),
        Commands::List { config, json } => run_list(config, json),
        Commands::Explain {
            option,
            char_id,
            config,
            json,
        } => run_explain(&option, char_id, config, json),
    }
}

fn load_config(path: Option<PathBuf>) -> GeneratorConfig {
    match GeneratorConfig::load(path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }
    }
}

fn load_project_or_exit(config: &GeneratorConfig) -> ResolvedProject {
    let defaults = PathBuf::from(&config.tables.defaults);
    let characterizations = PathBuf::from(&config.tables.characterizations);
    match load_project(&defaults, &characterizations) {
        Ok(project) => project,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn run_generate(
    config_path: Option<PathBuf>,
    defaults: Option<PathBuf>,
    characterizations: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    char_id: Option<String>,
    json_output: bool,
) {
    let config = load_config(config_path);

    let (include_dir, source_dir) = match out_dir {
        Some(dir) => (dir.join("include"), dir.join("src")),
        None => (
            PathBuf::from(&config.output.include_dir),
            PathBuf::from(&config.output.source_dir),
        ),
    };

    let request = GenerateRequest {
        defaults: defaults.unwrap_or_else(|| PathBuf::from(&config.tables.defaults)),
        characterizations: characterizations
            .unwrap_or_else(|| PathBuf::from(&config.tables.characterizations)),
        include_dir,
        source_dir,
        selection: match char_id {
            Some(id) => Selection::One(id),
            None => Selection::All,
        },
    };

    let summary = match generate(&request) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    };

    if json_output {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!(
            "Generated {} file(s) for {} characterization(s):",
            summary.files.len(),
            summary.characterizations.len()
        );
        for file in &summary.files {
            println!(
                "  {} ({} bytes, sha256 {})",
                file.path, file.bytes, file.sha256
            );
        }
    }
}

fn run_verify(config_path: Option<PathBuf>) {
    let config = load_config(config_path);
    let project = load_project_or_exit(&config);

    let option_count = project
        .catalog
        .options()
        .iter()
        .filter(|def| def.kind == OptionKind::Option)
        .count();
    let value_count = project.catalog.len() - option_count;
    let testing_count = project.resolved.iter().filter(|rc| rc.testing).count();

    println!("Tables valid.");
    println!();
    println!("  Defaults table: {}", config.tables.defaults);
    println!(
        "  Characterization table: {}",
        config.tables.characterizations
    );
    println!(
        "  Options: {} ({} OPTION, {} VALUE)",
        project.catalog.len(),
        option_count,
        value_count
    );
    println!(
        "  Characterizations: {} ({} testing)",
        project.resolved.len(),
        testing_count
    );
}

fn run_list(config_path: Option<PathBuf>, json_output: bool) {
    let config = load_config(config_path);
    let project = load_project_or_exit(&config);

    if json_output {
        let output: Vec<serde_json::Value> = project
            .resolved
            .iter()
            .enumerate()
            .map(|(i, rc)| {
                serde_json::json!({
                    "number": i + 1,
                    "char_id": rc.char_id,
                    "brief": rc.brief,
                    "testing": rc.testing,
                })
            })
            .collect();

        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        if project.resolved.is_empty() {
            println!("No characterizations defined.");
            return;
        }

        println!("Characterizations ({} total):\n", project.resolved.len());
        for (i, rc) in project.resolved.iter().enumerate() {
            let testing = if rc.testing { " [testing]" } else { "" };
            println!("  {:>3}  {}{}", i + 1, rc.char_id, testing);
            if !rc.brief.is_empty() {
                println!("       {}", rc.brief);
            }
        }
    }
}

fn run_explain(
    option_name: &str,
    char_id: Option<String>,
    config_path: Option<PathBuf>,
    json_output: bool,
) {
    let config = load_config(config_path);
    let project = load_project_or_exit(&config);

    let def = match check::find_option(&project.catalog, option_name) {
        Ok(def) => def,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(GenerateError::Check(e).exit_code());
        }
    };

    let (override_value, resolved_option, testing) = match &char_id {
        Some(id) => {
            let characterization =
                match check::find_characterization(&project.characterizations, id) {
                    Ok(ch) => ch,
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        process::exit(GenerateError::Check(e).exit_code());
                    }
                };
            let rc = match project.resolved.iter().find(|rc| rc.char_id == *id) {
                Some(rc) => rc,
                None => {
                    eprintln!("Error: characterization '{}' did not resolve", id);
                    process::exit(1);
                }
            };
            let position = match project
                .catalog
                .options()
                .iter()
                .position(|d| d.name == def.name)
            {
                Some(position) => position,
                None => {
                    eprintln!("Error: option '{}' missing from catalog", def.name);
                    process::exit(1);
                }
            };
            // VALUE options never take overrides.
            let override_value = match def.kind {
                OptionKind::Option => characterization
                    .override_for(&def.name)
                    .map(str::to_string),
                OptionKind::Value => None,
            };
            (override_value, rc.options[position].clone(), rc.testing)
        }
        None => {
            let resolution = match resolve_value(&project.catalog, &def.default) {
                Ok(resolution) => resolution,
                Err(source) => {
                    let e = GenerateError::Resolve(ResolveError::Alias {
                        char_id: "(defaults)".to_string(),
                        option: def.name.clone(),
                        source,
                    });
                    eprintln!("Error: {}", e);
                    process::exit(e.exit_code());
                }
            };
            let option = ResolvedOption {
                name: def.name.clone(),
                value: resolution.value,
                kind: def.decl.emitted_kind(false),
                transformed: false,
                constness: def.decl.base != DeclBase::Var,
            };
            (None, option, false)
        }
    };

    let raw = override_value
        .clone()
        .unwrap_or_else(|| def.default.clone());
    let chain = match resolve_value(&project.catalog, &raw) {
        Ok(resolution) => resolution.chain,
        Err(_) => Vec::new(),
    };

    let header_line = emit::render_header_line(def, &resolved_option);
    let source_line = emit::render_source_line(def, &resolved_option);

    if json_output {
        let report = serde_json::json!({
            "option": def.name,
            "type": def.kind.tag(),
            "decl": def.decl.to_string(),
            "default": def.default,
            "characterization": char_id,
            "override": override_value,
            "alias_chain": chain,
            "value": resolved_option.value,
            "testing": testing,
            "transformed": resolved_option.transformed,
            "emitted": resolved_option.kind.describe(),
            "header": header_line,
            "source": if source_line.is_empty() {
                None
            } else {
                Some(source_line.clone())
            },
        });

        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("Option: {}", def.name);
        println!("  Type: {}", def.kind.tag());
        println!("  Decl: {}", def.decl);
        println!("  Default: {}", def.default);
        match &char_id {
            Some(id) => println!("  Characterization: {}", id),
            None => println!("  Characterization: (defaults)"),
        }
        match &override_value {
            Some(value) => println!("  Override: {}", value),
            None => println!("  Override: (none)"),
        }
        if !chain.is_empty() {
            println!(
                "  Alias chain: {} -> {}",
                chain.join(" -> "),
                resolved_option.value
            );
        }
        println!("  Resolved value: {}", resolved_option.value);
        println!("  Testing: {}", testing);
        println!("  Emitted as: {}", resolved_option.kind.describe());
        println!("  Header: {}", header_line);
        if !source_line.is_empty() {
            println!("  Source: {}", source_line);
        }
    }
}
