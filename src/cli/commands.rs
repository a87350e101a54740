use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing::debug;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::chunk::fits_ascii_string;
use crate::conditions::{
    ConditionTemplate, ConditionType, ConditionTypeRegistry, Qualifier, TemplateRegistry,
};
use crate::config;
use crate::script::{self, Script};

use super::convert;
use super::exit_codes;
use super::output::{self, DumpData, OutputMode, QualifyData, TypesData};

/// edit distance allowed for condition type suggestions
const SUGGESTION_DISTANCE: usize = 3;

#[derive(Parser)]
#[command(name = "scriptcond")]
#[command(about = "Inspect and instantiate trigger conditions in map script chunk files")]
#[command(version)]
pub struct Cli {
    /// Path to config file (overrides SCRIPTCOND_CONFIG env var and default location)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (auto-enabled when stdout is piped)
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Force text output even when stdout is piped
    #[arg(long, global = true, conflicts_with = "json")]
    pub no_json: bool,

    /// Suppress all output on success (errors still go to stderr)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log more to stderr (-v debug, -vv trace); SCRIPTCOND_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print every script in a chunk file with its trigger expression
    Dump {
        /// Chunk file containing Script chunks
        file: PathBuf,
    },

    /// Instantiate template scripts for a concrete team and player
    Qualify {
        /// Chunk file containing template Script chunks
        file: PathBuf,

        /// Suffix appended to team, script, counter and flag names
        #[arg(long, default_value = "")]
        qualifier: String,

        /// Side name used by the templates
        #[arg(long, default_value = "")]
        template_player: String,

        /// Side name that replaces the template side
        #[arg(long, default_value = "")]
        player: String,

        /// Write the qualified scripts to this chunk file instead of printing them
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List condition types, or show one by name or id
    Types {
        /// Internal name (e.g. TEAM_DESTROYED) or numeric id
        name: Option<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Print the config file location
    Path,
    /// Check the config file for errors
    Verify,
    /// Print an example configuration
    Default,
}

/// print an error in the current output mode and exit with `code`
fn exit_with_error(output_mode: OutputMode, code: i32, message: &str, details: Option<&str>) -> ! {
    if output_mode.is_json() {
        match details {
            Some(details) => output::print_json_error_with_details(code, message, details),
            None => output::print_json_error(code, message),
        }
    } else {
        match details {
            Some(details) => eprintln!("Error: {}: {}", message, details),
            None => eprintln!("Error: {}", message),
        }
    }
    std::process::exit(code);
}

fn load_registry(config_path: Option<&Path>, output_mode: OutputMode) -> TemplateRegistry {
    let config = match config::load_with_override(config_path) {
        Ok(config) => config,
        Err(e) => exit_with_error(
            output_mode,
            exit_codes::CONFIG_ERROR,
            "failed to load config",
            Some(&format!("{:#}", e)),
        ),
    };

    match config.registry() {
        Ok(registry) => registry,
        Err(e) => exit_with_error(
            output_mode,
            exit_codes::CONFIG_ERROR,
            "invalid condition types in config",
            Some(&e.to_string()),
        ),
    }
}

fn load_script_file(
    file: &Path,
    registry: Rc<dyn ConditionTypeRegistry>,
    output_mode: OutputMode,
) -> Vec<Script> {
    let bytes = match fs::read(file) {
        Ok(bytes) => bytes,
        Err(e) => exit_with_error(
            output_mode,
            exit_codes::ERROR,
            &format!("failed to read {}", file.display()),
            Some(&e.to_string()),
        ),
    };

    match script::load_scripts(bytes, registry) {
        Ok(scripts) => scripts,
        Err(e) => exit_with_error(
            output_mode,
            exit_codes::PARSE_ERROR,
            &format!("failed to parse {}", file.display()),
            Some(&e.to_string()),
        ),
    }
}

fn print_scripts(scripts: &[Script], registry: &dyn ConditionTypeRegistry) {
    for script in scripts {
        let mut flags = Vec::new();
        if script.active {
            flags.push("active");
        }
        if script.one_shot {
            flags.push("one-shot");
        }
        if script.subroutine {
            flags.push("subroutine");
        }

        if flags.is_empty() {
            println!("{}", script.name);
        } else {
            println!("{} [{}]", script.name, flags.join(", "));
        }
        if !script.comment.is_empty() {
            println!("  # {}", script.comment);
        }
        println!("  IF {}", script.conditions().display(registry));
    }
}

fn print_type(template: &ConditionTemplate) {
    let params: Vec<_> = template.params.iter().map(|p| p.name()).collect();
    println!(
        "{:>4}  {}({})",
        template.id.as_i32(),
        template.internal_name,
        params.join(", ")
    );
}

/// look a type up by exact name, numeric id, then case-insensitive name
fn find_type<'a>(registry: &'a TemplateRegistry, query: &str) -> Option<&'a ConditionTemplate> {
    if let Some(template) = registry.find_by_name(query) {
        return Some(template);
    }
    if let Ok(id) = query.parse::<i32>() {
        return registry.template(ConditionType(id));
    }
    registry
        .iter()
        .find(|t| t.internal_name.eq_ignore_ascii_case(query))
}

pub fn execute(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    let output_mode = OutputMode::from_flags(cli.json, cli.no_json, cli.quiet);

    match cli.command {
        Commands::Dump { file } => {
            let registry: Rc<dyn ConditionTypeRegistry> =
                Rc::new(load_registry(config_path, output_mode));
            let scripts = load_script_file(&file, Rc::clone(&registry), output_mode);

            match output_mode {
                OutputMode::Json => {
                    let data = DumpData {
                        file: file.display().to_string(),
                        scripts: scripts
                            .iter()
                            .map(|s| convert::script_data(s, registry.as_ref()))
                            .collect(),
                    };
                    output::print_json(&data);
                }
                OutputMode::Text => print_scripts(&scripts, registry.as_ref()),
                OutputMode::Quiet => {}
            }
            Ok(())
        }

        Commands::Qualify {
            file,
            qualifier,
            template_player,
            player,
            output,
        } => {
            if qualifier.is_empty() && template_player.is_empty() {
                exit_with_error(
                    output_mode,
                    exit_codes::INVALID_ARGS,
                    "nothing to qualify: pass --qualifier and/or --template-player",
                    None,
                );
            }
            if !template_player.is_empty() && player.is_empty() {
                exit_with_error(
                    output_mode,
                    exit_codes::INVALID_ARGS,
                    "--template-player requires --player",
                    None,
                );
            }
            for (flag, value) in [
                ("--qualifier", &qualifier),
                ("--template-player", &template_player),
                ("--player", &player),
            ] {
                if !fits_ascii_string(value) {
                    exit_with_error(
                        output_mode,
                        exit_codes::INVALID_ARGS,
                        &format!("{} must use latin-1 characters only", flag),
                        Some(value.as_str()),
                    );
                }
            }

            let registry: Rc<dyn ConditionTypeRegistry> =
                Rc::new(load_registry(config_path, output_mode));
            let scripts = load_script_file(&file, Rc::clone(&registry), output_mode);

            let q = Qualifier::new(qualifier, template_player, player);
            let qualified: Vec<Script> = scripts
                .iter()
                .map(|s| s.duplicate_and_qualify(&q))
                .collect();
            debug!(scripts = qualified.len(), qualifier = %q.qualifier, "qualified scripts");

            if let Some(out_path) = &output {
                let bytes = script::save_scripts(&qualified, registry.as_ref());
                fs::write(out_path, bytes)
                    .with_context(|| format!("Failed to write {}", out_path.display()))?;
            }

            match output_mode {
                OutputMode::Json => {
                    let data = QualifyData {
                        action: "qualify",
                        file: file.display().to_string(),
                        qualifier: q.qualifier.clone(),
                        output: output.as_ref().map(|p| p.display().to_string()),
                        scripts: qualified
                            .iter()
                            .map(|s| convert::script_data(s, registry.as_ref()))
                            .collect(),
                    };
                    output::print_json(&data);
                }
                OutputMode::Text => match &output {
                    Some(out_path) => println!(
                        "Wrote {} script(s) to {}",
                        qualified.len(),
                        out_path.display()
                    ),
                    None => print_scripts(&qualified, registry.as_ref()),
                },
                OutputMode::Quiet => {}
            }
            Ok(())
        }

        Commands::Types { name } => {
            let registry = load_registry(config_path, output_mode);

            let templates: Vec<&ConditionTemplate> = match &name {
                None => registry.iter().collect(),
                Some(query) => match find_type(&registry, query) {
                    Some(template) => vec![template],
                    None => {
                        let suggestions = registry.suggest(query, SUGGESTION_DISTANCE);
                        let message = format!("condition type '{}' not found", query);

                        if output_mode.is_json() {
                            output::print_json_error_with_suggestions(
                                exit_codes::TYPE_NOT_FOUND,
                                &message,
                                suggestions,
                            );
                        } else {
                            eprintln!("Error: {}", message);
                            if !suggestions.is_empty() {
                                eprintln!("Did you mean: {}?", suggestions.join(", "));
                            }
                        }
                        std::process::exit(exit_codes::TYPE_NOT_FOUND);
                    }
                },
            };

            match output_mode {
                OutputMode::Json => {
                    let data = TypesData {
                        types: templates.iter().map(|t| convert::type_data(t)).collect(),
                    };
                    output::print_json(&data);
                }
                OutputMode::Text => {
                    for template in &templates {
                        print_type(template);
                    }
                }
                OutputMode::Quiet => {}
            }
            Ok(())
        }

        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                let config = match config::load_with_override(config_path) {
                    Ok(config) => config,
                    Err(e) => exit_with_error(
                        output_mode,
                        exit_codes::CONFIG_ERROR,
                        "failed to load config",
                        Some(&format!("{:#}", e)),
                    ),
                };
                let json =
                    serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
                println!("{}", json);
                Ok(())
            }
            ConfigCommands::Path => {
                let path = config::get_config_path_with_override(config_path)?;
                println!("{}", path.display());
                Ok(())
            }
            ConfigCommands::Default => {
                let config = config::default_with_examples();
                let json =
                    serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
                println!("{}", json);
                Ok(())
            }
            ConfigCommands::Verify => {
                let path = config::get_config_path_with_override(config_path)?;
                let errors = match config::verify(&path) {
                    Ok(errors) => errors,
                    Err(e) => exit_with_error(
                        output_mode,
                        exit_codes::CONFIG_ERROR,
                        &e.to_string(),
                        None,
                    ),
                };

                if errors.is_empty() {
                    if !output_mode.is_quiet() {
                        println!("✓ Configuration is valid: {}", path.display());
                    }
                    Ok(())
                } else {
                    println!(
                        "✗ Configuration has {} error(s): {}",
                        errors.len(),
                        path.display()
                    );
                    println!();
                    for error in &errors {
                        println!("  - {}", error);
                    }
                    std::process::exit(exit_codes::CONFIG_ERROR);
                }
            }
        },

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "scriptcond", &mut io::stdout());
            Ok(())
        }
    }
}
