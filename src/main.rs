// src/main.rs
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use cview_scene::config::Config;
use cview_scene::error::{SceneResult, Warnings};
use cview_scene::model::classify_site_properties;
use cview_scene::pipeline::{build_scene, SceneRequest};
use cview_scene::utils::logger;
use cview_scene::{io as scene_io, resolve_graph, CutoffBonding};

#[derive(Parser)]
#[command(name = "cview-scene", version, about = "Crystal structure to 3D scene description")]
struct Cli {
    /// Log level: -v info, -vv debug, -vvv trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Settings file instead of the platform config location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a scene from a JSON document or a POSCAR
    Render {
        input: PathBuf,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
        /// Recompute bonds even when the input carries a graph
        #[arg(long)]
        rebond: bool,
        /// Bond length tolerance for computed bonds
        #[arg(long, default_value_t = 1.15)]
        tolerance: f64,
    },
    /// Classify the site properties of a structure
    Props { input: PathBuf },
    /// Show or save the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    Show,
    Save,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if logger::init(level).is_err() {
        eprintln!("Logger already initialised");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> SceneResult<Config> {
    match path {
        Some(p) => Config::load_from(p),
        None => Ok(Config::load()),
    }
}

fn write_json<T: serde::Serialize>(value: &T, output: Option<&Path>, compact: bool) -> SceneResult<()> {
    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    if compact {
        serde_json::to_writer(&mut writer, value)?;
    } else {
        serde_json::to_writer_pretty(&mut writer, value)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn run(cli: Cli) -> SceneResult<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Render {
            input,
            output,
            compact,
            rebond,
            tolerance,
        } => {
            let doc = scene_io::load_input(&input)?;
            let mut warnings = Warnings::new();
            let graph = resolve_graph(
                &doc.structure,
                doc.graph,
                &CutoffBonding { tolerance },
                rebond,
                &mut warnings,
            );

            let request = SceneRequest {
                structure: doc.structure,
                graph,
                window: doc.window.unwrap_or(config.window),
                options: doc.options.unwrap_or(config.scene),
            };
            let mut out = build_scene(&request)?;

            // Bonding warnings come first, they happened first
            let mut all = warnings.into_vec();
            all.append(&mut out.warnings);
            out.warnings = all;

            write_json(&out, output.as_deref(), compact)?;
            if let Some(path) = output {
                log::info!("Scene written to {:?}", path);
            }
        }
        Command::Props { input } => {
            let doc = scene_io::load_input(&input)?;
            let kinds = classify_site_properties(doc.structure.site_properties());
            write_json(&kinds, None, false)?;
        }
        Command::Config { action } => match action {
            ConfigAction::Show => write_json(&config, None, false)?,
            ConfigAction::Save => {
                match &cli.config {
                    Some(path) => config.save_to(path)?,
                    None => {
                        config.save()?;
                    }
                }
            }
        },
    }

    Ok(())
}
