use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use kinema_core::{Diagnostics, Severity};
use kinema_interp::{build_objects, render_pass};
use kinema_spec::loader;
use kinema_stage::{RecordedTimeline, TimelineEvent};

#[derive(Parser)]
#[command(
    name = "kinema",
    version,
    about = "Kinema — declarative scene-to-animation interpreter",
    long_about = "Kinema translates a declarative JSON scene document (objects + animation\ntimeline) into an ordered animation cue script for an engine to play."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a scene document to an animation cue script
    Render {
        /// Path to the scene document
        #[arg(default_value = "scene.json")]
        file: PathBuf,

        /// Output file for the cue script JSON (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a scene document: load it and build its objects
    Check {
        /// Path to the scene document
        #[arg(default_value = "scene.json")]
        file: PathBuf,
    },

    /// Inspect the cue timeline of a scene document
    Inspect {
        /// Path to the scene document
        #[arg(default_value = "scene.json")]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Render { file, output } => cmd_render(file, output),
        Commands::Check { file } => cmd_check(file),
        Commands::Inspect { file } => cmd_inspect(file),
    }
}

/// Render accumulated pipeline diagnostics through the log stream.
fn emit_diagnostics(diags: &Diagnostics) {
    for diag in diags.iter() {
        match diag.severity {
            Severity::Warning => tracing::warn!("{}", diag),
            Severity::Error => tracing::error!("{}", diag),
        }
    }
}

fn cmd_render(file: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let spec = loader::load_from_path(&file)
        .with_context(|| format!("could not load scene document {}", file.display()))?;

    let mut timeline = RecordedTimeline::new();
    let (registry, diags) = render_pass(&spec, &mut timeline);
    emit_diagnostics(&diags);

    tracing::info!(
        objects = registry.len(),
        events = timeline.events().len(),
        "render pass complete"
    );

    let script = serde_json::to_string_pretty(timeline.events())?;
    match output {
        Some(path) => {
            std::fs::write(&path, script)
                .with_context(|| format!("could not write cue script to {}", path.display()))?;
            tracing::info!("cue script written to {}", path.display());
        }
        None => println!("{}", script),
    }
    Ok(())
}

fn cmd_check(file: PathBuf) -> Result<()> {
    let spec = loader::load_from_path(&file)
        .with_context(|| format!("could not load scene document {}", file.display()))?;

    let mut diags = Diagnostics::new();
    let registry = build_objects(&spec.objects, &mut diags);
    emit_diagnostics(&diags);

    println!(
        "{}: {} object(s), {} timeline entr{}, {} warning(s)",
        file.display(),
        registry.len(),
        spec.animations.len(),
        if spec.animations.len() == 1 { "y" } else { "ies" },
        diags.warning_count()
    );
    Ok(())
}

fn cmd_inspect(file: PathBuf) -> Result<()> {
    let spec = loader::load_from_path(&file)
        .with_context(|| format!("could not load scene document {}", file.display()))?;

    let mut timeline = RecordedTimeline::new();
    let (_, diags) = render_pass(&spec, &mut timeline);
    emit_diagnostics(&diags);

    for (index, event) in timeline.events().iter().enumerate() {
        match event {
            TimelineEvent::Play { cues, run_time } => {
                let described: Vec<String> = cues
                    .iter()
                    .map(|cue| format!("{}({})", cue.effect, cue.target))
                    .collect();
                println!("{:>3}. play  {}  [{}]", index + 1, described.join(" + "), run_time);
            }
            TimelineEvent::Wait { duration } => {
                println!("{:>3}. wait  [{}]", index + 1, duration);
            }
        }
    }
    println!("total duration: {}", timeline.total_duration());
    Ok(())
}
