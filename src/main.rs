use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use network3d::{Dataset, HeadlessHost, LayoutReport, Network, ScreenPoint, Settings, Viewport};

/// Force-directed 3D network layout.
#[derive(Parser)]
#[command(name = "network3d")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the layout headlessly and write the final positions as JSON
    Layout {
        /// Dataset file (.json) with `vertices` and `edges`
        #[arg(short, long)]
        data: PathBuf,

        /// Settings file (.json, .yaml or .yml)
        #[arg(short, long)]
        settings: Option<PathBuf>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of frames to run (defaults to the iteration budget)
        #[arg(short, long)]
        frames: Option<usize>,

        /// Pointer position in canvas pixels, as X,Y
        #[arg(long, value_parser = parse_point)]
        pointer: Option<ScreenPoint>,

        /// Canvas size in pixels, as WIDTHxHEIGHT
        #[arg(long, default_value = "800x600", value_parser = parse_size)]
        size: Viewport,
    },
}

fn parse_point(s: &str) -> Result<ScreenPoint, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{s}'"))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<f32>()
            .map_err(|e| format!("invalid coordinate '{v}': {e}"))
    };
    Ok(ScreenPoint {
        x: coord(x)?,
        y: coord(y)?,
    })
}

fn parse_size(s: &str) -> Result<Viewport, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT but got '{s}'"))?;
    let dim = |v: &str| match v.trim().parse::<f32>() {
        Ok(d) if d > 0.0 => Ok(d),
        _ => Err(format!("invalid dimension '{v}'")),
    };
    Ok(Viewport {
        width: dim(w)?,
        height: dim(h)?,
    })
}

struct LayoutArgs<'a> {
    data: &'a Path,
    settings: Option<&'a Path>,
    frames: Option<usize>,
    pointer: Option<ScreenPoint>,
    size: Viewport,
}

fn run_layout(args: LayoutArgs<'_>) -> anyhow::Result<LayoutReport> {
    let settings = match args.settings {
        Some(path) => Settings::from_path(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?,
        None => Settings::default(),
    };
    let data = Dataset::from_path(args.data)
        .with_context(|| format!("failed to read dataset from {}", args.data.display()))?;

    let mut network = Network::new(settings, HeadlessHost::default(), args.size)?;
    network
        .load(&data)
        .with_context(|| format!("failed to load {}", args.data.display()))?;

    if let Some(point) = args.pointer {
        network.pointer_moved(point, point);
    }

    let frames = args.frames.unwrap_or(network.params().max_iterations);
    for _ in 0..frames {
        if network.tick().is_break() {
            break;
        }
    }

    let report = network.report();
    network.stop();
    Ok(report)
}

fn write_report(report: &LayoutReport, output: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!(
                "Wrote layout of {} nodes to {}",
                report.nodes.len(),
                path.display()
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Layout {
            data,
            settings,
            output,
            frames,
            pointer,
            size,
        }) => {
            let report = run_layout(LayoutArgs {
                data: &data,
                settings: settings.as_deref(),
                frames,
                pointer,
                size,
            })?;
            write_report(&report, output.as_deref())?;
        }
        None => {
            println!("network3d: no command specified. Use --help for usage.");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_without_subcommand() {
        let cli = Cli::try_parse_from(["network3d"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn cli_parses_layout_with_defaults() {
        let cli = Cli::try_parse_from(["network3d", "layout", "--data", "graph.json"]).unwrap();
        match cli.command {
            Some(Commands::Layout {
                data,
                settings,
                output,
                frames,
                pointer,
                size,
            }) => {
                assert_eq!(data, PathBuf::from("graph.json"));
                assert!(settings.is_none());
                assert!(output.is_none());
                assert!(frames.is_none());
                assert!(pointer.is_none());
                assert_eq!(size, Viewport { width: 800.0, height: 600.0 });
            }
            _ => panic!("Expected Layout command"),
        }
    }

    #[test]
    fn cli_parses_layout_options() {
        let cli = Cli::try_parse_from([
            "network3d",
            "layout",
            "-d",
            "graph.json",
            "-s",
            "settings.yaml",
            "--frames",
            "10",
            "--pointer",
            "120,45.5",
            "--size",
            "1024x768",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Layout {
                settings,
                frames,
                pointer,
                size,
                ..
            }) => {
                assert_eq!(settings, Some(PathBuf::from("settings.yaml")));
                assert_eq!(frames, Some(10));
                assert_eq!(pointer, Some(ScreenPoint { x: 120.0, y: 45.5 }));
                assert_eq!(size, Viewport { width: 1024.0, height: 768.0 });
            }
            _ => panic!("Expected Layout command"),
        }
    }

    #[test]
    fn layout_requires_data() {
        assert!(Cli::try_parse_from(["network3d", "layout"]).is_err());
    }

    #[test]
    fn bad_point_and_size_are_reported() {
        insta::assert_snapshot!(parse_point("12").unwrap_err(), @"expected X,Y but got '12'");
        insta::assert_snapshot!(parse_size("0x10").unwrap_err(), @"invalid dimension '0'");
        insta::assert_snapshot!(parse_size("wide").unwrap_err(), @"expected WIDTHxHEIGHT but got 'wide'");
    }
}
