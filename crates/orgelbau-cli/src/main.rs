//! orgelbau CLI - parametric organ console generator.
//!
//! Generates 3D models, cutting lists, DXF profile sheets and SVG
//! technical drawings for the console variants.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use orgelbau::consoles::{self, ConsoleKind};
use orgelbau::export;
use orgelbau::{cut_list, total_area_m2, ParamValue, ParameterSet, TessellationQuality};

#[derive(Parser)]
#[command(name = "orgelbau")]
#[command(about = "Parametric pipe-organ console generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Bench,
    Normal,
    Vertical,
    Pedalboard,
}

impl From<Kind> for ConsoleKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Bench => ConsoleKind::Bench,
            Kind::Normal => ConsoleKind::Normal,
            Kind::Vertical => ConsoleKind::Vertical,
            Kind::Pedalboard => ConsoleKind::Pedalboard,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Quality {
    Coarse,
    Medium,
    Fine,
}

impl From<Quality> for TessellationQuality {
    fn from(quality: Quality) -> Self {
        match quality {
            Quality::Coarse => TessellationQuality::Coarse,
            Quality::Medium => TessellationQuality::Medium,
            Quality::Fine => TessellationQuality::Fine,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ParamFormat {
    Json,
    Toml,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a 3D model (format determined by extension: .gltf, .stl, .step)
    Generate {
        /// Console variant
        kind: Kind,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
        /// Parameter file (.json or .toml) merged over the defaults
        #[arg(short, long)]
        params: Option<PathBuf>,
        /// Tessellation quality
        #[arg(short, long, value_enum, default_value_t = Quality::Medium)]
        quality: Quality,
    },
    /// Write the cutting list as CSV
    Cutlist {
        /// Console variant
        kind: Kind,
        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,
        /// Parameter file (.json or .toml)
        #[arg(short, long)]
        params: Option<PathBuf>,
    },
    /// Write the 1:10 profile sheet as DXF
    Dxf {
        /// Console variant
        kind: Kind,
        /// Output DXF file
        #[arg(short, long)]
        output: PathBuf,
        /// Parameter file (.json or .toml)
        #[arg(short, long)]
        params: Option<PathBuf>,
    },
    /// Write the A3 technical-drawing sheet as SVG
    Drawing {
        /// Console variant
        kind: Kind,
        /// Output SVG file
        #[arg(short, long)]
        output: PathBuf,
        /// Parameter file (.json or .toml)
        #[arg(short, long)]
        params: Option<PathBuf>,
    },
    /// Print the reference parameter set, or save it to a file
    Params {
        /// Console variant
        kind: Kind,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = ParamFormat::Toml)]
        format: ParamFormat,
        /// Write to a .json or .toml file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print board count, total board area and bounding box
    Info {
        /// Console variant
        kind: Kind,
        /// Parameter file (.json or .toml)
        #[arg(short, long)]
        params: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            kind,
            output,
            params,
            quality,
        } => {
            let kind = ConsoleKind::from(kind);
            let params = load_params(kind, params)?;
            let assembly = consoles::generate_console(kind, &params, quality.into())?;
            export::export_assembly(&assembly, &output)?;
            println!("Wrote {}", output.display());
        }
        Commands::Cutlist {
            kind,
            output,
            params,
        } => {
            let kind = ConsoleKind::from(kind);
            let params = load_params(kind, params)?;
            let specs = consoles::board_specs(kind, &params)?;
            let entries = cut_list(&specs);
            export::write_cut_list_csv(&entries, &output)?;
            println!(
                "Wrote {} ({} lines, {:.2} m2)",
                output.display(),
                entries.len(),
                total_area_m2(&entries)
            );
        }
        Commands::Dxf {
            kind,
            output,
            params,
        } => {
            let kind = ConsoleKind::from(kind);
            let params = load_params(kind, params)?;
            let specs = consoles::board_specs(kind, &params)?;
            export::write_cut_list_dxf(&specs, &output)?;
            println!("Wrote {}", output.display());
        }
        Commands::Drawing {
            kind,
            output,
            params,
        } => {
            let kind = ConsoleKind::from(kind);
            let params = load_params(kind, params)?;
            let assembly =
                consoles::generate_console(kind, &params, TessellationQuality::Coarse)?;
            export::write_drawing_svg(&assembly, &output)?;
            println!("Wrote {}", output.display());
        }
        Commands::Params {
            kind,
            format,
            output,
        } => {
            let kind = ConsoleKind::from(kind);
            match output {
                Some(path) => {
                    consoles::default_parameters(kind).save(&path)?;
                    println!("Wrote {}", path.display());
                }
                None => print_params(kind, format)?,
            }
        }
        Commands::Info { kind, params } => {
            let kind = ConsoleKind::from(kind);
            let params = load_params(kind, params)?;
            show_info(kind, &params)?;
        }
    }
    Ok(())
}

/// The reference set for the variant, with a parameter file merged on
/// top when given.
fn load_params(kind: ConsoleKind, file: Option<PathBuf>) -> Result<ParameterSet> {
    let mut params = consoles::default_parameters(kind);
    if let Some(path) = file {
        let overrides = ParameterSet::load(&path)
            .with_context(|| format!("reading parameters from {}", path.display()))?;
        params.merge(&overrides);
    }
    Ok(params)
}

fn print_params(kind: ConsoleKind, format: ParamFormat) -> Result<()> {
    let params = consoles::default_parameters(kind);
    match format {
        ParamFormat::Json => println!("{}", params.to_json()?),
        ParamFormat::Toml => {
            // Grouped by schema category, categories as comments.
            let schema = consoles::schema(kind);
            for category in schema.categories() {
                println!("# {category}");
                for spec in schema.in_category(category) {
                    match params.get(spec.name) {
                        Some(value) => println!("{} = {}", spec.name, toml_value(value)),
                        None => println!("# {} = <required>", spec.name),
                    }
                }
                println!();
            }
        }
    }
    Ok(())
}

/// TOML rendering of one value; floats keep their decimal point so the
/// printed set reparses with the same types.
fn toml_value(value: ParamValue) -> String {
    match value {
        ParamValue::Float(v) => format!("{v:?}"),
        other => other.to_string(),
    }
}

fn show_info(kind: ConsoleKind, params: &ParameterSet) -> Result<()> {
    let specs = consoles::board_specs(kind, params)?;
    let entries = cut_list(&specs);
    let assembly = consoles::assemble(kind.name(), &specs, TessellationQuality::Coarse)?;

    println!("Console:     {kind}");
    println!("Parts:       {}", assembly.num_parts());
    println!(
        "Boards:      {} ({} cut-list lines)",
        entries.iter().map(|e| e.quantity).sum::<u32>(),
        entries.len()
    );
    println!("Board area:  {:.2} m2", total_area_m2(&entries));
    if let Some((min, max)) = assembly.bounding_box() {
        println!(
            "Bounding box: {:.0} x {:.0} x {:.0} mm",
            max.x - min.x,
            max.y - min.y,
            max.z - min.z
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_value_keeps_float_type() {
        assert_eq!(toml_value(ParamValue::Float(18.0)), "18.0");
        assert_eq!(toml_value(ParamValue::Float(23.65)), "23.65");
        assert_eq!(toml_value(ParamValue::Int(61)), "61");
        assert_eq!(toml_value(ParamValue::Bool(true)), "true");
    }
}
