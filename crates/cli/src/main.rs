//! GeoProcs CLI - run geospatial processes on GeoTIFF and GeoJSON files

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use geoprocs_algorithms::hydrology::D8Encoding;
use geoprocs_algorithms::terrain::{AspectOutput, CurvatureType, SlopeUnits};
use geoprocs_core::io::{read_geojson, read_geotiff, write_geojson, write_geotiff};
use geoprocs_core::{Envelope, FeatureCollection, Raster, RasterElement};
use geoprocs_process::prelude::*;

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "geoprocs")]
#[command(author, version, about = "Named geospatial processes for rasters and features", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available processes
    List {
        /// Only this category: vector, raster, statistics
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show the parameters of a process
    Describe {
        /// Process name, e.g. "slope" or "raster:Slope"
        name: String,
        /// Print the descriptor as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show information about a raster file
    Info {
        /// Input raster file
        input: PathBuf,
    },
    /// Raster processes
    Raster {
        #[command(subcommand)]
        process: RasterCommands,
    },
    /// Vector processes
    Vector {
        #[command(subcommand)]
        process: VectorCommands,
    },
    /// Spatial statistics
    Stats {
        #[command(subcommand)]
        process: StatsCommands,
    },
}

// ─── Raster subcommands ─────────────────────────────────────────────────

#[derive(Subcommand)]
enum RasterCommands {
    /// Calculate slope from DEM
    Slope {
        /// Input DEM file
        input: PathBuf,
        /// Output file
        output: PathBuf,
        /// Output units: degrees, percent, radians
        #[arg(short, long, default_value = "degrees")]
        units: String,
        /// Z-factor for unit conversion
        #[arg(short, long, default_value = "1.0")]
        z_factor: f64,
    },
    /// Calculate aspect from DEM
    Aspect {
        input: PathBuf,
        output: PathBuf,
        /// Output format: degrees, radians, compass
        #[arg(short, long, default_value = "degrees")]
        format: String,
    },
    /// Calculate surface curvature from DEM
    Curvature {
        input: PathBuf,
        output: PathBuf,
        /// Curvature type: general, profile, plan
        #[arg(short = 't', long, default_value = "general")]
        curvature_type: String,
        #[arg(short, long, default_value = "1.0")]
        z_factor: f64,
    },
    /// Calculate Topographic Position Index
    Tpi {
        input: PathBuf,
        output: PathBuf,
        /// Neighborhood radius in cells
        #[arg(short, long, default_value = "1")]
        radius: usize,
    },
    /// Calculate Terrain Ruggedness Index
    Tri {
        input: PathBuf,
        output: PathBuf,
        #[arg(short, long, default_value = "1")]
        radius: usize,
    },
    /// Calculate hillshade from DEM
    Hillshade {
        input: PathBuf,
        output: PathBuf,
        /// Sun azimuth in degrees (0=North, clockwise)
        #[arg(short, long, default_value = "315")]
        azimuth: f64,
        /// Sun altitude in degrees above horizon
        #[arg(short = 'l', long, default_value = "45")]
        altitude: f64,
        #[arg(short, long, default_value = "1.0")]
        z_factor: f64,
    },
    /// D8 flow direction
    FlowDirection {
        input: PathBuf,
        output: PathBuf,
        /// Direction codes: esri (1, 2, 4 .. 128) or sequential (1 .. 8)
        #[arg(short, long, default_value = "esri")]
        encoding: String,
    },
}

// ─── Vector subcommands ─────────────────────────────────────────────────

#[derive(Subcommand)]
enum VectorCommands {
    /// Add area and perimeter fields
    Area {
        input: PathBuf,
        output: PathBuf,
        #[arg(long, default_value = "geom_area")]
        area_field: String,
        #[arg(long, default_value = "geom_perim")]
        perimeter_field: String,
        /// Do not add a perimeter field
        #[arg(long)]
        no_perimeter: bool,
    },
    /// Add a length field
    Length {
        input: PathBuf,
        output: PathBuf,
        #[arg(long, default_value = "geom_len")]
        field: String,
    },
    /// Keep the parts of features inside clip polygons
    Clip {
        input: PathBuf,
        /// Clip polygons
        clip: PathBuf,
        output: PathBuf,
    },
    /// Remove the parts of features inside erase polygons
    Erase {
        input: PathBuf,
        /// Erase polygons
        erase: PathBuf,
        output: PathBuf,
    },
    /// Polygon intersection of two layers
    Intersect {
        input: PathBuf,
        overlay: PathBuf,
        output: PathBuf,
    },
    /// Polygon union of two layers
    Union {
        input: PathBuf,
        overlay: PathBuf,
        output: PathBuf,
    },
    /// Areas in exactly one of two layers
    SymDifference {
        input: PathBuf,
        overlay: PathBuf,
        output: PathBuf,
    },
    /// Delaunay triangulation of a point layer
    Delaunay {
        input: PathBuf,
        output: PathBuf,
        /// Polygons to clip the triangles to
        #[arg(long)]
        clip: Option<PathBuf>,
    },
    /// Remove features with repeated geometry
    DeleteDuplicates {
        input: PathBuf,
        output: PathBuf,
        /// Largest vertex distance still treated as equal
        #[arg(short, long, default_value = "0")]
        tolerance: f64,
    },
}

// ─── Statistics subcommands ─────────────────────────────────────────────

#[derive(Subcommand)]
enum StatsCommands {
    /// Quadrat count analysis
    Quadrat {
        input: PathBuf,
        /// Quadrat edge length
        #[arg(short, long)]
        cell_size: Option<f64>,
        /// Study area as "min_x,min_y,max_x,max_y"
        #[arg(short, long)]
        extent: Option<String>,
        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Average nearest neighbour analysis
    NearestNeighbor {
        input: PathBuf,
        /// Study area in square map units
        #[arg(short, long)]
        area: Option<f64>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Pearson correlation between numeric fields
    Pearson {
        input: PathBuf,
        /// Comma-separated field names
        #[arg(short, long, value_delimiter = ',', required = true)]
        fields: Vec<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to install logger")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn read_dem(path: &Path) -> Result<Raster<f64>> {
    let pb = spinner("Reading raster...");
    let raster: Raster<f64> =
        read_geotiff(path).with_context(|| format!("Failed to read raster {}", path.display()))?;
    pb.finish_and_clear();
    info!("Input: {} x {}", raster.cols(), raster.rows());
    Ok(raster)
}

fn write_raster<T: RasterElement>(raster: &Raster<T>, path: &Path) -> Result<()> {
    let pb = spinner("Writing output...");
    write_geotiff(raster, path).context("Failed to write output")?;
    pb.finish_and_clear();
    Ok(())
}

fn read_features(path: &Path) -> Result<FeatureCollection> {
    let pb = spinner("Reading features...");
    let features =
        read_geojson(path).with_context(|| format!("Failed to read features {}", path.display()))?;
    pb.finish_and_clear();
    info!("Input: {} features", features.len());
    Ok(features)
}

fn write_features(features: &FeatureCollection, path: &Path) -> Result<()> {
    let pb = spinner("Writing output...");
    write_geojson(features, path).context("Failed to write output")?;
    pb.finish_and_clear();
    Ok(())
}

/// Pretty JSON to a file, or stdout when no path is given
fn write_report<R: Serialize>(report: &R, path: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    match path {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Report saved to: {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn done(name: &str, path: &Path, elapsed: Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

fn parse_slope_units(s: &str) -> Result<SlopeUnits> {
    match s.to_lowercase().as_str() {
        "degrees" | "deg" | "d" => Ok(SlopeUnits::Degrees),
        "percent" | "pct" | "%" => Ok(SlopeUnits::Percent),
        "radians" | "rad" | "r" => Ok(SlopeUnits::Radians),
        _ => anyhow::bail!("Unknown units: {}. Use degrees, percent, or radians.", s),
    }
}

fn parse_aspect_format(s: &str) -> Result<AspectOutput> {
    match s.to_lowercase().as_str() {
        "degrees" | "deg" | "d" => Ok(AspectOutput::Degrees),
        "radians" | "rad" | "r" => Ok(AspectOutput::Radians),
        "compass" | "c" => Ok(AspectOutput::Compass),
        _ => anyhow::bail!("Unknown format: {}. Use degrees, radians, or compass.", s),
    }
}

fn parse_curvature_type(s: &str) -> Result<CurvatureType> {
    match s.to_lowercase().as_str() {
        "general" | "mean" | "g" => Ok(CurvatureType::General),
        "profile" | "prof" | "p" => Ok(CurvatureType::Profile),
        "plan" | "tangential" | "t" => Ok(CurvatureType::Plan),
        _ => anyhow::bail!("Unknown curvature type: {}. Use general, profile, or plan.", s),
    }
}

fn parse_encoding(s: &str) -> Result<D8Encoding> {
    match s.to_lowercase().as_str() {
        "esri" | "arcgis" => Ok(D8Encoding::Esri),
        "sequential" | "seq" => Ok(D8Encoding::Sequential),
        _ => anyhow::bail!("Unknown encoding: {}. Use esri or sequential.", s),
    }
}

fn parse_extent(s: &str) -> Result<Envelope> {
    let values: Vec<f64> = s
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .with_context(|| format!("Invalid extent: {}", s))?;
    match values.as_slice() {
        &[min_x, min_y, max_x, max_y] => Ok(Envelope::new(min_x, min_y, max_x, max_y)),
        _ => anyhow::bail!("Extent must be 'min_x,min_y,max_x,max_y', got: {}", s),
    }
}

fn print_process(info: &ProcessInfo) {
    println!("{} - {}", info.name, info.title);
    println!("  {}", info.description);
    println!("\nInputs:");
    for param in info.inputs {
        let usage = match (param.required, param.default) {
            (true, _) => "required".to_string(),
            (false, Some(default)) => format!("default: {}", default),
            (false, None) => "optional".to_string(),
        };
        println!("  {:<18} {} ({})", param.name, param.kind, usage);
        println!("  {:<18} {}", "", param.description);
    }
    println!("\nOutputs:");
    for param in info.outputs {
        println!("  {:<18} {} - {}", param.name, param.kind, param.description);
    }
}

/// Run a raster process, write the result and report timing
fn raster_process<P>(process: &P, input: P::Input, output: &Path) -> Result<()>
where
    P: Process,
    P::Output: RasterOutput,
{
    let start = Instant::now();
    let result = run(process, input)?;
    let elapsed = start.elapsed();
    result.write(output)?;
    done(process.info().title, output, elapsed);
    Ok(())
}

/// Run a vector process, write the result and report timing
fn vector_process<P>(process: &P, input: P::Input, output: &Path) -> Result<()>
where
    P: Process<Output = FeatureCollection>,
{
    let start = Instant::now();
    let result = run(process, input)?;
    let elapsed = start.elapsed();
    info!("Output: {} features", result.len());
    write_features(&result, output)?;
    done(process.info().title, output, elapsed);
    Ok(())
}

trait RasterOutput {
    fn write(&self, path: &Path) -> Result<()>;
}

impl<T: RasterElement> RasterOutput for Raster<T> {
    fn write(&self, path: &Path) -> Result<()> {
        write_raster(self, path)
    }
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        // ── Discovery ────────────────────────────────────────────────
        Commands::List { category } => {
            let categories: Vec<Category> = match category {
                Some(name) => vec![Category::parse(&name).with_context(|| {
                    format!("Unknown category: {}. Use vector, raster, or statistics.", name)
                })?],
                None => Category::ALL.to_vec(),
            };
            for category in categories {
                println!("{}:", category);
                for info in registry::by_category(category) {
                    println!("  {:<32} {}", info.name, info.title);
                }
            }
        }

        Commands::Describe { name, json } => {
            let info = registry::find(&name).with_context(|| format!("Unknown process: {}", name))?;
            if json {
                println!("{}", serde_json::to_string_pretty(info)?);
            } else {
                print_process(info);
            }
        }

        Commands::Info { input } => {
            let raster = read_dem(&input)?;
            let (rows, cols) = raster.shape();
            let extent = raster.extent();
            let stats = raster.statistics();

            println!("File: {}", input.display());
            println!("Dimensions: {} x {} ({} cells)", cols, rows, raster.len());
            println!("Cell size: {}", raster.cell_size());
            println!(
                "Extent: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                extent.min_x, extent.min_y, extent.max_x, extent.max_y
            );
            if let Some(crs) = raster.crs() {
                println!("CRS: {}", crs.identifier());
            }
            if let Some(nodata) = raster.nodata() {
                println!("NoData: {}", nodata);
            }
            println!("\nStatistics:");
            if let Some(min) = stats.min {
                println!("  Min: {:.4}", min);
            }
            if let Some(max) = stats.max {
                println!("  Max: {:.4}", max);
            }
            if let Some(mean) = stats.mean {
                println!("  Mean: {:.4}", mean);
            }
            println!(
                "  Valid cells: {} ({:.1}%)",
                stats.valid_count,
                100.0 * stats.valid_count as f64 / raster.len().max(1) as f64
            );
        }

        // ── Raster ───────────────────────────────────────────────────
        Commands::Raster { process } => match process {
            RasterCommands::Slope {
                input,
                output,
                units,
                z_factor,
            } => {
                let units = parse_slope_units(&units)?;
                let dem = read_dem(&input)?;
                raster_process(&Slope, SlopeInput { dem, units, z_factor }, &output)?;
            }

            RasterCommands::Aspect { input, output, format } => {
                let format = parse_aspect_format(&format)?;
                let dem = read_dem(&input)?;
                raster_process(&Aspect, AspectInput { dem, format }, &output)?;
            }

            RasterCommands::Curvature {
                input,
                output,
                curvature_type,
                z_factor,
            } => {
                let curvature_type = parse_curvature_type(&curvature_type)?;
                let dem = read_dem(&input)?;
                raster_process(
                    &Curvature,
                    CurvatureInput {
                        dem,
                        curvature_type,
                        z_factor,
                    },
                    &output,
                )?;
            }

            RasterCommands::Tpi { input, output, radius } => {
                let dem = read_dem(&input)?;
                raster_process(&Tpi, NeighborhoodInput { dem, radius }, &output)?;
            }

            RasterCommands::Tri { input, output, radius } => {
                let dem = read_dem(&input)?;
                raster_process(&Tri, NeighborhoodInput { dem, radius }, &output)?;
            }

            RasterCommands::Hillshade {
                input,
                output,
                azimuth,
                altitude,
                z_factor,
            } => {
                let dem = read_dem(&input)?;
                raster_process(
                    &Hillshade,
                    HillshadeInput {
                        dem,
                        azimuth,
                        altitude,
                        z_factor,
                    },
                    &output,
                )?;
            }

            RasterCommands::FlowDirection {
                input,
                output,
                encoding,
            } => {
                let encoding = parse_encoding(&encoding)?;
                let dem = read_dem(&input)?;
                raster_process(&FlowDirection, FlowDirectionInput { dem, encoding }, &output)?;
            }
        },

        // ── Vector ───────────────────────────────────────────────────
        Commands::Vector { process } => match process {
            VectorCommands::Area {
                input,
                output,
                area_field,
                perimeter_field,
                no_perimeter,
            } => {
                let features = read_features(&input)?;
                let input = CalculateAreaInput {
                    features,
                    area_field,
                    perimeter_field: (!no_perimeter).then_some(perimeter_field),
                };
                vector_process(&CalculateArea, input, &output)?;
            }

            VectorCommands::Length { input, output, field } => {
                let features = read_features(&input)?;
                let input = CalculateLengthInput {
                    features,
                    length_field: field,
                };
                vector_process(&CalculateLength, input, &output)?;
            }

            VectorCommands::Clip { input, clip, output } => {
                let input = ClipInput {
                    features: read_features(&input)?,
                    clip_features: read_features(&clip)?,
                };
                vector_process(&Clip, input, &output)?;
            }

            VectorCommands::Erase { input, erase, output } => {
                let input = EraseInput {
                    features: read_features(&input)?,
                    erase_features: read_features(&erase)?,
                };
                vector_process(&Erase, input, &output)?;
            }

            VectorCommands::Intersect { input, overlay, output } => {
                let input = OverlayInput {
                    features: read_features(&input)?,
                    overlay_features: read_features(&overlay)?,
                };
                vector_process(&Intersect, input, &output)?;
            }

            VectorCommands::Union { input, overlay, output } => {
                let input = OverlayInput {
                    features: read_features(&input)?,
                    overlay_features: read_features(&overlay)?,
                };
                vector_process(&Union, input, &output)?;
            }

            VectorCommands::SymDifference { input, overlay, output } => {
                let input = OverlayInput {
                    features: read_features(&input)?,
                    overlay_features: read_features(&overlay)?,
                };
                vector_process(&SymDifference, input, &output)?;
            }

            VectorCommands::Delaunay { input, output, clip } => {
                let input = DelaunayInput {
                    points: read_features(&input)?,
                    clip_area: clip.as_deref().map(read_features).transpose()?,
                };
                vector_process(&DelaunayTriangulation, input, &output)?;
            }

            VectorCommands::DeleteDuplicates {
                input,
                output,
                tolerance,
            } => {
                let input = DeleteDuplicatesInput {
                    features: read_features(&input)?,
                    tolerance,
                };
                let start = Instant::now();
                let result = run(&DeleteDuplicates, input)?;
                let elapsed = start.elapsed();
                println!("Removed {} duplicate features", result.removed);
                write_features(&result.features, &output)?;
                done("Delete duplicates", &output, elapsed);
            }
        },

        // ── Statistics ───────────────────────────────────────────────
        Commands::Stats { process } => match process {
            StatsCommands::Quadrat {
                input,
                cell_size,
                extent,
                output,
            } => {
                let input = QuadratInput {
                    points: read_features(&input)?,
                    extent: extent.as_deref().map(parse_extent).transpose()?,
                    cell_size,
                };
                let report = run(&QuadratAnalysis, input)?;
                info!(
                    "{} quadrats, VMR {:.3}, pattern {}",
                    report.quadrats, report.variance_mean_ratio, report.pattern
                );
                write_report(&report, output.as_deref())?;
            }

            StatsCommands::NearestNeighbor { input, area, output } => {
                let input = NearestNeighborInput {
                    points: read_features(&input)?,
                    area,
                };
                let report = run(&NearestNeighbor, input)?;
                info!(
                    "Ratio {:.3}, z {:.3}, pattern {}",
                    report.nearest_neighbor_ratio, report.z_score, report.pattern
                );
                write_report(&report, output.as_deref())?;
            }

            StatsCommands::Pearson { input, fields, output } => {
                let input = PearsonInput {
                    features: read_features(&input)?,
                    fields,
                };
                let report = run(&PearsonCorrelation, input)?;
                write_report(&report, output.as_deref())?;
            }
        },
    }

    Ok(())
}
