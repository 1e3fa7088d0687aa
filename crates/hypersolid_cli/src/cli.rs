use std::io::Read;
use std::path::PathBuf;

use eyre::{Context, Result, bail};
use hypersolid::Float;
use hypersolid::prelude::*;
use hypersolid::shape::Properties;
use serde::Serialize;

/// Properties of N-dimensional solids and tilings of the plane
///
/// All results are printed to stdout as JSON.
#[derive(Debug, clap::Parser)]
#[command(version)]
pub(crate) struct Args {
    /// YAML file overriding the built-in limits.
    #[arg(long, global = true, value_name = "FILE")]
    pub limits: Option<PathBuf>,

    #[command(subcommand)]
    pub subcommand: Subcommand,
}

#[derive(clap::Subcommand, Debug)]
pub(crate) enum Subcommand {
    /// Print every property of a shape.
    Shape {
        /// Shape as `KIND:NDIM:PARAMS` (such as `sphere:3:2` or
        /// `pyramid:4:1,2`).
        #[arg(value_parser = parse_shape)]
        shape: ShapeRequest,
    },
    /// Compare properties across shapes.
    Compare {
        /// Shapes as `KIND:NDIM:PARAMS`.
        #[arg(required = true, value_parser = parse_shape)]
        shapes: Vec<ShapeRequest>,
        /// Property to compare; may be repeated. Defaults to volume and
        /// surface area.
        #[arg(short, long = "property")]
        properties: Vec<String>,
    },
    /// Generate a tiling from a JSON request.
    Tiling {
        /// JSON tiling request, use '-' for stdin.
        #[arg(value_parser)]
        request: clio::Input,

        /// Print the analysis of the tiling instead of its tiles.
        #[arg(long)]
        analyze: bool,
    },
    /// Print unit ball volume and surface area in each dimension.
    Profile {
        /// Highest number of dimensions to include.
        #[arg(default_value_t = 20)]
        max_ndim: u32,
    },
    /// Print the effective limits as YAML.
    Limits,
}

/// Everything known about a single shape.
#[derive(Serialize, Debug)]
struct ShapeReport<'a> {
    name: String,
    shape: &'a Shape,
    volume: Option<Float>,
    surface_area: Option<Float>,
    ln_volume: Float,
    ln_surface_area: Float,
    volume_formula: String,
    surface_area_formula: String,
    properties: Properties,
}
impl<'a> ShapeReport<'a> {
    fn new(shape: &'a Shape) -> Self {
        let volume = shape.volume();
        if let Err(e) = &volume {
            log::warn!("volume of {}: {e}", shape.name());
        }
        let surface_area = shape.surface_area();
        if let Err(e) = &surface_area {
            log::warn!("surface area of {}: {e}", shape.name());
        }
        Self {
            name: shape.name(),
            shape,
            volume: volume.ok(),
            surface_area: surface_area.ok(),
            ln_volume: shape.ln_volume(),
            ln_surface_area: shape.ln_surface_area(),
            volume_formula: shape.volume_formula(),
            surface_area_formula: shape.surface_area_formula(),
            properties: shape.extra_properties(),
        }
    }
}

pub(crate) fn exec(subcommand: Subcommand, limits: &Limits) -> Result<()> {
    match subcommand {
        Subcommand::Shape { shape } => {
            let shape = build_shape(&shape, limits)?;
            write_json_output(&ShapeReport::new(&shape))
        }

        Subcommand::Compare { shapes, properties } => {
            let shapes = shapes
                .iter()
                .map(|request| build_shape(request, limits))
                .collect::<Result<Vec<_>>>()?;
            let table = hypersolid::compare(&shapes, &properties, limits)?;
            write_json_output(&table)
        }

        Subcommand::Tiling {
            mut request,
            analyze,
        } => {
            let mut buffer = String::new();
            request
                .read_to_string(&mut buffer)
                .context("error reading tiling request")?;
            let request: TilingRequest =
                serde_json::from_str(&buffer).context("error parsing tiling request")?;

            let pattern = hypersolid::generate_tiling(&request, limits)?;
            log::info!("generated {} tiles", pattern.tiles().len());
            if analyze {
                write_json_output(&hypersolid::analyze(&pattern))
            } else {
                write_json_output(&pattern)
            }
        }

        Subcommand::Profile { max_ndim } => {
            if max_ndim > u32::from(limits.max_ndim) {
                bail!("{max_ndim} dimensions exceeds the limit of {}", limits.max_ndim);
            }
            write_json_output(&hypersolid::ball_profile(max_ndim)?)
        }

        Subcommand::Limits => {
            print!("{}", limits.to_yaml().context("error serializing limits")?);
            Ok(())
        }
    }
}

fn build_shape(request: &ShapeRequest, limits: &Limits) -> Result<Shape> {
    request.build(limits).with_context(|| {
        format!("invalid {} in {} dimensions", request.kind, request.ndim)
    })
}

/// Parses a shape written as `KIND:NDIM:PARAMS`, where `PARAMS` is a
/// comma-separated list of numbers.
fn parse_shape(s: &str) -> Result<ShapeRequest, String> {
    let mut parts = s.split(':');
    let (Some(kind), Some(ndim), Some(params), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("expected KIND:NDIM:PARAMS, got {s:?}"));
    };
    let ndim = ndim
        .trim()
        .parse()
        .map_err(|e| format!("invalid dimension count {ndim:?}: {e}"))?;
    let params = params
        .split(',')
        .map(|p| {
            p.trim()
                .parse()
                .map_err(|e| format!("invalid parameter {p:?}: {e}"))
        })
        .collect::<Result<_, _>>()?;
    Ok(ShapeRequest {
        kind: kind.trim().to_owned(),
        ndim,
        params,
    })
}

fn write_json_output<T: Serialize>(value: &T) -> Result<()> {
    serde_json::to_writer_pretty(std::io::stdout(), value)
        .context("error serializing data and writing to stdout")?;
    println!();
    Ok(())
}
