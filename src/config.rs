use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::math::{Gradient, Projection, SceneOptions, Topology};

#[derive(Parser, Debug)]
#[command(name = "fdf3d")]
#[command(about = "Interactive 3D viewer for FDF heightmaps and images", long_about = None)]
#[command(after_help = "Supports .fdf text maps and .png, .jpg, .bmp, .tiff, ... images\n\
                        Example: fdf3d maps/pyramid.fdf")]
pub struct Cli {
    /// Heightmap file (.fdf) or image
    pub file: PathBuf,

    #[arg(long, value_enum, default_value_t = ProjectionArg::Isometric)]
    pub projection: ProjectionArg,

    #[arg(long, value_enum, default_value_t = TopologyArg::Quads)]
    pub topology: TopologyArg,

    #[arg(long, value_enum, default_value_t = GradientArg::Hsv)]
    pub gradient: GradientArg,

    /// Window width in pixels
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Window height in pixels
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Frame rate cap
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub fps: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProjectionArg {
    Isometric,
    Perspective,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TopologyArg {
    /// Neighbour edges only
    Lines,
    /// Edges plus two triangles per complete grid cell
    Quads,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum GradientArg {
    Linear,
    Hsv,
}

pub struct ViewerConfig {
    pub file: PathBuf,
    pub projection: Projection,
    pub scene: SceneOptions,
    pub window_size: (u32, u32),
    pub fps: u32,
}

impl From<Cli> for ViewerConfig {
    fn from(cli: Cli) -> Self {
        Self {
            file: cli.file,
            projection: match cli.projection {
                ProjectionArg::Isometric => Projection::Isometric,
                ProjectionArg::Perspective => Projection::Perspective,
            },
            scene: SceneOptions {
                topology: match cli.topology {
                    TopologyArg::Lines => Topology::Lines,
                    TopologyArg::Quads => Topology::Quads,
                },
                gradient: match cli.gradient {
                    GradientArg::Linear => Gradient::Linear,
                    GradientArg::Hsv => Gradient::Hsv,
                },
            },
            window_size: (cli.width.max(1), cli.height.max(1)),
            fps: cli.fps,
        }
    }
}
