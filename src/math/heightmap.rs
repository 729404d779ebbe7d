//! Heightmap sources: the whitespace separated `.fdf` text grid, or any raster
//! image whose brightness is read as depth.

use std::io;
use std::path::{Path, PathBuf};

use glam::{UVec2, Vec3};
use image::imageops::FilterType;
use thiserror::Error;

/// Side length of the grid an image is resampled to.
pub const IMAGE_GRID: u32 = 50;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file {0} not found")]
    FileNotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no valid height data found")]
    EmptyModel,
    #[error("image decode failed: {0}")]
    ImageDecode(#[from] image::ImageError),
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridPoint {
    pub position: Vec3,
    /// Column/row the point occupies in the source grid.
    pub cell: UVec2,
    /// Raw color token, resolved lazily by the color mapper.
    pub color: Option<String>,
}

impl GridPoint {
    pub fn height(&self) -> f32 {
        self.position.z
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }
}

#[derive(Clone, Debug)]
pub struct HeightMap {
    pub points: Vec<GridPoint>,
    pub min_z: f32,
    pub max_z: f32,
}

impl HeightMap {
    fn from_points(points: Vec<GridPoint>) -> Result<Self, LoadError> {
        if points.is_empty() {
            return Err(LoadError::EmptyModel);
        }

        let (min_z, max_z) = points
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.height()), hi.max(p.height()))
            });

        Ok(Self {
            points,
            min_z,
            max_z,
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

/// Parses the text grid. Rows are counted per non-comment line, columns per
/// token whose height parses; anything else on a line is skipped.
pub fn parse_text(source: &str) -> Result<HeightMap, LoadError> {
    let mut points = Vec::new();
    let mut row = 0u32;

    for line in source.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut col = 0u32;
        for token in line.split_whitespace() {
            let (height, color) = match token.split_once(',') {
                Some((height, color)) => (height, Some(color)),
                None => (token, None),
            };

            let Some(z) = height.parse::<f32>().ok().filter(|z| z.is_finite()) else {
                continue;
            };

            points.push(GridPoint {
                position: Vec3::new(col as f32, row as f32, z),
                cell: UVec2::new(col, row),
                color: color.filter(|c| !c.is_empty()).map(str::to_owned),
            });
            col += 1;
        }

        row += 1;
    }

    HeightMap::from_points(points)
}

/// Decodes an image and turns darker pixels into taller points, centred on
/// the origin.
pub fn from_image_bytes(bytes: &[u8]) -> Result<HeightMap, LoadError> {
    let image = image::load_from_memory(bytes)?;
    let luma = image
        .resize_exact(IMAGE_GRID, IMAGE_GRID, FilterType::Triangle)
        .to_luma8();

    let half = (IMAGE_GRID / 2) as f32;
    let points = luma
        .enumerate_pixels()
        .map(|(x, y, pixel)| {
            let z = (255.0 - pixel.0[0] as f32) / 10.0;
            GridPoint {
                position: Vec3::new(x as f32 - half, y as f32 - half, z),
                cell: UVec2::new(x, y),
                color: None,
            }
        })
        .collect();

    HeightMap::from_points(points)
}

pub fn is_text_source(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("fdf"))
}

pub fn load_path(path: &Path) -> Result<HeightMap, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::FileNotFound(path.to_path_buf()),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    if is_text_source(path) {
        let text = String::from_utf8(bytes).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;
        parse_text(&text)
    } else {
        from_image_bytes(&bytes)
    }
}
