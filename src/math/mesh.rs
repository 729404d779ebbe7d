use egui::Color32;

use crate::math::color::ColorMapper;
use crate::math::heightmap::HeightMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topology {
    /// Edges between orthogonal neighbours only.
    Lines,
    /// Complete 2x2 blocks become four edges and two triangles.
    Quads,
}

/// Maps grid cells to point indices; cells without a point hold `None`.
pub struct GridIndex {
    cols: usize,
    rows: usize,
    cells: Vec<Option<usize>>,
}

impl GridIndex {
    pub fn build(map: &HeightMap) -> Self {
        let cols = map.points.iter().map(|p| p.cell.x as usize + 1).max().unwrap_or(0);
        let rows = map.points.iter().map(|p| p.cell.y as usize + 1).max().unwrap_or(0);

        let mut cells = vec![None; cols * rows];
        for (idx, point) in map.points.iter().enumerate() {
            let (x, y) = (point.cell.x as usize, point.cell.y as usize);
            cells[y * cols + x] = Some(idx);
        }

        Self { cols, rows, cells }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn get(&self, col: usize, row: usize) -> Option<usize> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells[row * self.cols + col]
    }
}

pub struct Mesh {
    pub grid: GridIndex,
    pub edges: Vec<[usize; 2]>,
    pub faces: Vec<[usize; 3]>,
    pub face_colors: Vec<Color32>,
}

impl Mesh {
    pub fn build(map: &HeightMap, topology: Topology, colors: &ColorMapper) -> Self {
        let grid = GridIndex::build(map);
        let mut mesh = Self {
            grid,
            edges: Vec::new(),
            faces: Vec::new(),
            face_colors: Vec::new(),
        };

        match topology {
            Topology::Lines => mesh.connect_neighbours(),
            Topology::Quads => mesh.triangulate_blocks(map, colors),
        }

        mesh
    }

    fn connect_neighbours(&mut self) {
        let grid = &self.grid;

        for y in 0..grid.rows() {
            for x in 0..grid.cols().saturating_sub(1) {
                if let (Some(a), Some(b)) = (grid.get(x, y), grid.get(x + 1, y)) {
                    self.edges.push([a, b]);
                }
            }
        }

        for y in 0..grid.rows().saturating_sub(1) {
            for x in 0..grid.cols() {
                if let (Some(a), Some(b)) = (grid.get(x, y), grid.get(x, y + 1)) {
                    self.edges.push([a, b]);
                }
            }
        }
    }

    fn triangulate_blocks(&mut self, map: &HeightMap, colors: &ColorMapper) {
        for y in 0..self.grid.rows().saturating_sub(1) {
            for x in 0..self.grid.cols().saturating_sub(1) {
                let corners = (
                    self.grid.get(x, y),
                    self.grid.get(x + 1, y),
                    self.grid.get(x, y + 1),
                    self.grid.get(x + 1, y + 1),
                );
                let (Some(tl), Some(tr), Some(bl), Some(br)) = corners else {
                    continue;
                };

                self.edges.push([tl, tr]);
                self.edges.push([tl, bl]);
                self.edges.push([bl, br]);
                self.edges.push([tr, br]);

                self.faces.push([tl, tr, bl]);
                self.faces.push([br, tr, bl]);

                let avg_z = [tl, tr, bl, br]
                    .iter()
                    .map(|&i| map.points[i].height())
                    .sum::<f32>()
                    / 4.0;
                let color = colors.gradient_color(avg_z);
                self.face_colors.push(color);
                self.face_colors.push(color);
            }
        }
    }
}
