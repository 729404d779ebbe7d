//! Per-frame pipeline: rotate and project every point, then emit draw
//! primitives for the active render mode in back-to-front order.

use egui::Color32;
use glam::{Vec2, Vec3};

use crate::math::{Scene, rotate};
use crate::renderer::camera::{RenderMode, ViewState};

pub const EDGE_WIDTH: f32 = 2.0;
pub const OUTLINE_WIDTH: f32 = 1.0;
pub const AXIS_WIDTH: f32 = 3.0;
pub const GRID_WIDTH: f32 = 1.0;

pub const OUTLINE_COLOR: Color32 = Color32::from_rgb(50, 50, 80);

const GRID_EXTENT: i32 = 12;
const GRID_STEP: usize = 2;
const AXIS_LENGTH: f32 = 10.0;
const LABEL_OFFSET: Vec2 = Vec2::new(5.0, -10.0);

const RIPPLE_AMPLITUDE: f32 = 0.5;
const RIPPLE_PHASE_STEP: f32 = 0.1;

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Line {
        from: Vec2,
        to: Vec2,
        color: Color32,
        width: f32,
    },
    Polygon {
        points: Vec<Vec2>,
        fill: Color32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color32,
    },
    Label {
        pos: Vec2,
        text: &'static str,
        color: Color32,
    },
}

/// A point after the view transform.
#[derive(Clone, Copy, Debug)]
pub struct ViewPoint {
    pub rotated: Vec3,
    pub screen: Vec2,
}

pub fn transform_points(scene: &Scene, view: &ViewState) -> Vec<ViewPoint> {
    scene
        .map
        .points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let mut p = point.position;
            if view.auto_rotate {
                p.z += (view.time + i as f32 * RIPPLE_PHASE_STEP).sin() * RIPPLE_AMPLITUDE;
            }
            let rotated = rotate(p, view.angle_x, view.angle_y, view.angle_z);
            ViewPoint {
                rotated,
                screen: view_project(view, rotated),
            }
        })
        .collect()
}

fn view_project(view: &ViewState, rotated: Vec3) -> Vec2 {
    view.projection.project(rotated, view.scale, view.offset)
}

fn view_point(view: &ViewState, p: Vec3) -> Vec2 {
    view_project(view, rotate(p, view.angle_x, view.angle_y, view.angle_z))
}

pub fn render_frame(scene: &Scene, view: &ViewState) -> Vec<DrawCommand> {
    let mut out = Vec::new();

    if view.show_grid {
        draw_grid(view, &mut out);
    }

    let points = transform_points(scene, view);
    match view.mode {
        RenderMode::Solid if !scene.mesh.faces.is_empty() => draw_solid(scene, &points, &mut out),
        RenderMode::Points => draw_points(scene, &points, &mut out),
        RenderMode::Wireframe | RenderMode::Solid => draw_wireframe(scene, &points, &mut out),
    }

    if view.show_axes {
        draw_axes(view, &mut out);
    }

    out
}

fn draw_wireframe(scene: &Scene, points: &[ViewPoint], out: &mut Vec<DrawCommand>) {
    let source = &scene.map.points;

    for &[a, b] in &scene.mesh.edges {
        let (Some(pa), Some(pb)) = (points.get(a), points.get(b)) else {
            continue;
        };
        let (first, second) = (&source[a], &source[b]);

        let color = match first.color() {
            Some(custom) => scene.colors.color_for(first.height(), Some(custom)),
            None => {
                let avg_z = (first.height() + second.height()) / 2.0;
                scene.colors.color_for(avg_z, None)
            }
        };

        out.push(DrawCommand::Line {
            from: pa.screen,
            to: pb.screen,
            color,
            width: EDGE_WIDTH,
        });
    }
}

fn draw_points(scene: &Scene, points: &[ViewPoint], out: &mut Vec<DrawCommand>) {
    for (point, projected) in scene.map.points.iter().zip(points) {
        let z = point.height();
        out.push(DrawCommand::Circle {
            center: projected.screen,
            radius: (5.0 + z).max(2.0),
            color: scene.colors.color_for(z, point.color()),
        });
    }
}

struct DepthFace {
    depth: f32,
    corners: [Vec2; 3],
    color: Color32,
}

fn draw_solid(scene: &Scene, points: &[ViewPoint], out: &mut Vec<DrawCommand>) {
    let mut faces: Vec<DepthFace> = scene
        .mesh
        .faces
        .iter()
        .zip(&scene.mesh.face_colors)
        .filter_map(|(&[a, b, c], &color)| {
            let (pa, pb, pc) = (points.get(a)?, points.get(b)?, points.get(c)?);
            Some(DepthFace {
                depth: (pa.rotated.z + pb.rotated.z + pc.rotated.z) / 3.0,
                corners: [pa.screen, pb.screen, pc.screen],
                color,
            })
        })
        .collect();

    // Farthest first so nearer faces paint over them.
    faces.sort_by(|a, b| b.depth.total_cmp(&a.depth));

    for face in faces {
        out.push(DrawCommand::Polygon {
            points: face.corners.to_vec(),
            fill: face.color,
        });
        for i in 0..3 {
            out.push(DrawCommand::Line {
                from: face.corners[i],
                to: face.corners[(i + 1) % 3],
                color: OUTLINE_COLOR,
                width: OUTLINE_WIDTH,
            });
        }
    }
}

fn draw_grid(view: &ViewState, out: &mut Vec<DrawCommand>) {
    let extent = GRID_EXTENT as f32;

    for i in (-GRID_EXTENT..=GRID_EXTENT).step_by(GRID_STEP) {
        let alpha = if i % 4 == 0 { 50 } else { 30 };
        let color = Color32::from_rgba_unmultiplied(120, 120, 180, alpha);
        let at = i as f32;

        for (start, end) in [
            (Vec3::new(at, -extent, 0.0), Vec3::new(at, extent, 0.0)),
            (Vec3::new(-extent, at, 0.0), Vec3::new(extent, at, 0.0)),
        ] {
            out.push(DrawCommand::Line {
                from: view_point(view, start),
                to: view_point(view, end),
                color,
                width: GRID_WIDTH,
            });
        }
    }
}

fn draw_axes(view: &ViewState, out: &mut Vec<DrawCommand>) {
    let origin = view_point(view, Vec3::ZERO);
    let axes = [
        (Vec3::X, Color32::from_rgb(255, 50, 50), "X"),
        (Vec3::Y, Color32::from_rgb(50, 255, 50), "Y"),
        (Vec3::Z, Color32::from_rgb(50, 50, 255), "Z"),
    ];

    for (axis, color, label) in axes {
        let end = view_point(view, axis * AXIS_LENGTH);
        out.push(DrawCommand::Line {
            from: origin,
            to: end,
            color,
            width: AXIS_WIDTH,
        });
        out.push(DrawCommand::Label {
            pos: end + LABEL_OFFSET,
            text: label,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::heightmap::{GridPoint, HeightMap, parse_text};
    use crate::math::{Gradient, Projection, SceneOptions, Topology};
    use glam::UVec2;
    use std::path::PathBuf;

    fn scene(text: &str, topology: Topology) -> Scene {
        let map = parse_text(text).unwrap();
        Scene::from_map(
            PathBuf::from("test.fdf"),
            map,
            SceneOptions {
                topology,
                gradient: Gradient::Linear,
            },
        )
    }

    fn bare_view(mode: RenderMode) -> ViewState {
        let mut view = ViewState::new(Vec2::new(800.0, 600.0), Projection::Isometric);
        view.show_axes = false;
        view.show_grid = false;
        view.mode = mode;
        view
    }

    fn polygons(commands: &[DrawCommand]) -> Vec<(Vec<Vec2>, Color32)> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Polygon { points, fill } => Some((points.clone(), *fill)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn solid_mode_draws_far_faces_first() {
        let mut scene = scene("0 0\n0 0", Topology::Quads);
        // Two hand-made faces whose average rotated Z is 1 and 5.
        scene.map = HeightMap {
            points: [(0.0, 0.0, 1.0), (1.0, 0.0, 1.0), (0.0, 1.0, 1.0), (2.0, 0.0, 5.0), (3.0, 0.0, 5.0), (2.0, 1.0, 5.0)]
                .iter()
                .enumerate()
                .map(|(i, &(x, y, z))| GridPoint {
                    position: Vec3::new(x, y, z),
                    cell: UVec2::new(i as u32, 0),
                    color: None,
                })
                .collect(),
            min_z: 1.0,
            max_z: 5.0,
        };
        let near = Color32::from_rgb(1, 1, 1);
        let far = Color32::from_rgb(5, 5, 5);
        scene.mesh.faces = vec![[0, 1, 2], [3, 4, 5]];
        scene.mesh.face_colors = vec![near, far];

        let mut view = bare_view(RenderMode::Solid);
        view.angle_x = 0.0;
        view.angle_y = 0.0;

        let commands = render_frame(&scene, &view);
        let fills: Vec<Color32> = polygons(&commands).into_iter().map(|(_, c)| c).collect();
        assert_eq!(fills, vec![far, near]);

        // each face is followed by its outline
        assert!(matches!(
            &commands[1],
            DrawCommand::Line { color, width, .. } if *color == OUTLINE_COLOR && *width == OUTLINE_WIDTH
        ));
        assert_eq!(commands.len(), 8);
    }

    #[test]
    fn solid_faces_keep_their_precomputed_color() {
        let scene = scene("0 1 2\n3 4 5\n6 7 8", Topology::Quads);
        let commands = render_frame(&scene, &bare_view(RenderMode::Solid));
        let mut drawn: Vec<Color32> = polygons(&commands).into_iter().map(|(_, c)| c).collect();
        let mut expected = scene.mesh.face_colors.clone();
        drawn.sort_by_key(|c| c.to_array());
        expected.sort_by_key(|c| c.to_array());
        assert_eq!(drawn, expected);
    }

    #[test]
    fn solid_without_faces_falls_back_to_wireframe() {
        let scene = scene("0 1\n2 3", Topology::Lines);
        let commands = render_frame(&scene, &bare_view(RenderMode::Solid));
        assert_eq!(commands.len(), 4);
        assert!(
            commands
                .iter()
                .all(|c| matches!(c, DrawCommand::Line { width, .. } if *width == EDGE_WIDTH))
        );
    }

    #[test]
    fn wireframe_prefers_first_endpoint_override() {
        let scene = scene("0,0x00ff00 10\n0 10,ff0000", Topology::Lines);
        let commands = render_frame(&scene, &bare_view(RenderMode::Wireframe));
        let colors: Vec<Color32> = commands
            .iter()
            .map(|c| match c {
                DrawCommand::Line { color, .. } => *color,
                other => panic!("unexpected {other:?}"),
            })
            .collect();

        // edges: (0,1) (2,3) horizontal, (0,2) (1,3) vertical
        let green = Color32::from_rgb(0, 255, 0);
        assert_eq!(colors[0], green);
        assert_eq!(colors[1], scene.colors.gradient_color(5.0));
        assert_eq!(colors[2], green);
        // first endpoint has no override, second's is ignored
        assert_eq!(colors[3], scene.colors.gradient_color(10.0));
    }

    #[test]
    fn points_mode_sizes_by_height() {
        let scene = scene("-10 0 3.5", Topology::Lines);
        let commands = render_frame(&scene, &bare_view(RenderMode::Points));
        let radii: Vec<f32> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Circle { radius, .. } => Some(*radius),
                _ => None,
            })
            .collect();
        assert_eq!(radii, vec![2.0, 5.0, 8.5]);
    }

    #[test]
    fn dangling_indices_are_dropped() {
        let mut scene = scene("0 1\n2 3", Topology::Quads);
        scene.mesh.edges.push([0, 42]);
        scene.mesh.faces.push([1, 2, 99]);
        scene.mesh.face_colors.push(Color32::WHITE);

        let wire = render_frame(&scene, &bare_view(RenderMode::Wireframe));
        assert_eq!(wire.len(), 4);

        let solid = render_frame(&scene, &bare_view(RenderMode::Solid));
        assert_eq!(polygons(&solid).len(), 2);
    }

    #[test]
    fn overlays_wrap_the_model() {
        let scene = scene("0 1\n2 3", Topology::Lines);
        let mut view = bare_view(RenderMode::Wireframe);
        view.show_grid = true;
        view.show_axes = true;

        let commands = render_frame(&scene, &view);
        let grid_lines = 13 * 2;
        assert_eq!(commands.len(), grid_lines + 4 + 6);
        assert!(matches!(&commands[0], DrawCommand::Line { width, .. } if *width == GRID_WIDTH));
        assert!(matches!(commands.last(), Some(DrawCommand::Label { text: "Z", .. })));
    }

    #[test]
    fn ripple_only_moves_points_while_auto_rotating() {
        let scene = scene("0 0 0", Topology::Lines);
        let mut view = bare_view(RenderMode::Points);
        view.time = 1.0;

        let still = transform_points(&scene, &view);
        view.auto_rotate = true;
        let moving = transform_points(&scene, &view);

        assert_ne!(still[1].rotated, moving[1].rotated);
        let mut view_flat = bare_view(RenderMode::Points);
        view_flat.angle_x = 0.0;
        view_flat.angle_y = 0.0;
        view_flat.auto_rotate = true;
        view_flat.time = 1.0;
        let flat = transform_points(&scene, &view_flat);
        let expected = (1.0_f32 + 0.1).sin() * 0.5;
        assert!((flat[1].rotated.z - expected).abs() < 1e-6);
    }
}
