use std::cmp::Reverse;

use egui::{Color32, Mesh, Pos2, Rect, Shape, Stroke};
use glam::{Vec2, Vec3};

use crate::controller::{Interaction, Session};
use crate::model::world::Face;
use crate::model::{Block, BlockKind, Camera, Player, WorldStore};
use crate::utils::WorldCoord;

const SKY_TOP: Color32 = Color32::from_rgb(0x87, 0xCE, 0xEB);
const SKY_BOTTOM: Color32 = Color32::from_rgb(0xE0, 0xF4, 0xFF);

const EDGE_STROKE: Stroke = Stroke { width: 1.0, color: Color32::from_rgba_premultiplied(0, 0, 0, 51) };
const TARGET_STROKE: Stroke = Stroke { width: 2.0, color: Color32::YELLOW };
const CRACK_STROKE: Stroke = Stroke { width: 1.5, color: Color32::from_rgb(0x1F, 0x29, 0x37) };

/// Progress covered by one crack stroke
const PROGRESS_PER_CRACK: u8 = 20;

// avatar glyph, in screen pixels
const AVATAR_BODY: Vec2 = Vec2::new(12.0, 22.0);
const AVATAR_HEAD_RADIUS: f32 = 7.0;
const AVATAR_BODY_COLOR: Color32 = Color32::from_rgb(0x3B, 0x82, 0xF6);
const AVATAR_HEAD_COLOR: Color32 = Color32::from_rgb(0xF5, 0xD0, 0xA9);
/// Bottom of the avatar's cell, level with the top face of the block below
const AVATAR_FEET: Vec3 = Vec3::new(0.0, -0.5, 0.0);

/// Everything a repaint reads, borrowed from one session so the snapshot is consistent
#[derive(Clone, Copy)]
pub struct RenderScene<'a> {
    pub world: &'a WorldStore,
    pub player: &'a Player,
    pub camera: &'a Camera,
    pub interaction: &'a Interaction,
}

impl<'a> From<&'a Session> for RenderScene<'a> {
    fn from(session: &'a Session) -> Self {
        Self {
            world: session.world(),
            player: session.player(),
            camera: session.camera(),
            interaction: session.interaction(),
        }
    }
}

/// One painted picture, in paint order
pub struct Frame {
    pub shapes: Vec<Shape>,
    /// Block positions in the order they were painted
    pub draw_order: Vec<WorldCoord>,
}

/// One projected face of a block
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceQuad {
    pub face: Face,
    pub points: [Pos2; 4],
}

/// Painter's-algorithm renderer producing egui shapes
pub struct IsoRenderer {
    /// Jitter source for crack strokes
    rng: fastrand::Rng,
    pub base_scale: f32,
}

impl IsoRenderer {
    pub fn new(base_scale: f32) -> Self {
        Self {
            rng: fastrand::Rng::new(),
            base_scale,
        }
    }

    pub fn with_seed(base_scale: f32, seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            base_scale,
        }
    }

    /// Paint the whole scene into `viewport`, avatar centred
    pub fn render(&mut self, scene: RenderScene<'_>, viewport: Rect) -> Frame {
        let origin = Vec2::new(viewport.center().x, viewport.center().y);
        let scale = scene.camera.pixel_scale(self.base_scale);

        let blocks = draw_order(scene.world, &scene.player.pos);
        let mut shapes = Vec::with_capacity(blocks.len() * 3 + 3);
        shapes.push(sky(viewport));

        for block in &blocks {
            let rel = block.pos.relative_to(&scene.player.pos);
            let faces = project_faces(scene.camera, block.kind, rel, origin, scale);
            let progress = scene.interaction.progress_at(&block.pos);
            let opacity = progress.map_or(1.0, |p| 1.0 - p.min(100) as f32 / 100.0);

            for quad in &faces {
                let [r, g, b] = block.kind.face_rgb(quad.face);
                let fill = Color32::from_rgb(r, g, b).gamma_multiply(opacity);
                shapes.push(Shape::convex_polygon(quad.points.to_vec(), fill, EDGE_STROKE));
            }

            if scene.interaction.target() == Some(block.pos) {
                for quad in &faces {
                    shapes.push(Shape::closed_line(quad.points.to_vec(), TARGET_STROKE));
                }
            }

            if let (Some(progress), Some(top)) = (progress, faces.first()) {
                self.paint_cracks(&mut shapes, top, progress);
            }
        }

        // avatar is the camera anchor, always painted last
        let feet = scene.camera.project(AVATAR_FEET, origin, scale);
        shapes.extend(avatar(Pos2::new(feet.x, feet.y)));

        Frame {
            shapes,
            draw_order: blocks.into_iter().map(|b| b.pos).collect(),
        }
    }

    fn paint_cracks(&mut self, shapes: &mut Vec<Shape>, top: &FaceQuad, progress: u8) {
        for _ in 0..progress / PROGRESS_PER_CRACK {
            let from = point_within(top, self.rng.f32(), self.rng.f32());
            let to = point_within(top, self.rng.f32(), self.rng.f32());
            shapes.push(Shape::line_segment([from, to], CRACK_STROKE));
        }
    }
}

impl Default for IsoRenderer {
    fn default() -> Self {
        Self::new(25.0)
    }
}

/// All blocks, farthest from `anchor` first. Ties keep store order.
pub fn draw_order(world: &WorldStore, anchor: &WorldCoord) -> Vec<Block> {
    let mut blocks: Vec<Block> = world.all().collect();
    blocks.sort_by_key(|b| Reverse(b.pos.squared_distance(anchor)));
    blocks
}

/// Project the visible faces of a unit cube centred at `rel`: the top first,
/// then the two side faces turned most towards the viewer. Flat kinds only get the top.
pub fn project_faces(camera: &Camera, kind: BlockKind, rel: Vec3, origin: Vec2, scale: f32) -> Vec<FaceQuad> {
    let corner = |dx: f32, dy: f32, dz: f32| {
        let p = camera.project(rel + Vec3::new(dx, dy, dz), origin, scale);
        Pos2::new(p.x, p.y)
    };

    let top = FaceQuad {
        face: Face::Top,
        points: [
            corner(-0.5, 0.5, -0.5),
            corner(0.5, 0.5, -0.5),
            corner(0.5, 0.5, 0.5),
            corner(-0.5, 0.5, 0.5),
        ],
    };
    if kind.is_flat() {
        return vec![top];
    }

    // side normals on the ground plane; negative rotated z faces the viewer
    let mut sides = [(1.0f32, 0.0f32), (-1.0, 0.0), (0.0, 1.0), (0.0, -1.0)].map(|(nx, nz)| {
        let (rx, rz) = camera.rotate(nx, nz);
        (nx, nz, rx, rz)
    });
    sides.sort_by(|a, b| a.3.total_cmp(&b.3));
    let (mut left, mut right) = (sides[0], sides[1]);
    if right.2 < left.2 {
        std::mem::swap(&mut left, &mut right);
    }

    let side = |face: Face, (nx, nz, _, _): (f32, f32, f32, f32)| {
        let (cx, cz) = (nx * 0.5, nz * 0.5);
        // edge direction along the face, perpendicular to its normal
        let (ex, ez) = (-nz * 0.5, nx * 0.5);
        FaceQuad {
            face,
            points: [
                corner(cx - ex, -0.5, cz - ez),
                corner(cx + ex, -0.5, cz + ez),
                corner(cx + ex, 0.5, cz + ez),
                corner(cx - ex, 0.5, cz - ez),
            ],
        }
    };

    vec![top, side(Face::Left, left), side(Face::Right, right)]
}

/// Bilinear point inside a quad, `u` and `v` in [0, 1]
fn point_within(quad: &FaceQuad, u: f32, v: f32) -> Pos2 {
    let [a, b, c, d] = quad.points;
    let near = a.lerp(b, u);
    let far = d.lerp(c, u);
    near.lerp(far, v)
}

fn sky(viewport: Rect) -> Shape {
    let mut mesh = Mesh::default();
    mesh.colored_vertex(viewport.left_top(), SKY_TOP);
    mesh.colored_vertex(viewport.right_top(), SKY_TOP);
    mesh.colored_vertex(viewport.right_bottom(), SKY_BOTTOM);
    mesh.colored_vertex(viewport.left_bottom(), SKY_BOTTOM);
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    Shape::mesh(mesh)
}

/// Body and head, feet on `feet`
fn avatar(feet: Pos2) -> [Shape; 2] {
    let body = Rect::from_min_max(
        Pos2::new(feet.x - AVATAR_BODY.x / 2.0, feet.y - AVATAR_BODY.y),
        Pos2::new(feet.x + AVATAR_BODY.x / 2.0, feet.y),
    );
    let head = Pos2::new(feet.x, body.top() - AVATAR_HEAD_RADIUS);
    [
        Shape::rect_filled(body, 2.0, AVATAR_BODY_COLOR),
        Shape::circle_filled(head, AVATAR_HEAD_RADIUS, AVATAR_HEAD_COLOR),
    ]
}
