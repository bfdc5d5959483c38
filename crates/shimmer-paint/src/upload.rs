use bytemuck::{Pod, Zeroable};

use crate::display_list::{Command, DisplayList};
use crate::error::{PaintError, Result};
use crate::scene::{BlendMode, Brush, Rect, RoundedRect, Transform2D};

const ELLIPSE_SEGMENTS: usize = 32;
const CORNER_SEGMENTS: usize = 8;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 2],
    pub color: [f32; 4],
    pub z_index: f32,
}

/// A run of indices that share one compositing mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Batch {
    pub blend: BlendMode,
    /// Layer nesting depth the batch was recorded at (0 = root).
    pub depth: usize,
    pub first_index: u32,
    pub index_count: u32,
}

/// CPU-side geometry ready for upload with `bytemuck::cast_slice`.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
    pub batches: Vec<Batch>,
}

impl Mesh {
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Index of the next vertex, provided `count` more still fit in 16-bit indices.
    fn reserve(&self, count: usize) -> Result<u16> {
        const LIMIT: usize = u16::MAX as usize + 1;
        if self.vertices.len() + count > LIMIT {
            return Err(PaintError::MeshTooLarge(LIMIT));
        }
        u16::try_from(self.vertices.len()).map_err(|_| PaintError::MeshTooLarge(LIMIT))
    }

    fn push_batch(&mut self, blend: BlendMode, depth: usize, first_index: usize) {
        let count = self.indices.len() - first_index;
        if count == 0 {
            return;
        }
        // Merge with the previous batch when nothing changed in between.
        if let Some(last) = self.batches.last_mut() {
            if last.blend == blend
                && last.depth == depth
                && (last.first_index + last.index_count) as usize == first_index
            {
                last.index_count += count as u32;
                return;
            }
        }
        self.batches.push(Batch {
            blend,
            depth,
            first_index: first_index as u32,
            index_count: count as u32,
        });
    }
}

fn vertex(p: [f32; 2], brush: &Brush, t: Transform2D, z: f32) -> Vertex {
    Vertex {
        pos: t.apply(p),
        color: brush.color_at(p).to_array(),
        z_index: z,
    }
}

/// Push a convex polygon as a triangle fan around its first corner.
fn push_polygon(mesh: &mut Mesh, poly: &[[f32; 2]], brush: &Brush, t: Transform2D, z: f32) -> Result<()> {
    if poly.len() < 3 {
        return Ok(());
    }
    let base = mesh.reserve(poly.len())?;
    for p in poly {
        mesh.vertices.push(vertex(*p, brush, t, z));
    }
    for i in 1..poly.len() as u16 - 1 {
        mesh.indices.extend_from_slice(&[base, base + i, base + i + 1]);
    }
    Ok(())
}

/// Keep the part of a convex polygon where `dist >= 0`.
fn clip_polygon(poly: &[[f32; 2]], dist: impl Fn([f32; 2]) -> f32) -> Vec<[f32; 2]> {
    let mut out = Vec::with_capacity(poly.len() + 2);
    for (i, &p) in poly.iter().enumerate() {
        let q = poly[(i + 1) % poly.len()];
        let (dp, dq) = (dist(p), dist(q));
        if dp >= 0.0 {
            out.push(p);
        }
        if (dp > 0.0 && dq < 0.0) || (dp < 0.0 && dq > 0.0) {
            let s = dp / (dp - dq);
            out.push([p[0] + (q[0] - p[0]) * s, p[1] + (q[1] - p[1]) * s]);
        }
    }
    out
}

fn push_rect(mesh: &mut Mesh, rect: Rect, brush: &Brush, t: Transform2D, z: f32) -> Result<()> {
    let (x0, y0) = (rect.x, rect.y);
    let (x1, y1) = (rect.x + rect.w, rect.y + rect.h);
    let quad = [[x0, y0], [x1, y0], [x1, y1], [x0, y1]];

    let Brush::LinearGradient { start, end, stops } = brush else {
        return push_polygon(mesh, &quad, brush, t, z);
    };
    if stops.is_empty() {
        return Err(PaintError::EmptyGradient);
    }
    let axis = [end[0] - start[0], end[1] - start[1]];
    let len2 = axis[0] * axis[0] + axis[1] * axis[1];
    if len2 <= 0.0 {
        return push_polygon(mesh, &quad, brush, t, z);
    }

    // Cut the rect into bands perpendicular to the gradient axis at every
    // stop that falls inside it, so interior stops land on real vertices.
    let param = |p: [f32; 2]| ((p[0] - start[0]) * axis[0] + (p[1] - start[1]) * axis[1]) / len2;
    let (lo, hi) = quad
        .iter()
        .map(|p| param(*p))
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let mut cuts: Vec<f32> = stops
        .iter()
        .map(|(offset, _)| *offset)
        .filter(|offset| *offset > lo && *offset < hi)
        .collect();
    cuts.push(lo);
    cuts.push(hi);
    cuts.sort_by(|a, b| a.total_cmp(b));
    cuts.dedup_by(|a, b| (*a - *b).abs() < 1e-6);

    for pair in cuts.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let band = clip_polygon(&quad, |p| param(p) - from);
        let band = clip_polygon(&band, |p| to - param(p));
        push_polygon(mesh, &band, brush, t, z)?;
    }
    Ok(())
}

fn push_fan(mesh: &mut Mesh, center: [f32; 2], ring: &[[f32; 2]], brush: &Brush, t: Transform2D, z: f32) -> Result<()> {
    if let Brush::LinearGradient { stops, .. } = brush {
        if stops.is_empty() {
            return Err(PaintError::EmptyGradient);
        }
    }
    let base = mesh.reserve(1 + ring.len())?;
    mesh.vertices.push(vertex(center, brush, t, z));
    for p in ring {
        mesh.vertices.push(vertex(*p, brush, t, z));
    }
    let n = ring.len() as u16;
    for i in 0..n {
        mesh.indices
            .extend_from_slice(&[base, base + 1 + i, base + 1 + (i + 1) % n]);
    }
    Ok(())
}

fn ellipse_ring(center: [f32; 2], radii: [f32; 2]) -> Vec<[f32; 2]> {
    (0..ELLIPSE_SEGMENTS)
        .map(|i| {
            let a = i as f32 / ELLIPSE_SEGMENTS as f32 * std::f32::consts::TAU;
            [center[0] + radii[0] * a.cos(), center[1] + radii[1] * a.sin()]
        })
        .collect()
}

fn rounded_rect_ring(rrect: &RoundedRect) -> Vec<[f32; 2]> {
    let r = rrect.rect;
    let max = 0.5 * r.w.min(r.h);
    let radii = rrect.radii;
    // (corner centre, radius, start angle) clockwise from top-right.
    let corners = [
        ([r.x + r.w, r.y], radii.tr.clamp(0.0, max), -std::f32::consts::FRAC_PI_2, [-1.0, 1.0]),
        ([r.x + r.w, r.y + r.h], radii.br.clamp(0.0, max), 0.0, [-1.0, -1.0]),
        ([r.x, r.y + r.h], radii.bl.clamp(0.0, max), std::f32::consts::FRAC_PI_2, [1.0, -1.0]),
        ([r.x, r.y], radii.tl.clamp(0.0, max), std::f32::consts::PI, [1.0, 1.0]),
    ];
    let mut ring = Vec::with_capacity(4 * (CORNER_SEGMENTS + 1));
    for (corner, radius, start, inward) in corners {
        if radius <= 0.0 {
            ring.push(corner);
            continue;
        }
        let c = [corner[0] + inward[0] * radius, corner[1] + inward[1] * radius];
        for i in 0..=CORNER_SEGMENTS {
            let a = start + i as f32 / CORNER_SEGMENTS as f32 * std::f32::consts::FRAC_PI_2;
            ring.push([c[0] + radius * a.cos(), c[1] + radius * a.sin()]);
        }
    }
    ring
}

/// Flatten a display list into triangles, split into batches by blend mode.
///
/// Clips are recorded by the host backend itself and are not applied here.
pub fn tessellate(list: &DisplayList) -> Result<Mesh> {
    let mut mesh = Mesh::default();
    let mut blend_stack = vec![BlendMode::SrcOver];

    for cmd in &list.commands {
        let blend = blend_stack.last().copied().unwrap_or_default();
        let depth = blend_stack.len() - 1;
        let first_index = mesh.indices.len();
        match cmd {
            Command::DrawRect { rect, brush, z, transform } => {
                push_rect(&mut mesh, *rect, brush, *transform, *z as f32)?;
            }
            Command::DrawRoundedRect { rrect, brush, z, transform } => {
                let ring = rounded_rect_ring(rrect);
                push_fan(&mut mesh, rrect.rect.center(), &ring, brush, *transform, *z as f32)?;
            }
            Command::DrawEllipse { center, radii, brush, z, transform } => {
                let ring = ellipse_ring(*center, *radii);
                push_fan(&mut mesh, *center, &ring, brush, *transform, *z as f32)?;
            }
            Command::PushLayer { blend } => blend_stack.push(*blend),
            Command::PopLayer => {
                if blend_stack.len() <= 1 {
                    return Err(PaintError::Unbalanced("layer"));
                }
                let _ = blend_stack.pop();
            }
            Command::PushClip(_) | Command::PopClip | Command::PushTransform(_) | Command::PopTransform => {}
        }
        mesh.push_batch(blend, depth, first_index);
    }

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display_list::Viewport;
    use crate::painter::Painter;
    use crate::scene::{ColorLinPremul, RoundedRadii};

    fn grey() -> ColorLinPremul {
        ColorLinPremul { r: 0.5, g: 0.5, b: 0.5, a: 1.0 }
    }

    fn white() -> ColorLinPremul {
        ColorLinPremul { r: 1.0, g: 1.0, b: 1.0, a: 1.0 }
    }

    #[test]
    fn solid_rect_is_one_quad() {
        let mut p = Painter::begin_frame(Viewport { width: 10, height: 10 });
        p.rect(Rect::new(0.0, 0.0, 10.0, 10.0), Brush::Solid(grey()), 0);
        let mesh = tessellate(&p.finish().unwrap()).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
        assert_eq!(mesh.vertex_bytes().len(), 4 * std::mem::size_of::<Vertex>());
        assert_eq!(mesh.batches.len(), 1);
    }

    #[test]
    fn horizontal_gradient_splits_at_interior_stops() {
        let brush = Brush::LinearGradient {
            start: [0.0, 0.0],
            end: [100.0, 0.0],
            stops: vec![(0.0, grey()), (0.5, white()), (1.0, grey())],
        };
        let mut p = Painter::begin_frame(Viewport { width: 100, height: 10 });
        p.rect(Rect::new(0.0, 0.0, 100.0, 10.0), brush, 0);
        let mesh = tessellate(&p.finish().unwrap()).unwrap();

        assert_eq!(mesh.vertices.len(), 8);
        let peak = mesh.vertices.iter().find(|v| v.pos == [50.0, 0.0]).unwrap();
        assert_eq!(peak.color, white().to_array());
    }

    fn carries(mesh: &Mesh, color: ColorLinPremul) -> bool {
        let want = color.to_array();
        mesh.vertices
            .iter()
            .any(|v| v.color.iter().zip(want).all(|(a, b)| (a - b).abs() < 1e-4))
    }

    fn peak_brush(start: [f32; 2], end: [f32; 2]) -> Brush {
        Brush::LinearGradient {
            start,
            end,
            stops: vec![(0.0, grey()), (0.5, white()), (1.0, grey())],
        }
    }

    #[test]
    fn vertical_gradient_keeps_interior_stop() {
        let mut p = Painter::begin_frame(Viewport { width: 10, height: 100 });
        p.rect(Rect::new(0.0, 0.0, 10.0, 100.0), peak_brush([5.0, 0.0], [5.0, 100.0]), 0);
        let mesh = tessellate(&p.finish().unwrap()).unwrap();

        assert_eq!(mesh.vertices.len(), 8);
        assert!(carries(&mesh, white()));
        let peak = mesh.vertices.iter().find(|v| v.pos == [10.0, 50.0]).unwrap();
        assert_eq!(peak.color, white().to_array());
    }

    #[test]
    fn slanted_gradient_keeps_interior_stop() {
        let (s, c) = 30f32.to_radians().sin_cos();
        let center = [50.0, 50.0];
        let start = [center[0] - 50.0 * c, center[1] - 50.0 * s];
        let end = [center[0] + 50.0 * c, center[1] + 50.0 * s];
        let mut p = Painter::begin_frame(Viewport { width: 100, height: 100 });
        p.rect(Rect::new(0.0, 0.0, 100.0, 100.0), peak_brush(start, end), 0);
        let mesh = tessellate(&p.finish().unwrap()).unwrap();

        assert!(mesh.vertices.len() > 4);
        assert!(carries(&mesh, white()), "highlight missing from slanted band");
        // Every triangle's area adds back up to the rect.
        let area: f32 = mesh
            .indices
            .chunks(3)
            .map(|tri| {
                let [a, b, c] = [0, 1, 2].map(|k| mesh.vertices[tri[k] as usize].pos);
                ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])).abs() * 0.5
            })
            .sum();
        assert!((area - 10_000.0).abs() < 0.5, "{area}");
    }

    #[test]
    fn mesh_rejects_vertices_past_u16_range() {
        let record = |rects: usize| {
            let mut p = Painter::begin_frame(Viewport::default());
            p.circle([5.0, 5.0], 5.0, Brush::Solid(grey()), 0);
            for _ in 0..rects {
                p.rect(Rect::new(0.0, 0.0, 1.0, 1.0), Brush::Solid(grey()), 0);
            }
            p.finish().unwrap()
        };

        // 33 fan vertices + 16 375 quads = 65 533, the last that fits.
        let mesh = tessellate(&record(16_375)).unwrap();
        assert_eq!(mesh.vertices.len(), 65_533);
        assert_eq!(mesh.indices.iter().copied().max(), Some(65_532));

        assert_eq!(
            tessellate(&record(16_376)).unwrap_err(),
            PaintError::MeshTooLarge(65_536)
        );
    }

    #[test]
    fn layers_produce_separate_batches() {
        let mut p = Painter::begin_frame(Viewport { width: 10, height: 10 });
        p.push_layer(BlendMode::SrcOver);
        p.rect(Rect::new(0.0, 0.0, 10.0, 10.0), Brush::Solid(grey()), 0);
        p.push_layer(BlendMode::SrcIn);
        p.rect(Rect::new(0.0, 0.0, 10.0, 10.0), Brush::Solid(white()), 1);
        p.pop_layer().unwrap();
        p.pop_layer().unwrap();
        let mesh = tessellate(&p.finish().unwrap()).unwrap();

        assert_eq!(mesh.batches.len(), 2);
        assert_eq!(mesh.batches[0].blend, BlendMode::SrcOver);
        assert_eq!(mesh.batches[1].blend, BlendMode::SrcIn);
        assert_eq!(mesh.batches[1].depth, 2);
        assert_eq!(mesh.batches[1].first_index, 6);
    }

    #[test]
    fn rounded_rect_and_ellipse_become_fans() {
        let mut p = Painter::begin_frame(Viewport { width: 40, height: 40 });
        p.rounded_rect(
            RoundedRect { rect: Rect::new(0.0, 0.0, 40.0, 20.0), radii: RoundedRadii::uniform(4.0) },
            Brush::Solid(grey()),
            0,
        );
        p.circle([20.0, 20.0], 5.0, Brush::Solid(grey()), 0);
        let mesh = tessellate(&p.finish().unwrap()).unwrap();

        let rr_ring = 4 * (CORNER_SEGMENTS + 1);
        assert_eq!(mesh.vertices.len(), 1 + rr_ring + 1 + ELLIPSE_SEGMENTS);
        assert_eq!(mesh.indices.len(), 3 * (rr_ring + ELLIPSE_SEGMENTS));
    }

    #[test]
    fn empty_gradient_is_rejected() {
        let mut p = Painter::begin_frame(Viewport::default());
        p.rect(
            Rect::new(0.0, 0.0, 1.0, 1.0),
            Brush::LinearGradient { start: [0.0, 0.0], end: [0.0, 1.0], stops: vec![] },
            0,
        );
        assert_eq!(tessellate(&p.finish().unwrap()).unwrap_err(), PaintError::EmptyGradient);
    }
}
