//! Closest point on a triangle.

use nalgebra::{Point3, Vector3};

use crate::mesh::{FaceId, VertexId};

/// Which part of a triangle a closest point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    /// One of the corners.
    Vertex(VertexId),
    /// The interior of the edge between two corners.
    Edge(VertexId, VertexId),
    /// The interior of the face.
    Face,
}

/// Nearest point of the surface to a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPoint {
    /// Triangle the point lies on.
    pub triangle: FaceId,
    /// Corner, edge or face of that triangle.
    pub feature: Feature,
    /// The point itself.
    pub point: Point3<f32>,
    /// Unsigned distance from the query point.
    pub distance: f32,
}

/// Closest point of triangle `triangle` (corners `ids` at `verts`) to `p`.
pub(crate) fn closest_on_triangle(
    p: &Point3<f32>,
    triangle: FaceId,
    ids: [VertexId; 3],
    verts: &[Point3<f32>; 3],
) -> ClosestPoint {
    let (feature, point) = match plane_basis(verts) {
        Some((xhat, yhat)) => closest_in_plane(p, ids, verts, &xhat, &yhat),
        None => closest_on_edges(p, ids, verts),
    };
    ClosestPoint {
        triangle,
        feature,
        point,
        distance: (p - point).norm(),
    }
}

/// Orthonormal basis of the triangle's plane, `None` for (nearly) degenerate triangles.
fn plane_basis(verts: &[Point3<f32>; 3]) -> Option<(Vector3<f32>, Vector3<f32>)> {
    let v10 = verts[1] - verts[0];
    let v20 = verts[2] - verts[0];
    let xlen = v10.norm();
    if !(xlen > 0.0) {
        return None;
    }
    let xhat = v10 / xlen;
    let y = v20 - xhat * xhat.dot(&v20);
    let ylen = y.norm();
    if !(ylen > 0.0) {
        return None;
    }
    let yhat = y / ylen;
    if xhat.dot(&yhat).abs() > 0.01 || !yhat.iter().all(|c| c.is_finite()) {
        return None;
    }
    Some((xhat, yhat))
}

/// Best point over the three edges, used when the plane is unusable.
fn closest_on_edges(
    p: &Point3<f32>,
    ids: [VertexId; 3],
    verts: &[Point3<f32>; 3],
) -> (Feature, Point3<f32>) {
    let mut best: Option<(f32, Feature, Point3<f32>)> = None;
    for (i, j) in [(0, 2), (1, 0), (2, 1)] {
        let edge = verts[j] - verts[i];
        let length = edge.norm();
        let (feature, point) = if length > 0.0 {
            let dir = edge / length;
            let t = dir.dot(&(p - verts[i]));
            if t <= 0.0 {
                (Feature::Vertex(ids[i]), verts[i])
            } else if t >= length {
                (Feature::Vertex(ids[j]), verts[j])
            } else {
                (Feature::Edge(ids[i], ids[j]), verts[i] + dir * t)
            }
        } else {
            (Feature::Vertex(ids[i]), verts[i])
        };
        let d2 = (p - point).norm_squared();
        if best.as_ref().map_or(true, |b| d2 < b.0) {
            best = Some((d2, feature, point));
        }
    }
    match best {
        Some((_, feature, point)) => (feature, point),
        None => (Feature::Vertex(ids[0]), verts[0]),
    }
}

/// Project into the plane and walk the edges with their inward normals.
///
/// Being outside one edge in its interior settles it. Being outside at an
/// endpoint may still be beaten by another edge, so a second outside edge
/// is checked before giving up.
fn closest_in_plane(
    p: &Point3<f32>,
    ids: [VertexId; 3],
    verts: &[Point3<f32>; 3],
    xhat: &Vector3<f32>,
    yhat: &Vector3<f32>,
) -> (Feature, Point3<f32>) {
    let origin = verts[0];
    let flat = |q: &Point3<f32>| {
        let d = q - origin;
        [xhat.dot(&d), yhat.dot(&d)]
    };
    let lift = |xy: [f32; 2]| origin + xhat * xy[0] + yhat * xy[1];
    let xy = [flat(&verts[0]), flat(&verts[1]), flat(&verts[2])];
    let pp = flat(p);

    let mut corner: Option<(f32, usize)> = None;
    for (i, j, k) in [(0, 2, 1), (1, 0, 2), (2, 1, 0)] {
        let edge = [xy[j][0] - xy[i][0], xy[j][1] - xy[i][1]];
        let diff = [pp[0] - xy[i][0], pp[1] - xy[i][1]];
        let mut inward = [xy[k][0] - xy[i][0], xy[k][1] - xy[i][1]];
        let length = edge[0].hypot(edge[1]);
        if length == 0.0 {
            if diff[0] * inward[0] + diff[1] * inward[1] < 0.0 {
                return (Feature::Vertex(ids[i]), verts[i]);
            }
            continue;
        }
        let dir = [edge[0] / length, edge[1] / length];
        let along = inward[0] * dir[0] + inward[1] * dir[1];
        inward[0] -= along * dir[0];
        inward[1] -= along * dir[1];
        if diff[0] * inward[0] + diff[1] * inward[1] >= 0.0 {
            continue;
        }

        let t = diff[0] * dir[0] + diff[1] * dir[1];
        let end = if t <= 0.0 {
            i
        } else if t >= length {
            j
        } else {
            let on_edge = [xy[i][0] + dir[0] * t, xy[i][1] + dir[1] * t];
            return (Feature::Edge(ids[i], ids[j]), lift(on_edge));
        };
        let d2 = (pp[0] - xy[end][0]).powi(2) + (pp[1] - xy[end][1]).powi(2);
        match corner {
            None => corner = Some((d2, end)),
            Some((best, _)) => {
                if d2 < best {
                    corner = Some((d2, end));
                }
                break;
            }
        }
    }

    match corner {
        Some((_, v)) => (Feature::Vertex(ids[v]), verts[v]),
        None => (Feature::Face, lift(pp)),
    }
}

/// Barycentric coordinates of `point` (assumed in the plane of `verts`) by
/// projection onto the two edges from `verts[0]`, clamped to be non-negative.
pub(crate) fn face_weights(point: &Point3<f32>, verts: &[Point3<f32>; 3]) -> [f32; 3] {
    let e1 = verts[1] - verts[0];
    let e2 = verts[2] - verts[0];
    let ep = point - verts[0];
    let d00 = e1.dot(&e1);
    let d01 = e1.dot(&e2);
    let d11 = e2.dot(&e2);
    let d20 = ep.dot(&e1);
    let d21 = ep.dot(&e2);
    let denom = d00 * d11 - d01 * d01;
    if !(denom > 0.0) {
        return [1.0, 0.0, 0.0];
    }
    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    normalized([1.0 - v - w, v, w])
}

/// Weights of `a` and `b` for `point` on the segment between them.
pub(crate) fn edge_weights(point: &Point3<f32>, a: &Point3<f32>, b: &Point3<f32>) -> [f32; 2] {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if !(len2 > 0.0) {
        return [1.0, 0.0];
    }
    let t = ab.dot(&(point - a)) / len2;
    let [wa, wb, _] = normalized([1.0 - t, t, 0.0]);
    [wa, wb]
}

fn normalized(mut w: [f32; 3]) -> [f32; 3] {
    for x in &mut w {
        *x = x.max(0.0);
    }
    let sum: f32 = w.iter().sum();
    if sum > 0.0 {
        for x in &mut w {
            *x /= sum;
        }
    }
    w
}
