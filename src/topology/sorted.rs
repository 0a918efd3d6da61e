//! Counter-clockwise ordering of a vertex's one-ring.

use crate::mesh::{EdgeId, FaceId, VertexId};

/// Order the links and tiles of `v` counter-clockwise around it.
///
/// Each incident triangle `(v, a, b)` contributes the step `a -> b`. The walk
/// starts at a boundary neighbour if there is one (a neighbour that no step
/// leads into) so open fans are traversed end to end. Anything the walk
/// cannot reach, such as a second fan at a non-manifold vertex, is appended
/// in its original order.
pub(super) fn counter_clockwise(
    v: VertexId,
    links: &[(VertexId, EdgeId)],
    tiles: &[FaceId],
    triangles: &[[VertexId; 3]],
) -> (Vec<(VertexId, EdgeId)>, Vec<FaceId>) {
    let steps: Vec<(VertexId, VertexId, FaceId)> = tiles
        .iter()
        .filter_map(|&t| {
            let tri = triangles[t.index()];
            let k = tri.iter().position(|&x| x == v)?;
            Some((tri[(k + 1) % 3], tri[(k + 2) % 3], t))
        })
        .collect();

    let start = steps
        .iter()
        .map(|s| s.0)
        .find(|&a| steps.iter().all(|s| s.1 != a))
        .or_else(|| steps.first().map(|s| s.0));

    let mut ring: Vec<VertexId> = Vec::with_capacity(links.len());
    let mut fan: Vec<FaceId> = Vec::with_capacity(tiles.len());
    let mut used = vec![false; steps.len()];

    if let Some(start) = start {
        ring.push(start);
        let mut current = start;
        while let Some(i) = (0..steps.len()).find(|&i| !used[i] && steps[i].0 == current) {
            used[i] = true;
            fan.push(steps[i].2);
            current = steps[i].1;
            if current == start || ring.contains(&current) {
                break;
            }
            ring.push(current);
        }
    }

    let mut sorted_links: Vec<(VertexId, EdgeId)> = ring
        .iter()
        .filter_map(|n| links.iter().find(|l| l.0 == *n).copied())
        .collect();
    for link in links {
        if !ring.contains(&link.0) {
            sorted_links.push(*link);
        }
    }
    for &t in tiles {
        if !fan.contains(&t) {
            fan.push(t);
        }
    }

    (sorted_links, fan)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[usize]) -> Vec<VertexId> {
        raw.iter().map(|&i| VertexId::new(i)).collect()
    }

    fn tri(a: usize, b: usize, c: usize) -> [VertexId; 3] {
        [VertexId::new(a), VertexId::new(b), VertexId::new(c)]
    }

    #[test]
    fn test_closed_fan() {
        // Vertex 0 surrounded by 1..=4 counter-clockwise
        let triangles = vec![tri(0, 1, 2), tri(0, 3, 4), tri(0, 2, 3), tri(0, 4, 1)];
        let links: Vec<_> = [3, 1, 4, 2]
            .iter()
            .enumerate()
            .map(|(e, &n)| (VertexId::new(n), EdgeId::new(e)))
            .collect();
        let tiles: Vec<_> = (0..4).map(FaceId::new).collect();

        let (sorted, fan) = counter_clockwise(VertexId::new(0), &links, &tiles, &triangles);
        let ring: Vec<_> = sorted.iter().map(|l| l.0).collect();

        // Any rotation of 1,2,3,4 is counter-clockwise
        let pos = ring.iter().position(|&n| n == VertexId::new(1)).unwrap();
        let rotated: Vec<_> = ring[pos..].iter().chain(&ring[..pos]).copied().collect();
        assert_eq!(rotated, ids(&[1, 2, 3, 4]));
        assert_eq!(fan.len(), 4);

        // Edges stay paired with their neighbours
        for (n, e) in sorted {
            assert_eq!(links.iter().find(|l| l.0 == n).unwrap().1, e);
        }
    }

    #[test]
    fn test_open_fan_starts_at_boundary() {
        // Half disk around 0: 1 -> 2 -> 3
        let triangles = vec![tri(0, 2, 3), tri(0, 1, 2)];
        let links: Vec<_> = [2, 3, 1]
            .iter()
            .enumerate()
            .map(|(e, &n)| (VertexId::new(n), EdgeId::new(e)))
            .collect();
        let tiles = vec![FaceId::new(0), FaceId::new(1)];

        let (sorted, fan) = counter_clockwise(VertexId::new(0), &links, &tiles, &triangles);
        let ring: Vec<_> = sorted.iter().map(|l| l.0).collect();
        assert_eq!(ring, ids(&[1, 2, 3]));
        assert_eq!(fan, vec![FaceId::new(1), FaceId::new(0)]);
    }
}
