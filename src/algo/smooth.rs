//! Geodesic Gaussian smoothing of per-vertex data.
//!
//! A [`SmoothingKernel`] precomputes, for every vertex, a sparse list of
//! `(vertex, weight)` pairs over its geodesic neighbourhood. Applying it to a
//! column of data is then a weighted average per vertex.
//!
//! # Methods
//!
//! - [`SmoothingMethod::GeoGauss`]: each vertex gathers from its neighbours
//!   with weight `exp(-d² / 2σ²)`.
//! - [`SmoothingMethod::GeoGaussArea`]: each vertex scatters its own area
//!   over its neighbours, weighted by the Gaussian times the receiving
//!   vertex's area; the scattered weights are then regrouped by receiver.
//!   The area-weighted integral of the data is preserved.
//! - [`SmoothingMethod::GeoGaussEqual`]: like `GeoGaussArea` without the area
//!   terms, so every vertex scatters a total weight of 1.
//!
//! Neighbourhoods reach `3σ`. When that finds too few vertices (σ smaller
//! than the mesh spacing), the direct mesh neighbours plus the vertex itself
//! are used instead.
//!
//! # Example
//!
//! ```
//! use sulcus::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let surface = build_from_triangles(&vertices, &[[0, 1, 2], [0, 2, 3]]).unwrap();
//!
//! let kernel = SmoothingKernel::new(&surface, &KernelOptions::default(), None).unwrap();
//! let data = Metric::from_values(vec![4.0, 0.0, 0.0, 0.0]);
//! let smoothed = kernel.smooth_column(&data, 0, None, false).unwrap();
//! assert!(smoothed[0] < 4.0 && smoothed[2] > 0.0);
//! ```

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use super::geodesic::{GeodesicBase, GeodesicQuery};
use crate::error::{MeshError, Result};
use crate::mesh::csr::Csr;
use crate::mesh::{Surface, VertexId};
use crate::metric::Metric;
use crate::topology::TopologyBase;

/// How kernel weights are normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmoothingMethod {
    /// Plain Gaussian gathered at each vertex.
    GeoGauss,
    /// Area-preserving Gaussian.
    #[default]
    GeoGaussArea,
    /// Gaussian where every vertex contributes equally.
    GeoGaussEqual,
}

/// Options for building a [`SmoothingKernel`].
#[derive(Debug, Clone)]
pub struct KernelOptions {
    /// Gaussian standard deviation, in surface units.
    pub sigma: f32,

    /// Normalization scheme.
    pub method: SmoothingMethod,

    /// Per-vertex areas to use instead of the surface's own.
    ///
    /// They also rescale the geodesic distances (see
    /// [`GeodesicBase::with_corrected_areas`]).
    pub corrected_areas: Option<Vec<f32>>,

    /// Whether to use parallel execution (default: true).
    pub parallel: bool,
}

impl Default for KernelOptions {
    fn default() -> Self {
        Self {
            sigma: 1.0,
            method: SmoothingMethod::default(),
            corrected_areas: None,
            parallel: true,
        }
    }
}

impl KernelOptions {
    /// Create options with the specified sigma.
    pub fn with_sigma(mut self, sigma: f32) -> Self {
        self.sigma = sigma;
        self
    }

    /// Set the normalization method.
    pub fn with_method(mut self, method: SmoothingMethod) -> Self {
        self.method = method;
        self
    }

    /// Use corrected vertex areas.
    pub fn with_corrected_areas(mut self, areas: Vec<f32>) -> Self {
        self.corrected_areas = Some(areas);
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// One entry of a kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelWeight {
    /// The vertex whose value is read.
    pub vertex: VertexId,
    /// Its weight.
    pub weight: f32,
}

/// Precomputed smoothing weights for every vertex of a surface.
#[derive(Debug, Clone)]
pub struct SmoothingKernel {
    method: SmoothingMethod,
    sigma: f32,
    parallel: bool,
    /// Row `i` is the gathering kernel of vertex `i`.
    kernels: Csr<KernelWeight>,
    weight_sums: Vec<f32>,
    roi: Option<Vec<bool>>,
}

/// Shared inputs of the per-vertex kernel computation.
struct KernelSetup<'a> {
    topology: &'a TopologyBase,
    areas: &'a [f32],
    roi: Option<&'a [bool]>,
    method: SmoothingMethod,
    radius: f32,
    gauss_denom: f32,
}

impl KernelSetup<'_> {
    #[inline]
    fn in_roi(&self, v: usize) -> bool {
        self.roi.map_or(true, |roi| roi[v])
    }

    /// Geodesic neighbourhood of `v`, or its one-ring plus itself when the
    /// search finds too few vertices.
    fn neighborhood(&self, query: &GeodesicQuery, v: VertexId) -> Result<(Vec<VertexId>, Vec<f32>)> {
        let found = query.distances_within_radius(v, self.radius, true)?;
        let ring = self.topology.neighbors(v);
        let sparse = match self.method {
            SmoothingMethod::GeoGauss => found.len() < 7,
            // The ring excludes `v`, so equal counts mean a neighbour is missing
            SmoothingMethod::GeoGaussArea | SmoothingMethod::GeoGaussEqual => {
                found.len() <= ring.len()
            }
        };
        if !sparse {
            return Ok((found.vertices, found.distances));
        }
        let mut nodes = ring.to_vec();
        nodes.push(v);
        let distances = query.distances_to_subset(v, &nodes, true)?;
        Ok((nodes, distances))
    }

    #[inline]
    fn gauss(&self, d: f32) -> f32 {
        (d * d * self.gauss_denom).exp()
    }

    /// Gathering kernel of `v` for [`SmoothingMethod::GeoGauss`].
    fn gather(&self, query: &GeodesicQuery, v: usize) -> Result<Vec<KernelWeight>> {
        if !self.in_roi(v) {
            return Ok(Vec::new());
        }
        let (nodes, distances) = self.neighborhood(query, VertexId::new(v))?;
        Ok(nodes
            .into_iter()
            .zip(distances)
            .filter(|(n, _)| self.in_roi(n.index()))
            .map(|(vertex, d)| KernelWeight {
                vertex,
                weight: self.gauss(d),
            })
            .collect())
    }

    /// Scattering kernel of `v` for the area and equal methods.
    ///
    /// The normalization runs over every target, the kept list only over
    /// targets inside the ROI, so vertices on the ROI border do not gain
    /// weight toward the inside.
    fn scatter(&self, query: &GeodesicQuery, v: usize) -> Result<Vec<KernelWeight>> {
        if !self.in_roi(v) {
            return Ok(Vec::new());
        }
        let by_area = self.method == SmoothingMethod::GeoGaussArea;
        let (nodes, distances) = self.neighborhood(query, VertexId::new(v))?;

        let mut total = 0.0f32;
        let mut kept = Vec::with_capacity(nodes.len());
        for (vertex, d) in nodes.into_iter().zip(distances) {
            let mut weight = self.gauss(d);
            if by_area {
                weight *= self.areas[vertex.index()];
            }
            total += weight;
            if self.in_roi(vertex.index()) {
                kept.push(KernelWeight { vertex, weight });
            }
        }

        let scale = if by_area { self.areas[v] } else { 1.0 };
        let factor = if total > 0.0 { scale / total } else { 0.0 };
        for entry in &mut kept {
            entry.weight *= factor;
        }
        Ok(kept)
    }
}

impl SmoothingKernel {
    /// Precompute the kernels of every vertex.
    ///
    /// With `roi`, only vertices with a positive ROI value get a kernel and
    /// kernels only read vertices inside the ROI.
    ///
    /// # Errors
    ///
    /// Fails if `sigma` is not a positive finite number, or if `roi` or the
    /// corrected areas do not have one entry per vertex.
    pub fn new(surface: &Surface, options: &KernelOptions, roi: Option<&[f32]>) -> Result<Self> {
        let sigma = options.sigma;
        if !(sigma > 0.0 && sigma.is_finite()) {
            return Err(MeshError::invalid_param(
                "sigma",
                sigma,
                "must be positive and finite",
            ));
        }
        let n = surface.num_vertices();
        let roi: Option<Vec<bool>> = match roi {
            Some(values) => {
                MeshError::check_length("roi", n, values.len())?;
                Some(values.iter().map(|&x| x > 0.0).collect())
            }
            None => None,
        };

        let start = Instant::now();
        let (base, areas) = match &options.corrected_areas {
            Some(corrected) => (
                Arc::new(GeodesicBase::with_corrected_areas(surface, corrected)?),
                corrected.clone(),
            ),
            None => (surface.geodesic_base(), surface.vertex_areas()),
        };
        let topology = surface.topology();
        let setup = KernelSetup {
            topology: &topology,
            areas: &areas,
            roi: roi.as_deref(),
            method: options.method,
            radius: 3.0 * sigma,
            gauss_denom: -0.5 / (sigma * sigma),
        };

        let per_vertex = |query: &GeodesicQuery, v: usize| match options.method {
            SmoothingMethod::GeoGauss => setup.gather(query, v),
            SmoothingMethod::GeoGaussArea | SmoothingMethod::GeoGaussEqual => {
                setup.scatter(query, v)
            }
        };
        let rows: Vec<Vec<KernelWeight>> = if options.parallel {
            (0..n)
                .into_par_iter()
                .map_init(
                    || GeodesicQuery::new(Arc::clone(&base)),
                    |query, v| per_vertex(&*query, v),
                )
                .collect::<Result<_>>()?
        } else {
            let query = GeodesicQuery::new(Arc::clone(&base));
            (0..n)
                .map(|v| per_vertex(&query, v))
                .collect::<Result<_>>()?
        };

        let kernels = match options.method {
            SmoothingMethod::GeoGauss => Csr::from_rows(rows),
            SmoothingMethod::GeoGaussArea | SmoothingMethod::GeoGaussEqual => {
                let transposed = to_gathering(n, &rows);
                debug!(entries = transposed.len(), "regrouped scattering kernels");
                transposed
            }
        };
        let weight_sums: Vec<f32> = (0..n)
            .map(|v| kernels.row(v).iter().map(|k| k.weight).sum())
            .collect();

        info!(
            vertices = n,
            method = ?options.method,
            sigma,
            entries = kernels.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "built smoothing kernels"
        );
        Ok(Self {
            method: options.method,
            sigma,
            parallel: options.parallel,
            kernels,
            weight_sums,
            roi,
        })
    }

    /// The normalization method.
    #[inline]
    pub fn method(&self) -> SmoothingMethod {
        self.method
    }

    /// The Gaussian sigma.
    #[inline]
    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.weight_sums.len()
    }

    /// Sum of each vertex's kernel weights.
    #[inline]
    pub fn weight_sums(&self) -> &[f32] {
        &self.weight_sums
    }

    /// The gathering kernel of `v`.
    #[inline]
    pub fn kernel(&self, v: VertexId) -> &[KernelWeight] {
        self.kernels.row(v.index())
    }

    /// Sum of all kernel weights.
    ///
    /// Without an ROI this is the surface area for
    /// [`SmoothingMethod::GeoGaussArea`] and the vertex count for
    /// [`SmoothingMethod::GeoGaussEqual`].
    pub fn total_weight(&self) -> f32 {
        self.weight_sums.iter().map(|&w| f64::from(w)).sum::<f64>() as f32
    }

    /// The ROI the kernels were built for, as an inclusion mask.
    pub fn roi(&self) -> Option<&[bool]> {
        self.roi.as_deref()
    }

    // ==================== Application ====================

    /// Smooth one column of `metric`.
    ///
    /// Each output value is the kernel-weighted average of the input. With
    /// `roi`, vertices outside it output 0 and inputs outside it are ignored.
    /// With `fix_zeros`, zero inputs are treated as missing data rather than
    /// as values.
    pub fn smooth_column(
        &self,
        metric: &Metric,
        column: usize,
        roi: Option<&[f32]>,
        fix_zeros: bool,
    ) -> Result<Vec<f32>> {
        MeshError::check_length("metric", self.num_vertices(), metric.num_vertices())?;
        let values = metric.column(column)?;
        let mask: Option<Vec<bool>> = match roi {
            Some(roi) => {
                MeshError::check_length("roi", self.num_vertices(), roi.len())?;
                Some(roi.iter().map(|&x| x > 0.0).collect())
            }
            None => None,
        };
        Ok(self.apply(values, mask.as_deref(), fix_zeros))
    }

    /// Smooth every column of `metric`, keeping the column names.
    pub fn smooth_metric(
        &self,
        metric: &Metric,
        roi: Option<&[f32]>,
        fix_zeros: bool,
    ) -> Result<Metric> {
        let mut out = Metric::new(self.num_vertices());
        for column in 0..metric.num_columns() {
            let smoothed = self.smooth_column(metric, column, roi, fix_zeros)?;
            out.add_column(metric.name(column)?, smoothed)?;
        }
        Ok(out)
    }

    fn apply(&self, values: &[f32], roi: Option<&[bool]>, fix_zeros: bool) -> Vec<f32> {
        let smooth_one = |v: usize| -> f32 {
            if roi.is_some_and(|roi| !roi[v]) || self.weight_sums[v] == 0.0 {
                return 0.0;
            }
            let kernel = self.kernels.row(v);
            if roi.is_none() && !fix_zeros {
                let sum: f32 = kernel
                    .iter()
                    .map(|k| k.weight * values[k.vertex.index()])
                    .sum();
                return sum / self.weight_sums[v];
            }

            let mut sum = 0.0f32;
            let mut weight_sum = 0.0f32;
            for k in kernel {
                let i = k.vertex.index();
                let value = values[i];
                if roi.is_some_and(|roi| !roi[i]) || (fix_zeros && value == 0.0) {
                    continue;
                }
                sum += k.weight * value;
                weight_sum += k.weight;
            }
            if weight_sum != 0.0 {
                sum / weight_sum
            } else {
                0.0
            }
        };

        if self.parallel {
            (0..self.num_vertices()).into_par_iter().map(smooth_one).collect()
        } else {
            (0..self.num_vertices()).map(smooth_one).collect()
        }
    }
}

/// Regroup scattering kernels by receiving vertex.
///
/// Entry `(target, w)` in row `source` becomes `(source, w)` in row `target`.
/// Rows of the result list their sources in increasing order.
fn to_gathering(n: usize, scatter: &[Vec<KernelWeight>]) -> Csr<KernelWeight> {
    let total = scatter.iter().map(Vec::len).sum();
    let mut entries = Vec::with_capacity(total);
    for (source, row) in scatter.iter().enumerate() {
        for k in row {
            entries.push((
                k.vertex.index(),
                KernelWeight {
                    vertex: VertexId::new(source),
                    weight: k.weight,
                },
            ));
        }
    }
    Csr::from_entries(n, &entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_triangles;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    const METHODS: [SmoothingMethod; 3] = [
        SmoothingMethod::GeoGauss,
        SmoothingMethod::GeoGaussArea,
        SmoothingMethod::GeoGaussEqual,
    ];

    fn create_grid(n: usize) -> Surface {
        let mut vertices = Vec::new();
        for j in 0..=n {
            for i in 0..=n {
                vertices.push(Point3::new(i as f32, j as f32, 0.0));
            }
        }
        let idx = |i: usize, j: usize| j * (n + 1) + i;
        let mut faces = Vec::new();
        for j in 0..n {
            for i in 0..n {
                faces.push([idx(i, j), idx(i + 1, j), idx(i + 1, j + 1)]);
                faces.push([idx(i, j), idx(i + 1, j + 1), idx(i, j + 1)]);
            }
        }
        build_from_triangles(&vertices, &faces).unwrap()
    }

    fn options(method: SmoothingMethod) -> KernelOptions {
        KernelOptions::default().with_sigma(1.0).with_method(method)
    }

    #[test]
    fn test_constant_field_is_unchanged() {
        let surface = create_grid(6);
        let data = Metric::from_values(vec![2.5; surface.num_vertices()]);
        for method in METHODS {
            let kernel = SmoothingKernel::new(&surface, &options(method), None).unwrap();
            let out = kernel.smooth_column(&data, 0, None, false).unwrap();
            for value in out {
                assert_relative_eq!(value, 2.5, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_area_method_preserves_integral() {
        let surface = create_grid(6);
        let kernel =
            SmoothingKernel::new(&surface, &options(SmoothingMethod::GeoGaussArea), None).unwrap();
        assert_relative_eq!(kernel.total_weight(), surface.surface_area(), epsilon = 1e-3);

        let areas = surface.vertex_areas();
        let values: Vec<f32> = (0..surface.num_vertices())
            .map(|v| ((v * 7) % 5) as f32)
            .collect();
        let out = kernel
            .smooth_column(&Metric::from_values(values.clone()), 0, None, false)
            .unwrap();

        // Each output carries the weight its kernel gathered
        let before: f32 = values.iter().zip(&areas).map(|(v, a)| v * a).sum();
        let after: f32 = out
            .iter()
            .zip(kernel.weight_sums())
            .map(|(v, w)| v * w)
            .sum();
        assert_relative_eq!(before, after, epsilon = 1e-2);
    }

    #[test]
    fn test_equal_method_scatters_unit_weight() {
        let surface = create_grid(5);
        let kernel =
            SmoothingKernel::new(&surface, &options(SmoothingMethod::GeoGaussEqual), None).unwrap();
        assert_relative_eq!(
            kernel.total_weight(),
            surface.num_vertices() as f32,
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_small_sigma_falls_back_to_ring() {
        let surface = create_grid(4);
        let topology = surface.topology();
        for method in METHODS {
            let kernel =
                SmoothingKernel::new(&surface, &options(method).with_sigma(0.1), None).unwrap();
            let v = VertexId::new(12);
            assert_eq!(kernel.kernel(v).len(), topology.num_neighbors(v) + 1);
            let center = kernel.kernel(v).iter().find(|k| k.vertex == v).unwrap();
            assert!(kernel.kernel(v).iter().all(|k| k.weight <= center.weight));
        }
    }

    #[test]
    fn test_roi_kernels_stay_inside() {
        let surface = create_grid(6);
        // Left half of the grid
        let roi: Vec<f32> = surface
            .coordinates()
            .iter()
            .map(|p| if p.x <= 3.0 { 1.0 } else { 0.0 })
            .collect();
        for method in METHODS {
            let kernel = SmoothingKernel::new(&surface, &options(method), Some(roi.as_slice())).unwrap();
            assert_eq!(kernel.roi().map(|r| r.len()), Some(surface.num_vertices()));
            for v in surface.vertex_ids() {
                if roi[v.index()] > 0.0 {
                    assert!(!kernel.kernel(v).is_empty());
                    assert!(kernel.kernel(v).iter().all(|k| roi[k.vertex.index()] > 0.0));
                } else {
                    assert!(kernel.kernel(v).is_empty());
                }
            }

            let data = Metric::from_values(vec![1.0; surface.num_vertices()]);
            let out = kernel.smooth_column(&data, 0, Some(roi.as_slice()), false).unwrap();
            for v in surface.vertex_ids() {
                let expected = if roi[v.index()] > 0.0 { 1.0 } else { 0.0 };
                assert_relative_eq!(out[v.index()], expected, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_roi_border_keeps_outside_mass() {
        let surface = create_grid(6);
        let roi: Vec<f32> = surface
            .coordinates()
            .iter()
            .map(|p| if p.x <= 3.0 { 1.0 } else { 0.0 })
            .collect();
        let full =
            SmoothingKernel::new(&surface, &options(SmoothingMethod::GeoGaussEqual), None).unwrap();
        let restricted =
            SmoothingKernel::new(&surface, &options(SmoothingMethod::GeoGaussEqual), Some(roi.as_slice()))
                .unwrap();
        // Inside the ROI the surviving weights are unchanged, not renormalized
        let v = VertexId::new(3 * 7 + 3);
        for k in restricted.kernel(v) {
            let same = full.kernel(v).iter().find(|f| f.vertex == k.vertex).unwrap();
            assert_relative_eq!(k.weight, same.weight, epsilon = 1e-6);
        }
        assert!(restricted.weight_sums()[v.index()] < full.weight_sums()[v.index()]);
    }

    #[test]
    fn test_fix_zeros_ignores_missing_data() {
        let surface = create_grid(4);
        let kernel =
            SmoothingKernel::new(&surface, &options(SmoothingMethod::GeoGauss), None).unwrap();
        let values: Vec<f32> = (0..surface.num_vertices())
            .map(|v| if v % 2 == 0 { 3.0 } else { 0.0 })
            .collect();
        let data = Metric::from_values(values);

        let fixed = kernel.smooth_column(&data, 0, None, true).unwrap();
        for value in &fixed {
            assert_relative_eq!(*value, 3.0, epsilon = 1e-5);
        }
        let plain = kernel.smooth_column(&data, 0, None, false).unwrap();
        assert!(plain.iter().all(|&v| v > 0.0 && v < 3.0));
    }

    #[test]
    fn test_smooth_metric_keeps_names() {
        let surface = create_grid(3);
        let kernel = SmoothingKernel::new(&surface, &KernelOptions::default(), None).unwrap();
        let mut metric = Metric::new(surface.num_vertices());
        metric.add_column("a", vec![1.0; 16]).unwrap();
        metric
            .add_column("b", (0..16).map(|v| v as f32).collect())
            .unwrap();

        let out = kernel.smooth_metric(&metric, None, false).unwrap();
        assert_eq!(out.num_columns(), 2);
        assert_eq!(out.names(), metric.names());
        assert_eq!(
            out.column(1).unwrap(),
            kernel.smooth_column(&metric, 1, None, false).unwrap().as_slice()
        );
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let surface = create_grid(5);
        for method in METHODS {
            let parallel = SmoothingKernel::new(&surface, &options(method), None).unwrap();
            let sequential =
                SmoothingKernel::new(&surface, &options(method).sequential(), None).unwrap();
            for v in surface.vertex_ids() {
                assert_eq!(parallel.kernel(v), sequential.kernel(v));
            }
        }
    }

    #[test]
    fn test_corrected_areas_scale_distances() {
        let surface = create_grid(4);
        // Four times the area everywhere doubles every distance
        let corrected: Vec<f32> = surface.vertex_areas().iter().map(|a| a * 4.0).collect();
        let plain = SmoothingKernel::new(&surface, &options(SmoothingMethod::GeoGauss), None).unwrap();
        let scaled = SmoothingKernel::new(
            &surface,
            &options(SmoothingMethod::GeoGauss).with_sigma(2.0).with_corrected_areas(corrected),
            None,
        )
        .unwrap();
        let v = VertexId::new(12);
        assert_eq!(plain.kernel(v).len(), scaled.kernel(v).len());
        for (a, b) in plain.kernel(v).iter().zip(scaled.kernel(v)) {
            assert_eq!(a.vertex, b.vertex);
            assert_relative_eq!(a.weight, b.weight, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_rejects_bad_arguments() {
        let surface = create_grid(2);
        for sigma in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let err = SmoothingKernel::new(&surface, &KernelOptions::default().with_sigma(sigma), None)
                .unwrap_err();
            assert!(matches!(err, MeshError::InvalidParameter { name: "sigma", .. }));
        }
        assert!(matches!(
            SmoothingKernel::new(&surface, &KernelOptions::default(), Some(&[1.0; 3][..])),
            Err(MeshError::LengthMismatch { .. })
        ));

        let kernel = SmoothingKernel::new(&surface, &KernelOptions::default(), None).unwrap();
        let data = Metric::from_values(vec![0.0; 9]);
        assert!(matches!(
            kernel.smooth_column(&data, 2, None, false),
            Err(MeshError::InvalidColumn { .. })
        ));
        let wrong = Metric::from_values(vec![0.0; 4]);
        assert!(kernel.smooth_column(&wrong, 0, None, false).is_err());
    }
}
