use ec_core::{Point3f, Result, select_labeled, unique_points};
use ec_graph::{EdgeGraph, build_edge_graph};
use ec_sample::{random_cap, sample_with_rng};
use rand::Rng;
use tracing::info;

use crate::classify::EdgeClassifier;
use crate::config::PipelineConfig;

/// Per-stage point counts of one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub raw: usize,
    pub unique: usize,
    pub capped: usize,
    pub classified_edge: usize,
    pub edge_points: usize,
    pub edges: usize,
}

/// Edge points and the graph built over them.
///
/// `graph` indices refer to `edge_points` and nothing else.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub edge_points: Vec<Point3f>,
    pub graph: EdgeGraph,
    pub stats: PipelineStats,
}

impl PipelineOutput {
    pub fn segments(&self) -> Result<Vec<(Point3f, Point3f)>> {
        self.graph.segments(&self.edge_points)
    }
}

/// Raw cloud to edge graph.
///
/// Stages: exact dedup, random cap to `max_raw_points`, classification,
/// edge-point selection, dedup again, optional voxel normalisation, graph
/// build. The config is validated before any stage runs.
pub fn run_pipeline<C, R>(
    raw: &[Point3f],
    classifier: &mut C,
    cfg: &PipelineConfig,
    rng: &mut R,
) -> Result<PipelineOutput>
where
    C: EdgeClassifier + ?Sized,
    R: Rng + ?Sized,
{
    cfg.validate()?;

    let mut stats = PipelineStats {
        raw: raw.len(),
        ..PipelineStats::default()
    };

    let points = unique_points(raw)?;
    stats.unique = points.len();
    info!(raw = stats.raw, unique = stats.unique, "deduplicated cloud");

    let points = random_cap(&points, cfg.max_raw_points, rng)?;
    stats.capped = points.len();
    if stats.capped < stats.unique {
        info!(
            capped = stats.capped,
            max = cfg.max_raw_points,
            "cloud over cap, randomly sampled"
        );
    }

    let labels = classifier.classify(&points)?;
    let edge_points = select_labeled(&points, &labels)?;
    stats.classified_edge = edge_points.len();

    let mut edge_points = unique_points(&edge_points)?;
    if cfg.downsample_edges {
        edge_points = sample_with_rng(
            &edge_points,
            cfg.sample.voxel_size,
            cfg.sample.max_points,
            rng,
        )?;
    }
    stats.edge_points = edge_points.len();
    info!(
        classified = stats.classified_edge,
        edge_points = stats.edge_points,
        "edge points selected"
    );

    let graph = build_edge_graph(&edge_points, cfg.graph.k, cfg.graph.max_dist_factor)?;
    stats.edges = graph.len();
    info!(
        edges = stats.edges,
        max_dist = graph.max_dist().unwrap_or(f32::INFINITY),
        "edge graph built"
    );

    Ok(PipelineOutput {
        edge_points,
        graph,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use ec_core::{Error, Point3f};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::{LabelLookup, PipelineConfig, run_pipeline};

    /// Two unit squares of corners, one at z = 0 (edge) and one at z = 5
    /// (interior), each listed twice.
    fn cloud() -> (Vec<Point3f>, Vec<bool>) {
        let mut pts = Vec::new();
        let mut labels = Vec::new();
        for _ in 0..2 {
            for (z, is_edge) in [(0.0, true), (5.0, false)] {
                for (x, y) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
                    pts.push(Point3f::new(x, y, z));
                    labels.push(is_edge);
                }
            }
        }
        (pts, labels)
    }

    #[test]
    fn square_of_edge_points_becomes_a_cycle() {
        let (pts, labels) = cloud();
        let mut lookup = LabelLookup::new(&pts, &labels).expect("aligned");
        let mut cfg = PipelineConfig::default();
        cfg.graph.max_dist_factor = 1.5;

        let out = run_pipeline(&pts, &mut lookup, &cfg, &mut StdRng::seed_from_u64(0))
            .expect("valid run");

        assert_eq!(out.stats.raw, 16);
        assert_eq!(out.stats.unique, 8);
        assert_eq!(out.stats.capped, 8);
        assert_eq!(out.stats.edge_points, 4);
        assert_eq!(out.graph.len(), 4);
        assert!(out.edge_points.iter().all(|p| p.z == 0.0));
        assert!(out.graph.degrees().iter().all(|&d| d == 2));

        for (a, b) in out.segments().expect("same set") {
            assert!((a.distance(b) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn raw_cap_is_applied_before_classification() {
        let (pts, labels) = cloud();
        let mut lookup = LabelLookup::new(&pts, &labels).expect("aligned");
        let cfg = PipelineConfig {
            max_raw_points: 3,
            ..PipelineConfig::default()
        };

        let out = run_pipeline(&pts, &mut lookup, &cfg, &mut StdRng::seed_from_u64(2))
            .expect("valid run");
        assert_eq!(out.stats.capped, 3);
        assert!(out.stats.edge_points <= 3);
    }

    #[test]
    fn classifier_length_is_checked() {
        let (pts, _) = cloud();
        let mut broken = |_: &[Point3f]| -> ec_core::Result<Vec<bool>> { Ok(vec![true]) };

        let err = run_pipeline(
            &pts,
            &mut broken,
            &PipelineConfig::default(),
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap_err();
        assert!(matches!(err, Error::SizeMismatch { .. }));
    }

    #[test]
    fn invalid_config_fails_before_classification() {
        let (pts, _) = cloud();
        let mut calls = 0;
        let mut counting = |p: &[Point3f]| -> ec_core::Result<Vec<bool>> {
            calls += 1;
            Ok(vec![true; p.len()])
        };
        let mut cfg = PipelineConfig::default();
        cfg.graph.k = 0;

        assert!(run_pipeline(&pts, &mut counting, &cfg, &mut StdRng::seed_from_u64(0)).is_err());
        assert_eq!(calls, 0);
    }

    #[test]
    fn edge_downsampling_bounds_edge_points() {
        let pts: Vec<Point3f> = (0..200)
            .map(|i| Point3f::new(i as f32 * 0.01, 0.0, 0.0))
            .collect();
        let mut all_edges = |p: &[Point3f]| -> ec_core::Result<Vec<bool>> { Ok(vec![true; p.len()]) };
        let mut cfg = PipelineConfig::default();
        cfg.downsample_edges = true;
        cfg.sample.voxel_size = 0.1;

        let out = run_pipeline(&pts, &mut all_edges, &cfg, &mut StdRng::seed_from_u64(0))
            .expect("valid run");
        assert_eq!(out.stats.edge_points, 20);
        assert_eq!(out.graph.num_points(), 20);
    }
}
