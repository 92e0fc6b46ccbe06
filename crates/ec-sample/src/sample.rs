use ec_core::{Point3f, Result, ensure_at_least, ensure_positive};
use rand::Rng;
use tracing::debug;

use crate::voxel::voxel_downsample;

/// Parameters for [`sample`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SampleConfig {
    pub voxel_size: f32,
    pub max_points: usize,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            voxel_size: 0.5,
            max_points: 50_000,
        }
    }
}

impl SampleConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("voxel_size", self.voxel_size)?;
        ensure_at_least("max_points", self.max_points, 1)
    }
}

/// Voxel downsample, then randomly thin the result to `max_points` if it is
/// still too large.
///
/// Uses the thread-local RNG, so repeated calls may differ. See
/// [`sample_with_rng`] to pin the random source.
pub fn sample(points: &[Point3f], voxel_size: f32, max_points: usize) -> Result<Vec<Point3f>> {
    sample_with_rng(points, voxel_size, max_points, &mut rand::thread_rng())
}

/// Same as [`sample`] with a caller-supplied random source.
///
/// Output length is at most `max_points` and at most `points.len()`.
pub fn sample_with_rng<R: Rng + ?Sized>(
    points: &[Point3f],
    voxel_size: f32,
    max_points: usize,
    rng: &mut R,
) -> Result<Vec<Point3f>> {
    ensure_positive("voxel_size", voxel_size)?;
    ensure_at_least("max_points", max_points, 1)?;

    let reduced = voxel_downsample(points, voxel_size)?;
    if reduced.len() <= max_points {
        return Ok(reduced);
    }

    debug!(
        voxels = reduced.len(),
        max_points, "voxel output over cap, falling back to random sampling"
    );
    random_cap(&reduced, max_points, rng)
}

/// Uniform sampling without replacement down to `max_points`.
///
/// Inputs already within the cap are returned unchanged. Survivors keep
/// their relative order from `points`.
pub fn random_cap<R: Rng + ?Sized>(
    points: &[Point3f],
    max_points: usize,
    rng: &mut R,
) -> Result<Vec<Point3f>> {
    ensure_at_least("max_points", max_points, 1)?;

    if points.len() <= max_points {
        return Ok(points.to_vec());
    }

    let mut picked = rand::seq::index::sample(rng, points.len(), max_points).into_vec();
    picked.sort_unstable();

    Ok(picked.into_iter().map(|i| points[i]).collect())
}

#[cfg(test)]
mod tests {
    use ec_core::{Error, Point3f};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::{SampleConfig, random_cap, sample, sample_with_rng};

    fn random_cube(n: usize, seed: u64) -> Vec<Point3f> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|_| Point3f::new(rng.r#gen(), rng.r#gen(), rng.r#gen()))
            .collect()
    }

    #[test]
    fn uniform_unit_cube_yields_at_most_eight_points() {
        let pts = random_cube(10_000, 7);
        let out = sample(&pts, 0.5, 1_000).expect("valid config");
        assert!(out.len() <= 8);
    }

    #[test]
    fn random_fallback_hits_cap_exactly() {
        let pts: Vec<Point3f> = (0..100)
            .map(|i| Point3f::new(i as f32 * 0.37, (i % 7) as f32, (i % 3) as f32 * 2.0))
            .collect();
        let mut rng = StdRng::seed_from_u64(42);

        let out = sample_with_rng(&pts, 1e-3, 10, &mut rng).expect("valid config");
        assert_eq!(out.len(), 10);
        for p in &out {
            assert!(pts.contains(p), "{p:?} is not an input point");
        }

        let mut seen = out.clone();
        seen.sort_by(|a, b| a.x.total_cmp(&b.x));
        seen.dedup();
        assert_eq!(seen.len(), 10);
    }

    #[test]
    fn output_is_bounded_by_cap_and_input() {
        let pts = random_cube(500, 3);
        let mut rng = StdRng::seed_from_u64(9);
        for (voxel, cap) in [(0.05, 10), (0.05, 10_000), (0.3, 1), (1e-4, 499), (2.0, 3)] {
            let out = sample_with_rng(&pts, voxel, cap, &mut rng).expect("valid config");
            assert!(out.len() <= cap);
            assert!(out.len() <= pts.len());
        }
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let pts = random_cube(300, 11);
        let a = sample_with_rng(&pts, 1e-4, 20, &mut StdRng::seed_from_u64(5)).expect("valid");
        let b = sample_with_rng(&pts, 1e-4, 20, &mut StdRng::seed_from_u64(5)).expect("valid");
        assert_eq!(a, b);
    }

    #[test]
    fn zero_cap_is_rejected_before_work() {
        let err = sample(&[Point3f::default()], 0.5, 0).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidArgument {
                name: "max_points",
                ..
            }
        ));
        assert!(sample(&[], -1.0, 10).is_err());
    }

    #[test]
    fn random_cap_keeps_relative_order() {
        let pts: Vec<Point3f> = (0..50).map(|i| Point3f::new(i as f32, 0.0, 0.0)).collect();
        let out = random_cap(&pts, 12, &mut StdRng::seed_from_u64(1)).expect("valid cap");
        assert_eq!(out.len(), 12);
        assert!(out.windows(2).all(|w| w[0].x < w[1].x));

        let small = random_cap(&pts[..5], 12, &mut StdRng::seed_from_u64(1)).expect("valid cap");
        assert_eq!(small, pts[..5].to_vec());
    }

    #[test]
    fn default_config_validates() {
        assert!(SampleConfig::default().validate().is_ok());
        let bad = SampleConfig {
            voxel_size: 0.0,
            ..SampleConfig::default()
        };
        assert!(bad.validate().is_err());
    }
}
