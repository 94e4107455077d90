//! Seeded k-means clustering over RGB points.
//!
//! k-means++ initialization followed by Lloyd iterations, repeated for a
//! fixed number of restarts from one seeded RNG stream. The clustering with
//! the lowest inertia wins; earlier restarts win ties. The iteration and
//! restart budgets bound the running time regardless of input.

#![allow(clippy::cast_precision_loss)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A point in RGB space with channels in 0.0..=255.0.
pub type Point = [f64; 3];

/// Budget and seed for a clustering run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeansParams {
    /// Independent k-means++ initializations to try
    pub restarts: usize,
    /// Lloyd iterations per restart
    pub max_iterations: usize,
    /// Stop once no centroid moves more than this (squared distance)
    pub tolerance: f64,
    /// Seed of the RNG driving initialization
    pub seed: u64,
}

impl Default for KMeansParams {
    fn default() -> Self {
        Self {
            restarts: 10,
            max_iterations: 300,
            tolerance: 1e-4,
            seed: 42,
        }
    }
}

/// Result of a clustering run.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    /// Cluster centers
    pub centroids: Vec<Point>,
    /// Number of points assigned to each cluster
    pub counts: Vec<usize>,
    /// Sum of squared distances from each point to its centroid
    pub inertia: f64,
}

impl Clustering {
    /// Index of the most populated cluster; the lowest index wins ties.
    pub fn dominant(&self) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (index, &count) in self.counts.iter().enumerate() {
            if best.is_none_or(|(_, best_count)| count > best_count) {
                best = Some((index, count));
            }
        }
        best.map(|(index, _)| index)
    }
}

/// Clusters `points` into `min(k, points.len())` groups.
///
/// Returns `None` for an empty input or `k == 0`.
pub fn kmeans(points: &[Point], k: usize, params: &KMeansParams) -> Option<Clustering> {
    let k = k.min(points.len());
    if k == 0 {
        return None;
    }

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut best: Option<Clustering> = None;

    for _ in 0..params.restarts.max(1) {
        let initial = init_plus_plus(points, k, &mut rng);
        let candidate = lloyd(points, initial, params);
        if best
            .as_ref()
            .is_none_or(|current| candidate.inertia < current.inertia)
        {
            best = Some(candidate);
        }
    }

    best
}

fn squared_distance(a: &Point, b: &Point) -> f64 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

/// Index of the nearest centroid; the lowest index wins ties.
fn nearest(point: &Point, centroids: &[Point]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (index, centroid) in centroids.iter().enumerate() {
        let distance = squared_distance(point, centroid);
        if distance < best.1 {
            best = (index, distance);
        }
    }
    best
}

/// k-means++ seeding: each new center is drawn with probability
/// proportional to its squared distance from the centers chosen so far.
fn init_plus_plus(points: &[Point], k: usize, rng: &mut StdRng) -> Vec<Point> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.random_range(0..points.len())]);

    let mut weights: Vec<f64> = points
        .iter()
        .map(|p| squared_distance(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = weights.iter().sum();
        let chosen = if total > 0.0 {
            let mut target = rng.random::<f64>() * total;
            let mut chosen = None;
            for (index, &weight) in weights.iter().enumerate() {
                if weight > 0.0 {
                    chosen = Some(index);
                    if target < weight {
                        break;
                    }
                    target -= weight;
                }
            }
            chosen.unwrap_or(0)
        } else {
            // every point coincides with a center already
            rng.random_range(0..points.len())
        };

        let center = points[chosen];
        centroids.push(center);
        for (weight, point) in weights.iter_mut().zip(points) {
            *weight = weight.min(squared_distance(point, &center));
        }
    }

    centroids
}

fn lloyd(points: &[Point], mut centroids: Vec<Point>, params: &KMeansParams) -> Clustering {
    let k = centroids.len();

    for _ in 0..params.max_iterations {
        let mut sums = vec![[0.0f64; 3]; k];
        let mut counts = vec![0usize; k];
        for point in points {
            let (index, _) = nearest(point, &centroids);
            counts[index] += 1;
            for channel in 0..3 {
                sums[index][channel] += point[channel];
            }
        }

        let mut shift = 0.0f64;
        for ((centroid, sum), count) in centroids.iter_mut().zip(&sums).zip(&counts) {
            // an empty cluster keeps its previous center
            if *count == 0 {
                continue;
            }
            let n = *count as f64;
            let updated = [sum[0] / n, sum[1] / n, sum[2] / n];
            shift = shift.max(squared_distance(centroid, &updated));
            *centroid = updated;
        }

        if shift <= params.tolerance {
            break;
        }
    }

    let mut counts = vec![0usize; k];
    let mut inertia = 0.0;
    for point in points {
        let (index, distance) = nearest(point, &centroids);
        counts[index] += 1;
        inertia += distance;
    }

    Clustering {
        centroids,
        counts,
        inertia,
    }
}
