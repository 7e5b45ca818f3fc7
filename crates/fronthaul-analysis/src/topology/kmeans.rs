//! Deterministic k-means over distance-matrix rows.
//!
//! Farthest-first seeding from the first point, then Lloyd iterations
//! until assignments stop changing.

const MAX_ITERATIONS: usize = 300;

/// Cluster `points` into `k` groups (`k` clamped to `[1, n]`).
/// Returns one label per point.
pub fn kmeans(points: &[Vec<f64>], k: usize) -> Vec<usize> {
    let n = points.len();
    if n == 0 {
        return Vec::new();
    }
    let k = k.clamp(1, n);
    let mut centroids = seed(points, k);
    let mut labels = vec![usize::MAX; n];

    for iteration in 0..MAX_ITERATIONS {
        let mut changed = false;
        for (i, p) in points.iter().enumerate() {
            let nearest = nearest(p, &centroids);
            if labels[i] != nearest {
                labels[i] = nearest;
                changed = true;
            }
        }
        if !changed {
            tracing::debug!(iterations = iteration, "k-means converged");
            break;
        }
        update_centroids(points, &labels, &mut centroids);
    }
    labels
}

fn seed(points: &[Vec<f64>], k: usize) -> Vec<Vec<f64>> {
    let mut centroids = vec![points[0].clone()];
    let mut min_dist: Vec<f64> = points.iter().map(|p| sq_dist(p, &points[0])).collect();
    while centroids.len() < k {
        let mut far = 0;
        for (i, &d) in min_dist.iter().enumerate() {
            if d > min_dist[far] {
                far = i;
            }
        }
        centroids.push(points[far].clone());
        for (i, p) in points.iter().enumerate() {
            min_dist[i] = min_dist[i].min(sq_dist(p, &points[far]));
        }
    }
    centroids
}

/// Index of the closest centroid; ties go to the lower index.
fn nearest(p: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_d = f64::INFINITY;
    for (c, centroid) in centroids.iter().enumerate() {
        let d = sq_dist(p, centroid);
        if d < best_d {
            best = c;
            best_d = d;
        }
    }
    best
}

/// Mean of each cluster's points. An empty cluster keeps its centroid.
fn update_centroids(points: &[Vec<f64>], labels: &[usize], centroids: &mut [Vec<f64>]) {
    let dim = points[0].len();
    for (c, centroid) in centroids.iter_mut().enumerate() {
        let members: Vec<&Vec<f64>> = points
            .iter()
            .zip(labels)
            .filter(|(_, &l)| l == c)
            .map(|(p, _)| p)
            .collect();
        if members.is_empty() {
            continue;
        }
        let mut mean = vec![0.0; dim];
        for p in &members {
            for (m, v) in mean.iter_mut().zip(p.iter()) {
                *m += v;
            }
        }
        for m in &mut mean {
            *m /= members.len() as f64;
        }
        *centroid = mean;
    }
}

fn sq_dist(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blobs() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.1, 0.9, 0.9],
            vec![0.1, 0.0, 0.8, 0.9],
            vec![0.9, 0.8, 0.0, 0.1],
            vec![0.9, 0.9, 0.1, 0.0],
        ]
    }

    #[test]
    fn separates_two_blobs() {
        let labels = kmeans(&two_blobs(), 2);
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[2], labels[3]);
        assert_ne!(labels[0], labels[2]);
    }

    #[test]
    fn k_is_clamped_to_point_count() {
        let labels = kmeans(&two_blobs(), 10);
        let mut distinct = labels.clone();
        distinct.sort();
        distinct.dedup();
        assert_eq!(distinct.len(), 4);
    }

    #[test]
    fn deterministic_across_runs() {
        assert_eq!(kmeans(&two_blobs(), 2), kmeans(&two_blobs(), 2));
    }

    #[test]
    fn empty_input_yields_no_labels() {
        assert!(kmeans(&[], 3).is_empty());
    }
}
