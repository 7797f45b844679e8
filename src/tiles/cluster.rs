//! # 聚类模块
//!
//! ## 设计思路
//!
//! 调色板构建只依赖 `Clusterer` 能力接口（“对 M 个向量拟合 k 个中心”），
//! 具体算法可替换。默认实现 `KMeans` 是 k-means++ 初始化 + Lloyd 迭代，
//! 多次重启取惯性（簇内平方距离和）最小者。
//!
//! ## 实现思路
//!
//! - 全部随机性来自一个以 `seed` 初始化的 `StdRng`，重启按顺序消耗同一随机流，
//!   因此同一种子、同一重启次数的输出完全可复现。
//! - 收敛条件：标签不再变化，或中心总位移平方 ≤ `tolerance × 特征方差均值`，
//!   或达到最大迭代次数。
//! - 空簇用“离自身中心最远的点”重新播种；所有点都已与中心重合时保留旧中心。
//!   不同块少于 k 时因此会得到重复中心，但不会失败。
//!
//! 这是整条流水线的热点：代价约为 `块数 × k × block_size² × 迭代次数 × 重启次数`。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::assign::{nearest_centroid, squared_distance};
use crate::config::ConvertConfig;
use crate::error::ConvertError;

/// 聚类能力接口。
pub trait Clusterer {
    /// 对 `vectors` 拟合恰好 `k` 个中心。
    fn fit(&self, vectors: &[Vec<f32>], k: usize) -> Result<Vec<Vec<f32>>, ConvertError>;
}

/// 一次完整拟合的结果。
#[derive(Debug, Clone)]
pub struct ClusterFit {
    pub centroids: Vec<Vec<f32>>,
    /// 每个向量到最近中心的平方距离之和。
    pub inertia: f64,
}

/// k-means 聚类器。
#[derive(Debug, Clone)]
pub struct KMeans {
    pub seed: u64,
    pub restarts: usize,
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for KMeans {
    fn default() -> Self {
        Self {
            seed: 0,
            restarts: 10,
            max_iterations: 300,
            tolerance: 1e-4,
        }
    }
}

impl KMeans {
    pub fn from_config(config: &ConvertConfig) -> Self {
        Self {
            seed: config.seed,
            restarts: config.restarts,
            max_iterations: config.max_iterations,
            tolerance: config.tolerance,
        }
    }

    /// 拟合并返回中心与惯性。
    pub fn fit_detailed(&self, vectors: &[Vec<f32>], k: usize) -> Result<ClusterFit, ConvertError> {
        if k == 0 {
            return Err(ConvertError::Configuration("聚类数 k 必须大于 0".to_string()));
        }
        let Some(first) = vectors.first() else {
            return Err(ConvertError::Configuration("没有可聚类的块".to_string()));
        };
        let dim = first.len();
        if vectors.iter().any(|v| v.len() != dim) {
            return Err(ConvertError::Configuration("块向量长度不一致".to_string()));
        }

        let tolerance = scaled_tolerance(vectors, self.tolerance);
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut best: Option<ClusterFit> = None;

        for restart in 0..self.restarts.max(1) {
            let (fit, iterations) = self.run_once(vectors, k, tolerance, &mut rng);
            log::debug!(
                "🔁 k-means 第 {} 次重启：iterations={} inertia={:.3}",
                restart + 1,
                iterations,
                fit.inertia
            );

            let improved = match best {
                Some(ref current) => fit.inertia < current.inertia,
                None => true,
            };
            if improved {
                best = Some(fit);
            }
        }

        best.ok_or_else(|| ConvertError::Configuration("聚类没有产生结果".to_string()))
    }

    /// 单次 k-means++ 初始化 + Lloyd 迭代，返回结果与实际迭代次数。
    fn run_once(
        &self,
        data: &[Vec<f32>],
        k: usize,
        tolerance: f64,
        rng: &mut StdRng,
    ) -> (ClusterFit, usize) {
        let n = data.len();
        let mut centroids = init_plus_plus(data, k, rng);
        let mut labels = vec![usize::MAX; n];
        let mut distances = vec![0f32; n];
        let mut iterations = 0;

        for _ in 0..self.max_iterations {
            let mut changed = false;
            for (i, point) in data.iter().enumerate() {
                let (label, distance) = nearest_centroid(point, &centroids);
                if labels[i] != label {
                    labels[i] = label;
                    changed = true;
                }
                distances[i] = distance;
            }
            if !changed {
                break;
            }

            let updated = recompute_centroids(data, &labels, &distances, &centroids);
            let shift: f64 = centroids
                .iter()
                .zip(&updated)
                .map(|(old, new)| squared_distance(old, new) as f64)
                .sum();
            centroids = updated;
            iterations += 1;

            if shift <= tolerance {
                break;
            }
        }

        let inertia = data
            .iter()
            .map(|point| nearest_centroid(point, &centroids).1 as f64)
            .sum();

        (ClusterFit { centroids, inertia }, iterations)
    }
}

impl Clusterer for KMeans {
    fn fit(&self, vectors: &[Vec<f32>], k: usize) -> Result<Vec<Vec<f32>>, ConvertError> {
        let fit = self.fit_detailed(vectors, k)?;
        log::info!(
            "🎯 k-means 完成 - blocks={} k={} restarts={} inertia={:.3}",
            vectors.len(),
            k,
            self.restarts.max(1),
            fit.inertia
        );
        Ok(fit.centroids)
    }
}

/// 绝对收敛阈值：相对阈值乘以各特征方差的均值。
fn scaled_tolerance(data: &[Vec<f32>], tolerance: f64) -> f64 {
    let n = data.len() as f64;
    let dim = data.first().map_or(0, Vec::len);
    if dim == 0 {
        return 0.0;
    }

    let mut total_variance = 0.0;
    for j in 0..dim {
        let mean = data.iter().map(|v| v[j] as f64).sum::<f64>() / n;
        let variance = data
            .iter()
            .map(|v| {
                let d = v[j] as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n;
        total_variance += variance;
    }

    tolerance * total_variance / dim as f64
}

/// 贪心 k-means++：每个新中心采样 `2 + ln k` 个候选，保留使总势能最低者。
fn init_plus_plus(data: &[Vec<f32>], k: usize, rng: &mut StdRng) -> Vec<Vec<f32>> {
    let n = data.len();
    let trials = 2 + (k as f64).ln() as usize;
    let mut centroids = Vec::with_capacity(k);

    let first = rng.gen_range(0..n);
    centroids.push(data[first].clone());
    let mut closest: Vec<f32> = data
        .iter()
        .map(|point| squared_distance(point, &data[first]))
        .collect();
    let mut potential: f64 = closest.iter().map(|&d| d as f64).sum();

    while centroids.len() < k {
        if potential <= 0.0 {
            // 所有点都已与某个中心重合，剩余中心只能重复
            centroids.push(data[rng.gen_range(0..n)].clone());
            continue;
        }

        let mut best: Option<(usize, f64, Vec<f32>)> = None;
        for _ in 0..trials {
            let target = rng.gen_range(0.0..potential);
            let candidate = sample_by_weight(&closest, target);
            let candidate_closest: Vec<f32> = data
                .iter()
                .zip(&closest)
                .map(|(point, &current)| squared_distance(point, &data[candidate]).min(current))
                .collect();
            let candidate_potential: f64 = candidate_closest.iter().map(|&d| d as f64).sum();

            let better = match best {
                Some((_, best_potential, _)) => candidate_potential < best_potential,
                None => true,
            };
            if better {
                best = Some((candidate, candidate_potential, candidate_closest));
            }
        }

        if let Some((index, new_potential, new_closest)) = best {
            centroids.push(data[index].clone());
            potential = new_potential;
            closest = new_closest;
        }
    }

    centroids
}

/// 按权重（到最近中心的平方距离）轮盘采样。
fn sample_by_weight(weights: &[f32], target: f64) -> usize {
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w as f64;
        if cumulative > target {
            return i;
        }
    }
    weights.iter().rposition(|&w| w > 0.0).unwrap_or(0)
}

/// 按标签求均值；空簇重新播种为离自身中心最远的点。
fn recompute_centroids(
    data: &[Vec<f32>],
    labels: &[usize],
    distances: &[f32],
    previous: &[Vec<f32>],
) -> Vec<Vec<f32>> {
    let k = previous.len();
    let dim = previous.first().map_or(0, Vec::len);
    let mut sums = vec![vec![0f64; dim]; k];
    let mut counts = vec![0usize; k];

    for (point, &label) in data.iter().zip(labels) {
        counts[label] += 1;
        for (acc, &value) in sums[label].iter_mut().zip(point) {
            *acc += value as f64;
        }
    }

    let mut centroids: Vec<Vec<f32>> = sums
        .iter()
        .zip(&counts)
        .zip(previous)
        .map(|((sum, &count), old)| {
            if count == 0 {
                old.clone()
            } else {
                sum.iter().map(|&s| (s / count as f64) as f32).collect()
            }
        })
        .collect();

    let empty: Vec<usize> = (0..k).filter(|&c| counts[c] == 0).collect();
    if !empty.is_empty() {
        let mut farthest: Vec<usize> = (0..data.len()).collect();
        farthest.sort_by(|&a, &b| distances[b].total_cmp(&distances[a]).then(a.cmp(&b)));

        for (slot, &cluster) in empty.iter().enumerate() {
            match farthest.get(slot) {
                Some(&i) if distances[i] > 0.0 => centroids[cluster] = data[i].clone(),
                _ => {}
            }
        }
    }

    centroids
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_groups() -> Vec<Vec<f32>> {
        let mut data = Vec::new();
        for i in 0..10 {
            let mut dark = vec![0.0; 16];
            dark[i % 16] = 1.0;
            data.push(dark);
            let mut light = vec![1.0; 16];
            light[i % 16] = 0.0;
            data.push(light);
        }
        data
    }

    #[test]
    fn separates_two_obvious_groups() {
        let data = two_groups();
        let centroids = KMeans::default().fit(&data, 2).unwrap();

        assert_eq!(centroids.len(), 2);
        let mut means: Vec<f32> = centroids
            .iter()
            .map(|c| c.iter().sum::<f32>() / c.len() as f32)
            .collect();
        means.sort_by(f32::total_cmp);
        assert!(means[0] < 0.2, "dark centroid mean {}", means[0]);
        assert!(means[1] > 0.8, "light centroid mean {}", means[1]);
    }

    #[test]
    fn same_seed_is_reproducible() {
        let data: Vec<Vec<f32>> = (0..60)
            .map(|i| (0..16).map(|j| ((i * 7 + j * 3) % 5 == 0) as u8 as f32).collect())
            .collect();
        let kmeans = KMeans {
            seed: 7,
            restarts: 4,
            ..KMeans::default()
        };

        let first = kmeans.fit(&data, 6).unwrap();
        let second = kmeans.fit(&data, 6).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn more_restarts_never_increase_inertia() {
        let data: Vec<Vec<f32>> = (0..80)
            .map(|i| (0..9).map(|j| ((i * 13 + j * 5) % 7 < 3) as u8 as f32).collect())
            .collect();

        let single = KMeans {
            restarts: 1,
            ..KMeans::default()
        }
        .fit_detailed(&data, 5)
        .unwrap();
        let many = KMeans {
            restarts: 8,
            ..KMeans::default()
        }
        .fit_detailed(&data, 5)
        .unwrap();

        assert!(many.inertia <= single.inertia);
    }

    #[test]
    fn identical_blocks_still_yield_k_centroids() {
        let data = vec![vec![1.0, 0.0, 1.0, 0.0]; 5];
        let centroids = KMeans::default().fit(&data, 4).unwrap();

        assert_eq!(centroids.len(), 4);
        assert!(centroids.iter().all(|c| c.len() == 4));
        assert!(centroids.iter().flatten().all(|v| v.is_finite()));
    }

    #[test]
    fn fewer_points_than_clusters_does_not_fail() {
        let data = vec![vec![0.0, 0.0], vec![1.0, 1.0]];
        let fit = KMeans::default().fit_detailed(&data, 5).unwrap();

        assert_eq!(fit.centroids.len(), 5);
        assert_eq!(fit.inertia, 0.0);
    }

    #[test]
    fn single_cluster_is_the_mean() {
        let data = vec![vec![0.0, 1.0], vec![1.0, 1.0], vec![0.5, 0.0], vec![0.5, 0.0]];
        let centroids = KMeans::default().fit(&data, 1).unwrap();
        assert_eq!(centroids.len(), 1);
        assert!((centroids[0][0] - 0.5).abs() < 1e-6);
        assert!((centroids[0][1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn rejects_zero_k_and_empty_input() {
        let kmeans = KMeans::default();
        assert!(matches!(
            kmeans.fit(&[vec![0.0]], 0),
            Err(ConvertError::Configuration(_))
        ));
        assert!(matches!(
            kmeans.fit(&[], 3),
            Err(ConvertError::Configuration(_))
        ));
    }

    #[test]
    fn rejects_ragged_vectors() {
        let data = vec![vec![0.0, 1.0], vec![1.0]];
        assert!(KMeans::default().fit(&data, 1).is_err());
    }

    #[test]
    fn weighted_sampling_skips_zero_weights() {
        let weights = [0.0, 0.0, 2.0, 0.0, 1.0];
        assert_eq!(sample_by_weight(&weights, 0.0), 2);
        assert_eq!(sample_by_weight(&weights, 1.99), 2);
        assert_eq!(sample_by_weight(&weights, 2.5), 4);
        assert_eq!(sample_by_weight(&weights, 3.0), 4);
    }
}
