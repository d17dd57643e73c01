//! Normalized mutual information from equal-width discretization.
//!
//! Each volume is binned independently over its own value range, the two
//! label sequences are cross-tabulated, and
//! `NMI = 2 (H(A) + H(B) - H(A,B)) / (H(A) + H(B))`
//! with every entropy computed as `-Σ p ln(p + ε)`.

use crate::config::NmiConfig;
use ndarray::{Array2, Axis};

/// Equal-width ordinal binning of a sequence.
///
/// Edges are `linspace(min, max, bins + 1)`; a value's bin is the number of
/// inner edges not greater than it, so the maximum lands in the last bin. A
/// constant sequence maps entirely to bin 0. Pure: no state is kept between
/// calls.
pub fn discretize_uniform(values: &[f64], bins: usize) -> Vec<usize> {
    let (min, max) = value_range(values);
    if values.is_empty() || bins < 2 || !(max > min) {
        return vec![0; values.len()];
    }

    let edges = linspace(min, max, bins + 1);
    let inner = &edges[1..bins];
    values
        .iter()
        .map(|&v| inner.partition_point(|&edge| edge <= v))
        .collect()
}

/// Two-dimensional histogram of paired labels.
///
/// Each axis has `bins` equal-width bins spanning that sequence's own
/// `[min, max]`, the last bin closed on the right. A degenerate range is
/// widened to `[v - 0.5, v + 0.5]`.
pub fn joint_histogram(a: &[usize], b: &[usize], bins: usize) -> Array2<f64> {
    let mut histogram = Array2::<f64>::zeros((bins, bins));
    if a.is_empty() || bins == 0 {
        return histogram;
    }

    let edges_a = histogram_edges(a, bins);
    let edges_b = histogram_edges(b, bins);
    for (&la, &lb) in a.iter().zip(b) {
        let i = histogram_bin(la as f64, &edges_a);
        let j = histogram_bin(lb as f64, &edges_b);
        histogram[[i, j]] += 1.0;
    }
    histogram
}

/// Shannon entropy in nats with `epsilon` added inside each logarithm.
pub fn shannon_entropy<'a, I>(probabilities: I, epsilon: f64) -> f64
where
    I: IntoIterator<Item = &'a f64>,
{
    -probabilities
        .into_iter()
        .map(|&p| p * (p + epsilon).ln())
        .sum::<f64>()
}

/// Entropies behind an NMI value, exposed for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntropyTerms {
    pub fixed: f64,
    pub moving: f64,
    pub joint: f64,
}

impl EntropyTerms {
    pub fn mutual_information(&self) -> f64 {
        self.fixed + self.moving - self.joint
    }

    /// Undefined (NaN or infinite) when both marginal entropies vanish.
    pub fn normalized(&self) -> f64 {
        2.0 * self.mutual_information() / (self.fixed + self.moving)
    }
}

pub fn entropy_terms(a: &[f64], b: &[f64], config: &NmiConfig) -> EntropyTerms {
    let labels_a = discretize_uniform(a, config.bins);
    let labels_b = discretize_uniform(b, config.bins);

    let joint = joint_histogram(&labels_a, &labels_b, config.bins);
    let joint_prob = &joint / joint.sum();
    let marginal_a = joint_prob.sum_axis(Axis(1));
    let marginal_b = joint_prob.sum_axis(Axis(0));

    EntropyTerms {
        fixed: shannon_entropy(marginal_a.iter(), config.epsilon),
        moving: shannon_entropy(marginal_b.iter(), config.epsilon),
        joint: shannon_entropy(joint_prob.iter(), config.epsilon),
    }
}

pub fn normalized_mutual_information(a: &[f64], b: &[f64], config: &NmiConfig) -> f64 {
    entropy_terms(a, b, config).normalized()
}

fn value_range(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    let step = (stop - start) / (num - 1) as f64;
    let mut points: Vec<f64> = (0..num).map(|k| k as f64 * step + start).collect();
    if let Some(last) = points.last_mut() {
        *last = stop;
    }
    points
}

fn histogram_edges(labels: &[usize], bins: usize) -> Vec<f64> {
    let lo = labels.iter().copied().min().unwrap_or(0) as f64;
    let hi = labels.iter().copied().max().unwrap_or(0) as f64;
    if lo == hi {
        linspace(lo - 0.5, hi + 0.5, bins + 1)
    } else {
        linspace(lo, hi, bins + 1)
    }
}

fn histogram_bin(value: f64, edges: &[f64]) -> usize {
    let mut index = edges.partition_point(|&edge| edge <= value);
    if value == edges[edges.len() - 1] {
        index -= 1;
    }
    index.saturating_sub(1)
}
