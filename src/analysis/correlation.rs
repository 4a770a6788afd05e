//! Trait correlation scanning: Pearson coefficients over all trait pairs,
//! reported when strong and re-reported only on meaningful change.

use crate::genetics::traits::{TraitKind, TraitVector};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Minimum population for a meaningful coefficient
const MIN_SAMPLES: usize = 20;
/// Coefficient magnitude below which a pair is not worth reporting
const REPORT_THRESHOLD: f32 = 0.3;
/// Change in the coefficient required to re-report a known pair
const CHANGE_THRESHOLD: f32 = 0.2;

/// A strong correlation between two traits
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CorrelationReport {
    pub a: TraitKind,
    pub b: TraitKind,
    pub coefficient: f32,
    pub samples: usize,
    pub day: u32,
}

/// Pearson correlation coefficient, `None` when either side has no
/// variance or the samples are too few to divide.
pub fn pearson(xs: &[f32], ys: &[f32]) -> Option<f32> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let nf = n as f32;
    let mean_x = xs[..n].iter().sum::<f32>() / nf;
    let mean_y = ys[..n].iter().sum::<f32>() / nf;

    let mut cov = 0.0f32;
    let mut var_x = 0.0f32;
    let mut var_y = 0.0f32;
    for i in 0..n {
        let dx = xs[i] - mean_x;
        let dy = ys[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x <= f32::EPSILON || var_y <= f32::EPSILON {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Scans the living population for strong trait correlations
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CorrelationScanner {
    /// Last reported coefficient per unordered trait pair
    reported: HashMap<(TraitKind, TraitKind), f32>,
}

impl CorrelationScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan all unordered trait pairs over the given trait vectors.
    /// Reports a pair when |r| passes the strength threshold and it is
    /// either new or has moved materially since the last report.
    pub fn scan(&mut self, population: &[TraitVector], day: u32) -> Vec<CorrelationReport> {
        if population.len() < MIN_SAMPLES {
            return Vec::new();
        }

        let mut columns: Vec<Vec<f32>> = vec![Vec::with_capacity(population.len()); TraitKind::COUNT];
        for traits in population {
            for kind in TraitKind::ALL {
                columns[kind.index()].push(traits.get(kind));
            }
        }

        let mut reports = Vec::new();
        for (i, a) in TraitKind::ALL.iter().enumerate() {
            for b in &TraitKind::ALL[i + 1..] {
                let Some(r) = pearson(&columns[a.index()], &columns[b.index()]) else {
                    continue;
                };
                if r.abs() < REPORT_THRESHOLD {
                    continue;
                }
                let key = (*a, *b);
                let changed = match self.reported.get(&key) {
                    Some(&previous) => (r - previous).abs() > CHANGE_THRESHOLD,
                    None => true,
                };
                if changed {
                    self.reported.insert(key, r);
                    reports.push(CorrelationReport {
                        a: *a,
                        b: *b,
                        coefficient: r,
                        samples: population.len(),
                        day,
                    });
                }
            }
        }
        reports
    }
}
