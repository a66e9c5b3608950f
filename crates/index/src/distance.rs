//! Vector distance metrics.

use core::fmt;
use core::str::FromStr;
use shoal_core::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DistanceMetric {
    /// Euclidean norm of the elementwise difference.
    L2,
    /// `1 - dot / (|a| * |b|)`
    Cosine,
    /// Raw dot product.
    InnerProduct,
}

impl DistanceMetric {
    pub fn name(&self) -> &'static str {
        match self {
            DistanceMetric::L2 => "l2_distance",
            DistanceMetric::Cosine => "cosine_distance",
            DistanceMetric::InnerProduct => "inner_product",
        }
    }

    /// Computes the metric. Operands must have equal length.
    pub fn distance(&self, left: &[f32], right: &[f32]) -> Result<f32> {
        if left.len() != right.len() {
            return Err(Error::invalid_argument(format!(
                "{}: vector length mismatch ({} vs {})",
                self.name(),
                left.len(),
                right.len()
            )));
        }
        let value = match self {
            DistanceMetric::L2 => left
                .iter()
                .zip(right)
                .map(|(l, r)| (l - r) * (l - r))
                .sum::<f32>()
                .sqrt(),
            DistanceMetric::Cosine => {
                let (mut dot, mut left_norm, mut right_norm) = (0.0f32, 0.0f32, 0.0f32);
                for (l, r) in left.iter().zip(right) {
                    dot += l * r;
                    left_norm += l * l;
                    right_norm += r * r;
                }
                1.0 - dot / (left_norm.sqrt() * right_norm.sqrt())
            }
            DistanceMetric::InnerProduct => left.iter().zip(right).map(|(l, r)| l * r).sum(),
        };
        Ok(value)
    }

    /// Sort key where smaller means closer. Inner product is a similarity,
    /// so larger products rank first.
    #[inline]
    pub fn rank_key(&self, distance: f32) -> f32 {
        match self {
            DistanceMetric::InnerProduct => -distance,
            _ => distance,
        }
    }

    pub(crate) fn code(&self) -> u8 {
        match self {
            DistanceMetric::L2 => 0,
            DistanceMetric::Cosine => 1,
            DistanceMetric::InnerProduct => 2,
        }
    }

    pub(crate) fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(DistanceMetric::L2),
            1 => Some(DistanceMetric::Cosine),
            2 => Some(DistanceMetric::InnerProduct),
            _ => None,
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DistanceMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "l2_distance" | "l2" => Ok(DistanceMetric::L2),
            "cosine_distance" | "cosine" => Ok(DistanceMetric::Cosine),
            "inner_product" => Ok(DistanceMetric::InnerProduct),
            _ => Err(Error::invalid_argument(format!("unknown distance metric: {s}"))),
        }
    }
}
