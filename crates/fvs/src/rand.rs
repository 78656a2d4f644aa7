//! Synthetic clustered point sets for experiments and tests.
//!
//! Model
//! - Integer coordinates on a `width × height` canvas.
//! - Five cluster centres; a draw at distance `d` from the nearest centre is
//!   kept if `d < 1.4 r`, with probability 1/5 if `d < 1.6 r`, 1/10 if
//!   `d < 1.8 r`, and 1/100 inside a sparse background square.
//! - Optional degree cap: reject a draw that already has `max_degree` placed
//!   points within `threshold` (inclusive), which keeps the graph sparse.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use nalgebra::Point2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// Degree cap applied while placing points.
#[derive(Clone, Copy, Debug)]
pub struct DegreeCap {
    pub threshold: f64,
    pub max_degree: usize,
}

/// Generator configuration.
#[derive(Clone, Copy, Debug)]
pub struct GenCfg {
    pub count: usize,
    pub width: u32,
    pub height: u32,
    /// Cluster radius.
    pub radius: f64,
    pub degree_cap: Option<DegreeCap>,
    /// Rejected draws allowed per point before giving up.
    pub max_attempts: usize,
}

impl Default for GenCfg {
    fn default() -> Self {
        Self {
            count: 150,
            width: 1400,
            height: 900,
            radius: 140.0,
            degree_cap: None,
            max_attempts: 1_000_000,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, cheap and stable.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }

    /// Token for the next instance in the same stream.
    pub fn next(self) -> Self {
        Self {
            seed: self.seed,
            index: self.index.wrapping_add(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenError {
    InvalidParams { reason: String },
    Exhausted { placed: usize, count: usize },
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParams { reason } => write!(f, "invalid generator params: {reason}"),
            Self::Exhausted { placed, count } => {
                write!(f, "gave up after placing {placed} of {count} points")
            }
        }
    }
}

impl std::error::Error for GenError {}

/// Draw `cfg.count` clustered points.
pub fn generate_points(cfg: GenCfg, tok: ReplayToken) -> Result<Vec<Point2<f64>>, GenError> {
    if cfg.width == 0 || cfg.height == 0 {
        return Err(GenError::InvalidParams {
            reason: "canvas must be non-empty".into(),
        });
    }
    if cfg.radius.is_nan() || cfg.radius <= 0.0 {
        return Err(GenError::InvalidParams {
            reason: format!("radius must be positive, got {}", cfg.radius),
        });
    }
    let mut rng = tok.to_std_rng();
    let centres = cluster_centres(cfg.width as f64, cfg.height as f64);
    let mut points: Vec<Point2<f64>> = Vec::with_capacity(cfg.count);

    while points.len() < cfg.count {
        let mut attempts = 0;
        let p = loop {
            if attempts >= cfg.max_attempts {
                return Err(GenError::Exhausted {
                    placed: points.len(),
                    count: cfg.count,
                });
            }
            attempts += 1;
            let p = Point2::new(
                rng.gen_range(0..cfg.width) as f64,
                rng.gen_range(0..cfg.height) as f64,
            );
            if !accept(&mut rng, &p, &centres, &cfg) {
                continue;
            }
            if let Some(cap) = cfg.degree_cap {
                let degree = points
                    .iter()
                    .filter(|q| nalgebra::distance(&p, *q) <= cap.threshold)
                    .count();
                if degree >= cap.max_degree {
                    continue;
                }
            }
            break p;
        };
        points.push(p);
    }
    Ok(points)
}

fn cluster_centres(w: f64, h: f64) -> [Point2<f64>; 5] {
    [
        Point2::new(w / 2.0, h / 2.0),
        Point2::new(2.5 * w / 6.0, 2.0 * h / 6.0),
        Point2::new(4.0 * w / 6.0, 2.0 * h / 6.0),
        Point2::new(2.0 * w / 6.0, 4.0 * h / 6.0),
        Point2::new(4.0 * w / 6.0, 4.0 * h / 6.0),
    ]
}

fn accept<R: Rng>(rng: &mut R, p: &Point2<f64>, centres: &[Point2<f64>], cfg: &GenCfg) -> bool {
    let d = centres
        .iter()
        .map(|c| nalgebra::distance(p, c))
        .fold(f64::INFINITY, f64::min);
    let r = cfg.radius;
    if d < 1.4 * r {
        return true;
    }
    if d < 1.6 * r && rng.gen_ratio(1, 5) {
        return true;
    }
    if d < 1.8 * r && rng.gen_ratio(1, 10) {
        return true;
    }
    // sparse background square spanning the middle 3/5 of the canvas height
    let (lo, hi) = (cfg.height as f64 / 5.0, 4.0 * cfg.height as f64 / 5.0);
    lo < p.x && p.x < hi && lo < p.y && p.y < hi && rng.gen_ratio(1, 100)
}
