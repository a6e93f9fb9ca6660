//! Injected random source.
//!
//! # Determinism strategy
//!
//! Every stochastic decision in the engine (trajectory sampling, import
//! candidate selection, seed advancement, transmission) draws from an
//! [`EpiRng`] passed in by the caller.  Production runs use [`SimRng`], a
//! `SmallRng` seeded from the run seed; each disease gets its own child
//! stream so adding a disease does not perturb the others.  Tests use
//! [`ScriptedRng`] to replay an exact sequence of draws.
//!
//! The trait is object safe so models can take `&mut dyn EpiRng`.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── EpiRng ────────────────────────────────────────────────────────────────────

/// Source of randomness consumed by the engine.
pub trait EpiRng {
    /// Uniform draw in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// Uniform integer in `[0, n)`.  `n` must be non-zero.
    fn below(&mut self, n: usize) -> usize;

    /// Standard normal draw (mean 0, variance 1).
    fn standard_normal(&mut self) -> f64;

    /// `true` with probability `p` (clamped to [0, 1]).
    fn gen_bool(&mut self, p: f64) -> bool {
        if p >= 1.0 {
            true
        } else if p <= 0.0 {
            false
        } else {
            self.uniform() < p
        }
    }

    /// Lognormal draw `exp(location + scale · z)`.
    fn lognormal(&mut self, location: f64, scale: f64) -> f64 {
        (location + scale * self.standard_normal()).exp()
    }

    /// Exponential draw with the given rate.
    fn exponential(&mut self, rate: f64) -> f64 {
        -(1.0 - self.uniform()).ln() / rate
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG backed by `SmallRng`.
///
/// Used only in single-threaded contexts; derive a [`child`](Self::child)
/// per disease instead of sharing one stream.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }
}

impl EpiRng for SimRng {
    #[inline]
    fn uniform(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }

    #[inline]
    fn below(&mut self, n: usize) -> usize {
        self.0.gen_range(0..n)
    }

    #[inline]
    fn standard_normal(&mut self) -> f64 {
        self.0.sample(StandardNormal)
    }
}

// ── ScriptedRng ───────────────────────────────────────────────────────────────

/// Deterministic [`EpiRng`] replaying fixed sequences.
///
/// Uniform and normal draws cycle independently through their scripts; an
/// empty script yields `0.0`.  `below(n)` maps the next uniform `u` to
/// `floor(u · n)`.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRng {
    uniforms: Vec<f64>,
    normals:  Vec<f64>,
    next_u:   usize,
    next_n:   usize,
}

impl ScriptedRng {
    pub fn new(uniforms: Vec<f64>) -> Self {
        Self { uniforms, ..Self::default() }
    }

    /// A script that always draws `u`.
    pub fn constant(u: f64) -> Self {
        Self::new(vec![u])
    }

    pub fn with_normals(mut self, normals: Vec<f64>) -> Self {
        self.normals = normals;
        self
    }

    /// Number of uniform draws consumed so far.
    pub fn uniform_draws(&self) -> usize {
        self.next_u
    }
}

impl EpiRng for ScriptedRng {
    fn uniform(&mut self) -> f64 {
        if self.uniforms.is_empty() {
            return 0.0;
        }
        let u = self.uniforms[self.next_u % self.uniforms.len()];
        self.next_u += 1;
        u
    }

    fn below(&mut self, n: usize) -> usize {
        let u = self.uniform();
        ((u * n as f64) as usize).min(n.saturating_sub(1))
    }

    fn standard_normal(&mut self) -> f64 {
        if self.normals.is_empty() {
            return 0.0;
        }
        let z = self.normals[self.next_n % self.normals.len()];
        self.next_n += 1;
        z
    }
}
