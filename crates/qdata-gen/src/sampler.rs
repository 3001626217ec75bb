//! Angle samplers for the labeled and unlabeled populations.
//!
//! Both samplers take the random source as an argument; nothing here touches
//! global RNG state, so a seeded `rng` fully determines the output.

use std::f64::consts::TAU;

use rand::Rng;

use crate::config::DatasetConfig;
use crate::state::{Angles, Draw, Label};

/// Draw one labeled sample.
///
/// The label is uniform over {0, 1}. Cluster 1 is perturbed upwards only,
/// θ = θ₁ + U(0, ε); cluster 0 symmetrically, θ = θ₀ + U(-ε, ε).
///
/// `config` must have passed [`DatasetConfig::validate`], otherwise the
/// uniform ranges may be empty.
pub fn draw_labeled<R: Rng>(config: &DatasetConfig, rng: &mut R) -> Draw {
    let label = if rng.gen_range(0..2u8) == 1 {
        Label::One
    } else {
        Label::Zero
    };
    let theta = match label {
        Label::One => config.theta_1 + rng.gen_range(0.0..config.epsilon),
        Label::Zero => config.theta_0 + rng.gen_range(-config.epsilon..config.epsilon),
    };
    let phi = draw_phi(rng);
    Draw {
        angles: Angles::new(theta, phi),
        label: Some(label),
    }
}

/// Draw one unlabeled sample with θ uniform over the gap [θ₀, θ₁).
pub fn draw_unlabeled<R: Rng>(config: &DatasetConfig, rng: &mut R) -> Draw {
    let theta = rng.gen_range(config.theta_0..config.theta_1);
    let phi = draw_phi(rng);
    Draw {
        angles: Angles::new(theta, phi),
        label: None,
    }
}

fn draw_phi<R: Rng>(rng: &mut R) -> f64 {
    rng.gen_range(0.0..TAU)
}
