//! Property-based tests for the samplers and the generator.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use qdata_gen::sampler::{draw_labeled, draw_unlabeled};
use qdata_gen::{Angles, DatasetConfig, Generator, Label};

/// Valid configurations: ordered centers and a positive bound.
fn arb_config() -> impl Strategy<Value = DatasetConfig> {
    (-1.0_f64..1.0, 0.05_f64..2.0, 0.01_f64..0.5, 0_usize..64).prop_map(
        |(theta_0, gap, epsilon, samples)| {
            DatasetConfig::default()
                .with_centers(theta_0, theta_0 + gap)
                .with_epsilon(epsilon)
                .with_samples(samples)
        },
    )
}

proptest! {
    #[test]
    fn unit_norm_for_any_angles(theta in -4.0_f64..4.0, phi in 0.0_f64..std::f64::consts::TAU) {
        let angles = Angles::new(theta, phi);
        prop_assert!((angles.state().norm_sqr() - 1.0).abs() < 1e-9);
        prop_assert!((angles.bloch().norm_sqr() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn labeled_theta_within_cluster(cfg in arb_config(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..32 {
            let draw = draw_labeled(&cfg, &mut rng);
            let theta = draw.angles.theta;
            match draw.label {
                Some(Label::One) => {
                    prop_assert!(theta >= cfg.theta_1 && theta <= cfg.theta_1 + cfg.epsilon);
                }
                Some(Label::Zero) => {
                    prop_assert!(theta >= cfg.theta_0 - cfg.epsilon && theta <= cfg.theta_0 + cfg.epsilon);
                }
                None => prop_assert!(false, "labeled draw without label"),
            }
        }
    }

    #[test]
    fn unlabeled_theta_within_gap(cfg in arb_config(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..32 {
            let draw = draw_unlabeled(&cfg, &mut rng);
            prop_assert!(draw.label.is_none());
            prop_assert!(draw.angles.theta >= cfg.theta_0 && draw.angles.theta <= cfg.theta_1);
        }
    }

    #[test]
    fn container_lengths(cfg in arb_config(), seed in any::<u64>()) {
        let n = cfg.samples;
        let ds = Generator::new(cfg).unwrap().generate_with_rng(StdRng::seed_from_u64(seed));
        prop_assert_eq!(ds.lengths(), [n, n, n / 2, n / 2]);
    }

    #[test]
    fn write_then_read_preserves_dataset(cfg in arb_config(), seed in any::<u64>()) {
        let ds = Generator::new(cfg).unwrap().generate_with_rng(StdRng::seed_from_u64(seed));
        let mut buf = Vec::new();
        ds.write_to(&mut buf).unwrap();
        let back = qdata_gen::Dataset::read_from(&mut buf.as_slice()).unwrap();
        prop_assert_eq!(back, ds);
    }
}
