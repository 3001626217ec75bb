//! Single-qubit state geometry.
//!
//! A draw (θ, φ) maps to two equivalent representations:
//!
//! ```text
//!   amplitudes  (a, b)    = (cos θ, e^{iφ} sin θ)
//!   Bloch       (x, y, z) = (sin 2θ cos φ, sin 2θ sin φ, cos 2θ)
//! ```
//!
//! The Bloch form uses the doubled angle, so both are unit-norm for any
//! real θ, including the slightly negative values produced around cluster 0.

use num_complex::Complex64;
use std::fmt;

/// Polar and azimuthal angle of one draw, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Angles {
    /// Polar angle θ.
    pub theta: f64,
    /// Azimuthal angle φ.
    pub phi: f64,
}

impl Angles {
    /// Create an angle pair.
    pub const fn new(theta: f64, phi: f64) -> Self {
        Self { theta, phi }
    }

    /// Amplitude form of this draw.
    pub fn state(&self) -> QubitState {
        QubitState::from_angles(*self)
    }

    /// Bloch form of this draw.
    pub fn bloch(&self) -> BlochVector {
        BlochVector::from_angles(*self)
    }
}

/// Cluster label of a labeled sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Label {
    /// Drawn around `theta_0`.
    Zero = 0,
    /// Drawn just above `theta_1`.
    One = 1,
}

impl Label {
    /// Integer value stored on disk.
    pub fn as_i64(self) -> i64 {
        self as i64
    }

    /// Inverse of [`Label::as_i64`]; `None` for anything but 0 or 1.
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Zero),
            1 => Some(Self::One),
            _ => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i64())
    }
}

/// Amplitude pair (a, b) of a single-qubit state a|0⟩ + b|1⟩.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QubitState {
    amplitudes: [Complex64; 2],
}

impl QubitState {
    /// Build a state from raw amplitudes. No normalisation is applied.
    pub const fn new(a: Complex64, b: Complex64) -> Self {
        Self { amplitudes: [a, b] }
    }

    /// (cos θ, e^{iφ} sin θ).
    pub fn from_angles(angles: Angles) -> Self {
        let a = Complex64::new(angles.theta.cos(), 0.0);
        let b = Complex64::from_polar(1.0, angles.phi) * angles.theta.sin();
        Self::new(a, b)
    }

    /// Amplitude of |0⟩.
    pub fn a(&self) -> Complex64 {
        self.amplitudes[0]
    }

    /// Amplitude of |1⟩.
    pub fn b(&self) -> Complex64 {
        self.amplitudes[1]
    }

    /// Both amplitudes in basis order.
    pub fn amplitudes(&self) -> &[Complex64; 2] {
        &self.amplitudes
    }

    /// |a|² + |b|².
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// Polar angle folded into [0, π]: atan2(|b|, Re a).
    ///
    /// The sign of θ is not recoverable from the amplitudes, so a draw with
    /// θ = -0.1 reports 0.1.
    pub fn polar_angle(&self) -> f64 {
        self.b().norm().atan2(self.a().re)
    }

    /// Bloch vector of this state, computed from the amplitudes.
    ///
    /// Uses x = 2 Re(a* b), y = 2 Im(a* b), z = |a|² - |b|², which agrees
    /// with [`BlochVector::from_angles`] for states built from angles.
    pub fn to_bloch(&self) -> BlochVector {
        let cross = self.a().conj() * self.b();
        BlochVector::new(
            2.0 * cross.re,
            2.0 * cross.im,
            self.a().norm_sqr() - self.b().norm_sqr(),
        )
    }
}

/// Point (x, y, z) on the Bloch sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlochVector {
    coords: [f64; 3],
}

impl BlochVector {
    /// Build from Cartesian coordinates.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { coords: [x, y, z] }
    }

    /// (sin 2θ cos φ, sin 2θ sin φ, cos 2θ).
    pub fn from_angles(angles: Angles) -> Self {
        let (sin_2t, cos_2t) = (2.0 * angles.theta).sin_cos();
        let (sin_p, cos_p) = angles.phi.sin_cos();
        Self::new(sin_2t * cos_p, sin_2t * sin_p, cos_2t)
    }

    /// X component.
    pub fn x(&self) -> f64 {
        self.coords[0]
    }

    /// Y component.
    pub fn y(&self) -> f64 {
        self.coords[1]
    }

    /// Z component.
    pub fn z(&self) -> f64 {
        self.coords[2]
    }

    /// Coordinates as an array.
    pub fn coords(&self) -> &[f64; 3] {
        &self.coords
    }

    /// x² + y² + z².
    pub fn norm_sqr(&self) -> f64 {
        self.coords.iter().map(|c| c * c).sum()
    }

    /// Angle from the +z axis, in [0, π]. Equals 2|θ| for θ ∈ [-π/2, π/2].
    pub fn polar_angle(&self) -> f64 {
        self.x().hypot(self.y()).atan2(self.z())
    }
}

/// Amplitude entry of a dataset container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateRecord {
    pub amplitudes: QubitState,
    pub label: Option<Label>,
}

/// Bloch entry of a dataset container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlochRecord {
    pub coords: BlochVector,
    pub label: Option<Label>,
}

/// One sampler iteration: the angles and, for the labeled set, the cluster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Draw {
    pub angles: Angles,
    pub label: Option<Label>,
}

impl Draw {
    /// Amplitude record for this draw.
    pub fn state_record(&self) -> StateRecord {
        StateRecord {
            amplitudes: self.angles.state(),
            label: self.label,
        }
    }

    /// Bloch record for this draw.
    pub fn bloch_record(&self) -> BlochRecord {
        BlochRecord {
            coords: self.angles.bloch(),
            label: self.label,
        }
    }
}
