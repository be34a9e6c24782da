use nalgebra as na;

use crate::{covariance::Covariance, Error};

const REPEATED_EIGENVALUE_TOLERANCE: f64 = 1e-10;
const DEFAULT_EPSILON: f64 = f64::EPSILON;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Solver {
	/// Jacobi style iteration of `nalgebra::SymmetricEigen`.
	/// `max_iterations` of 0 iterates until convergence.
	Iterative { epsilon: f64, max_iterations: usize },
	/// Closed form eigenvalues for real symmetric 3x3 matrices.
	Analytic,
}

impl Default for Solver {
	fn default() -> Self {
		Self::Iterative { epsilon: DEFAULT_EPSILON, max_iterations: 0 }
	}
}

/// Settings forwarded to the eigen decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EigenOptions {
	pub solver: Solver,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EigenPair {
	pub value: f64,
	pub vector: na::Unit<na::Vector3<f64>>,
}

/// Eigenpair with the smallest eigenvalue magnitude, the direction of least variance.
/// Equal eigenvalues resolve to the first one in solver order.
pub fn least_variance(covariance: &Covariance, options: &EigenOptions) -> Result<EigenPair, Error> {
	let mat = covariance.normalized();
	let pair = match options.solver {
		Solver::Iterative { epsilon, max_iterations } => iterative(mat, epsilon, max_iterations)?,
		Solver::Analytic => match analytic(mat) {
			Some(pair) => pair,
			None => {
				log::debug!("repeated smallest eigenvalue, using iterative solver");
				iterative(mat, DEFAULT_EPSILON, 0)?
			},
		},
	};
	Ok(EigenPair { value: covariance.rescale(pair.value), vector: pair.vector })
}

fn iterative(mat: &na::Matrix3<f64>, epsilon: f64, max_iterations: usize) -> Result<EigenPair, Error> {
	let eigen =
		na::SymmetricEigen::try_new(*mat, epsilon, max_iterations).ok_or(Error::NoConvergence { max_iterations })?;
	let index = smallest(&eigen.eigenvalues);
	Ok(EigenPair {
		value: eigen.eigenvalues[index],
		vector: normalize(eigen.eigenvectors.column(index).into_owned()),
	})
}

fn analytic(mat: &na::Matrix3<f64>) -> Option<EigenPair> {
	let eigen_values = closed_form_eigenvalues(mat);
	let index = smallest(&eigen_values);
	let value = eigen_values[index];

	// rows of (mat - value * I) span the plane orthogonal to the eigenvector
	let mut shifted = *mat;
	for i in 0..3 {
		shifted[(i, i)] -= value;
	}
	let rows = [
		shifted.row(0).transpose(),
		shifted.row(1).transpose(),
		shifted.row(2).transpose(),
	];
	let vector = [(0, 1), (0, 2), (1, 2)]
		.into_iter()
		.map(|(a, b)| rows[a].cross(&rows[b]))
		.max_by(|a, b| a.norm_squared().total_cmp(&b.norm_squared()))?;

	let scale = mat.amax();
	if vector.norm() <= REPEATED_EIGENVALUE_TOLERANCE * scale * scale {
		return None;
	}
	Some(EigenPair { value, vector: normalize(vector) })
}

// trigonometric roots of the characteristic polynomial, largest first
// https://en.wikipedia.org/wiki/Eigenvalue_algorithm#3%C3%973_matrices
fn closed_form_eigenvalues(mat: &na::Matrix3<f64>) -> na::Vector3<f64> {
	let mean = mat.trace() / 3.0;
	let deviation = mat - na::Matrix3::identity() * mean;
	let spread = (deviation.norm_squared() / 6.0).sqrt();
	if spread == 0.0 {
		return na::Vector3::repeat(mean);
	}

	let half_determinant = (deviation / spread).determinant() / 2.0;
	let angle = half_determinant.clamp(-1.0, 1.0).acos() / 3.0;
	let largest = mean + 2.0 * spread * angle.cos();
	let lowest = mean + 2.0 * spread * (angle + 2.0 * std::f64::consts::FRAC_PI_3).cos();
	na::vector![largest, 3.0 * mean - largest - lowest, lowest]
}

fn smallest(values: &na::Vector3<f64>) -> usize {
	let mut best = 0;
	for i in 1..3 {
		if values[i].abs() < values[best].abs() {
			best = i;
		}
	}
	best
}

fn normalize(vector: na::Vector3<f64>) -> na::Unit<na::Vector3<f64>> {
	na::Unit::try_new(vector, 0.0).unwrap_or_else(na::Vector3::z_axis)
}
