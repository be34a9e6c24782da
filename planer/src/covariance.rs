use nalgebra as na;

use crate::Error;

const SYMMETRY_TOLERANCE: f64 = 1e-9;

pub trait Coordinates {
	fn position(&self) -> na::Point3<f64>;
}

impl Coordinates for na::Point3<f64> {
	fn position(&self) -> na::Point3<f64> {
		*self
	}
}

impl Coordinates for na::Vector3<f64> {
	fn position(&self) -> na::Point3<f64> {
		(*self).into()
	}
}

impl Coordinates for [f64; 3] {
	fn position(&self) -> na::Point3<f64> {
		(*self).into()
	}
}

/// Real symmetric 3x3 matrix of second central moments.
///
/// Stored as `normalized * scale * scale` with entries of `normalized` at most 1 in magnitude,
/// so clouds with large coordinates do not overflow while accumulating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Covariance {
	normalized: na::Matrix3<f64>,
	scale: f64,
}

impl Covariance {
	/// Population covariance of the points, normalized by their count.
	/// Returns the centroid as well, both are calculated from the same points.
	pub fn from_points<P: Coordinates>(points: &[P]) -> (na::Point3<f64>, Self) {
		let mean = centroid(points);
		let scale = points
			.iter()
			.map(|point| (point.position() - mean).amax())
			.fold(0.0, f64::max);
		let scale = if scale > 0.0 { scale } else { 1.0 };

		let mut variance = na::Matrix3::<f64>::zeros();
		for point in points {
			let difference = (point.position() - mean) / scale;
			for x in 0..3 {
				for y in x..3 {
					variance[(x, y)] += difference[x] * difference[y];
				}
			}
		}
		let count = points.len().max(1) as f64;
		for x in 0..3 {
			for y in x..3 {
				variance[(x, y)] /= count;
				variance[(y, x)] = variance[(x, y)];
			}
		}
		(mean, Self { normalized: variance, scale })
	}

	/// Accepts a matrix the caller already computed as covariance.
	pub fn from_matrix(matrix: na::Matrix3<f64>) -> Result<Self, Error> {
		if matrix.iter().any(|value| !value.is_finite()) {
			return Err(Error::NonFinite);
		}
		let largest = matrix.amax();
		let tolerance = SYMMETRY_TOLERANCE * largest.max(1.0);
		for row in 0..3 {
			for column in (row + 1)..3 {
				if (matrix[(row, column)] - matrix[(column, row)]).abs() > tolerance {
					return Err(Error::NotSymmetric { row, column });
				}
			}
		}
		if largest == 0.0 {
			return Ok(Self { normalized: matrix, scale: 1.0 });
		}
		Ok(Self { normalized: matrix / largest, scale: largest.sqrt() })
	}

	/// The covariance matrix. Saturates to infinity for clouds whose variance exceeds `f64`.
	pub fn matrix(&self) -> na::Matrix3<f64> {
		self.normalized * self.scale * self.scale
	}

	pub(crate) fn normalized(&self) -> &na::Matrix3<f64> {
		&self.normalized
	}

	/// Maps an eigenvalue of the normalized matrix back to the covariance.
	pub(crate) fn rescale(&self, value: f64) -> f64 {
		value * self.scale * self.scale
	}

	pub(crate) fn is_finite(&self) -> bool {
		self.scale.is_finite() && self.normalized.iter().all(|value| value.is_finite())
	}
}

pub fn centroid<P: Coordinates>(points: &[P]) -> na::Point3<f64> {
	if points.is_empty() {
		return na::Point3::origin();
	}
	let mut mean = na::Vector3::<f64>::zeros();
	for point in points {
		mean += point.position().coords;
	}
	(mean / points.len() as f64).into()
}

#[cfg(test)]
mod tests {
	use approx::assert_relative_eq;

	use super::*;

	#[test]
	fn population_covariance() {
		let points = [[1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, -2.0, 0.0]];
		let (center, covariance) = Covariance::from_points(&points);
		assert_eq!(center, na::Point3::origin());
		assert_relative_eq!(covariance.matrix(), na::Matrix3::from_diagonal(&na::vector![0.5, 2.0, 0.0]));
	}

	#[test]
	fn covariance_ignores_translation() {
		let points = [[1.0, 2.0, 3.0], [2.0, 0.5, -1.0], [-4.0, 1.0, 0.0], [0.3, 0.3, 0.3]];
		let shifted = points.map(|[x, y, z]| [x + 100.0, y - 50.0, z + 7.0]);
		let (center, covariance) = Covariance::from_points(&points);
		let (shifted_center, shifted_covariance) = Covariance::from_points(&shifted);
		assert_relative_eq!(shifted_center, center + na::vector![100.0, -50.0, 7.0], epsilon = 1e-12);
		assert_relative_eq!(shifted_covariance.matrix(), covariance.matrix(), epsilon = 1e-9);
	}

	#[test]
	fn identical_points_give_zero_matrix() {
		let points = [na::Point3::new(1.5, -2.0, 3.0); 5];
		let (center, covariance) = Covariance::from_points(&points);
		assert_eq!(center, points[0]);
		assert_eq!(covariance.matrix(), na::Matrix3::zeros());
	}

	#[test]
	fn matrix_must_be_symmetric() {
		let matrix = na::matrix![
			3.0, 2.0, 1.0;
			2.0, 1.0, 4.0;
			1.0, 4.0, 2.0;
		];
		assert_eq!(Covariance::from_matrix(matrix).map(|c| c.matrix()), Ok(matrix));

		let mut broken = matrix;
		broken[(1, 2)] = 4.5;
		assert_eq!(Covariance::from_matrix(broken), Err(Error::NotSymmetric { row: 1, column: 2 }));

		broken[(1, 2)] = f64::NAN;
		assert_eq!(Covariance::from_matrix(broken), Err(Error::NonFinite));
	}

	#[test]
	fn empty_centroid() {
		assert_eq!(centroid::<[f64; 3]>(&[]), na::Point3::origin());
	}

	#[test]
	fn large_coordinates_do_not_overflow() {
		let points = [[1e200, 0.0, 0.0], [0.0, 1e200, 0.0], [0.0, 0.0, 1e200]];
		let (center, covariance) = Covariance::from_points(&points);
		assert!(covariance.is_finite());
		assert_relative_eq!(center.coords, na::Vector3::repeat(1e200 / 3.0), max_relative = 1e-12);
		assert!(covariance.normalized().amax() <= 1.0);
	}

	#[test]
	fn matrix_round_trip() {
		let matrix = na::matrix![
			40.0, 2.0, -1.0;
			2.0, 10.0, 4.0;
			-1.0, 4.0, 20.0;
		];
		let covariance = Covariance::from_matrix(matrix).unwrap();
		assert_relative_eq!(covariance.matrix(), matrix, max_relative = 1e-12);
		assert_relative_eq!(covariance.normalized().amax(), 1.0);
		assert_relative_eq!(covariance.rescale(0.5), 20.0, max_relative = 1e-12);
	}
}
