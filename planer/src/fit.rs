use nalgebra as na;

use crate::{
	admission::{self, Admission, PointInput},
	covariance::{Coordinates, Covariance},
	eigen::{self, EigenOptions},
	plane::Plane,
	Error,
};

pub const MIN_POINTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Options {
	pub eigen: EigenOptions,
	pub admission: Admission,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PlaneResult<P = Plane> {
	pub plane: P,
	/// Centroid of the points, lies on the plane.
	pub center: na::Point3<f64>,
	/// Smallest eigenvalue of the covariance matrix.
	/// For point input this is the mean squared distance of the points to the plane.
	pub variance: f64,
}

struct Estimate {
	normal: na::Unit<na::Vector3<f64>>,
	center: na::Point3<f64>,
	variance: f64,
}

/// Fits a plane through the points.
/// Returns `Ok(None)` for missing input or less than three points.
pub fn fit<'a>(
	points: impl Into<Option<&'a [PointInput]>>,
	options: &Options,
) -> Result<Option<PlaneResult>, Error> {
	let Some(estimate) = estimate(points.into(), options)? else {
		return Ok(None);
	};
	Ok(Some(PlaneResult {
		plane: Plane::from_normal_and_coplanar_point(estimate.normal, &estimate.center),
		center: estimate.center,
		variance: estimate.variance,
	}))
}

/// Like [`fit`], but overwrites `plane` and returns it inside the result.
/// `plane` is left untouched when there is no result.
pub fn fit_into<'a, 'p>(
	points: impl Into<Option<&'a [PointInput]>>,
	options: &Options,
	plane: &'p mut Plane,
) -> Result<Option<PlaneResult<&'p mut Plane>>, Error> {
	let Some(estimate) = estimate(points.into(), options)? else {
		return Ok(None);
	};
	Ok(Some(PlaneResult {
		plane: plane.set_from_normal_and_coplanar_point(estimate.normal, &estimate.center),
		center: estimate.center,
		variance: estimate.variance,
	}))
}

/// Fits a plane from a precomputed covariance matrix and the centroid of its points.
pub fn fit_covariance(
	covariance: na::Matrix3<f64>,
	center: na::Point3<f64>,
	options: &EigenOptions,
) -> Result<PlaneResult, Error> {
	let covariance = Covariance::from_matrix(covariance)?;
	let pair = eigen::least_variance(&covariance, options)?;
	Ok(PlaneResult {
		plane: Plane::from_normal_and_coplanar_point(pair.vector, &center),
		center,
		variance: pair.value,
	})
}

fn estimate(points: Option<&[PointInput]>, options: &Options) -> Result<Option<Estimate>, Error> {
	let points = match points {
		Some(points) if points.len() >= MIN_POINTS => points,
		Some(points) => {
			log::debug!("{} points are not enough to fit a plane", points.len());
			return Ok(None);
		},
		None => return Ok(None),
	};

	let estimate = match options.admission {
		Admission::Safe => solve(&admission::copy(points), &options.eigen)?,
		Admission::Unsafe => solve(admission::trust(points), &options.eigen)?,
	};
	Ok(Some(estimate))
}

fn solve<P: Coordinates>(points: &[P], options: &EigenOptions) -> Result<Estimate, Error> {
	let finite = points
		.iter()
		.all(|point| point.position().coords.iter().all(|value| value.is_finite()));
	if !finite {
		return Err(Error::NonFinite);
	}
	let (center, covariance) = Covariance::from_points(points);
	if !center.coords.iter().all(|value| value.is_finite()) || !covariance.is_finite() {
		return Err(Error::NonFinite);
	}
	let pair = eigen::least_variance(&covariance, options)?;
	log::debug!(
		"fitted plane through {} points with normal {:?} and variance {}",
		points.len(),
		pair.vector.as_slice(),
		pair.value,
	);
	Ok(Estimate { normal: pair.vector, center, variance: pair.value })
}
