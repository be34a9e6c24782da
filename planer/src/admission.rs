use nalgebra as na;

use crate::covariance::Coordinates;

/// A single input point, either plain coordinates or a nalgebra point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointInput {
	Triple([f64; 3]),
	Point(na::Point3<f64>),
}

impl PointInput {
	pub fn is_point(&self) -> bool {
		matches!(self, Self::Point(_))
	}

	pub fn to_point(&self) -> na::Point3<f64> {
		match *self {
			Self::Triple(triple) => triple.into(),
			Self::Point(point) => point,
		}
	}
}

impl From<[f64; 3]> for PointInput {
	fn from(value: [f64; 3]) -> Self {
		Self::Triple(value)
	}
}

impl From<na::Point3<f64>> for PointInput {
	fn from(value: na::Point3<f64>) -> Self {
		Self::Point(value)
	}
}

impl From<na::Vector3<f64>> for PointInput {
	fn from(value: na::Vector3<f64>) -> Self {
		Self::Point(value.into())
	}
}

impl Coordinates for PointInput {
	fn position(&self) -> na::Point3<f64> {
		self.to_point()
	}
}

/// How the input points are checked before fitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Admission {
	/// Every point is read by its own kind into an owned copy.
	#[default]
	Safe,
	/// Only the first point is inspected and the input is used without a copy.
	/// Mixed input is a caller error and only checked in debug builds.
	Unsafe,
}

pub(crate) fn copy(points: &[PointInput]) -> Vec<na::Point3<f64>> {
	let rich = points.iter().filter(|point| point.is_point()).count();
	if rich != 0 && rich != points.len() {
		log::debug!("mixed input with {} of {} nalgebra points", rich, points.len());
	}
	points.iter().map(PointInput::to_point).collect()
}

pub(crate) fn trust(points: &[PointInput]) -> &[PointInput] {
	if let Some(first) = points.first() {
		debug_assert!(
			points.iter().all(|point| point.is_point() == first.is_point()),
			"unsafe admission with mixed point kinds",
		);
	}
	points
}
