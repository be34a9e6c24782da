use nalgebra as na;

/// Plane with the equation `normal · x + constant = 0`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Plane {
	pub normal: na::Unit<na::Vector3<f64>>,
	pub constant: f64,
}

impl Default for Plane {
	fn default() -> Self {
		Self { normal: na::Vector3::x_axis(), constant: 0.0 }
	}
}

impl Plane {
	pub fn from_normal_and_coplanar_point(normal: na::Unit<na::Vector3<f64>>, point: &na::Point3<f64>) -> Self {
		let mut plane = Self::default();
		plane.set_from_normal_and_coplanar_point(normal, point);
		plane
	}

	pub fn set_from_normal_and_coplanar_point(
		&mut self,
		normal: na::Unit<na::Vector3<f64>>,
		point: &na::Point3<f64>,
	) -> &mut Self {
		self.normal = normal;
		self.constant = -normal.dot(&point.coords);
		self
	}

	/// Signed distance, positive on the side the normal points to.
	pub fn distance_to_point(&self, point: &na::Point3<f64>) -> f64 {
		self.normal.dot(&point.coords) + self.constant
	}

	pub fn project_point(&self, point: &na::Point3<f64>) -> na::Point3<f64> {
		*point - self.normal.into_inner() * self.distance_to_point(point)
	}

	/// Point of the plane closest to the origin.
	pub fn coplanar_point(&self) -> na::Point3<f64> {
		(self.normal.into_inner() * -self.constant).into()
	}

	pub fn flipped(&self) -> Self {
		Self { normal: -self.normal, constant: -self.constant }
	}
}
