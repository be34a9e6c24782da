#![doc = include_str!("../readme.md")]

mod admission;
mod covariance;
mod eigen;
mod error;
mod fit;
mod plane;

pub use admission::{Admission, PointInput};
pub use covariance::{centroid, Coordinates, Covariance};
pub use eigen::{least_variance, EigenOptions, EigenPair, Solver};
pub use error::Error;
pub use fit::{fit, fit_covariance, fit_into, Options, PlaneResult, MIN_POINTS};
pub use plane::Plane;
