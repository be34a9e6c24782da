#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
	#[error("Covariance matrix is not symmetric at ({row}, {column})")]
	NotSymmetric { row: usize, column: usize },

	#[error("Input contains non-finite values")]
	NonFinite,

	#[error("Eigen decomposition did not converge within {max_iterations} iterations")]
	NoConvergence { max_iterations: usize },
}
