//! # EIR Math
//!
//! Numerical optimisation for the Amortis effective interest engine.
//!
//! This crate provides:
//!
//! - **Optimization**: bounded one-parameter nonlinear least squares
//!   (projected Levenberg-Marquardt), used to find the rate that drives a
//!   residual to zero

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::float_cmp)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod optimization;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::optimization::{
        least_squares, least_squares_numerical, LeastSquaresConfig, LeastSquaresResult,
        Termination,
    };
}

pub use error::{MathError, MathResult};
