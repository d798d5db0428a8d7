//! Dense linear algebra used by the fitting engines
//!
//! - [`Matrix`]: a bounds-checked dense matrix with the elementary row operations
//!   needed for elimination.
//! - [`Vector`]: a small helper for norms, dot products and matrix-vector products.
//! - [`GaussJordan`]: a full-pivot Gauss-Jordan solver for `A·X = B`.
//!
//! Storage is backed by `nalgebra`, but every access goes through checked accessors
//! that return [`crate::error::Error::IndexOutOfBounds`] rather than panicking.
//!
//! # Example
//! ```rust
//! use lsqfit::linalg::{GaussJordan, Matrix};
//!
//! let mut a = Matrix::from_rows(&[[2.0_f64, 1.0], [1.0, 3.0]]).unwrap();
//! let mut b = Matrix::from_rows(&[[3.0_f64], [5.0]]).unwrap();
//! GaussJordan::solve(&mut a, &mut b).unwrap();
//!
//! // x = 0.8, y = 1.4
//! assert!((b.get(0, 0).unwrap() - 0.8).abs() < 1e-12);
//! assert!((b.get(1, 0).unwrap() - 1.4).abs() < 1e-12);
//! ```
mod gauss_jordan;
pub use gauss_jordan::GaussJordan;

mod matrix;
pub use matrix::{Matrix, Pivot};

mod vector;
pub use vector::Vector;
