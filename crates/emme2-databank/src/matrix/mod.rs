//! Matrix names and the matrix directory
//!
//! Matrices are addressed by short names: `m`, a type letter and a number,
//! e.g. `mf61` for full matrix 61. The matrix directory in File 60 records,
//! for every type and number, whether the matrix is defined and how it is
//! stored. Cell values are not read here.

pub mod directory;
pub mod flags;
pub mod name;

pub use directory::{MATRIX_DIRECTORY_FILE, MatrixDirectory};
pub use flags::MatrixFlags;
pub use name::{MATRIX_TYPE_COUNT, MatrixId, MatrixType, matrix_number, matrix_type};
