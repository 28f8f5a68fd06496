pub mod angles;
pub mod euler;

pub use angles::{normalize_angle, AllowedAngles};
pub use euler::{euler_to_matrix, matrix_to_euler, rotate_point_around, Composition};
