// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rotations about the vertical axis

use nalgebra::{Matrix3, Rotation3, Vector3};

/// Rotation by `angle` radians about +Z
///
/// `[[cos, -sin, 0], [sin, cos, 0], [0, 0, 1]]`
pub fn rotation_z(angle: f64) -> Matrix3<f64> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), angle).into_inner()
}

/// Row-major nested array form of a 3x3 matrix
pub fn to_rows(m: &Matrix3<f64>) -> [[f64; 3]; 3] {
    [
        [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
        [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
        [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
    ]
}

pub fn from_rows(rows: &[[f64; 3]; 3]) -> Matrix3<f64> {
    Matrix3::new(
        rows[0][0], rows[0][1], rows[0][2], rows[1][0], rows[1][1], rows[1][2], rows[2][0],
        rows[2][1], rows[2][2],
    )
}

/// Yaw recovered from a rotation about +Z
pub fn yaw(m: &Matrix3<f64>) -> f64 {
    m[(1, 0)].atan2(m[(0, 0)])
}
