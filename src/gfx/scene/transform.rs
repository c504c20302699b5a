//! # Transform Pipeline
//!
//! Model, view, projection and normal matrices. All matrices here use the
//! OpenGL clip convention (depth in [-1, 1]); [`OPENGL_TO_WGPU_MATRIX`] is
//! applied only when the projection is uploaded.
//!
//! The animated object's model matrix is composed as
//! `rotation * scale * translate(dx, 0, dz)` with rotation outermost, where
//! `dx = 5 sin(t + pi/2)` and `dz = 5 sin(2t)`.

use std::f32::consts::FRAC_PI_2;

use cgmath::{Deg, Matrix, Matrix4, Point3, SquareMatrix, Vector3};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Amplitude of the motion path in world units.
pub const PATH_AMPLITUDE: f32 = 5.0;

/// Angle applied by one rotate-left / rotate-right command.
pub const ROTATION_STEP: Deg<f32> = Deg(10.0);

/// Distance of every camera preset from the origin.
pub const CAMERA_DISTANCE: f32 = 25.0;

/// Offset of the animated object along its path at parameter `t`. Y is always 0.
pub fn motion_offset(t: f32) -> Vector3<f32> {
    Vector3::new(
        PATH_AMPLITUDE * (t + FRAC_PI_2).sin(),
        0.0,
        PATH_AMPLITUDE * (2.0 * t).sin(),
    )
}

/// Model matrix of the animated object.
pub fn animated_model_matrix(rotation: Matrix4<f32>, scale: Matrix4<f32>, t: f32) -> Matrix4<f32> {
    rotation * scale * Matrix4::from_translation(motion_offset(t))
}

/// Model matrix of a static object: a plain translation along X.
pub fn static_model_matrix(offset_x: f32) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(offset_x, 0.0, 0.0))
}

/// Inverse-transpose of a model matrix. A singular matrix (zero scale) has
/// no meaningful normal transform and maps to identity.
pub fn normal_matrix(model: Matrix4<f32>) -> Matrix4<f32> {
    match model.invert() {
        Some(inverse) => inverse.transpose(),
        None => {
            log::warn!("Model matrix is singular, using identity normal matrix");
            Matrix4::identity()
        }
    }
}

/// Persistent rotation about the world Y axis.
///
/// Stored as a wrapped angle rather than an accumulated matrix so long
/// sessions do not drift.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct YawRotation {
    degrees: f32,
}

impl YawRotation {
    pub fn degrees(&self) -> f32 {
        self.degrees
    }

    pub fn rotate(&mut self, delta: Deg<f32>) {
        self.degrees = (self.degrees + delta.0).rem_euclid(360.0);
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_angle_y(Deg(self.degrees))
    }
}

/// Uniform-per-axis scale hook. Identity in the current design.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleHook {
    pub factors: Vector3<f32>,
}

impl Default for ScaleHook {
    fn default() -> Self {
        Self {
            factors: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl ScaleHook {
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_nonuniform_scale(self.factors.x, self.factors.y, self.factors.z)
    }
}

/// Fixed camera positions, all looking at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraPreset {
    ViewX,
    ViewY,
    ViewZ,
}

impl CameraPreset {
    pub fn eye(self) -> Point3<f32> {
        match self {
            CameraPreset::ViewX => Point3::new(CAMERA_DISTANCE, 0.0, 0.0),
            CameraPreset::ViewY => Point3::new(0.0, CAMERA_DISTANCE, 0.0),
            CameraPreset::ViewZ => Point3::new(0.0, 0.0, CAMERA_DISTANCE),
        }
    }

    pub fn up(self) -> Vector3<f32> {
        match self {
            CameraPreset::ViewX | CameraPreset::ViewZ => Vector3::unit_y(),
            // Looking straight down Y, so Y cannot be "up".
            CameraPreset::ViewY => Vector3::unit_z(),
        }
    }

    pub fn view_matrix(self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye(), Point3::new(0.0, 0.0, 0.0), self.up())
    }
}

/// Projection modes selectable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionPreset {
    Perspective,
    Orthographic,
}

impl ProjectionPreset {
    pub const FOV_Y: Deg<f32> = Deg(60.0);
    pub const ASPECT: f32 = 1.0;
    pub const NEAR: f32 = 0.01;
    pub const FAR: f32 = 1000.0;
    pub const ORTHO_EXTENT: f32 = 100.0;

    pub fn matrix(self) -> Matrix4<f32> {
        match self {
            ProjectionPreset::Perspective => {
                cgmath::perspective(Self::FOV_Y, Self::ASPECT, Self::NEAR, Self::FAR)
            }
            ProjectionPreset::Orthographic => {
                let e = Self::ORTHO_EXTENT;
                cgmath::ortho(-e, e, -e, e, -e, e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Vector4, Zero};

    const EPSILON: f32 = 1e-4;

    fn assert_matrix_near(a: Matrix4<f32>, b: Matrix4<f32>) {
        for col in 0..4 {
            for row in 0..4 {
                assert!(
                    (a[col][row] - b[col][row]).abs() < EPSILON,
                    "mismatch at [{}][{}]: {} vs {}",
                    col,
                    row,
                    a[col][row],
                    b[col][row]
                );
            }
        }
    }

    #[test]
    fn test_motion_path_matches_parametric_form() {
        for i in 0..200 {
            let t = i as f32 * 0.037;
            let offset = motion_offset(t);
            assert!((offset.x - 5.0 * (t + FRAC_PI_2).sin()).abs() < EPSILON);
            assert!((offset.z - 5.0 * (2.0 * t).sin()).abs() < EPSILON);
            assert_eq!(offset.y, 0.0);
        }
    }

    #[test]
    fn test_offset_after_five_steps() {
        let offset = motion_offset(0.05);
        assert!((offset.x - 4.994).abs() < 1e-3);
        assert!((offset.z - 0.4996).abs() < 1e-3);
    }

    #[test]
    fn test_animated_model_places_origin_on_path() {
        let t = 1.3;
        let model = animated_model_matrix(Matrix4::identity(), ScaleHook::default().matrix(), t);
        let origin = model * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let expected = motion_offset(t);
        assert!((origin.x - expected.x).abs() < EPSILON);
        assert!(origin.y.abs() < EPSILON);
        assert!((origin.z - expected.z).abs() < EPSILON);
    }

    #[test]
    fn test_rotation_is_outermost() {
        // Rotating 90 degrees about Y maps the path offset (x, 0, z) to (z, 0, -x).
        let mut rotation = YawRotation::default();
        rotation.rotate(Deg(90.0));
        let t = 0.0;
        let model = animated_model_matrix(rotation.matrix(), Matrix4::identity(), t);
        let origin = model * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let offset = motion_offset(t);
        assert!((origin.x - offset.z).abs() < EPSILON);
        assert!((origin.z + offset.x).abs() < EPSILON);
    }

    #[test]
    fn test_scale_hook_composes() {
        let scale = ScaleHook {
            factors: Vector3::new(2.0, 2.0, 2.0),
        };
        let model = animated_model_matrix(Matrix4::identity(), scale.matrix(), 0.0);
        let origin = model * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!((origin.x - 2.0 * PATH_AMPLITUDE).abs() < EPSILON);
    }

    #[test]
    fn test_rotation_round_trip_returns_to_identity() {
        let mut rotation = YawRotation::default();
        for _ in 0..10 {
            rotation.rotate(ROTATION_STEP);
        }
        for _ in 0..10 {
            rotation.rotate(-ROTATION_STEP);
        }
        assert_matrix_near(rotation.matrix(), Matrix4::identity());
    }

    #[test]
    fn test_rotation_wraps() {
        let mut rotation = YawRotation::default();
        for _ in 0..37 {
            rotation.rotate(ROTATION_STEP);
        }
        assert!((rotation.degrees() - 10.0).abs() < EPSILON);
        rotation.rotate(-Deg(20.0));
        assert!((rotation.degrees() - 350.0).abs() < EPSILON);
    }

    #[test]
    fn test_static_normal_matrix_of_translation_keeps_directions() {
        let normal = normal_matrix(static_model_matrix(-2.0));
        let n = normal * Vector4::new(0.0, 1.0, 0.0, 0.0);
        assert!((n.y - 1.0).abs() < EPSILON);
        assert!(n.x.abs() < EPSILON && n.z.abs() < EPSILON);
    }

    #[test]
    fn test_normal_matrix_is_inverse_transpose() {
        let model = Matrix4::from_angle_y(Deg(30.0))
            * Matrix4::from_nonuniform_scale(1.0, 3.0, 0.5)
            * Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0));
        let normal = normal_matrix(model);
        assert_matrix_near(normal.transpose() * model, Matrix4::identity());
    }

    #[test]
    fn test_singular_model_falls_back_to_identity() {
        assert_eq!(normal_matrix(Matrix4::zero()), Matrix4::identity());
    }

    #[test]
    fn test_camera_presets_are_idempotent() {
        for preset in [CameraPreset::ViewX, CameraPreset::ViewY, CameraPreset::ViewZ] {
            assert_eq!(preset.view_matrix(), preset.view_matrix());
        }
    }

    #[test]
    fn test_camera_preset_moves_eye_to_origin() {
        for preset in [CameraPreset::ViewX, CameraPreset::ViewY, CameraPreset::ViewZ] {
            let eye = preset.eye();
            let view_space = preset.view_matrix() * Vector4::new(eye.x, eye.y, eye.z, 1.0);
            assert!(view_space.x.abs() < EPSILON);
            assert!(view_space.y.abs() < EPSILON);
            assert!(view_space.z.abs() < EPSILON);

            let target = preset.view_matrix() * Vector4::new(0.0, 0.0, 0.0, 1.0);
            assert!((target.z + CAMERA_DISTANCE).abs() < EPSILON);
        }
    }

    #[test]
    fn test_orthographic_box_maps_to_unit_cube() {
        let projection = ProjectionPreset::Orthographic.matrix();
        let corner = projection * Vector4::new(100.0, 100.0, -100.0, 1.0);
        assert!((corner.x - 1.0).abs() < EPSILON);
        assert!((corner.y - 1.0).abs() < EPSILON);
        assert!((corner.z - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_perspective_depth_range() {
        let projection = ProjectionPreset::Perspective.matrix();
        let near = projection * Vector4::new(0.0, 0.0, -ProjectionPreset::NEAR, 1.0);
        assert!((near.z / near.w + 1.0).abs() < 1e-3);
        let far = projection * Vector4::new(0.0, 0.0, -ProjectionPreset::FAR, 1.0);
        assert!((far.z / far.w - 1.0).abs() < 1e-3);
    }
}
