use cgmath::Matrix4;

use crate::input::SceneCommand;

use super::{
    animation::AnimationState,
    transform::{
        animated_model_matrix, normal_matrix, static_model_matrix, CameraPreset,
        ProjectionPreset, ScaleHook, YawRotation, ROTATION_STEP,
    },
};

/// Number of reserved instance offsets. Not consumed by rendering yet.
pub const INSTANCE_SLOTS: usize = 10;

/// The three objects in the scene, in draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneObjectId {
    Animated,
    Cylinder,
    Cones,
}

impl SceneObjectId {
    pub const DRAW_ORDER: [SceneObjectId; 3] = [
        SceneObjectId::Animated,
        SceneObjectId::Cylinder,
        SceneObjectId::Cones,
    ];

    /// Index into per-object tables (meshes, uniforms).
    pub fn index(self) -> usize {
        match self {
            SceneObjectId::Animated => 0,
            SceneObjectId::Cylinder => 1,
            SceneObjectId::Cones => 2,
        }
    }
}

/// Model and normal matrices for one object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectMatrices {
    pub model: Matrix4<f32>,
    pub normal: Matrix4<f32>,
}

impl ObjectMatrices {
    pub fn from_model(model: Matrix4<f32>) -> Self {
        Self {
            model,
            normal: normal_matrix(model),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Placement {
    /// Follows the motion path under the user rotation. Recomputed per frame.
    MotionPath,
    /// Fixed translation, exempt from rotation. Computed once.
    Fixed(ObjectMatrices),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneObject {
    pub id: SceneObjectId,
    placement: Placement,
}

impl SceneObject {
    pub fn animated() -> Self {
        Self {
            id: SceneObjectId::Animated,
            placement: Placement::MotionPath,
        }
    }

    pub fn fixed(id: SceneObjectId, offset_x: f32) -> Self {
        Self {
            id,
            placement: Placement::Fixed(ObjectMatrices::from_model(static_model_matrix(offset_x))),
        }
    }

    pub fn is_animated(&self) -> bool {
        matches!(self.placement, Placement::MotionPath)
    }
}

/// All mutable viewer state: camera, projection, rotation, animation.
///
/// Every command replaces a whole value (a matrix, a flag, a scalar), so the
/// frame renderer never observes a half-applied command.
#[derive(Debug, Clone)]
pub struct SceneState {
    pub rotation: YawRotation,
    pub scale: ScaleHook,
    pub camera: CameraPreset,
    pub view: Matrix4<f32>,
    pub projection_mode: ProjectionPreset,
    pub projection: Matrix4<f32>,
    pub animation: AnimationState,
    pub instancing: bool,
    pub instance_offsets: [[f32; 3]; INSTANCE_SLOTS],
    pub objects: [SceneObject; 3],
    exit_requested: bool,
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneState {
    pub fn new() -> Self {
        let camera = CameraPreset::ViewZ;
        let projection_mode = ProjectionPreset::Perspective;
        Self {
            rotation: YawRotation::default(),
            scale: ScaleHook::default(),
            camera,
            view: camera.view_matrix(),
            projection_mode,
            projection: projection_mode.matrix(),
            animation: AnimationState::new(),
            instancing: false,
            instance_offsets: [[0.0; 3]; INSTANCE_SLOTS],
            objects: [
                SceneObject::animated(),
                SceneObject::fixed(SceneObjectId::Cylinder, -2.0),
                SceneObject::fixed(SceneObjectId::Cones, 2.0),
            ],
            exit_requested: false,
        }
    }

    /// Executes one decoded command.
    pub fn apply(&mut self, command: SceneCommand) {
        log::debug!("Applying {:?}", command);
        match command {
            SceneCommand::Terminate => self.exit_requested = true,
            SceneCommand::RotateLeft => self.rotation.rotate(-ROTATION_STEP),
            SceneCommand::RotateRight => self.rotation.rotate(ROTATION_STEP),
            SceneCommand::ViewX => self.set_camera(CameraPreset::ViewX),
            SceneCommand::ViewY => self.set_camera(CameraPreset::ViewY),
            SceneCommand::ViewZ => self.set_camera(CameraPreset::ViewZ),
            SceneCommand::ProjectionOrthographic => {
                self.set_projection(ProjectionPreset::Orthographic)
            }
            SceneCommand::ProjectionPerspective => {
                self.set_projection(ProjectionPreset::Perspective)
            }
            SceneCommand::ToggleInstancing => self.instancing = !self.instancing,
            SceneCommand::Step => self.animation.step(),
            SceneCommand::StartContinuous => self.animation.start_continuous(),
        }
    }

    pub fn set_camera(&mut self, preset: CameraPreset) {
        self.camera = preset;
        self.view = preset.view_matrix();
    }

    pub fn set_projection(&mut self, preset: ProjectionPreset) {
        self.projection_mode = preset;
        self.projection = preset.matrix();
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn object(&self, id: SceneObjectId) -> &SceneObject {
        &self.objects[id.index()]
    }

    /// Current matrices of an object. The animated object's are derived from
    /// the current rotation and `t` on every call.
    pub fn object_matrices(&self, id: SceneObjectId) -> ObjectMatrices {
        match self.object(id).placement {
            Placement::Fixed(matrices) => matrices,
            Placement::MotionPath => ObjectMatrices::from_model(animated_model_matrix(
                self.rotation.matrix(),
                self.scale.matrix(),
                self.animation.t(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::animation::{AnimationMode, STEP_INCREMENT};
    use crate::gfx::scene::transform::motion_offset;
    use cgmath::{SquareMatrix, Vector4};

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_initial_state() {
        let state = SceneState::new();
        assert_eq!(state.view, CameraPreset::ViewZ.view_matrix());
        assert_eq!(state.projection, ProjectionPreset::Perspective.matrix());
        assert_eq!(state.rotation.matrix(), Matrix4::identity());
        assert_eq!(state.animation.t(), 0.0);
        assert_eq!(state.animation.mode(), AnimationMode::Continuous);
        assert!(!state.instancing);
        assert!(!state.exit_requested());
    }

    #[test]
    fn test_projection_switch_leaves_view_and_rotation() {
        let mut state = SceneState::new();
        state.apply(SceneCommand::RotateRight);
        state.apply(SceneCommand::ViewX);
        let view = state.view;
        let rotation = state.rotation;

        state.apply(SceneCommand::ProjectionOrthographic);
        assert_eq!(state.projection, ProjectionPreset::Orthographic.matrix());
        assert_eq!(state.view, view);
        assert_eq!(state.rotation, rotation);

        state.apply(SceneCommand::ProjectionPerspective);
        assert_eq!(state.projection, ProjectionPreset::Perspective.matrix());
        assert_eq!(state.view, view);
        assert_eq!(state.rotation, rotation);
    }

    #[test]
    fn test_camera_preset_twice_is_bit_identical() {
        let mut state = SceneState::new();
        state.apply(SceneCommand::ViewY);
        let first = state.view;
        state.apply(SceneCommand::ViewY);
        assert_eq!(state.view, first);
    }

    #[test]
    fn test_rotation_commands_cancel() {
        let mut state = SceneState::new();
        for _ in 0..10 {
            state.apply(SceneCommand::RotateRight);
        }
        for _ in 0..10 {
            state.apply(SceneCommand::RotateLeft);
        }
        let identity = Matrix4::<f32>::identity();
        let rotation = state.rotation.matrix();
        for col in 0..4 {
            for row in 0..4 {
                assert!((rotation[col][row] - identity[col][row]).abs() < EPSILON);
            }
        }
    }

    #[test]
    fn test_rotate_right_is_positive() {
        let mut state = SceneState::new();
        state.apply(SceneCommand::RotateRight);
        assert!((state.rotation.degrees() - 10.0).abs() < EPSILON);
        state.apply(SceneCommand::RotateLeft);
        state.apply(SceneCommand::RotateLeft);
        assert!((state.rotation.degrees() - 350.0).abs() < EPSILON);
    }

    #[test]
    fn test_step_and_continuous_commands() {
        let mut state = SceneState::new();
        state.apply(SceneCommand::Step);
        assert_eq!(state.animation.t(), STEP_INCREMENT);
        assert_eq!(state.animation.mode(), AnimationMode::Stepped);

        state.apply(SceneCommand::StartContinuous);
        assert_eq!(state.animation.t(), STEP_INCREMENT);
        assert_eq!(state.animation.mode(), AnimationMode::Continuous);
    }

    #[test]
    fn test_toggle_instancing_has_no_other_effect() {
        let mut state = SceneState::new();
        let before = state.object_matrices(SceneObjectId::Animated);
        state.apply(SceneCommand::ToggleInstancing);
        assert!(state.instancing);
        assert_eq!(state.object_matrices(SceneObjectId::Animated), before);
        state.apply(SceneCommand::ToggleInstancing);
        assert!(!state.instancing);
    }

    #[test]
    fn test_terminate_requests_exit() {
        let mut state = SceneState::new();
        state.apply(SceneCommand::Terminate);
        assert!(state.exit_requested());
    }

    #[test]
    fn test_static_objects_ignore_rotation() {
        let mut state = SceneState::new();
        let cylinder = state.object_matrices(SceneObjectId::Cylinder);
        let cones = state.object_matrices(SceneObjectId::Cones);
        state.apply(SceneCommand::RotateRight);
        state.apply(SceneCommand::Step);
        assert_eq!(state.object_matrices(SceneObjectId::Cylinder), cylinder);
        assert_eq!(state.object_matrices(SceneObjectId::Cones), cones);

        let origin = cylinder.model * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(origin.x, -2.0);
        let origin = cones.model * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(origin.x, 2.0);
    }

    #[test]
    fn test_animated_object_follows_t() {
        let mut state = SceneState::new();
        for _ in 0..5 {
            state.apply(SceneCommand::Step);
        }
        let matrices = state.object_matrices(SceneObjectId::Animated);
        let origin = matrices.model * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let expected = motion_offset(state.animation.t());
        assert!((origin.x - expected.x).abs() < EPSILON);
        assert!((origin.z - expected.z).abs() < EPSILON);
        assert!(state.object(SceneObjectId::Animated).is_animated());
    }
}
