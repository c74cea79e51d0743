use glam::{Mat4, Vec3};

/// Fixed perspective camera looking at a target point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    /// Vertical field of view, radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov_y: 60f32.to_radians(),
            near: 0.1,
            far: 100.0,
            eye: Vec3::new(10.0, 10.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
        }
    }
}

impl Camera {
    /// Right-handed perspective with a 0..1 depth range.
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
}

/// Model matrix: rotation about +Y by `rotation_speed * multiplier` radians.
pub fn model_rotation(rotation_speed: f32, multiplier: f32) -> Mat4 {
    Mat4::from_rotation_y(rotation_speed * multiplier)
}

/// `projection * view * model`, the matrix uploaded for each draw.
pub fn frame_transform(projection: Mat4, view: Mat4, model: Mat4) -> Mat4 {
    projection * view * model
}

#[cfg(test)]
mod tests {
    use std::f32::consts::TAU;

    use super::*;

    #[test]
    fn zero_speed_means_no_rotation() {
        assert_eq!(model_rotation(0.0, 10.0), Mat4::IDENTITY);

        let front = model_rotation(0.0, 10.0).transform_point3(Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(front, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn rotation_angle_is_speed_times_multiplier() {
        let m = model_rotation(25.0, 10.0);
        let expected = Mat4::from_rotation_y(250f32.rem_euclid(TAU));
        assert!(m.abs_diff_eq(expected, 1e-3));
    }

    #[test]
    fn projection_uses_sixty_degree_fov() {
        let p = Camera::default().projection(1.0);
        let focal = 1.0 / 30f32.to_radians().tan();
        assert!((p.y_axis.y - focal).abs() < 1e-5);
        assert!((p.x_axis.x - focal).abs() < 1e-5);
    }

    #[test]
    fn wide_aspect_narrows_horizontal_scale() {
        let p = Camera::default().projection(2.0);
        assert!((p.x_axis.x * 2.0 - p.y_axis.y).abs() < 1e-5);
    }

    #[test]
    fn target_projects_to_screen_center() {
        let cam = Camera::default();
        let mvp = frame_transform(cam.projection(1.0), cam.view(), Mat4::IDENTITY);
        let ndc = mvp.project_point3(Vec3::ZERO);
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }
}
