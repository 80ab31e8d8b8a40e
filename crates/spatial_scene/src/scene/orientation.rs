//! Re-orienting a scene loaded on the desktop
//!
//! Persisted scenes carry no link to a live coordinate system, so "up" is
//! recovered from the data itself: the largest floor quad is assumed to be
//! level, and the scene is rotated so that its normal points along +Y.

use crate::foundation::math::{constants::PI, Quat, Vec3};
use crate::render::coordinates::{to_engine_space, transform_point};
use crate::scene::model::{SceneObjectKind, SceneObjectRecord, SceneQuad};

/// The floor quad chosen by [`largest_floor_quad`]
#[derive(Debug, Clone, Copy)]
pub struct FloorCandidate<'a> {
    /// Owning floor object
    pub object: &'a SceneObjectRecord,
    /// The quad itself
    pub quad: &'a SceneQuad,
    /// Width times height
    pub area: f32,
}

impl FloorCandidate<'_> {
    /// Normal of the quad in engine space, `(p3 - p1) x (p2 - p1)`
    pub fn normal(&self) -> Vec3 {
        let (hw, hh) = (self.quad.extents[0] / 2.0, self.quad.extents[1] / 2.0);
        let location = to_engine_space(&self.object.location_matrix());
        
        let p1 = transform_point(&location, Vec3::new(-hw, -hh, 0.0));
        let p2 = transform_point(&location, Vec3::new(hw, -hh, 0.0));
        let p3 = transform_point(&location, Vec3::new(-hw, hh, 0.0));
        
        (p3 - p1).cross(&(p2 - p1))
    }
}

/// Find the floor quad with the largest area. On ties the first one wins;
/// quads with no area are never chosen.
pub fn largest_floor_quad(objects: &[SceneObjectRecord]) -> Option<FloorCandidate<'_>> {
    let mut best: Option<FloorCandidate<'_>> = None;
    
    for object in objects.iter().filter(|o| o.kind == SceneObjectKind::Floor) {
        for quad in &object.quads {
            let area = quad.area();
            if area > best.map_or(0.0, |b| b.area) {
                best = Some(FloorCandidate { object, quad, area });
            }
        }
    }
    
    best
}

/// Rotation that brings the largest floor's normal onto +Y, or `None` when
/// the scene has no usable floor quad.
pub fn compute_up_rotation(objects: &[SceneObjectRecord]) -> Option<Quat> {
    let floor = largest_floor_quad(objects)?;
    let normal = floor.normal();
    if normal.norm_squared() <= f32::EPSILON {
        log::warn!("compute_up_rotation: largest floor quad has a collapsed normal");
        return None;
    }
    
    let up = Vec3::y();
    Some(
        Quat::rotation_between(&normal, &up)
            // Only fails for a normal pointing straight down
            .unwrap_or_else(|| Quat::from_axis_angle(&Vec3::x_axis(), PI)),
    )
}
