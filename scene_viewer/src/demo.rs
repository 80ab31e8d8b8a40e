//! Synthesized room used when no fragment is given

use spatial_scene::foundation::math::{mat4_to_rows, Quat, Transform, Vec3};
use spatial_scene::scene::{Scene, SceneMesh, SceneObjectKind, SceneObjectRecord, SceneQuad, SurfaceKind, SurfaceMask};

const ROOM_WIDTH: f32 = 5.0;
const ROOM_DEPTH: f32 = 4.0;
const ROOM_HEIGHT: f32 = 2.6;

fn placed(kind: SceneObjectKind, position: Vec3, rotation: Quat) -> SceneObjectRecord {
    let location = Transform::from_position_rotation(position, rotation).to_matrix();
    SceneObjectRecord::new(kind, mat4_to_rows(&location))
}

/// Floor mask with an unobserved corner and an inferred strip
fn floor_mask() -> SurfaceMask {
    let (width, height) = (16u16, 16u16);
    let texels = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .map(|(x, y)| {
            if x < 4 && y < 4 {
                SurfaceKind::NotSurface as u8
            } else if y > 12 {
                SurfaceKind::SurfaceInferred as u8
            } else {
                SurfaceKind::SurfaceObserved as u8
            }
        })
        .collect();
    SurfaceMask { width, height, texels }
}

fn box_mesh(size: Vec3) -> SceneMesh {
    let (x, y, z) = (size.x, size.y, size.z);
    SceneMesh {
        positions: vec![
            [0.0, 0.0, 0.0], [x, 0.0, 0.0], [x, y, 0.0], [0.0, y, 0.0],
            [0.0, 0.0, z], [x, 0.0, z], [x, y, z], [0.0, y, z],
        ],
        indices: vec![
            0, 2, 1, 0, 3, 2, // back
            4, 5, 6, 4, 6, 7, // front
            0, 1, 5, 0, 5, 4, // bottom
            3, 7, 6, 3, 6, 2, // top
            0, 4, 7, 0, 7, 3, // left
            1, 2, 6, 1, 6, 5, // right
        ],
    }
}

/// A small furnished room in provider space (right-handed, Y up)
pub fn room() -> Scene {
    let level = Quat::from_axis_angle(&Vec3::x_axis(), -std::f32::consts::FRAC_PI_2);

    let mut floor = placed(SceneObjectKind::Floor, Vec3::zeros(), level);
    floor.quads.push(SceneQuad {
        extents: [ROOM_WIDTH, ROOM_DEPTH],
        mask: Some(floor_mask()),
    });

    let mut ceiling = placed(SceneObjectKind::Ceiling, Vec3::new(0.0, ROOM_HEIGHT, 0.0), level);
    ceiling.quads.push(SceneQuad::new(ROOM_WIDTH, ROOM_DEPTH));

    let mut objects = vec![floor, ceiling];

    for (i, (position, yaw, length)) in [
        (Vec3::new(0.0, ROOM_HEIGHT / 2.0, -ROOM_DEPTH / 2.0), 0.0, ROOM_WIDTH),
        (Vec3::new(ROOM_WIDTH / 2.0, ROOM_HEIGHT / 2.0, 0.0), -std::f32::consts::FRAC_PI_2, ROOM_DEPTH),
        (Vec3::new(-ROOM_WIDTH / 2.0, ROOM_HEIGHT / 2.0, 0.0), std::f32::consts::FRAC_PI_2, ROOM_DEPTH),
    ]
    .into_iter()
    .enumerate()
    {
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), yaw);
        let mut wall = placed(SceneObjectKind::Wall, position, rotation);
        wall.quads.push(SceneQuad::new(length, ROOM_HEIGHT));
        let mesh = box_mesh(Vec3::new(length, ROOM_HEIGHT, 0.1));
        wall.meshes.push(mesh.clone());
        wall.collider_meshes.push(mesh);
        log::debug!("demo: wall {i} is {length} m long");
        objects.push(wall);
    }

    let mut table = placed(SceneObjectKind::Platform, Vec3::new(0.5, 0.0, 0.5), Quat::identity());
    table.quads.push(SceneQuad::new(1.2, 0.8));
    let top = box_mesh(Vec3::new(1.2, 0.75, 0.8));
    table.meshes.push(top.clone());
    table.collider_meshes.push(top);
    objects.push(table);

    let mut world = placed(SceneObjectKind::World, Vec3::zeros(), Quat::identity());
    world.meshes.push(box_mesh(Vec3::new(ROOM_WIDTH, ROOM_HEIGHT, ROOM_DEPTH)));
    objects.push(world);

    Scene::new(objects)
}
