//! Cooperative scene display
//!
//! A display pass rebuilds the visual tree under the host's root from one or
//! more decoded scenes. The pass is sliced: [`DisplayPipeline::poll`] does a
//! bounded amount of work and returns, so the host can keep rendering frames
//! while a large scene is being built.
//!
//! Each object is fully prepared (meshes, mask texture, colliders) before the
//! first node is created for it, so an object that fails validation leaves no
//! trace in the tree.

use crate::core::config::{DisplayConfig, RenderMode};
use crate::foundation::math::{Mat4, Quat, Transform, Vec3};
use crate::render::coordinates::{decompose, to_engine_space};
use crate::render::{apply_mask, combine_meshes, quad_mesh, Color, GeometryError, MaskError, Material, MaterialKind};
use crate::scene::model::{Scene, SceneObjectKind, SceneObjectRecord};
use crate::scene::orientation::compute_up_rotation;
use crate::scene::scene_graph::{Collider, Geometry, Label, VisualSceneBuilder};
use image::RgbaImage;
use log::{debug, info, warn};
use uuid::Uuid;

/// How the root is posed for one scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RootPlacement {
    /// Scene-to-host transform reported by the provider (provider space)
    Anchored(Mat4),
    /// No anchor available; rotate so the largest floor faces up
    FloorAligned,
    /// The provider could not locate the scene
    Unplaced,
}

/// A decoded scene plus where to put it
#[derive(Debug, Clone)]
pub struct PlacedScene {
    /// Scene content
    pub scene: Scene,
    /// Root placement
    pub placement: RootPlacement,
}

/// Input of one display pass
#[derive(Debug, Clone, Default)]
pub struct DisplayJob {
    /// Scenes to display, in order
    pub scenes: Vec<PlacedScene>,
    /// Snapshot the scenes were decoded from, if any
    pub snapshot_id: Option<Uuid>,
}

/// Counters of a finished pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayReport {
    /// Scenes whose root was placed
    pub scenes: usize,
    /// Scenes skipped for lack of a transform
    pub scenes_skipped: usize,
    /// Objects that made it into the tree
    pub objects_displayed: usize,
    /// Objects rejected by the filter
    pub objects_filtered: usize,
    /// Objects that failed to build
    pub objects_failed: usize,
    /// Snapshot displayed by the pass
    pub snapshot_id: Option<Uuid>,
}

/// Outcome of one [`DisplayPipeline::poll`]
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayProgress {
    /// No pass running
    Idle,
    /// First slice of a new pass ran; call again next frame
    Started,
    /// Work remains; call again next frame
    Yielded,
    /// The pass finished
    Completed(DisplayReport),
}

/// Reasons a single object is skipped
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum DisplayError {
    /// Mesh data is inconsistent
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Mask could not be composited
    #[error(transparent)]
    Mask(#[from] MaskError),

    /// Collider requested for a mesh without a collider counterpart
    #[error("no collider mesh for mesh {0}")]
    MissingColliderMesh(usize),
}

/// One child of an object container
#[derive(Debug)]
struct PreparedPart {
    geometry: Geometry,
    texture: Option<RgbaImage>,
    collider: Option<Collider>,
}

/// Everything needed to emit one object
#[derive(Debug)]
struct PreparedObject {
    kind: SceneObjectKind,
    pose: Transform,
    parts: Vec<PreparedPart>,
    label: Option<Label>,
}

#[derive(Debug)]
struct DisplayPass {
    job: DisplayJob,
    cleared: bool,
    scene_index: usize,
    object_index: usize,
    root_placed: bool,
    report: DisplayReport,
}

#[derive(Debug)]
enum PipelineState {
    Idle,
    InProgress(DisplayPass),
}

enum Advance {
    Yielded,
    Done,
}

/// Idle/in-progress state machine driving display passes
#[derive(Debug)]
pub struct DisplayPipeline {
    settings: DisplayConfig,
    state: PipelineState,
    last_displayed: Option<Uuid>,
}

impl DisplayPipeline {
    /// Create an idle pipeline
    pub fn new(settings: DisplayConfig) -> Self {
        Self {
            settings,
            state: PipelineState::Idle,
            last_displayed: None,
        }
    }

    /// Whether a pass is running
    pub fn is_in_progress(&self) -> bool {
        matches!(self.state, PipelineState::InProgress(_))
    }

    /// Snapshot id of the last completed pass
    pub fn last_displayed(&self) -> Option<Uuid> {
        self.last_displayed
    }

    /// Begin a pass. Returns `false` and does nothing if one is already
    /// running.
    pub fn start_display(&mut self, job: DisplayJob) -> bool {
        if self.is_in_progress() {
            info!("DisplayPipeline: display already in progress, ignoring request");
            return false;
        }

        debug!("DisplayPipeline: starting display of {} scene(s)", job.scenes.len());
        let report = DisplayReport {
            snapshot_id: job.snapshot_id,
            ..DisplayReport::default()
        };
        self.state = PipelineState::InProgress(DisplayPass {
            job,
            cleared: false,
            scene_index: 0,
            object_index: 0,
            root_placed: false,
            report,
        });
        true
    }

    /// Do one slice of work
    pub fn poll<B: VisualSceneBuilder>(&mut self, host: &mut B) -> DisplayProgress {
        let PipelineState::InProgress(pass) = &mut self.state else {
            return DisplayProgress::Idle;
        };

        let starting = !pass.cleared;
        match advance(pass, &self.settings, host) {
            Advance::Yielded if starting => DisplayProgress::Started,
            Advance::Yielded => DisplayProgress::Yielded,
            Advance::Done => {
                let report = std::mem::take(&mut pass.report);
                self.state = PipelineState::Idle;
                self.last_displayed = report.snapshot_id.or(self.last_displayed);
                info!(
                    "DisplayPipeline: display completed ({} shown, {} filtered, {} failed)",
                    report.objects_displayed, report.objects_filtered, report.objects_failed
                );
                DisplayProgress::Completed(report)
            }
        }
    }

    /// Poll until the running pass finishes. Returns `None` if nothing was
    /// running.
    pub fn run_to_completion<B: VisualSceneBuilder>(&mut self, host: &mut B) -> Option<DisplayReport> {
        loop {
            match self.poll(host) {
                DisplayProgress::Idle => return None,
                DisplayProgress::Started | DisplayProgress::Yielded => {}
                DisplayProgress::Completed(report) => return Some(report),
            }
        }
    }
}

fn advance<B: VisualSceneBuilder>(pass: &mut DisplayPass, settings: &DisplayConfig, host: &mut B) -> Advance {
    if !pass.cleared {
        pass.cleared = true;
        if pass.job.scenes.is_empty() {
            warn!("DisplayPipeline: no scene to display, keeping current content");
        } else {
            host.destroy_children(host.root());
        }
        return Advance::Yielded;
    }

    let budget = settings.yield_every.max(1);
    let mut displayed = 0;

    while let Some(placed) = pass.job.scenes.get(pass.scene_index) {
        if !pass.root_placed {
            let Some(pose) = root_pose(placed) else {
                warn!(
                    "DisplayPipeline: scene {} has no transform to the host, skipping it",
                    pass.scene_index
                );
                pass.report.scenes_skipped += 1;
                pass.scene_index += 1;
                continue;
            };
            host.set_local_pose(host.root(), &pose);
            pass.root_placed = true;
            pass.report.scenes += 1;
        }

        while let Some(object) = placed.scene.objects.get(pass.object_index) {
            pass.object_index += 1;

            if !settings.filter.allows(object.kind) {
                pass.report.objects_filtered += 1;
                continue;
            }

            match prepare_object(object, settings) {
                Ok(prepared) => {
                    emit(prepared, host);
                    pass.report.objects_displayed += 1;
                    displayed += 1;
                    if displayed >= budget {
                        return Advance::Yielded;
                    }
                }
                Err(e) => {
                    warn!("DisplayPipeline: skipping {} object: {e}", object.kind);
                    pass.report.objects_failed += 1;
                }
            }
        }

        pass.scene_index += 1;
        pass.object_index = 0;
        pass.root_placed = false;
        displayed = 0;
    }

    Advance::Done
}

fn root_pose(placed: &PlacedScene) -> Option<Transform> {
    match placed.placement {
        RootPlacement::Anchored(matrix) => Some(decompose(&to_engine_space(&matrix)).without_scale()),
        RootPlacement::FloorAligned => {
            let rotation = compute_up_rotation(&placed.scene.objects).unwrap_or_else(|| {
                debug!("DisplayPipeline: no floor quad to orient by");
                Quat::identity()
            });
            Some(Transform::from_position_rotation(Vec3::zeros(), rotation))
        }
        RootPlacement::Unplaced => None,
    }
}

fn material_for(kind: MaterialKind, settings: &DisplayConfig, color: Color) -> Material {
    let material = Material::new(kind, Some(color));
    if settings.ghost_mode {
        material.ghosted()
    } else {
        material
    }
}

fn prepare_object(object: &SceneObjectRecord, settings: &DisplayConfig) -> Result<PreparedObject, DisplayError> {
    let color = settings.colors.for_kind(object.kind);

    let parts = if object.kind == SceneObjectKind::World {
        vec![PreparedPart {
            geometry: Geometry {
                mesh: combine_meshes(&object.meshes)?,
                material: material_for(MaterialKind::Wireframe, settings, color),
            },
            texture: None,
            collider: None,
        }]
    } else if settings.filter.render_mode.uses_quads() {
        prepare_quads(object, settings, color)?
    } else {
        prepare_meshes(object, settings, color)?
    };

    let label = (settings.filter.display_text_labels && object.kind.has_label())
        .then(|| Label::new(object.kind.name()));

    Ok(PreparedObject {
        kind: object.kind,
        pose: decompose(&to_engine_space(&object.location_matrix())),
        parts,
        label,
    })
}

fn prepare_quads(
    object: &SceneObjectRecord,
    settings: &DisplayConfig,
    color: Color,
) -> Result<Vec<PreparedPart>, DisplayError> {
    let masked = settings.filter.render_mode == RenderMode::QuadWithMask;
    let material_kind = if masked { MaterialKind::MaskedQuad } else { MaterialKind::Mesh };
    let resolution = settings.mask_resolution;

    object
        .quads
        .iter()
        .map(|quad| -> Result<PreparedPart, DisplayError> {
            let texture = if masked {
                let mask = quad.surface_mask(resolution.width, resolution.height);
                Some(apply_mask(&mask, resolution, color)?)
            } else {
                None
            };
            let extents = quad.extents();
            Ok(PreparedPart {
                geometry: Geometry {
                    mesh: quad_mesh(extents),
                    material: material_for(material_kind, settings, color),
                },
                texture,
                collider: settings.add_colliders.then(|| Collider::Box {
                    size: Vec3::new(extents.x, extents.y, 0.0),
                }),
            })
        })
        .collect()
}

fn prepare_meshes(
    object: &SceneObjectRecord,
    settings: &DisplayConfig,
    color: Color,
) -> Result<Vec<PreparedPart>, DisplayError> {
    let material_kind = match settings.filter.render_mode {
        RenderMode::Wireframe => MaterialKind::Wireframe,
        _ => MaterialKind::Mesh,
    };

    object
        .meshes
        .iter()
        .enumerate()
        .map(|(i, mesh)| -> Result<PreparedPart, DisplayError> {
            let collider = if settings.add_colliders {
                let collider_mesh = object
                    .collider_meshes
                    .get(i)
                    .ok_or(DisplayError::MissingColliderMesh(i))?;
                Some(Collider::Mesh(combine_meshes(std::iter::once(collider_mesh))?))
            } else {
                None
            };
            Ok(PreparedPart {
                geometry: Geometry {
                    mesh: combine_meshes(std::iter::once(mesh))?,
                    material: material_for(material_kind, settings, color),
                },
                texture: None,
                collider,
            })
        })
        .collect()
}

fn emit<B: VisualSceneBuilder>(object: PreparedObject, host: &mut B) {
    let name = object.kind.name();
    let container = host.create_node(name, host.root());
    host.set_local_pose(container, &object.pose);

    for part in object.parts {
        let node = host.create_node(name, container);
        host.set_local_pose(node, &Transform::identity());
        host.attach_geometry(node, part.geometry);
        if let Some(texture) = part.texture {
            host.attach_texture(node, texture);
        }
        if let Some(collider) = part.collider {
            host.attach_collider(node, collider);
        }
    }

    if let Some(label) = object.label {
        let node = host.create_node("Label", container);
        host.set_local_pose(node, &Transform::from_position_rotation(label.offset, Quat::identity()));
        host.attach_label(node, label);
    }
}
