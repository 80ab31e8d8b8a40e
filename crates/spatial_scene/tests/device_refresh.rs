//! Device path: background poller, auto-refresh and anchored display

use parking_lot::Mutex;
use spatial_scene::core::config::{ManagerConfig, QueryConfig};
use spatial_scene::foundation::logging;
use spatial_scene::foundation::math::{Mat4, Transform, Vec3, Quat};
use spatial_scene::scene::{
    AccessStatus, DisplayProgress, ProviderError, QuerySettings, RonSceneCodec, Scene, SceneCodec, SceneManager,
    SceneObjectKind, SceneObjectRecord, SceneProvider, SceneQuad, SceneSource, SnapshotCell, VisualSceneBuilder,
    VisualTree,
};
use spatial_scene::scene::model::IDENTITY_LOCATION;
use std::sync::Arc;
use std::time::{Duration, Instant};

use approx::assert_relative_eq;

struct ScriptedProvider {
    scene: Vec<u8>,
    anchor: Mat4,
    queries: Mutex<Vec<QuerySettings>>,
}

impl ScriptedProvider {
    fn new() -> Self {
        let mut wall = SceneObjectRecord::new(SceneObjectKind::Wall, IDENTITY_LOCATION);
        wall.quads.push(SceneQuad::new(2.0, 2.5));
        let ceiling = SceneObjectRecord::new(SceneObjectKind::Ceiling, IDENTITY_LOCATION);
        let scene = RonSceneCodec.encode(&Scene::new(vec![wall, ceiling])).unwrap();
        let anchor = Transform::from_position_rotation(Vec3::new(0.5, 1.5, 2.0), Quat::identity()).to_matrix();
        Self {
            scene,
            anchor,
            queries: Mutex::new(Vec::new()),
        }
    }
}

impl SceneProvider for ScriptedProvider {
    fn is_supported(&self) -> bool {
        true
    }

    fn request_access(&self) -> AccessStatus {
        AccessStatus::Allowed
    }

    fn compute_serialized(&self, settings: &QuerySettings) -> Result<Vec<u8>, ProviderError> {
        self.queries.lock().push(*settings);
        Ok(self.scene.clone())
    }

    fn scene_to_host_transform(&self, _scene: &Scene) -> Option<Mat4> {
        Some(self.anchor)
    }
}

fn wait_for_snapshot(cell: &SnapshotCell) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while cell.latest_id().is_none() {
        assert!(Instant::now() < deadline, "poller never published a scene");
        std::thread::sleep(Duration::from_millis(5));
    }
}

fn config() -> ManagerConfig {
    ManagerConfig {
        query: QueryConfig {
            poll_interval_ms: 60_000,
            ..QueryConfig::default()
        },
        ..ManagerConfig::default()
    }
}

fn drive<B: VisualSceneBuilder>(manager: &mut SceneManager, host: &mut B, first_delta: f32) -> DisplayProgress {
    let mut progress = manager.update(first_delta, host);
    for _ in 0..100 {
        if !matches!(progress, DisplayProgress::Started | DisplayProgress::Yielded) {
            break;
        }
        progress = manager.update(0.0, host);
    }
    progress
}

#[test]
fn auto_refresh_displays_new_snapshot_once() {
    logging::try_init();
    let provider = Arc::new(ScriptedProvider::new());
    let cell = Arc::new(SnapshotCell::new());
    let mut manager = SceneManager::new(
        config(),
        SceneSource::Device {
            provider: provider.clone(),
            snapshots: cell.clone(),
        },
        Box::new(RonSceneCodec),
    );
    manager.start().unwrap();
    assert!(manager.is_polling());
    wait_for_snapshot(&cell);

    let mut tree = VisualTree::default();

    // Interval not reached yet
    assert_eq!(manager.update(1.0, &mut tree), DisplayProgress::Idle);

    let DisplayProgress::Completed(report) = drive(&mut manager, &mut tree, 10.0) else {
        panic!("display did not complete");
    };
    assert_eq!(report.objects_displayed, 2);
    assert_eq!(report.snapshot_id, cell.latest_id());
    assert_eq!(manager.last_displayed(), cell.latest_id());

    let root = tree.node(tree.root()).unwrap();
    assert_relative_eq!(root.pose.position, Vec3::new(0.5, 1.5, -2.0), epsilon = 1e-6);
    assert_eq!(tree.find_by_name("Label").count(), 2);

    // Same snapshot: nothing to do
    assert_eq!(manager.update(10.0, &mut tree), DisplayProgress::Idle);

    manager.shutdown();
    assert!(!manager.is_polling());

    let queries = provider.queries.lock();
    assert!(queries[0].enable_only_observed);
    assert!(!queries[0].enable_quads);
}

#[test]
fn save_bytes_writes_latest_snapshot() {
    logging::try_init();
    let provider = Arc::new(ScriptedProvider::new());
    let cell = Arc::new(SnapshotCell::new());
    let mut manager = SceneManager::new(
        config(),
        SceneSource::Device {
            provider: provider.clone(),
            snapshots: cell.clone(),
        },
        Box::new(RonSceneCodec),
    );

    let dir = tempfile::tempdir().unwrap();
    assert!(manager.save_bytes(dir.path()).unwrap().is_empty());

    manager.start().unwrap();
    wait_for_snapshot(&cell);

    let written = manager.save_bytes(dir.path()).unwrap();
    assert_eq!(written.len(), 1);
    let name = written[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("SU_") && name.ends_with(".bytes"));
    assert_eq!(std::fs::read(&written[0]).unwrap(), provider.scene);
}
