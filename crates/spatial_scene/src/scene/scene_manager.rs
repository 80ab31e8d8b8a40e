//! Scene Manager - Bridge between the scene provider and the visual host
//!
//! The manager owns the background poller and the display pipeline and
//! decides when a new display pass starts:
//!
//! 1. On a device with auto-refresh, every `auto_refresh_interval_secs` it
//!    checks whether the poller published a snapshot that has not been
//!    displayed yet.
//! 2. On the desktop, the persisted fragments are displayed once, on the
//!    first update.
//!
//! It also offers the export helpers (raw buffers and OBJ files).

use crate::assets::{self, ExportError, ObjSummary};
use crate::core::config::ManagerConfig;
use crate::foundation::time::IntervalTimer;
use crate::scene::codec::SceneCodec;
use crate::scene::display::{DisplayJob, DisplayPipeline, DisplayProgress, DisplayReport, PlacedScene, RootPlacement};
use crate::scene::model::{Scene, SceneObjectKind};
use crate::scene::poller::{RetrievalPlan, ScenePoller};
use crate::scene::provider::{AccessStatus, ProviderError, SceneProvider};
use crate::scene::scene_graph::VisualSceneBuilder;
use crate::scene::snapshot::SnapshotCell;
use crate::scene::SceneError;
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// Where scenes come from
pub enum SceneSource {
    /// Live device: a provider polled in the background into `snapshots`
    Device {
        /// Scene provider
        provider: Arc<dyn SceneProvider>,
        /// Cell the poller publishes into
        snapshots: Arc<SnapshotCell>,
    },
    /// Persisted scene buffers, displayed on the desktop
    Fragments(Vec<Vec<u8>>),
}

impl SceneSource {
    /// Device source with a fresh snapshot cell
    pub fn device(provider: Arc<dyn SceneProvider>) -> Self {
        Self::Device {
            provider,
            snapshots: Arc::new(SnapshotCell::new()),
        }
    }
}

/// Coordinates polling, display and export
pub struct SceneManager {
    config: ManagerConfig,
    source: SceneSource,
    codec: Box<dyn SceneCodec>,
    pipeline: DisplayPipeline,
    poller: Option<ScenePoller>,
    refresh_timer: IntervalTimer,
    desktop_display_started: bool,
}

impl SceneManager {
    /// Create a manager; nothing runs until [`SceneManager::start`]
    pub fn new(config: ManagerConfig, source: SceneSource, codec: Box<dyn SceneCodec>) -> Self {
        let pipeline = DisplayPipeline::new(config.display.clone());
        let refresh_timer = IntervalTimer::new(config.auto_refresh_interval_secs);
        Self {
            config,
            source,
            codec,
            pipeline,
            poller: None,
            refresh_timer,
            desktop_display_started: false,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// The display pipeline
    pub fn pipeline(&self) -> &DisplayPipeline {
        &self.pipeline
    }

    /// Whether the background poller is running
    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(ScenePoller::is_running)
    }

    /// Check platform support and access, then start the poller.
    ///
    /// Does nothing for a fragment source. Unsupported platforms and denied
    /// access are fatal.
    pub fn start(&mut self) -> Result<(), SceneError> {
        let SceneSource::Device { provider, snapshots } = &self.source else {
            info!("SceneManager: using persisted fragments, no poller needed");
            return Ok(());
        };
        if self.poller.is_some() {
            debug!("SceneManager: already started");
            return Ok(());
        }

        if !provider.is_supported() {
            error!("SceneManager: scene understanding is not supported on this platform");
            return Err(ProviderError::Unsupported.into());
        }

        let access = provider.request_access();
        if access != AccessStatus::Allowed {
            error!("SceneManager: access to scene understanding has been denied. Reason: {access}");
            return Err(ProviderError::AccessDenied(access).into());
        }

        let plan = RetrievalPlan::from_config(&self.config.query, self.config.display.filter.level_of_detail);
        self.poller = Some(ScenePoller::spawn(Arc::clone(provider), Arc::clone(snapshots), plan)?);
        info!("SceneManager: started ({plan:?})");
        Ok(())
    }

    /// Per-frame tick: maybe start a pass, then advance the running one
    pub fn update<B: VisualSceneBuilder>(&mut self, delta_time: f32, host: &mut B) -> DisplayProgress {
        let should_start = match &self.source {
            SceneSource::Device { snapshots, .. } => {
                self.config.auto_refresh && self.refresh_timer.tick(delta_time) && {
                    let latest = snapshots.latest_id();
                    latest.is_some() && latest != self.pipeline.last_displayed()
                }
            }
            SceneSource::Fragments(_) => !std::mem::replace(&mut self.desktop_display_started, true),
        };
        if should_start {
            self.start_display_logged();
        }

        self.pipeline.poll(host)
    }

    fn start_display_logged(&mut self) {
        if let Err(e) = self.start_display() {
            warn!("SceneManager: could not start display: {e}");
        }
    }

    /// Decode the current scenes and start a display pass.
    ///
    /// Returns `Ok(false)` when there is nothing to display yet or a pass is
    /// already running.
    pub fn start_display(&mut self) -> Result<bool, SceneError> {
        if self.pipeline.is_in_progress() {
            info!("SceneManager: display already in progress");
            return Ok(false);
        }

        let job = match &self.source {
            SceneSource::Device { provider, snapshots } => {
                let Some(snapshot) = snapshots.latest() else {
                    debug!("SceneManager: no scene retrieved yet");
                    return Ok(false);
                };
                let scene = self.codec.decode(&snapshot.data)?;
                let placement = provider
                    .scene_to_host_transform(&scene)
                    .map_or(RootPlacement::Unplaced, RootPlacement::Anchored);
                DisplayJob {
                    scenes: vec![PlacedScene { scene, placement }],
                    snapshot_id: Some(snapshot.id),
                }
            }
            SceneSource::Fragments(fragments) => {
                let scenes = fragments
                    .iter()
                    .map(|bytes| -> Result<PlacedScene, SceneError> {
                        Ok(PlacedScene {
                            scene: self.codec.decode(bytes)?,
                            placement: RootPlacement::FloorAligned,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                DisplayJob {
                    scenes,
                    snapshot_id: None,
                }
            }
        };

        Ok(self.pipeline.start_display(job))
    }

    /// Display synchronously. Finishes any pass already running instead of
    /// starting a new one.
    pub fn bake<B: VisualSceneBuilder>(&mut self, host: &mut B) -> Result<Option<DisplayReport>, SceneError> {
        self.start_display()?;
        Ok(self.pipeline.run_to_completion(host))
    }

    /// Snapshot id of the last completed pass
    pub fn last_displayed(&self) -> Option<Uuid> {
        self.pipeline.last_displayed()
    }

    /// Persist the raw buffers into `dir`: the latest snapshot on a device,
    /// every fragment on the desktop.
    pub fn save_bytes(&self, dir: &Path) -> Result<Vec<PathBuf>, SceneError> {
        let timestamp = assets::timestamp_secs();
        match &self.source {
            SceneSource::Device { snapshots, .. } => {
                let Some(snapshot) = snapshots.latest() else {
                    warn!("SceneManager: nothing to save yet");
                    return Ok(Vec::new());
                };
                let path = assets::write_fragment(dir, &assets::snapshot_file_name(timestamp), &snapshot.data)?;
                Ok(vec![path])
            }
            SceneSource::Fragments(fragments) => fragments
                .iter()
                .enumerate()
                .map(|(i, bytes)| {
                    assets::write_fragment(dir, &assets::fragment_file_name(i, timestamp), bytes)
                        .map_err(SceneError::from)
                })
                .collect(),
        }
    }

    /// Export one OBJ per object kind into `dir`. Kinds without geometry
    /// are skipped with a warning.
    pub fn save_objs(&self, dir: &Path) -> Result<Vec<ObjSummary>, SceneError> {
        let scenes = self.decode_all()?;
        if scenes.is_empty() {
            warn!("SceneManager: nothing to export");
            return Ok(Vec::new());
        }

        let timestamp = assets::timestamp_secs();
        let mut written = Vec::new();
        for kind in SceneObjectKind::ALL {
            let objects = scenes.iter().flat_map(|s| s.objects_of_kind(kind));
            let color = self.config.display.colors.for_kind(kind);
            match assets::write_kind_obj(dir, &assets::obj_file_name(kind, timestamp), objects, color) {
                Ok(summary) => written.push(summary),
                Err(ExportError::Empty(name)) => warn!("SceneManager: no {kind} geometry, skipping {name}"),
                Err(e) => return Err(e.into()),
            }
        }
        Ok(written)
    }

    fn decode_all(&self) -> Result<Vec<Scene>, SceneError> {
        match &self.source {
            SceneSource::Device { snapshots, .. } => {
                let Some(snapshot) = snapshots.latest() else {
                    return Ok(Vec::new());
                };
                Ok(vec![self.codec.decode(&snapshot.data)?])
            }
            SceneSource::Fragments(fragments) => fragments
                .iter()
                .map(|bytes| self.codec.decode(bytes).map_err(SceneError::from))
                .collect(),
        }
    }

    /// Stop the poller
    pub fn shutdown(&mut self) {
        if let Some(mut poller) = self.poller.take() {
            poller.shutdown();
            info!("SceneManager: poller stopped");
        }
    }
}

impl Drop for SceneManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}
