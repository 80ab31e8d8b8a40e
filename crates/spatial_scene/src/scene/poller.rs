//! Background scene retrieval
//!
//! A dedicated thread keeps asking the provider for the latest scene and
//! publishes each result into the shared [`SnapshotCell`]. It never waits on
//! the display side. Query failures are logged and the loop carries on; the
//! thread only exits once the poller is shut down or dropped.

use crate::core::config::{LevelOfDetail, QueryConfig};
use crate::foundation::time::Stopwatch;
use crate::scene::provider::{QuerySettings, SceneProvider};
use crate::scene::snapshot::SnapshotCell;
use crossbeam::channel::{bounded, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// What the poller asks for once it is past the initial query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrievalPlan {
    /// Radius, already clamped
    pub bounding_sphere_radius: f32,
    /// Ask for inferred objects
    pub request_inferred: bool,
    /// Mesh resolution
    pub level_of_detail: LevelOfDetail,
    /// Pause between two queries
    pub interval: Duration,
}

impl RetrievalPlan {
    /// Derive the plan from the query section of the configuration
    pub fn from_config(query: &QueryConfig, level_of_detail: LevelOfDetail) -> Self {
        Self {
            bounding_sphere_radius: query.clamped_radius(),
            request_inferred: query.request_inferred_regions,
            level_of_detail,
            interval: Duration::from_millis(query.poll_interval_ms),
        }
    }
}

/// Handle to the background retrieval thread
pub struct ScenePoller {
    shutdown: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl ScenePoller {
    /// Start polling `provider` into `cell`
    pub fn spawn(
        provider: Arc<dyn SceneProvider>,
        cell: Arc<SnapshotCell>,
        plan: RetrievalPlan,
    ) -> std::io::Result<Self> {
        let (shutdown, shutdown_rx) = bounded::<()>(1);
        
        let thread = thread::Builder::new()
            .name("scene-poller".to_string())
            .spawn(move || {
                retrieve(provider.as_ref(), &cell, &QuerySettings::initial(plan.bounding_sphere_radius));
                
                let steady = QuerySettings::full(
                    plan.bounding_sphere_radius,
                    plan.request_inferred,
                    plan.level_of_detail,
                );
                loop {
                    match shutdown_rx.recv_timeout(plan.interval) {
                        Err(RecvTimeoutError::Timeout) => retrieve(provider.as_ref(), &cell, &steady),
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                log::debug!("ScenePoller: retrieval thread stopped");
            })?;
        
        Ok(Self {
            shutdown: Some(shutdown),
            thread: Some(thread),
        })
    }
    
    /// Whether the retrieval thread is still alive
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }
    
    /// Stop the thread and wait for the query in flight to finish
    pub fn shutdown(&mut self) {
        // Disconnecting the channel wakes the thread even if the signal
        // buffer is full.
        drop(self.shutdown.take());
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("ScenePoller: retrieval thread panicked");
            }
        }
    }
}

impl Drop for ScenePoller {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn retrieve(provider: &dyn SceneProvider, cell: &SnapshotCell, settings: &QuerySettings) {
    log::debug!("ScenePoller: retrieval started");
    let stopwatch = Stopwatch::start_new();
    
    let bytes = match provider.compute_serialized(settings) {
        Ok(bytes) => {
            let len = bytes.len();
            cell.publish(bytes);
            len
        }
        Err(e) => {
            log::error!("ScenePoller: {e}");
            cell.latest().map_or(0, |snapshot| snapshot.len())
        }
    };
    
    log::info!(
        "ScenePoller: retrieval completed. Radius: {}; Quads: {}; Meshes: {}; Inference: {}; WorldMesh: {}; LOD: {:?}; Bytes: {}; Time (secs): {:.3}",
        settings.bounding_sphere_radius,
        settings.enable_quads,
        settings.enable_meshes,
        !settings.enable_only_observed,
        settings.enable_world_mesh,
        settings.level_of_detail,
        bytes,
        stopwatch.elapsed_secs(),
    );
}
