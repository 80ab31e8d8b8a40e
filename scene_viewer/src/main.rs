//! Scene viewer
//!
//! Loads persisted scene fragments (or a synthesized demo room), displays
//! them frame by frame into an in-memory visual tree and logs what was
//! built. With `--export <dir>` the fragments, per-kind OBJ files and the
//! composited mask textures are written to disk.
//!
//! ```text
//! scene_viewer [--config viewer.toml] [--export out/] [fragment.bytes ...]
//! ```

mod demo;

use spatial_scene::assets::{load_fragments, write_texture_png, ExportError};
use spatial_scene::core::config::{Config, ConfigError, ManagerConfig};
use spatial_scene::foundation::logging;
use spatial_scene::foundation::time::Stopwatch;
use spatial_scene::scene::{
    CodecError, DisplayProgress, RonSceneCodec, SceneCodec, SceneManager, SceneSource, VisualSceneBuilder, VisualTree,
};
use spatial_scene::SceneError;
use std::path::PathBuf;
use thiserror::Error;

const FRAME_TIME: f32 = 1.0 / 60.0;
const MAX_FRAMES: usize = 10_000;

#[derive(Error, Debug)]
enum ViewerError {
    #[error("usage: scene_viewer [--config <file>] [--export <dir>] [fragment.bytes ...] ({0})")]
    Usage(String),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("display did not finish within {0} frames")]
    Stalled(usize),
}

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    export: Option<PathBuf>,
    fragments: Vec<PathBuf>,
}

fn parse_args() -> Result<Args, ViewerError> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().ok_or_else(|| ViewerError::Usage("--config needs a path".to_string()))?;
                args.config = Some(path.into());
            }
            "--export" => {
                let path = iter.next().ok_or_else(|| ViewerError::Usage("--export needs a directory".to_string()))?;
                args.export = Some(path.into());
            }
            flag if flag.starts_with("--") => return Err(ViewerError::Usage(format!("unknown flag {flag}"))),
            _ => args.fragments.push(arg.into()),
        }
    }
    Ok(args)
}

fn run() -> Result<(), ViewerError> {
    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => ManagerConfig::load_from_file(path)?,
        None => ManagerConfig::default(),
    };

    let fragments = if args.fragments.is_empty() {
        log::info!("No fragment given, using the demo room");
        vec![RonSceneCodec.encode(&demo::room())?]
    } else {
        load_fragments(&args.fragments)?
    };

    let mut manager = SceneManager::new(config, SceneSource::Fragments(fragments), Box::new(RonSceneCodec));
    manager.start()?;

    let mut tree = VisualTree::new("Root");
    let stopwatch = Stopwatch::start_new();
    let mut frames = 0;
    let report = loop {
        frames += 1;
        match manager.update(FRAME_TIME, &mut tree) {
            DisplayProgress::Completed(report) => break report,
            DisplayProgress::Started => log::info!("Display started on frame {frames}"),
            DisplayProgress::Yielded | DisplayProgress::Idle if frames < MAX_FRAMES => {}
            _ => return Err(ViewerError::Stalled(frames)),
        }
    };

    log::info!(
        "Displayed {} objects over {} frames in {:.3}s ({} filtered, {} failed, {} scenes skipped)",
        report.objects_displayed,
        frames,
        stopwatch.elapsed_secs(),
        report.objects_filtered,
        report.objects_failed,
        report.scenes_skipped,
    );
    for &child in tree.children(tree.root()) {
        if let Some(node) = tree.node(child) {
            let parts = tree.children(child).len();
            log::info!("  {} at {:?} ({} children)", node.name, node.pose.position, parts);
        }
    }

    if let Some(dir) = &args.export {
        let saved = manager.save_bytes(dir)?;
        let objs = manager.save_objs(dir)?;
        let mut textures = 0;
        for texture in tree.iter().filter_map(|(_, node)| node.texture.as_ref()) {
            write_texture_png(texture, &dir.join(format!("SU_Mask{textures}.png")))?;
            textures += 1;
        }
        log::info!(
            "Exported {} fragment(s), {} OBJ file(s) and {} mask texture(s) to {:?}",
            saved.len(),
            objs.len(),
            textures,
            dir
        );
    }

    manager.shutdown();
    Ok(())
}

fn main() {
    logging::init();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
