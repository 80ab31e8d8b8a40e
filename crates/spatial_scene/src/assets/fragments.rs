//! Persisted scene buffers

use crate::assets::ExportError;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the Unix epoch, used to stamp exported files
pub fn timestamp_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

/// `SU_<timestamp>.bytes`
pub fn snapshot_file_name(timestamp: u64) -> String {
    format!("SU_{timestamp}.bytes")
}

/// `SU_Frag<n>_<timestamp>.bytes`
pub fn fragment_file_name(index: usize, timestamp: u64) -> String {
    format!("SU_Frag{index}_{timestamp}.bytes")
}

/// Write one buffer into `dir`, returning the full path
pub fn write_fragment(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    fs::write(&path, bytes)?;
    log::info!("Saved scene buffer ({} bytes) to {:?}", bytes.len(), path);
    Ok(path)
}

/// Read buffers back, in the order given
pub fn load_fragments<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Vec<u8>>, ExportError> {
    paths
        .iter()
        .map(|p| {
            let bytes = fs::read(p.as_ref())?;
            log::debug!("Loaded scene fragment {:?} ({} bytes)", p.as_ref(), bytes.len());
            Ok(bytes)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(snapshot_file_name(42), "SU_42.bytes");
        assert_eq!(fragment_file_name(3, 42), "SU_Frag3_42.bytes");
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fragment(dir.path(), &fragment_file_name(0, 1), b"scene").unwrap();
        assert_eq!(load_fragments(&[path]).unwrap(), vec![b"scene".to_vec()]);
    }

    #[test]
    fn test_missing_fragment() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_fragments(&[dir.path().join("absent.bytes")]);
        assert!(matches!(result, Err(ExportError::Io(_))));
    }
}
