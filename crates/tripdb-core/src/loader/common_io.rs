// crates/tripdb-core/src/loader/common_io.rs
use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::SystemTime;

/// Opens a source for reading. `.gz` files are decompressed on the fly when
/// the `compact` feature is on.
pub fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| Error::Load {
        source_name: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let reader = BufReader::new(file);

    #[cfg(feature = "compact")]
    {
        if path.extension().is_some_and(|ext| ext == "gz") {
            return Ok(Box::new(flate2::read::GzDecoder::new(reader)));
        }
    }

    Ok(Box::new(reader))
}

pub fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// `true` when `cache` exists and is at least as new as every source.
pub fn is_fresh(cache: &Path, sources: &[&Path]) -> bool {
    let Some(cache_time) = modified(cache) else {
        return false;
    };
    sources
        .iter()
        .all(|src| modified(src).is_some_and(|t| t <= cache_time))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_a_load_error() {
        let err = open_stream(Path::new("/definitely/not/here.csv"))
            .err()
            .unwrap();
        assert!(matches!(err, Error::Load { .. }));
    }

    #[test]
    fn cache_is_stale_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("cities.csv");
        fs::write(&src, "h\n").unwrap();
        assert!(!is_fresh(&dir.path().join("none.bin"), &[src.as_path()]));
    }
}
