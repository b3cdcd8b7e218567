// crates/tripdb-core/src/loader/snapshot.rs
use crate::catalog::Catalog;
use crate::error::{Error, Result};
use bincode::Options;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

#[cfg(not(feature = "compact"))]
pub const SNAPSHOT_SUFFIX: &str = ".bin";
#[cfg(feature = "compact")]
pub const SNAPSHOT_SUFFIX: &str = ".bin.gz";

/// Guards against hostile or truncated snapshots.
const SNAPSHOT_LIMIT: u64 = 256 * 1024 * 1024;

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_limit(SNAPSHOT_LIMIT)
        .allow_trailing_bytes()
}

pub(crate) fn snapshot_path(dir: &Path) -> PathBuf {
    dir.join(format!("catalog{SNAPSHOT_SUFFIX}"))
}

impl Catalog {
    /// Writes the catalog as a bincode snapshot (gzip when `compact` is on).
    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let writer = BufWriter::new(file);

        #[cfg(feature = "compact")]
        {
            let mut encoder = flate2::write::GzEncoder::new(writer, flate2::Compression::default());
            options().serialize_into(&mut encoder, self)?;
            encoder.finish()?.flush()?;
        }
        #[cfg(not(feature = "compact"))]
        {
            let mut writer = writer;
            options().serialize_into(&mut writer, self)?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Reads a snapshot written by [`Catalog::save_snapshot`].
    pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::Load {
            source_name: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let reader = BufReader::new(file);

        #[cfg(feature = "compact")]
        let stream: Box<dyn Read> = Box::new(flate2::read::GzDecoder::new(reader));
        #[cfg(not(feature = "compact"))]
        let stream: Box<dyn Read> = Box::new(reader);

        Ok(options().deserialize_from(stream)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_snapshot_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = snapshot_path(dir.path());
        std::fs::write(&path, b"\x01\x02").unwrap();
        assert!(Catalog::load_snapshot(&path).is_err());
    }

    #[test]
    fn snapshot_keeps_dropped_attraction_count() {
        let cities = "name,country_name,latitude,longitude,population,average_cost_per_day,description,image_url\n\
                      Lima,Peru,-12.05,-77.04,9700000,60,Coast,\n";
        let attractions = "name,city_name,category,description,latitude,longitude,average_visit_duration,average_cost,rating,image_url,website_url\n\
                           Ghost Pier,Atlantis,Landmark,Sunk,0,0,10,0,1,,\n";
        let destinations = "name,country_name,latitude,longitude,population,average_cost_per_day,description\n";
        let (catalog, _) = Catalog::from_readers(
            cities.as_bytes(),
            attractions.as_bytes(),
            destinations.as_bytes(),
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = snapshot_path(dir.path());
        catalog.save_snapshot(&path).unwrap();
        let restored = Catalog::load_snapshot(&path).unwrap();
        assert_eq!(restored.dropped_attractions(), 1);
        assert_eq!(restored, catalog);
    }
}
