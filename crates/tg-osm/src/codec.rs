//! Binary tile file format.
//!
//! ```text
//! offset  size  field
//! 0       4     magic    0x12873666, little-endian
//! 4       2     version  little-endian
//! 6       ..    body     bincode(OpenStreetMap)
//! ```
//!
//! The body is the whole map: road graph with its node index, bounding box
//! and tile ids, then the place index and places, then the area index and
//! areas.  Reading validates the header before decoding anything else.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use tg_core::TileId;

use crate::{MapError, MapResult, OpenStreetMap};

/// First four bytes of every tile file.
pub const OSM_MAGIC: u32 = 0x1287_3666;
/// Current tile format version.
pub const FORMAT_VERSION: u16 = 2;

/// Path of `tile`'s file inside the tile directory `dir`.
pub fn tile_file_name(dir: &Path, tile: TileId) -> PathBuf {
    tile.path_in(dir)
}

impl OpenStreetMap {
    /// Encode header and body into `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> MapResult<()> {
        writer.write_all(&OSM_MAGIC.to_le_bytes())?;
        writer.write_all(&FORMAT_VERSION.to_le_bytes())?;
        bincode::serialize_into(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Decode a map written by [`write_to`](Self::write_to).
    ///
    /// # Errors
    ///
    /// [`MapError::BadMagic`] or [`MapError::VersionMismatch`] for a foreign
    /// or outdated header; [`MapError::Codec`] for a corrupt body.
    pub fn read_from<R: Read>(mut reader: R) -> MapResult<OpenStreetMap> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        let found = u32::from_le_bytes(magic);
        if found != OSM_MAGIC {
            return Err(MapError::BadMagic { expected: OSM_MAGIC, found });
        }

        let mut version = [0u8; 2];
        reader.read_exact(&mut version)?;
        let found = u16::from_le_bytes(version);
        if found != FORMAT_VERSION {
            return Err(MapError::VersionMismatch { expected: FORMAT_VERSION, found });
        }

        Ok(bincode::deserialize_from(reader)?)
    }

    /// Write this map to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> MapResult<()> {
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))?;
        debug!(path = %path.display(), nodes = self.node_count(), "map saved");
        Ok(())
    }

    pub fn load(path: &Path) -> MapResult<OpenStreetMap> {
        let file = File::open(path)?;
        let map = Self::read_from(BufReader::new(file))?;
        debug!(path = %path.display(), nodes = map.node_count(), "map loaded");
        Ok(map)
    }

    /// Write every tile of this map to `dir`, one file per tile.  A tile
    /// holding only places or areas gets a file too.  Returns the tiles
    /// written.
    pub fn save_tiles(&self, dir: &Path) -> MapResult<Vec<TileId>> {
        let tiles = self.content_tiles();
        let mut written = Vec::with_capacity(tiles.len());
        for tile in tiles {
            self.extract_tile(tile).save(&tile_file_name(dir, tile))?;
            written.push(tile);
        }
        Ok(written)
    }
}
