//! On-disk serialization helpers: bincode inside an LZ4 frame.

use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::info;

use crate::error::BeanError;

// ─── LZ4 compression helpers ────────────────────────────────────────

/// Magic bytes identifying LZ4-compressed snapshot files.
pub const LZ4_MAGIC: &[u8; 4] = b"LZ4S";

/// Save a serializable value to a file with LZ4 frame compression.
/// Writes magic bytes, then LZ4-compressed bincode data.
pub fn save_compressed<T: serde::Serialize>(path: &Path, data: &T, label: &str) -> Result<(), BeanError> {
    let start = Instant::now();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(LZ4_MAGIC)?;
    let mut encoder = lz4_flex::frame::FrameEncoder::new(writer);
    bincode::serialize_into(&mut encoder, data)?;
    let mut writer = encoder.finish().map_err(std::io::Error::other)?;
    writer.flush()?;

    let compressed_size = std::fs::metadata(path)?.len();
    info!(
        label,
        bytes = compressed_size,
        elapsed_ms = start.elapsed().as_millis() as u64,
        path = %path.display(),
        "Saved compressed data"
    );

    Ok(())
}

/// Load a deserializable value from a file, accepting both LZ4-compressed
/// and plain bincode data.
pub fn load_compressed<T: serde::de::DeserializeOwned>(path: &Path, label: &str) -> Result<T, BeanError> {
    let path_str = path.display().to_string();
    let start = Instant::now();
    let load_err = |message: String| BeanError::SnapshotLoad { path: path_str.clone(), message };

    let file = std::fs::File::open(path).map_err(|e| load_err(format!("cannot open file: {}", e)))?;
    let mut reader = BufReader::new(file);

    let mut magic = [0u8; 4];
    reader
        .read_exact(&mut magic)
        .map_err(|e| load_err(format!("read error (magic bytes): {}", e)))?;

    let result = if &magic == LZ4_MAGIC {
        let decoder = lz4_flex::frame::FrameDecoder::new(reader);
        bincode::deserialize_from(decoder)
            .map_err(|e| load_err(format!("LZ4 deserialization failed: {}", e)))?
    } else {
        reader
            .seek(SeekFrom::Start(0))
            .map_err(|e| load_err(format!("seek error: {}", e)))?;
        let mut buf = Vec::new();
        reader
            .read_to_end(&mut buf)
            .map_err(|e| load_err(format!("read error: {}", e)))?;
        bincode::deserialize(&buf).map_err(|e| load_err(format!("deserialization failed: {}", e)))?
    };

    info!(
        label,
        elapsed_ms = start.elapsed().as_millis() as u64,
        path = %path_str,
        "Loaded compressed data"
    );

    Ok(result)
}

// ─── Snapshot locations ──────────────────────────────────────────────

/// Default snapshot directory: `<local data dir>/beannav`.
/// Tests should NOT use this; pass a test-local directory instead.
pub fn snapshot_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("beannav")
}

/// Snapshot file for a facts directory: name derived from a stable hash of the
/// canonical directory path.
pub fn snapshot_path_for(facts_dir: &str, base: &Path) -> PathBuf {
    let canonical = std::fs::canonicalize(facts_dir).unwrap_or_else(|_| PathBuf::from(facts_dir));
    let hash = crate::stable_hash(&[canonical.to_string_lossy().as_bytes(), b"beans"]);
    base.join(format!("{:016x}.beans", hash))
}
