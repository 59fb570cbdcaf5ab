//! Read access to the parts of a PPTX package.

use deck_core::{Error, Result};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// ZIP local file header magic (`PK\x03\x04`).
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Check whether the bytes look like a ZIP-based package.
pub fn is_package(bytes: &[u8]) -> bool {
    bytes.starts_with(&ZIP_MAGIC)
}

/// An opened package: every part is read once at open time.
#[derive(Debug)]
pub struct PptxPackage {
    /// Part names in container enumeration order.
    names: Vec<String>,
    parts: HashMap<String, Vec<u8>>,
}

impl PptxPackage {
    /// Open a package from raw bytes.
    ///
    /// Fails with [`Error::ContainerError`] when the bytes are not a valid ZIP container.
    pub fn open(bytes: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| Error::ContainerError(format!("Failed to open ZIP: {}", e)))?;

        let mut names = Vec::with_capacity(archive.len());
        let mut parts = HashMap::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .map_err(|e| Error::ContainerError(format!("Failed to read entry {}: {}", i, e)))?;
            if file.is_dir() {
                continue;
            }

            let name = normalize_part_name(file.name());
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)
                .map_err(|e| Error::ContainerError(format!("Failed to read '{}': {}", name, e)))?;

            names.push(name.clone());
            parts.insert(name, data);
        }

        log::debug!("Opened package with {} parts", names.len());
        Ok(Self { names, parts })
    }

    /// Raw bytes of a part. A missing part is a normal outcome.
    pub fn get_part(&self, path: &str) -> Option<&[u8]> {
        self.parts
            .get(&normalize_part_name(path))
            .map(|data| data.as_slice())
    }

    /// A part decoded as UTF-8 text (lossily).
    pub fn get_part_text(&self, path: &str) -> Option<String> {
        self.get_part(path)
            .map(|data| String::from_utf8_lossy(strip_bom(data)).into_owned())
    }

    /// Part names in the order the container lists them.
    pub fn part_names(&self) -> &[String] {
        &self.names
    }
}

/// Part names are stored without a leading slash.
fn normalize_part_name(name: &str) -> String {
    name.trim_start_matches('/').replace('\\', "/")
}

fn strip_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data)
}
