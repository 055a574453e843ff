use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use dxf2png::convert::FontConfig;
use lib_dxf2png::fontdb;

/// A well-formed drawing with a single line entity and no text.
pub const MINIMAL_LINE_DXF: &str = "0\nSECTION\n2\nENTITIES\n0\nLINE\n8\n0\n10\n0.0\n20\n0.0\n30\n0.0\n11\n10.0\n21\n5.0\n31\n0.0\n0\nENDSEC\n0\nEOF\n";

/// Bytes neither the strict nor the lenient loader can make sense of.
pub const GARBAGE: &str = "complete nonsense\nnot a drawing\n";

/// A font configuration without system fonts, for deterministic tests.
pub fn empty_font_config() -> FontConfig {
    FontConfig {
        database: Arc::new(fontdb::Database::new()),
        family: None,
    }
}

pub fn write_file(directory: &Path, name: &str, content: &str) -> PathBuf {
    let path = directory.join(name);
    fs::write(&path, content).unwrap();
    path
}
