//! Loading of DXF documents with a one-shot recovery fallback.

use std::path::Path;

use dxf::Drawing;
use log::{info, warn};

use crate::error::{Error, Result};

/// What the recovery pass had to fix to make the input parseable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryReport {
    pub corrections: usize,
}

/// Loads a drawing, first strictly, then through exactly one lenient pass
/// that repairs common structural damage in the tag/value stream.
///
/// Returns the recovery report only when the fallback was used.
pub fn load_drawing(path: impl AsRef<Path>) -> Result<(Drawing, Option<RecoveryReport>)> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;

    match Drawing::load(&mut bytes.as_slice()) {
        Ok(drawing) => Ok((drawing, None)),
        Err(error) => {
            warn!("Strict parsing of {path:?} failed: {error}");
            warn!("Attempting recovery mode");

            let (repaired, report) = repair(&bytes)?;
            match Drawing::load(&mut repaired.as_bytes()) {
                Ok(drawing) => {
                    info!(
                        "Recovery completed with {} corrections",
                        report.corrections
                    );
                    Ok((drawing, Some(report)))
                }
                Err(source) => Err(Error::RecoveryFailed {
                    corrections: report.corrections,
                    source,
                }),
            }
        }
    }
}

/// Repairs a damaged DXF text stream, counting every correction made.
///
/// Fixes applied, in order: invalid UTF-8 bytes, garbage lines before the
/// first `0`/`SECTION` pair, garbage after the `0`/`EOF` pair, a dangling
/// unpaired final tag line, and a missing `EOF` marker.
fn repair(bytes: &[u8]) -> Result<(String, RecoveryReport)> {
    let mut corrections = 0;

    let decoded = String::from_utf8_lossy(bytes);
    corrections += decoded.matches('\u{FFFD}').count();
    let decoded = decoded.replace('\u{FFFD}', "?");

    let lines: Vec<&str> = decoded.lines().collect();

    let start = lines
        .windows(2)
        .position(|pair| {
            pair[0].trim() == "0" && pair[1].trim().eq_ignore_ascii_case("SECTION")
        })
        .ok_or(Error::NoDxfContent)?;
    corrections += start;

    let mut kept: Vec<&str> = lines[start..].to_vec();

    let eof = kept
        .windows(2)
        .position(|pair| pair[0].trim() == "0" && pair[1].trim().eq_ignore_ascii_case("EOF"));

    match eof {
        Some(position) => {
            let trailing = kept.len() - (position + 2);
            corrections += trailing;
            kept.truncate(position + 2);
        }
        None => {
            // Tag lines and value lines alternate, so an odd line count means
            // the final tag has no value.
            if kept.len() % 2 == 1 {
                kept.pop();
                corrections += 1;
            }
            kept.push("0");
            kept.push("EOF");
            corrections += 1;
        }
    }

    let mut repaired = kept.join("\n");
    repaired.push('\n');
    Ok((repaired, RecoveryReport { corrections }))
}
