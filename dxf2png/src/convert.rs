//! Single-file and batch conversion drivers.
//!
//! Every job runs to a boolean verdict: any error is caught at the job
//! boundary, logged with its full context chain, and never aborts a batch.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result, ensure};
use lib_dxf2png::{
    document::load_drawing,
    fontdb,
    fonts::{self, OsKind},
    render::{RenderSettings, render_drawing},
};
use log::{error, info, warn};

/// Font configuration shared by all jobs of a run: the loaded font database
/// and the resolved Japanese-capable family, threaded explicitly into every
/// render instead of living in process-global state.
pub struct FontConfig {
    pub database: Arc<fontdb::Database>,
    pub family: Option<String>,
}

impl FontConfig {
    /// Runs font resolution once for this process.
    pub fn resolve() -> Self {
        let os = OsKind::detect();
        let database = fonts::load_font_database(os);
        let family = match fonts::resolve_font(&database, os) {
            Some(family) => {
                info!("Using Japanese font: {family}");
                Some(family)
            }
            // No known candidate installed; on macOS any family whose name
            // suggests CJK coverage is still better than tofu.
            None => match fonts::fallback_cjk_font(&database, os) {
                Some(family) => {
                    info!("Using CJK font: {family}");
                    Some(family)
                }
                None => {
                    warn!("No Japanese fonts detected; text may not display correctly");
                    for hint in remediation_hints(os) {
                        warn!("{hint}");
                    }
                    None
                }
            },
        };

        Self {
            database: Arc::new(database),
            family,
        }
    }
}

pub fn remediation_hints(os: Option<OsKind>) -> &'static [&'static str] {
    match os {
        Some(OsKind::MacOs) => &[
            "Install Noto fonts with: brew install font-noto-sans-cjk-jp",
            "Or download from: https://www.google.com/get/noto/",
        ],
        Some(OsKind::Linux) => &["Install Noto fonts with: sudo apt-get install fonts-noto-cjk"],
        Some(OsKind::Windows) => &["Install the Japanese language pack in Settings"],
        None => &[],
    }
}

/// One conversion, created from CLI arguments or directory enumeration.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub dpi: u32,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub converted: usize,
    pub failed: usize,
}

/// Converts one file, reporting success as a boolean. Errors never propagate
/// past this boundary.
pub fn convert_file(job: &ConversionJob, fonts: &FontConfig) -> bool {
    match try_convert(job, fonts) {
        Ok((width, height)) => {
            info!("Conversion successful: {width}x{height} pixels");
            true
        }
        Err(error) => {
            error!("Conversion of {:?} failed: {error:#}", job.input);
            false
        }
    }
}

fn try_convert(job: &ConversionJob, fonts: &FontConfig) -> Result<(u32, u32)> {
    ensure!(job.input.is_file(), "input file {:?} does not exist", job.input);

    info!("Loading DXF file {:?}", job.input);
    let (drawing, recovery) =
        load_drawing(&job.input).with_context(|| format!("failed to load {:?}", job.input))?;
    if let Some(report) = recovery {
        info!("Recovered drawing with {} corrections", report.corrections);
    }

    let settings = RenderSettings {
        dpi: job.dpi,
        font_family: fonts.family.clone(),
    };
    let png = render_drawing(&drawing, &settings, Arc::clone(&fonts.database))
        .with_context(|| format!("failed to render {:?}", job.input))?;

    if let Some(parent) = job.output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create output directory {parent:?}"))?;
        }
    }
    info!("Saving PNG file {:?}", job.output);
    fs::write(&job.output, &png)
        .with_context(|| format!("failed to write {:?}", job.output))?;

    // Best-effort post-check: the file must at least reopen as an image.
    image::image_dimensions(&job.output)
        .with_context(|| format!("written file {:?} is not a readable image", job.output))
}

/// Converts every DXF file directly inside `input_dir`, sequentially. A
/// failing file is counted and the batch continues.
pub fn convert_directory(
    input_dir: &Path,
    output_dir: &Path,
    dpi: u32,
    fonts: &FontConfig,
) -> Result<BatchSummary> {
    let mut inputs: Vec<PathBuf> = fs::read_dir(input_dir)
        .with_context(|| format!("failed to read directory {input_dir:?}"))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_dxf_extension(path))
        .collect();
    inputs.sort();

    if inputs.is_empty() {
        warn!("No DXF files found in {input_dir:?}");
        return Ok(BatchSummary::default());
    }
    info!("Found {} DXF file(s)", inputs.len());

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory {output_dir:?}"))?;

    let mut summary = BatchSummary::default();
    for input in inputs {
        let output = output_dir
            .join(input.file_name().unwrap_or_default())
            .with_extension("png");
        info!("Processing {:?}", input.file_name().unwrap_or_default());

        let job = ConversionJob { input, output, dpi };
        if convert_file(&job, fonts) {
            summary.converted += 1;
        } else {
            summary.failed += 1;
        }
    }

    info!(
        "Converted {} file(s), {} failure(s)",
        summary.converted, summary.failed
    );
    Ok(summary)
}

pub fn has_dxf_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("dxf"))
}
