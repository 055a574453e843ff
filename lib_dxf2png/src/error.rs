use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DXF parse error: {0}")]
    DxfParse(#[from] dxf::DxfError),

    #[error("recovery applied {corrections} corrections, but the drawing still failed to parse: {source}")]
    RecoveryFailed {
        corrections: usize,
        source: dxf::DxfError,
    },

    #[error("no DXF sections found in the input")]
    NoDxfContent,

    #[error("SVG tree construction failed: {0}")]
    Svg(#[from] resvg::usvg::Error),

    #[error("cannot allocate a {width}x{height} raster surface")]
    PixmapAllocation { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    PngEncode(String),
}
