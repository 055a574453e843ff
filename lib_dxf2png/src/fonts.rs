//! Discovery of installed fonts with Japanese glyph coverage.
//!
//! Candidate families are hard-coded per operating system in priority order.
//! Resolution intersects the candidate aliases with the families reported by
//! the font database and returns the first match; the searched directories
//! are informational and only affect which extra font files get registered.

use std::{collections::HashSet, path::PathBuf};

use log::{debug, info};
use resvg::usvg::fontdb;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsKind {
    MacOs,
    Linux,
    Windows,
}

impl OsKind {
    /// Classifies the host operating system. Unrecognized hosts yield `None`,
    /// which resolves through an empty candidate list rather than an error.
    pub fn detect() -> Option<Self> {
        match std::env::consts::OS {
            "macos" => Some(Self::MacOs),
            "linux" => Some(Self::Linux),
            "windows" => Some(Self::Windows),
            _ => None,
        }
    }
}

/// A font family known to carry Japanese glyphs, together with the installed
/// family names it may appear under.
#[derive(Debug, Clone, Copy)]
pub struct FontCandidate {
    pub family: &'static str,
    pub aliases: &'static [&'static str],
}

/// A candidate that is actually installed, with the alias that matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontMatch {
    pub family: &'static str,
    pub matched: String,
}

const MACOS_CANDIDATES: &[FontCandidate] = &[
    FontCandidate {
        family: "Hiragino Sans",
        aliases: &[
            "Hiragino Sans",
            "Hiragino Sans GB",
            "Hiragino Kaku Gothic Pro",
            "ヒラギノ角ゴ Pro W3",
        ],
    },
    FontCandidate {
        family: "Hiragino Kaku Gothic",
        aliases: &["Hiragino Kaku Gothic Pro", "ヒラギノ角ゴ Pro W3"],
    },
    FontCandidate {
        family: "Yu Gothic",
        aliases: &["Yu Gothic", "游ゴシック"],
    },
    FontCandidate {
        family: "Osaka",
        aliases: &["Osaka", "Osaka-Mono"],
    },
    FontCandidate {
        family: "Noto Sans CJK JP",
        aliases: &["Noto Sans CJK JP", "Noto Sans CJK JP Regular"],
    },
    FontCandidate {
        family: "Noto Sans JP",
        aliases: &["Noto Sans JP", "Noto Sans JP Regular"],
    },
    FontCandidate {
        family: "IPAGothic",
        aliases: &["IPAGothic", "IPAゴシック"],
    },
    FontCandidate {
        family: "IPAMincho",
        aliases: &["IPAMincho", "IPA明朝"],
    },
    FontCandidate {
        family: "Source Han Sans",
        aliases: &["Source Han Sans", "源ノ角ゴシック"],
    },
    // Installed alongside MS Office.
    FontCandidate {
        family: "MS Gothic",
        aliases: &["MS Gothic", "ＭＳ ゴシック"],
    },
    FontCandidate {
        family: "Meiryo",
        aliases: &["Meiryo", "メイリオ"],
    },
    FontCandidate {
        family: "Yu Mincho",
        aliases: &["Yu Mincho", "游明朝"],
    },
];

const LINUX_CANDIDATES: &[FontCandidate] = &[
    FontCandidate {
        family: "Noto Sans CJK JP",
        aliases: &["Noto Sans CJK JP", "Noto Sans CJK JP Regular"],
    },
    FontCandidate {
        family: "Noto Sans JP",
        aliases: &["Noto Sans JP", "Noto Sans JP Regular"],
    },
    FontCandidate {
        family: "IPAGothic",
        aliases: &["IPAGothic", "IPAゴシック"],
    },
    FontCandidate {
        family: "IPAMincho",
        aliases: &["IPAMincho", "IPA明朝"],
    },
    FontCandidate {
        family: "Takao Gothic",
        aliases: &["TakaoGothic", "Takaoゴシック"],
    },
    FontCandidate {
        family: "Source Han Sans",
        aliases: &["Source Han Sans", "源ノ角ゴシック"],
    },
];

const WINDOWS_CANDIDATES: &[FontCandidate] = &[
    FontCandidate {
        family: "Yu Gothic",
        aliases: &["Yu Gothic", "游ゴシック"],
    },
    FontCandidate {
        family: "Meiryo",
        aliases: &["Meiryo", "メイリオ"],
    },
    FontCandidate {
        family: "MS Gothic",
        aliases: &["MS Gothic", "ＭＳ ゴシック"],
    },
    FontCandidate {
        family: "MS Mincho",
        aliases: &["MS Mincho", "ＭＳ 明朝"],
    },
    FontCandidate {
        family: "Yu Mincho",
        aliases: &["Yu Mincho", "游明朝"],
    },
    FontCandidate {
        family: "Noto Sans CJK JP",
        aliases: &["Noto Sans CJK JP", "Noto Sans CJK JP Regular"],
    },
];

/// The priority-ordered candidate list for an OS kind.
pub fn candidates(os: Option<OsKind>) -> &'static [FontCandidate] {
    match os {
        Some(OsKind::MacOs) => MACOS_CANDIDATES,
        Some(OsKind::Linux) => LINUX_CANDIDATES,
        Some(OsKind::Windows) => WINDOWS_CANDIDATES,
        None => &[],
    }
}

/// Font installation directories per OS kind.
///
/// Used to register font files outside the default search paths and for the
/// `--check-fonts` report; resolution itself goes by family name only.
pub fn font_directories(os: Option<OsKind>) -> Vec<PathBuf> {
    let home = dirs::home_dir();
    let mut directories = Vec::new();

    match os {
        Some(OsKind::MacOs) => {
            directories.push(PathBuf::from("/System/Library/Fonts"));
            directories.push(PathBuf::from("/Library/Fonts"));
            if let Some(home) = &home {
                directories.push(home.join("Library/Fonts"));
            }
            directories.push(PathBuf::from(
                "/System/Library/Assets/com_apple_MobileAsset_Font6",
            ));
            directories.push(PathBuf::from(
                "/System/Library/Assets/com_apple_MobileAsset_Font7",
            ));
            // MS Office ships its own Japanese fonts.
            for application in ["Microsoft Word", "Microsoft Excel", "Microsoft PowerPoint"] {
                directories.push(PathBuf::from(format!(
                    "/Applications/{application}.app/Contents/Resources/DFonts"
                )));
            }
        }
        Some(OsKind::Linux) => {
            directories.push(PathBuf::from("/usr/share/fonts"));
            directories.push(PathBuf::from("/usr/local/share/fonts"));
            if let Some(home) = &home {
                directories.push(home.join(".fonts"));
            }
            directories.push(PathBuf::from("/usr/share/fonts/truetype/noto"));
            directories.push(PathBuf::from("/usr/share/fonts/opentype/noto"));
            directories.push(PathBuf::from("/usr/share/fonts/opentype/ipafont-gothic"));
            directories.push(PathBuf::from(
                "/usr/share/fonts/truetype/fonts-japanese-gothic",
            ));
        }
        Some(OsKind::Windows) => {
            directories.push(PathBuf::from("C:\\Windows\\Fonts"));
            if let Some(home) = &home {
                directories.push(home.join("AppData\\Local\\Microsoft\\Windows\\Fonts"));
            }
        }
        None => {}
    }

    directories
}

/// Loads the system font database, registering any candidate directories that
/// the default search paths miss.
pub fn load_font_database(os: Option<OsKind>) -> fontdb::Database {
    let mut database = fontdb::Database::new();
    database.load_system_fonts();

    for directory in font_directories(os) {
        if directory.is_dir() {
            debug!("Registering fonts from {directory:?}");
            database.load_fonts_dir(&directory);
        }
    }

    info!("Font database contains {} faces", database.len());
    database
}

/// Read-only snapshot of the installed family names.
pub fn installed_families(database: &fontdb::Database) -> HashSet<String> {
    database
        .faces()
        .flat_map(|face| face.families.iter().map(|(family, _)| family.clone()))
        .collect()
}

fn pick_candidates(
    candidates: &'static [FontCandidate],
    installed: &HashSet<String>,
) -> Vec<FontMatch> {
    candidates
        .iter()
        .filter_map(|candidate| {
            candidate
                .aliases
                .iter()
                .find(|alias| installed.contains(**alias))
                .map(|alias| FontMatch {
                    family: candidate.family,
                    matched: (*alias).to_string(),
                })
        })
        .collect()
}

/// All installed Japanese-capable candidates, in priority order.
pub fn find_cjk_fonts(database: &fontdb::Database, os: Option<OsKind>) -> Vec<FontMatch> {
    pick_candidates(candidates(os), &installed_families(database))
}

/// The best installed Japanese-capable family name, if any.
///
/// Returns the declared-priority first match; the caller decides how to react
/// to `None` (rendering falls back to the pipeline's default font).
pub fn resolve_font(database: &fontdb::Database, os: Option<OsKind>) -> Option<String> {
    find_cjk_fonts(database, os)
        .into_iter()
        .next()
        .map(|font_match| font_match.matched)
}

/// Family-name fragments that suggest CJK glyph coverage.
const CJK_NAME_HINTS: &[&str] = &["cjk", "chinese", "japanese", "korean", "hiragino", "yu"];

/// Last resort when no candidate matched: any installed family whose name
/// suggests CJK coverage. Only macOS gets this scan, where bundled font
/// names vary across releases; other hosts report no font instead.
pub fn fallback_cjk_font(database: &fontdb::Database, os: Option<OsKind>) -> Option<String> {
    if os != Some(OsKind::MacOs) {
        return None;
    }
    scan_for_cjk_family(&installed_families(database))
}

fn scan_for_cjk_family(installed: &HashSet<String>) -> Option<String> {
    let mut families: Vec<&String> = installed
        .iter()
        .filter(|family| {
            let family = family.to_lowercase();
            CJK_NAME_HINTS.iter().any(|hint| family.contains(hint))
        })
        .collect();
    // Installed-set iteration order is arbitrary; sort for a stable pick.
    families.sort();
    families.first().map(|family| (*family).to_string())
}
