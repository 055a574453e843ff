//! The `--check-fonts` report: which Japanese-capable fonts are installed
//! and which directories were searched.

use lib_dxf2png::fonts::{OsKind, find_cjk_fonts, font_directories, load_font_database};

use crate::convert::remediation_hints;

pub fn cli() {
    let os = OsKind::detect();

    println!("Checking available Japanese fonts...");
    println!();

    let database = load_font_database(os);
    let found = find_cjk_fonts(&database, os);

    if found.is_empty() {
        println!("No Japanese fonts found");
        for hint in remediation_hints(os) {
            println!("  {hint}");
        }
    } else {
        println!("Available Japanese fonts:");
        for font in &found {
            println!("  - {} ({})", font.matched, font.family);
        }
    }

    println!();
    println!("Font directories checked:");
    for directory in font_directories(os) {
        if directory.is_dir() {
            println!("  - {}", directory.display());
        }
    }
}
