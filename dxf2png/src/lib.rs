pub mod check_fonts;
pub mod convert;
