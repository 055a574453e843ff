use anyhow::Result;
use dxf2png::convert::{ConversionJob, convert_directory, convert_file};
use lib_dxf2png::document::load_drawing;
use util::{GARBAGE, MINIMAL_LINE_DXF, empty_font_config, write_file};

mod util;

#[test]
fn converts_a_minimal_line_drawing() -> Result<()> {
    let directory = tempfile::tempdir()?;
    let input = write_file(directory.path(), "minimal.dxf", MINIMAL_LINE_DXF);
    let output = directory.path().join("minimal.png");

    let job = ConversionJob {
        input,
        output: output.clone(),
        dpi: 150,
    };
    assert!(convert_file(&job, &empty_font_config()));

    let (width, height) = image::image_dimensions(&output)?;
    assert!(width > 0);
    assert!(height > 0);
    Ok(())
}

#[test]
fn missing_input_fails_cleanly() -> Result<()> {
    let directory = tempfile::tempdir()?;
    let job = ConversionJob {
        input: directory.path().join("absent.dxf"),
        output: directory.path().join("absent.png"),
        dpi: 300,
    };
    assert!(!convert_file(&job, &empty_font_config()));
    assert!(!job.output.exists());
    Ok(())
}

#[test]
fn damaged_input_recovers_with_corrections() -> Result<()> {
    let directory = tempfile::tempdir()?;
    let damaged = format!("this is not a dxf tag\n###\n{MINIMAL_LINE_DXF}");
    let input = write_file(directory.path(), "damaged.dxf", &damaged);

    let (_, report) = load_drawing(&input)?;
    let report = report.expect("the lenient fallback should have been used");
    assert!(report.corrections > 0);

    let output = directory.path().join("damaged.png");
    let job = ConversionJob {
        input,
        output: output.clone(),
        dpi: 96,
    };
    assert!(convert_file(&job, &empty_font_config()));
    assert!(output.exists());
    Ok(())
}

#[test]
fn unparseable_input_fails_and_leaves_no_output() -> Result<()> {
    let directory = tempfile::tempdir()?;
    let input = write_file(directory.path(), "garbage.dxf", GARBAGE);
    let output = directory.path().join("garbage.png");

    let job = ConversionJob {
        input,
        output: output.clone(),
        dpi: 96,
    };
    assert!(!convert_file(&job, &empty_font_config()));
    assert!(!output.exists());
    Ok(())
}

#[test]
fn clean_input_reports_no_recovery() -> Result<()> {
    let directory = tempfile::tempdir()?;
    let input = write_file(directory.path(), "clean.dxf", MINIMAL_LINE_DXF);
    let (_, report) = load_drawing(&input)?;
    assert!(report.is_none());
    Ok(())
}

#[test]
fn batch_converts_valid_files_and_counts_failures() -> Result<()> {
    let directory = tempfile::tempdir()?;
    write_file(directory.path(), "a.dxf", MINIMAL_LINE_DXF);
    write_file(directory.path(), "b.dxf", MINIMAL_LINE_DXF);
    write_file(directory.path(), "broken.dxf", GARBAGE);
    // Files without the recognized extension are not enumerated.
    write_file(directory.path(), "notes.txt", "ignore me");

    let output_directory = directory.path().join("output");
    let summary = convert_directory(
        directory.path(),
        &output_directory,
        96,
        &empty_font_config(),
    )?;

    assert_eq!(summary.converted, 2);
    assert_eq!(summary.failed, 1);
    assert!(output_directory.join("a.png").exists());
    assert!(output_directory.join("b.png").exists());
    assert!(!output_directory.join("broken.png").exists());
    assert!(!output_directory.join("notes.png").exists());
    Ok(())
}

#[test]
fn batch_creates_a_missing_output_directory() -> Result<()> {
    let directory = tempfile::tempdir()?;
    write_file(directory.path(), "a.dxf", MINIMAL_LINE_DXF);

    let output_directory = directory.path().join("nested").join("output");
    let summary = convert_directory(
        directory.path(),
        &output_directory,
        96,
        &empty_font_config(),
    )?;

    assert_eq!(summary.converted, 1);
    assert!(output_directory.join("a.png").exists());
    Ok(())
}

#[test]
fn batch_of_an_empty_directory_is_a_no_op() -> Result<()> {
    let directory = tempfile::tempdir()?;
    let output_directory = directory.path().join("output");
    let summary = convert_directory(
        directory.path(),
        &output_directory,
        96,
        &empty_font_config(),
    )?;

    assert_eq!(summary.converted, 0);
    assert_eq!(summary.failed, 0);
    Ok(())
}
