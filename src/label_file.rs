//! YOLO label file reader and writer.
//!
//! One object per line: `class_id center_x center_y width height`, the four
//! coordinates normalized to the image size. Files are always rewritten as a
//! whole.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

use log::debug;

use crate::categories::CategoryNames;
use crate::error::YolomarkError;
use crate::geom::precision::format_fixed;
use crate::geom::ImageSize;
use crate::sample::{Sample, SampleGrouper};

/// One parsed label line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct YoloRecord {
    pub class_id: usize,
    pub cx: f64,
    pub cy: f64,
    pub w: f64,
    pub h: f64,
}

/// Space-delimited, six decimals per coordinate. Values are printed as
/// stored; truncation happens in [`Sample::to_yolo`].
impl fmt::Display for YoloRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.class_id,
            format_fixed(self.cx),
            format_fixed(self.cy),
            format_fixed(self.w),
            format_fixed(self.h)
        )
    }
}

/// Reads a label file into samples, in file order.
///
/// Any malformed line or unknown category aborts the whole load.
pub fn read_label_file(
    path: &Path,
    names: &CategoryNames,
    image_size: ImageSize,
) -> Result<Vec<Sample>, YolomarkError> {
    let content = fs::read_to_string(path).map_err(YolomarkError::Io)?;
    let samples = read_label_str(&content, path, names, image_size)?;
    debug!("read {} sample(s) from {}", samples.len(), path.display());
    Ok(samples)
}

/// Parses label file content. `path` is only used in error messages.
pub fn read_label_str(
    content: &str,
    path: &Path,
    names: &CategoryNames,
    image_size: ImageSize,
) -> Result<Vec<Sample>, YolomarkError> {
    let mut samples = Vec::new();

    for (line_idx, line) in content.lines().enumerate() {
        let Some(record) = parse_label_line(line, path, line_idx + 1)? else {
            continue;
        };
        let sample = Sample::from_yolo(&record, line_idx, names, image_size).map_err(|err| {
            YolomarkError::UnknownCategory {
                index: err.0,
                path: path.to_path_buf(),
                line: line_idx + 1,
            }
        })?;
        samples.push(sample);
    }

    Ok(samples)
}

/// Renders the label file content for the grouper's current state.
///
/// Groups by effective category in ascending order, keeping sample order
/// within a category. Deleted samples are not written.
pub fn render_label_file(grouper: &SampleGrouper) -> String {
    let mut out = String::new();
    for sample in grouper.group_for_save().into_values().flatten() {
        out.push_str(&sample.to_yolo().to_string());
        out.push('\n');
    }
    out
}

/// Truncates `path` and writes [`render_label_file`]'s content to it.
/// Returns the number of lines written.
pub fn write_label_file(path: &Path, grouper: &SampleGrouper) -> Result<usize, YolomarkError> {
    let to_io_err = |source| YolomarkError::LabelWrite {
        path: path.to_path_buf(),
        source,
    };

    let content = render_label_file(grouper);
    let mut file = fs::File::create(path).map_err(to_io_err)?;
    file.write_all(content.as_bytes()).map_err(to_io_err)?;
    file.flush().map_err(to_io_err)?;

    let written = content.lines().count();
    debug!("wrote {} line(s) to {}", written, path.display());
    Ok(written)
}

/// Parses one label line. Blank lines yield `None`. `line_num` is 1-based.
pub fn parse_label_line(
    line: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<Option<YoloRecord>, YolomarkError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    // Take at most 6 tokens so pathological inputs do not allocate unbounded memory.
    let tokens: Vec<&str> = trimmed.split_whitespace().take(6).collect();

    if tokens.len() != 5 {
        return Err(YolomarkError::LabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: if tokens.len() > 5 {
                "expected 5 elements, found more".to_string()
            } else {
                format!("expected 5 elements, found {}", tokens.len())
            },
        });
    }

    let class_id = tokens[0]
        .parse::<usize>()
        .map_err(|_| YolomarkError::LabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!(
                "invalid category index '{}'; expected non-negative integer",
                tokens[0]
            ),
        })?;

    let cx = parse_coordinate(tokens[1], "center_x", file_path, line_num)?;
    let cy = parse_coordinate(tokens[2], "center_y", file_path, line_num)?;
    let w = parse_coordinate(tokens[3], "width", file_path, line_num)?;
    let h = parse_coordinate(tokens[4], "height", file_path, line_num)?;

    Ok(Some(YoloRecord {
        class_id,
        cx,
        cy,
        w,
        h,
    }))
}

/// Fuzz-only entrypoint for single-line parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_label_line(input: &str) -> Result<(), YolomarkError> {
    let _ = parse_label_line(input, Path::new("<fuzz>"), 1)?;
    Ok(())
}

fn parse_coordinate(
    raw: &str,
    field_name: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<f64, YolomarkError> {
    let value = raw
        .parse::<f64>()
        .map_err(|_| YolomarkError::LabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!("invalid {field_name} '{raw}'; expected floating-point number"),
        })?;
    if !value.is_finite() {
        return Err(YolomarkError::LabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!("{field_name} '{raw}' is not finite"),
        });
    }
    Ok(value)
}
