//! Reports printed by the CLI.
//!
//! Each report is a plain data structure that can be rendered as text
//! through `Display` or serialized to JSON.

mod summary;

pub use summary::{summarize, CategoryCount, SummaryReport};

use std::fmt;

use serde::Serialize;

use crate::categories::CategoryNames;
use crate::geom::ImageSize;
use crate::sample::Rgba;
use crate::session::LoadedImage;

/// The boxes of one image, grouped by category.
#[derive(Clone, Debug, Serialize)]
pub struct ImageReport {
    pub image: String,
    pub label_file: String,
    pub size: ImageSize,
    pub needs_save: bool,
    pub groups: Vec<GroupReport>,
}

/// One category group.
#[derive(Clone, Debug, Serialize)]
pub struct GroupReport {
    pub category: usize,
    pub name: String,
    pub color: Option<Rgba>,
    pub samples: Vec<SampleReport>,
}

/// One box.
#[derive(Clone, Debug, Serialize)]
pub struct SampleReport {
    pub id: usize,
    /// 0-based label file line, absent for drawn boxes.
    pub line: Option<usize>,
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub visible: bool,
    pub deleted: bool,
    pub is_new: bool,
    pub new_category: Option<usize>,
    /// The line this sample would be saved as.
    pub yolo: String,
}

impl ImageReport {
    /// Builds the report for the loaded image. With `only_visible`, hidden
    /// samples are left out, as when drawing.
    pub fn new(image: &LoadedImage, names: &CategoryNames, only_visible: bool) -> Self {
        let groups = image
            .grouper
            .group_by_category(only_visible)
            .into_iter()
            .map(|(category, samples)| GroupReport {
                category,
                name: names.name(category).unwrap_or("?").to_string(),
                color: image.grouper.color(category),
                samples: samples
                    .into_iter()
                    .map(|(id, sample)| {
                        let bbox = sample.bbox();
                        SampleReport {
                            id: id.as_usize(),
                            line: sample.line_number(),
                            left: bbox.left,
                            top: bbox.top,
                            right: bbox.right,
                            bottom: bbox.bottom,
                            visible: sample.is_visible(),
                            deleted: sample.is_deleted(),
                            is_new: sample.is_new(),
                            new_category: sample.new_category_index(),
                            yolo: sample.to_yolo().to_string(),
                        }
                    })
                    .collect(),
            })
            .collect();

        Self {
            image: image.entry.image_path.display().to_string(),
            label_file: image.entry.label_path.display().to_string(),
            size: image.size,
            needs_save: image.grouper.needs_save(),
            groups,
        }
    }

    pub fn sample_count(&self) -> usize {
        self.groups.iter().map(|group| group.samples.len()).sum()
    }
}

impl fmt::Display for ImageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.image, self.size)?;
        writeln!(f, "labels: {}", self.label_file)?;
        writeln!(f, "boxes:  {}", self.sample_count())?;

        for group in &self.groups {
            writeln!(f)?;
            let color = group
                .color
                .map(|color| color.to_string())
                .unwrap_or_else(|| "-".to_string());
            writeln!(
                f,
                "[{}] {} {} ({} box(es))",
                group.category,
                group.name,
                color,
                group.samples.len()
            )?;

            for sample in &group.samples {
                let line = match sample.line {
                    Some(line) => format!("line {line}"),
                    None => "new".to_string(),
                };
                write!(
                    f,
                    "  #{:<3} {:<8} ({:.1}, {:.1}) - ({:.1}, {:.1})  {}",
                    sample.id,
                    line,
                    sample.left,
                    sample.top,
                    sample.right,
                    sample.bottom,
                    sample.yolo
                )?;
                if let Some(category) = sample.new_category {
                    write!(f, "  -> {category}")?;
                }
                if !sample.visible {
                    write!(f, "  hidden")?;
                }
                if sample.deleted {
                    write!(f, "  deleted")?;
                }
                writeln!(f)?;
            }
        }

        Ok(())
    }
}
