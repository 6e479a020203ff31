//! Per-category box counts across a directory.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::YolomarkError;
use crate::session::{Position, Session};

/// Box counts of every navigable image.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SummaryReport {
    pub images: usize,
    pub skipped_images: usize,
    pub empty_images: usize,
    pub boxes: usize,
    pub categories: Vec<CategoryCount>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: usize,
    pub name: String,
    pub boxes: usize,
    pub images: usize,
}

/// Steps through every image of the session, counting boxes.
///
/// Nothing is edited, so no label file is rewritten on the way.
pub fn summarize(session: &mut Session) -> Result<SummaryReport, YolomarkError> {
    let mut boxes_per_category: BTreeMap<usize, (usize, usize)> = BTreeMap::new();
    let mut report = SummaryReport {
        skipped_images: session.images().skipped.len(),
        ..Default::default()
    };

    while let Position::Image(_) = session.next()? {
        let Some(image) = session.current() else {
            break;
        };
        report.images += 1;
        if image.grouper.is_empty() {
            report.empty_images += 1;
        }

        for (category, samples) in image.grouper.group_by_category(false) {
            let entry = boxes_per_category.entry(category).or_default();
            entry.0 += samples.len();
            entry.1 += 1;
            report.boxes += samples.len();
        }
    }

    report.categories = boxes_per_category
        .into_iter()
        .map(|(category, (boxes, images))| CategoryCount {
            category,
            name: session.names().name(category).unwrap_or("?").to_string(),
            boxes,
            images,
        })
        .collect();

    Ok(report)
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Images with labels: {}", self.images)?;
        writeln!(f, "Images skipped:     {}", self.skipped_images)?;
        writeln!(f, "Images w/o boxes:   {}", self.empty_images)?;
        writeln!(f, "Boxes:              {}", self.boxes)?;

        if self.categories.is_empty() {
            return Ok(());
        }

        writeln!(f)?;
        let name_width = self
            .categories
            .iter()
            .map(|c| c.name.len())
            .max()
            .unwrap_or(0)
            .max(4);
        writeln!(
            f,
            "{:>5}  {:<name_width$}  {:>7}  {:>7}",
            "index", "name", "boxes", "images"
        )?;
        for count in &self.categories {
            writeln!(
                f,
                "{:>5}  {:<name_width$}  {:>7}  {:>7}",
                count.category, count.name, count.boxes, count.images
            )?;
        }
        Ok(())
    }
}
