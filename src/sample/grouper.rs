//! Per-image sample collection and its category views.

use std::collections::BTreeMap;
use std::fmt;

use rand::{rngs::StdRng, RngExt, SeedableRng};
use serde::Serialize;

use super::{Sample, SampleId};

/// Display color of a category, `[r, g, b, a]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Rgba(pub [u8; 4]);

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, _] = self.0;
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

/// The samples of the image currently being edited.
///
/// Samples keep their insertion order; [`SampleId`]s are positions in that
/// order and stay valid until [`SampleGrouper::commit`] drops deleted
/// samples.
pub struct SampleGrouper {
    samples: Vec<Sample>,
    colors: BTreeMap<usize, Rgba>,
    rng: StdRng,
}

impl SampleGrouper {
    /// Creates an empty grouper. With a seed, category colors are
    /// reproducible.
    pub fn new(color_seed: Option<u64>) -> Self {
        let rng = match color_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::rng().random()),
        };
        Self {
            samples: Vec::new(),
            colors: BTreeMap::new(),
            rng,
        }
    }

    /// Appends a sample and makes sure its category has a color.
    pub fn add_sample(&mut self, sample: Sample) -> SampleId {
        self.ensure_color(sample.category_index());
        self.samples.push(sample);
        SampleId::new(self.samples.len() - 1)
    }

    /// Returns the color of `category`, picking a random one the first time
    /// the category is seen.
    pub fn ensure_color(&mut self, category: usize) -> Rgba {
        let rng = &mut self.rng;
        *self
            .colors
            .entry(category)
            .or_insert_with(|| Rgba([rng.random(), rng.random(), rng.random(), 255]))
    }

    pub fn color(&self, category: usize) -> Option<Rgba> {
        self.colors.get(&category).copied()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn sample(&self, id: SampleId) -> Option<&Sample> {
        self.samples.get(id.as_usize())
    }

    pub fn sample_mut(&mut self, id: SampleId) -> Option<&mut Sample> {
        self.samples.get_mut(id.as_usize())
    }

    /// Finds the sample read from the given 0-based label line.
    pub fn find_by_line(&self, line_number: usize) -> Option<SampleId> {
        self.samples
            .iter()
            .position(|sample| sample.line_number() == Some(line_number))
            .map(SampleId::new)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Groups samples by their original category, as drawn on screen.
    ///
    /// Order within a group is insertion order. With `only_visible`, hidden
    /// samples are left out.
    pub fn group_by_category(&self, only_visible: bool) -> BTreeMap<usize, Vec<(SampleId, &Sample)>> {
        let mut groups: BTreeMap<usize, Vec<(SampleId, &Sample)>> = BTreeMap::new();
        for (index, sample) in self.samples.iter().enumerate() {
            if only_visible && !sample.is_visible() {
                continue;
            }
            groups
                .entry(sample.category_index())
                .or_default()
                .push((SampleId::new(index), sample));
        }
        groups
    }

    /// Groups the samples that will be written, by effective category.
    /// Deleted samples are left out; keys iterate in ascending order.
    pub fn group_for_save(&self) -> BTreeMap<usize, Vec<&Sample>> {
        let mut groups: BTreeMap<usize, Vec<&Sample>> = BTreeMap::new();
        for sample in self.samples.iter().filter(|sample| !sample.is_deleted()) {
            groups
                .entry(sample.effective_category())
                .or_default()
                .push(sample);
        }
        groups
    }

    /// Shows or hides every sample whose original category is `category`.
    /// Returns how many samples matched.
    pub fn set_group_visibility(&mut self, category: usize, visible: bool) -> usize {
        let mut matched = 0;
        for sample in self
            .samples
            .iter_mut()
            .filter(|sample| sample.category_index() == category)
        {
            sample.set_visible(visible);
            matched += 1;
        }
        matched
    }

    /// True if any sample was edited, deleted or drawn since the last commit.
    pub fn needs_save(&self) -> bool {
        self.samples.iter().any(Sample::needs_save)
    }

    /// Drops deleted samples and makes pending edits the saved state. Called
    /// after the label file has been written.
    pub fn commit(&mut self) {
        self.samples.retain(|sample| !sample.is_deleted());
        for sample in &mut self.samples {
            sample.commit();
        }
        let categories: Vec<usize> = self.samples.iter().map(Sample::category_index).collect();
        for category in categories {
            self.ensure_color(category);
        }
    }
}

impl fmt::Debug for SampleGrouper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SampleGrouper")
            .field("samples", &self.samples)
            .field("colors", &self.colors)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::CategoryNames;
    use crate::geom::ImageSize;
    use crate::label_file::YoloRecord;

    fn names() -> CategoryNames {
        CategoryNames::parse("a\nb\nc\n")
    }

    fn sample(class_id: usize, line: usize) -> Sample {
        let record = YoloRecord {
            class_id,
            cx: 0.5,
            cy: 0.5,
            w: 0.1 * (line + 1) as f64,
            h: 0.1,
        };
        Sample::from_yolo(&record, line, &names(), ImageSize::new(100, 100)).expect("known")
    }

    fn lines(group: &[(SampleId, &Sample)]) -> Vec<Option<usize>> {
        group.iter().map(|(_, s)| s.line_number()).collect()
    }

    #[test]
    fn group_by_category_keeps_insertion_order() {
        let mut grouper = SampleGrouper::new(Some(1));
        for (line, class_id) in [1, 0, 1, 2, 1].into_iter().enumerate() {
            grouper.add_sample(sample(class_id, line));
        }

        let groups = grouper.group_by_category(false);
        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(lines(&groups[&1]), vec![Some(0), Some(2), Some(4)]);
        assert_eq!(groups[&1][1].0, SampleId::new(2));
    }

    #[test]
    fn group_by_category_skips_hidden_when_asked() {
        let mut grouper = SampleGrouper::new(Some(1));
        grouper.add_sample(sample(0, 0));
        let hidden = grouper.add_sample(sample(0, 1));
        grouper
            .sample_mut(hidden)
            .expect("sample exists")
            .set_visible(false);

        assert_eq!(grouper.group_by_category(false)[&0].len(), 2);
        assert_eq!(lines(&grouper.group_by_category(true)[&0]), vec![Some(0)]);
    }

    #[test]
    fn group_for_save_uses_effective_category_and_drops_deleted() {
        let mut grouper = SampleGrouper::new(Some(1));
        let moved = grouper.add_sample(sample(0, 0));
        let deleted = grouper.add_sample(sample(0, 1));
        grouper.add_sample(sample(2, 2));

        grouper.sample_mut(moved).expect("sample").set_category(2);
        grouper.sample_mut(deleted).expect("sample").set_deleted(true);

        let groups = grouper.group_for_save();
        assert!(!groups.contains_key(&0));
        let group = &groups[&2];
        assert_eq!(
            group.iter().map(|s| s.line_number()).collect::<Vec<_>>(),
            vec![Some(0), Some(2)]
        );
    }

    #[test]
    fn colors_are_assigned_once_per_category() {
        let mut grouper = SampleGrouper::new(Some(7));
        grouper.add_sample(sample(1, 0));
        let first = grouper.color(1).expect("color assigned");
        grouper.add_sample(sample(1, 1));
        assert_eq!(grouper.color(1), Some(first));
        assert_eq!(first.0[3], 255);
        assert_eq!(grouper.color(0), None);
    }

    #[test]
    fn seeded_colors_are_reproducible() {
        let mut a = SampleGrouper::new(Some(42));
        let mut b = SampleGrouper::new(Some(42));
        assert_eq!(a.ensure_color(3), b.ensure_color(3));
        assert_eq!(a.ensure_color(0), b.ensure_color(0));
    }

    #[test]
    fn set_group_visibility_matches_original_category() {
        let mut grouper = SampleGrouper::new(Some(1));
        grouper.add_sample(sample(0, 0));
        grouper.add_sample(sample(1, 1));
        grouper.add_sample(sample(0, 2));

        assert_eq!(grouper.set_group_visibility(0, false), 2);
        let visible: Vec<bool> = grouper.samples().iter().map(Sample::is_visible).collect();
        assert_eq!(visible, vec![false, true, false]);
    }

    #[test]
    fn commit_purges_deleted_and_clears_flags() {
        let mut grouper = SampleGrouper::new(Some(1));
        let keep = grouper.add_sample(sample(0, 0));
        let gone = grouper.add_sample(sample(1, 1));
        grouper.sample_mut(keep).expect("sample").set_category(2);
        grouper.sample_mut(gone).expect("sample").set_deleted(true);
        assert!(grouper.needs_save());

        grouper.commit();
        assert_eq!(grouper.len(), 1);
        assert_eq!(grouper.samples()[0].category_index(), 2);
        assert!(grouper.color(2).is_some());
        assert!(!grouper.needs_save());
    }

    #[test]
    fn find_by_line_maps_label_lines_to_ids() {
        let mut grouper = SampleGrouper::new(Some(1));
        grouper.add_sample(sample(0, 0));
        grouper.add_sample(sample(0, 1));
        assert_eq!(grouper.find_by_line(1), Some(SampleId::new(1)));
        assert_eq!(grouper.find_by_line(5), None);
    }

    #[test]
    fn rgba_displays_as_hex() {
        assert_eq!(Rgba([255, 0, 16, 255]).to_string(), "#ff0010");
    }
}
