//! Chapter ordering, range selection, adjacent pairs and sliding windows.

use crate::scene::chapter_slug;
use derive_getters::Getters;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::warn;

static SEQUENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]*(\d+(?:\.\d+)?)").expect("Valid sequence number regex")
});

/// Sequence number embedded in a chapter slug, if any.
///
/// The number follows an optional alphabetic prefix: `ch12.5-storm` → 12.5,
/// `7-intro` → 7. Slugs without one sort after every numbered slug.
///
/// # Examples
///
/// ```
/// use storylint_parser::chapter_sort_key;
///
/// assert_eq!(chapter_sort_key("ch12.5-storm"), Some(12.5));
/// assert_eq!(chapter_sort_key("7-intro"), Some(7.0));
/// assert_eq!(chapter_sort_key("prologue"), None);
/// ```
pub fn chapter_sort_key(slug: &str) -> Option<f64> {
    SEQUENCE
        .captures(slug)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn compare_slugs(a: &str, b: &str) -> Ordering {
    let key = |slug: &str| chapter_sort_key(slug).unwrap_or(f64::INFINITY);
    key(a).total_cmp(&key(b)).then_with(|| a.cmp(b))
}

/// A chapter selected for auditing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters, derive_new::new)]
pub struct ChapterRef {
    slug: String,
    path: PathBuf,
}

impl ChapterRef {
    /// Reference the chapter file at `path`, slugged by its directory name.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::new(chapter_slug(path), path.to_path_buf())
    }
}

/// A run of consecutive chapters audited together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ChapterWindow {
    chapters: Vec<ChapterRef>,
}

impl ChapterWindow {
    /// `first-last` slug naming the window and its artifact.
    pub fn slug(&self) -> String {
        match (self.chapters.first(), self.chapters.last()) {
            (Some(first), Some(last)) => format!("{}-{}", first.slug, last.slug),
            _ => String::new(),
        }
    }
}

/// Consecutive windows of exactly `size` items.
///
/// Zero windows when `size` is zero or larger than the input, otherwise
/// `len - size + 1`.
pub fn windows<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    if size == 0 || items.len() < size {
        return Vec::new();
    }
    items.windows(size).map(<[T]>::to_vec).collect()
}

/// Chapters in narrative order.
///
/// # Examples
///
/// ```
/// use storylint_parser::{ChapterPlan, ChapterRef};
///
/// let plan = ChapterPlan::new(
///     ["ch10", "ch2", "ch1.5", "epilogue"]
///         .iter()
///         .map(|s| ChapterRef::new(s.to_string(), format!("{}/content.md", s).into()))
///         .collect(),
/// );
/// assert_eq!(plan.slugs(), vec!["ch1.5", "ch2", "ch10", "epilogue"]);
/// assert_eq!(plan.slice(Some("ch10"), Some("ch2")).slugs(), vec!["ch2", "ch10"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ChapterPlan {
    chapters: Vec<ChapterRef>,
}

impl ChapterPlan {
    /// Order `chapters` by sequence number, then slug.
    ///
    /// Slugs name artifacts, so only the first chapter carrying a slug is
    /// kept; later ones are dropped with a warning.
    pub fn new(mut chapters: Vec<ChapterRef>) -> Self {
        chapters.sort_by(|a, b| compare_slugs(&a.slug, &b.slug));
        chapters.dedup_by(|later, kept| {
            let duplicate = later.slug == kept.slug;
            if duplicate {
                warn!(
                    slug = %kept.slug,
                    kept = %kept.path.display(),
                    dropped = %later.path.display(),
                    "Duplicate chapter slug, ignoring later file"
                );
            }
            duplicate
        });
        Self { chapters }
    }

    /// Build a plan from chapter file paths.
    pub fn from_paths<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Self {
        Self::new(paths.into_iter().map(ChapterRef::from_path).collect())
    }

    /// Slugs in order.
    pub fn slugs(&self) -> Vec<&str> {
        self.chapters.iter().map(|c| c.slug.as_str()).collect()
    }

    /// Number of chapters.
    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    /// Whether the plan is empty.
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Inclusive sub-range between two slugs.
    ///
    /// A missing or unknown start means the first chapter, a missing or
    /// unknown end the last. Reversed bounds are swapped.
    pub fn slice(&self, start: Option<&str>, end: Option<&str>) -> Self {
        if self.chapters.is_empty() || (start.is_none() && end.is_none()) {
            return self.clone();
        }
        let position = |slug: Option<&str>| {
            slug.and_then(|s| self.chapters.iter().position(|c| c.slug == s))
        };
        let mut from = position(start).unwrap_or(0);
        let mut to = position(end).unwrap_or(self.chapters.len() - 1);
        if from > to {
            std::mem::swap(&mut from, &mut to);
        }
        Self {
            chapters: self.chapters[from..=to].to_vec(),
        }
    }

    /// Consecutive `(left, right)` pairs.
    pub fn adjacent_pairs(&self) -> Vec<(ChapterRef, ChapterRef)> {
        self.chapters
            .windows(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect()
    }

    /// Sliding windows of `size` chapters.
    pub fn windows(&self, size: usize) -> Vec<ChapterWindow> {
        windows(&self.chapters, size)
            .into_iter()
            .map(|chapters| ChapterWindow { chapters })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(slugs: &[&str]) -> ChapterPlan {
        ChapterPlan::from_paths(slugs.iter().map(|s| format!("/book/{}/content.md", s)))
    }

    #[test]
    fn orders_by_sequence_then_slug() {
        let plan = plan(&["ch3", "intro", "ch12.5-storm", "ch12", "7-detour", "appendix"]);
        assert_eq!(
            plan.slugs(),
            vec!["ch3", "7-detour", "ch12", "ch12.5-storm", "appendix", "intro"]
        );
    }

    #[test]
    fn slice_is_symmetric_under_swapped_bounds() {
        let plan = plan(&["ch1", "ch2", "ch3", "ch4", "ch5"]);
        let forward = plan.slice(Some("ch2"), Some("ch4"));
        let reversed = plan.slice(Some("ch4"), Some("ch2"));
        assert_eq!(forward, reversed);
        assert_eq!(forward.slugs(), vec!["ch2", "ch3", "ch4"]);
    }

    #[test]
    fn unknown_bounds_fall_back_to_ends() {
        let plan = plan(&["ch1", "ch2", "ch3"]);
        assert_eq!(plan.slice(Some("ch9"), Some("ch2")).slugs(), vec!["ch1", "ch2"]);
        assert_eq!(plan.slice(Some("ch2"), None).slugs(), vec!["ch2", "ch3"]);
        assert_eq!(plan.slice(None, None).len(), 3);
    }

    #[test]
    fn seven_chapters_window_five_gives_three() {
        let plan = plan(&["ch1", "ch2", "ch3", "ch4", "ch5", "ch6", "ch7"]);
        let windows = plan.windows(5);
        assert_eq!(windows.len(), 3);
        assert!(windows.iter().all(|w| w.chapters().len() == 5));
        assert_eq!(windows[0].slug(), "ch1-ch5");
        assert_eq!(windows[2].slug(), "ch3-ch7");
    }

    #[test]
    fn window_edge_cases() {
        let items = [1, 2, 3];
        assert!(windows(&items, 0).is_empty());
        assert!(windows(&items, 4).is_empty());
        assert_eq!(windows(&items, 3), vec![vec![1, 2, 3]]);
        assert_eq!(windows(&items, 1).len(), 3);
    }

    #[test]
    fn duplicate_slugs_keep_first_file() {
        let plan = ChapterPlan::from_paths([
            "/book/part-a/ch01/content.md",
            "/book/part-a/ch02/content.md",
            "/book/part-b/ch01/content.md",
        ]);
        assert_eq!(plan.slugs(), vec!["ch01", "ch02"]);
        assert_eq!(
            plan.chapters()[0].path(),
            &PathBuf::from("/book/part-a/ch01/content.md")
        );
        assert_eq!(plan.adjacent_pairs().len(), 1);
    }

    #[test]
    fn adjacent_pairs_are_consecutive() {
        let plan = plan(&["ch1", "ch2", "ch3"]);
        let pairs: Vec<(String, String)> = plan
            .adjacent_pairs()
            .into_iter()
            .map(|(l, r)| (l.slug().clone(), r.slug().clone()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("ch1".to_string(), "ch2".to_string()),
                ("ch2".to_string(), "ch3".to_string())
            ]
        );
        assert!(super::ChapterPlan::default().adjacent_pairs().is_empty());
    }
}
