use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::ProbeGeneration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for ImageDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} × {}", self.width, self.height)
    }
}

/// Images tab state for the open record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GalleryState {
    pub(crate) show_all: bool,
    pub(crate) probe: Option<ProbeGeneration>,
    /// `None` values are probes that failed.
    pub(crate) dimensions: HashMap<String, Option<ImageDimensions>>,
}

impl GalleryState {
    pub fn show_all(&self) -> bool {
        self.show_all
    }

    pub fn dimensions_of(&self, url: &str) -> Option<ImageDimensions> {
        self.dimensions.get(url).copied().flatten()
    }

    /// True once a probe batch has reported, even if every probe failed.
    pub fn has_probe_results(&self) -> bool {
        !self.dimensions.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTile {
    pub url: String,
    /// Badge: the URL is part of the filtered subset.
    pub is_filtered: bool,
    pub dimensions: Option<ImageDimensions>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryView {
    pub filtered: Vec<ImageTile>,
    /// Present only while "all images" is toggled on.
    pub all: Option<Vec<ImageTile>>,
    pub all_count: usize,
    pub can_toggle: bool,
    pub toggle_label: String,
}

/// Unique union of filtered and raw URLs, first occurrence wins.
pub fn probe_targets(filtered: &[String], all: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut targets = Vec::new();
    for url in filtered.iter().chain(all) {
        if seen.insert(url.as_str()) {
            targets.push(url.clone());
        }
    }
    targets
}

pub fn gallery_view(filtered: &[String], all: &[String], state: &GalleryState) -> GalleryView {
    let members: HashSet<&str> = filtered.iter().map(String::as_str).collect();
    let tile = |url: &String| ImageTile {
        url: url.clone(),
        is_filtered: members.contains(url.as_str()),
        dimensions: state.dimensions_of(url),
    };

    let can_toggle = all.len() > filtered.len();
    let toggle_label = if state.show_all {
        "Show Filtered Images Only".to_string()
    } else {
        format!("Show All Images ({})", all.len())
    };

    GalleryView {
        filtered: filtered.iter().map(tile).collect(),
        all: state.show_all.then(|| all.iter().map(tile).collect()),
        all_count: all.len(),
        can_toggle,
        toggle_label,
    }
}
