//! Filtered and sorted views over registered fields.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::{Crop, UnknownIdentifier};
use crate::field::Field;
use crate::projection::{adjusted_yield, aggregate, project, FieldProjection, YieldTotals};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Largest area first.
    Area,
    /// Largest fertilizer-adjusted yield first.
    Yield,
    /// Crop label, ascending.
    Crop,
}

impl FromStr for SortKey {
    type Err = UnknownIdentifier;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "area" => Ok(SortKey::Area),
            "yield" => Ok(SortKey::Yield),
            "crop" => Ok(SortKey::Crop),
            other => Err(UnknownIdentifier {
                kind: "sort key",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SortKey::Area => "area",
            SortKey::Yield => "yield",
            SortKey::Crop => "crop",
        };
        f.write_str(label)
    }
}

/// Parses an optional selector where an empty string means "no selection".
pub fn parse_selector<T: FromStr>(raw: Option<&str>) -> Result<Option<T>, T::Err> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some),
    }
}

pub fn filter_by_crop<'a>(fields: &'a [Field], crop: Option<Crop>) -> Vec<&'a Field> {
    fields
        .iter()
        .filter(|field| crop.map_or(true, |wanted| field.crop() == wanted))
        .collect()
}

/// Returns a new ordering of `fields`. The sort is stable, so fields with
/// equal keys keep their registration order.
pub fn sort_fields<'a>(fields: &[&'a Field], key: Option<SortKey>) -> Vec<&'a Field> {
    let mut sorted = fields.to_vec();
    match key {
        Some(SortKey::Area) => sorted.sort_by(|a, b| b.area().total_cmp(&a.area())),
        Some(SortKey::Yield) => {
            sorted.sort_by(|a, b| adjusted_yield(b).total_cmp(&adjusted_yield(a)))
        }
        Some(SortKey::Crop) => sorted.sort_by(|a, b| compare_labels(a.crop(), b.crop())),
        None => {}
    }
    sorted
}

fn compare_labels(a: Crop, b: Crop) -> Ordering {
    let left = a.label().to_lowercase();
    let right = b.label().to_lowercase();
    left.cmp(&right).then_with(|| a.label().cmp(b.label()))
}

/// Everything a field table needs: the displayed rows, totals over those
/// rows, and the crops available as filter options.
#[derive(Debug, Clone, Serialize)]
pub struct FieldView<'a> {
    pub rows: Vec<FieldProjection<'a>>,
    pub totals: YieldTotals,
    pub crop_options: Vec<Crop>,
    pub crop_filter: Option<Crop>,
    pub sort: Option<SortKey>,
}

impl<'a> FieldView<'a> {
    pub fn build(fields: &'a [Field], crop_filter: Option<Crop>, sort: Option<SortKey>) -> Self {
        let filtered = filter_by_crop(fields, crop_filter);
        let sorted = sort_fields(&filtered, sort);
        let totals = aggregate(sorted.iter().copied());
        Self {
            rows: sorted.into_iter().map(project).collect(),
            totals,
            crop_options: distinct_crops(fields),
            crop_filter,
            sort,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Crops present in `fields`, in the order they first appear.
pub fn distinct_crops(fields: &[Field]) -> Vec<Crop> {
    let mut crops = Vec::new();
    for field in fields {
        if !crops.contains(&field.crop()) {
            crops.push(field.crop());
        }
    }
    crops
}
