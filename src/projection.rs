//! Yield projections for individual fields and whole collections.
//!
//! Fertilizer effects stack additively inside a single multiplier:
//! `yield_per_ha * (1 + sum(effects)) * area`. Nothing here rounds; callers
//! that display totals round on their own.

use serde::Serialize;

use crate::catalog::{effect_for_fertilizer_id, Fertilizer};
use crate::field::Field;

/// Yield in tons without any fertilizer adjustment.
pub fn baseline_yield(field: &Field) -> f64 {
    field.yield_per_ha() * field.area()
}

pub fn fertilizer_effect_sum<'a>(fertilizers: impl IntoIterator<Item = &'a Fertilizer>) -> f64 {
    fertilizers.into_iter().map(|f| f.effect()).sum()
}

/// Same as [`fertilizer_effect_sum`] for raw identifiers; unknown ones add nothing.
pub fn fertilizer_effect_sum_by_id<'a>(ids: impl IntoIterator<Item = &'a str>) -> f64 {
    ids.into_iter().map(effect_for_fertilizer_id).sum()
}

pub fn adjusted_yield(field: &Field) -> f64 {
    field.yield_per_ha() * (1.0 + fertilizer_effect_sum(field.fertilizers())) * field.area()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct YieldTotals {
    pub total_area: f64,
    pub total_baseline_yield: f64,
    pub total_adjusted_yield: f64,
}

impl YieldTotals {
    /// Extra tons attributed to fertilizers.
    pub fn fertilizer_gain(&self) -> f64 {
        self.total_adjusted_yield - self.total_baseline_yield
    }
}

pub fn aggregate<'a>(fields: impl IntoIterator<Item = &'a Field>) -> YieldTotals {
    fields
        .into_iter()
        .fold(YieldTotals::default(), |mut totals, field| {
            totals.total_area += field.area();
            totals.total_baseline_yield += baseline_yield(field);
            totals.total_adjusted_yield += adjusted_yield(field);
            totals
        })
}

/// One field together with both of its projections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldProjection<'a> {
    #[serde(flatten)]
    pub field: &'a Field,
    pub baseline_yield: f64,
    pub adjusted_yield: f64,
}

pub fn project(field: &Field) -> FieldProjection<'_> {
    FieldProjection {
        field,
        baseline_yield: baseline_yield(field),
        adjusted_yield: adjusted_yield(field),
    }
}
