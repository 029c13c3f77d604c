// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! A one-dimensional genre similarity scale.
//!
//! Tracks with similar genre tag sets are mapped onto nearby values
//! in the interval [0, 1].

use hashbrown::HashMap;
use ndarray::{Array1, Array2, Axis};

use crate::prelude::*;

pub type GenreScalarValue = f64;

#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
#[repr(transparent)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct GenreScalar(GenreScalarValue);

impl GenreScalar {
    pub const MIN: Self = Self(0.0);
    pub const MAX: Self = Self(1.0);

    #[must_use]
    pub const fn new(value: GenreScalarValue) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> GenreScalarValue {
        let Self(value) = self;
        value
    }

    /// The value quantized to 11 steps from 0 to 10.
    #[must_use]
    pub fn to_tenths(self) -> u8 {
        (self.value() * 10.0).round() as u8
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GenreScalarInvalidity {
    OutOfRange,
}

impl Validate for GenreScalar {
    type Invalidity = GenreScalarInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .invalidate_if(
                !(*self >= Self::MIN && *self <= Self::MAX),
                Self::Invalidity::OutOfRange,
            )
            .into()
    }
}

const POWER_ITERATION_MAX_ROUNDS: usize = 256;

const POWER_ITERATION_EPSILON: f64 = 1e-12;

/// Project the genre tag sets of all tracks onto a single axis.
///
/// The tags are one-hot encoded and min-max scaled per tag. The
/// resulting rows are projected onto their first principal component
/// which is finally min-max scaled into [0, 1] and rounded to
/// 3 decimal places.
///
/// The result contains one value per input item in the same order.
/// Without any variance between the tag sets all values are 0.
#[must_use]
pub fn project_genres<T, S>(tag_sets: &[T]) -> Vec<GenreScalar>
where
    T: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut columns = HashMap::<&str, usize>::new();
    let rows = tag_sets
        .iter()
        .map(|tags| {
            tags.as_ref()
                .iter()
                .map(|tag| {
                    let next_column = columns.len();
                    *columns.entry(tag.as_ref()).or_insert(next_column)
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    let Some(matrix) = one_hot_matrix(&rows, columns.len()) else {
        return vec![GenreScalar::MIN; tag_sets.len()];
    };
    let Some(component) = first_principal_component(&matrix) else {
        return vec![GenreScalar::MIN; tag_sets.len()];
    };
    min_max_scaled(matrix.dot(&component))
        .into_iter()
        .map(|value| GenreScalar::new((value * 1000.0).round() / 1000.0))
        .collect()
}

/// One-hot encoded, min-max scaled and mean centered columns.
///
/// Returns `None` without any rows.
fn one_hot_matrix(rows: &[Vec<usize>], column_count: usize) -> Option<Array2<f64>> {
    let mut matrix = Array2::<f64>::zeros((rows.len(), column_count));
    for (index, row) in rows.iter().enumerate() {
        for &column in row {
            matrix[[index, column]] = 1.0;
        }
    }
    let min = matrix.fold_axis(Axis(0), f64::INFINITY, |&acc, &value| acc.min(value));
    let max = matrix.fold_axis(Axis(0), f64::NEG_INFINITY, |&acc, &value| acc.max(value));
    // Constant columns collapse to 0
    let scale = (max - &min).mapv(|range| {
        if range > POWER_ITERATION_EPSILON {
            range.recip()
        } else {
            0.0
        }
    });
    let mut matrix = (matrix - &min) * &scale;
    let mean = matrix.mean_axis(Axis(0))?;
    matrix -= &mean;
    Some(matrix)
}

fn first_principal_component(matrix: &Array2<f64>) -> Option<Array1<f64>> {
    let column_count = matrix.ncols();
    if column_count == 0 {
        return None;
    }
    // Deterministic, non-uniform start vector
    let mut component = normalized(Array1::from_shape_fn(column_count, |column| {
        1.0 + column as f64 / column_count as f64
    }))?;
    for _ in 0..POWER_ITERATION_MAX_ROUNDS {
        let next = normalized(matrix.t().dot(&matrix.dot(&component)))?;
        let delta = (&next - &component).fold(0.0, |acc: f64, value| acc.max(value.abs()));
        component = next;
        if delta < POWER_ITERATION_EPSILON {
            break;
        }
    }
    // The sign of an eigenvector is arbitrary. Flip it so that the
    // loading with the largest magnitude is positive.
    let dominant = component.fold(0.0, |acc: f64, &value| {
        if value.abs() > acc.abs() { value } else { acc }
    });
    if dominant < 0.0 {
        component.mapv_inplace(|value| -value);
    }
    Some(component)
}

fn normalized(vector: Array1<f64>) -> Option<Array1<f64>> {
    let norm = vector.dot(&vector).sqrt();
    if norm < POWER_ITERATION_EPSILON || !norm.is_finite() {
        return None;
    }
    Some(vector / norm)
}

fn min_max_scaled(values: Array1<f64>) -> Array1<f64> {
    let min = values.fold(f64::INFINITY, |acc, &value| acc.min(value));
    let max = values.fold(f64::NEG_INFINITY, |acc, &value| acc.max(value));
    let range = max - min;
    if !(range > POWER_ITERATION_EPSILON) {
        return Array1::zeros(values.len());
    }
    (values - min) / range
}
