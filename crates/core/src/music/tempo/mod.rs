// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt;

use crate::prelude::*;

pub type TempoBpmValue = f64;

#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
#[repr(transparent)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct TempoBpm(TempoBpmValue);

impl TempoBpm {
    pub const UNIT_OF_MEASURE: &'static str = "bpm";

    pub const MIN: Self = Self(TempoBpmValue::MIN_POSITIVE);
    pub const MAX: Self = Self(TempoBpmValue::MAX);

    #[must_use]
    pub const fn new(value: TempoBpmValue) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> TempoBpmValue {
        let Self(value) = self;
        value
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        <Self as IsValid>::is_valid(self)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TempoBpmInvalidity {
    OutOfRange,
}

impl Validate for TempoBpm {
    type Invalidity = TempoBpmInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        // NaN fails both comparisons
        ValidationContext::new()
            .invalidate_if(
                !(*self >= Self::MIN && *self <= Self::MAX),
                Self::Invalidity::OutOfRange,
            )
            .into()
    }
}

impl fmt::Display for TempoBpm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{value} {unit}",
            value = self.value(),
            unit = Self::UNIT_OF_MEASURE
        )
    }
}

///////////////////////////////////////////////////////////////////////
// TempoBand
///////////////////////////////////////////////////////////////////////

/// A closed range of tempo ratios relative to a reference tempo.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TempoBand {
    pub min_ratio: f64,
    pub max_ratio: f64,
}

impl TempoBand {
    /// Same speed, +/- 10%
    pub const SAME_TIME: Self = Self::around(1.0);

    /// Double speed, +/- 10%
    pub const DOUBLE_TIME: Self = Self::around(2.0);

    /// Half speed, +/- 10%
    pub const HALF_TIME: Self = Self::around(0.5);

    pub const DEFAULT_BANDS: [Self; 3] = [Self::SAME_TIME, Self::DOUBLE_TIME, Self::HALF_TIME];

    const DEFAULT_TOLERANCE: f64 = 0.1;

    #[must_use]
    const fn around(ratio: f64) -> Self {
        Self {
            min_ratio: ratio * (1.0 - Self::DEFAULT_TOLERANCE),
            max_ratio: ratio * (1.0 + Self::DEFAULT_TOLERANCE),
        }
    }

    #[must_use]
    pub fn contains(self, reference: TempoBpm, tempo: TempoBpm) -> bool {
        let Self {
            min_ratio,
            max_ratio,
        } = self;
        let reference = reference.value();
        let tempo = tempo.value();
        tempo >= reference * min_ratio && tempo <= reference * max_ratio
    }
}
