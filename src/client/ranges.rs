// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-circuit setpoint limits.

use std::collections::{BTreeSet, HashMap};

use crate::types::{Circuit, TemperatureRange};

/// Setpoint limits learned from the static values of each circuit.
///
/// Circuit 1 keeps its bounds in dedicated fields; circuits 2 and 3 are
/// stored by circuit number.
#[derive(Debug, Default)]
pub(crate) struct TemperatureRanges {
    min_temp: Option<f64>,
    max_temp: Option<f64>,
    circuits: HashMap<u8, (Option<f64>, Option<f64>)>,
    initialized: BTreeSet<u8>,
}

impl TemperatureRanges {
    /// Records the bounds read for `circuit`. Missing bounds keep their
    /// previous value; the circuit counts as initialized once both are known.
    pub(crate) fn store(&mut self, circuit: Circuit, min: Option<f64>, max: Option<f64>) {
        let (stored_min, stored_max) = if circuit.is_primary() {
            (&mut self.min_temp, &mut self.max_temp)
        } else {
            let entry = self.circuits.entry(circuit.number()).or_default();
            (&mut entry.0, &mut entry.1)
        };
        if min.is_some() {
            *stored_min = min;
        }
        if max.is_some() {
            *stored_max = max;
        }
        if stored_min.is_some() && stored_max.is_some() {
            self.initialized.insert(circuit.number());
        }
    }

    /// Returns true once both bounds of `circuit` are known.
    pub(crate) fn is_initialized(&self, circuit: Circuit) -> bool {
        self.initialized.contains(&circuit.number())
    }

    /// Returns the range of `circuit` when both bounds are known.
    pub(crate) fn get(&self, circuit: Circuit) -> Option<TemperatureRange> {
        let (min, max) = if circuit.is_primary() {
            (self.min_temp, self.max_temp)
        } else {
            self.circuits.get(&circuit.number()).copied()?
        };
        Some(TemperatureRange::new(min?, max?))
    }
}
