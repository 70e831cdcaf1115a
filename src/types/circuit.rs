// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Heating circuit selection.

use std::fmt;

use crate::error::ValueError;

/// Number of the first circuit.
const CIRCUIT_MIN: u8 = 1;

/// Number of the last circuit.
const CIRCUIT_MAX: u8 = 3;

/// Parameter ID distance between two consecutive circuits.
const CIRCUIT_ID_STRIDE: u32 = 300;

/// An independently controllable heating circuit (HC1, HC2 or HC3).
///
/// Circuits share parameter semantics; the IDs of circuit 2 and 3 are the
/// circuit 1 IDs shifted by 300 and 600.
///
/// # Examples
///
/// ```
/// use bsblan_lib::types::Circuit;
///
/// let hc2 = Circuit::new(2).unwrap();
/// assert_eq!(hc2.id_offset(), 300);
/// assert!(Circuit::new(4).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Circuit(u8);

impl Circuit {
    /// Heating circuit 1.
    pub const ONE: Self = Self(1);
    /// Heating circuit 2.
    pub const TWO: Self = Self(2);
    /// Heating circuit 3.
    pub const THREE: Self = Self(3);

    /// All circuits in probing order.
    pub const ALL: [Self; 3] = [Self::ONE, Self::TWO, Self::THREE];

    /// Creates a circuit from its number.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidCircuit` if `number` is not 1, 2 or 3.
    pub fn new(number: u8) -> Result<Self, ValueError> {
        if (CIRCUIT_MIN..=CIRCUIT_MAX).contains(&number) {
            Ok(Self(number))
        } else {
            Err(ValueError::InvalidCircuit(number))
        }
    }

    /// Returns the circuit number (1-3).
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Returns the parameter ID offset relative to circuit 1.
    #[must_use]
    pub const fn id_offset(self) -> u32 {
        (self.0 as u32 - 1) * CIRCUIT_ID_STRIDE
    }

    /// Returns true for circuit 1.
    #[must_use]
    pub const fn is_primary(self) -> bool {
        self.0 == CIRCUIT_MIN
    }
}

impl Default for Circuit {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HC{}", self.0)
    }
}

impl TryFrom<u8> for Circuit {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
