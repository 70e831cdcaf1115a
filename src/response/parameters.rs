// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Query endpoint responses and the models built from them.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::ParseError;
use crate::response::EntityInfo;
use crate::schema::ParamMap;
use crate::types::ParameterId;

/// Decoded answer of the query endpoint: parameter ID → entity.
///
/// Entries that are `null`, empty objects or not objects at all are dropped,
/// as are keys that are not parameter numbers.
///
/// # Examples
///
/// ```
/// use bsblan_lib::response::ParameterResponse;
/// use bsblan_lib::types::ParameterId;
/// use serde_json::json;
///
/// let response = ParameterResponse::from_json(&json!({
///     "8700": {"name": "Outside temp", "value": "6.3", "unit": "&deg;C", "dataType": 0},
///     "8740": {"name": "Room temp", "value": "---", "unit": "&deg;C", "dataType": 0},
/// })).unwrap();
///
/// assert!(response.has_value(ParameterId::new(8700)));
/// assert!(!response.has_value(ParameterId::new(8740)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterResponse {
    entries: BTreeMap<ParameterId, EntityInfo>,
}

impl ParameterResponse {
    /// Decodes a query response body.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::UnexpectedFormat` if the body is not a JSON object.
    pub fn from_json(body: &Value) -> Result<Self, ParseError> {
        let object = body.as_object().ok_or_else(|| {
            ParseError::UnexpectedFormat("expected a JSON object of parameters".to_string())
        })?;

        let mut entries = BTreeMap::new();
        for (key, entry) in object {
            let Ok(id) = key.parse::<ParameterId>() else {
                tracing::debug!(key = %key, "Ignoring non-parameter key in response");
                continue;
            };
            if entry.as_object().is_none_or(serde_json::Map::is_empty) {
                continue;
            }
            match serde_json::from_value::<EntityInfo>(entry.clone()) {
                Ok(info) => {
                    entries.insert(id, info);
                }
                Err(err) => {
                    tracing::warn!(parameter = %id, error = %err, "Malformed parameter entry");
                }
            }
        }
        Ok(Self { entries })
    }

    /// Returns the entity for `id`.
    #[must_use]
    pub fn get(&self, id: ParameterId) -> Option<&EntityInfo> {
        self.entries.get(&id)
    }

    /// Returns true if `id` is present and carries a value.
    #[must_use]
    pub fn has_value(&self, id: ParameterId) -> bool {
        self.get(id).is_some_and(EntityInfo::has_value)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the response has no entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (ParameterId, &EntityInfo)> {
        self.entries.iter().map(|(id, info)| (*id, info))
    }

    /// Consumes the response, returning the entries.
    #[must_use]
    pub fn into_entries(self) -> BTreeMap<ParameterId, EntityInfo> {
        self.entries
    }
}

/// A model assembled from named parameters.
pub trait FromParameters: Default {
    /// Stores `entity` under the attribute `name`. Unknown names are ignored.
    fn assign(&mut self, name: &str, entity: EntityInfo);

    /// Builds the model from the parameters in `params` found in `response`.
    #[must_use]
    fn from_parameters(params: &ParamMap, response: &ParameterResponse) -> Self {
        let mut model = Self::default();
        for (id, name) in params {
            if let Some(entity) = response.get(*id) {
                model.assign(name, entity.clone());
            }
        }
        model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_non_object() {
        let err = ParameterResponse::from_json(&json!(["700"])).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedFormat(_)));
    }

    #[test]
    fn skips_empty_and_null_entries() {
        let response = ParameterResponse::from_json(&json!({
            "700": {},
            "710": null,
            "714": {"name": "Min", "value": "8.0", "dataType": 0},
            "status": "ok"
        }))
        .unwrap();
        assert_eq!(response.len(), 1);
        assert!(response.get(ParameterId::new(700)).is_none());
        assert!(response.has_value(ParameterId::new(714)));
    }

    #[derive(Debug, Default)]
    struct Probe {
        seen: Vec<String>,
    }

    impl FromParameters for Probe {
        fn assign(&mut self, name: &str, _entity: EntityInfo) {
            self.seen.push(name.to_string());
        }
    }

    #[test]
    fn from_parameters_follows_param_map() {
        let response = ParameterResponse::from_json(&json!({
            "8700": {"name": "Outside", "value": "6.0", "dataType": 0},
            "9999": {"name": "Stray", "value": "1", "dataType": 0}
        }))
        .unwrap();
        let params: ParamMap = [
            (ParameterId::new(8700), "outside_temperature"),
            (ParameterId::new(8740), "current_temperature"),
        ]
        .into_iter()
        .collect();

        let probe = Probe::from_parameters(&params, &response);
        assert_eq!(probe.seen, vec!["outside_temperature"]);
    }
}
