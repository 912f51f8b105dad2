//! Geofences

use super::form::{check_required, field_value, parse_number, FormError, FormField};
use crate::grid::GridRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geofence {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
    #[serde(default)]
    pub description: String,
}

impl Geofence {
    pub fn coordinates(&self) -> String {
        format!("{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

impl GridRecord for Geofence {
    fn record_key(&self) -> Option<String> {
        Some(self.id.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGeofence {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
    pub description: String,
}

impl NewGeofence {
    pub fn form_fields() -> Vec<FormField> {
        vec![
            FormField::new("name", "Name", "").required(),
            FormField::new("latitude", "Latitude", "").required(),
            FormField::new("longitude", "Longitude", "").required(),
            FormField::new("radius", "Radius (m)", "100").required(),
            FormField::new("description", "Description", ""),
        ]
    }

    pub fn from_fields(fields: &[FormField]) -> Result<Self, FormError> {
        check_required(fields)?;
        let latitude: f64 = parse_number("latitude", field_value(fields, "latitude"))?;
        let longitude: f64 = parse_number("longitude", field_value(fields, "longitude"))?;
        let radius_meters: f64 = parse_number("radius", field_value(fields, "radius"))?;

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(FormError::OutOfRange {
                field: "latitude".to_string(),
                reason: "must be between -90 and 90".to_string(),
            });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(FormError::OutOfRange {
                field: "longitude".to_string(),
                reason: "must be between -180 and 180".to_string(),
            });
        }
        if radius_meters.is_nan() || radius_meters <= 0.0 {
            return Err(FormError::OutOfRange {
                field: "radius".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Self {
            name: field_value(fields, "name").to_string(),
            latitude,
            longitude,
            radius_meters,
            description: field_value(fields, "description").to_string(),
        })
    }
}
