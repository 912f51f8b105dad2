//! Device groups

use super::form::{check_required, field_value, FormError, FormField};
use crate::grid::GridRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub device_count: u32,
}

/// Body of a create-group request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeviceGroup {
    pub name: String,
    pub description: String,
}

impl NewDeviceGroup {
    pub fn form_fields() -> Vec<FormField> {
        vec![
            FormField::new("name", "Name", "").required(),
            FormField::new("description", "Description", ""),
        ]
    }

    pub fn from_fields(fields: &[FormField]) -> Result<Self, FormError> {
        check_required(fields)?;
        Ok(Self {
            name: field_value(fields, "name").to_string(),
            description: field_value(fields, "description").to_string(),
        })
    }
}

impl GridRecord for DeviceGroup {
    fn record_key(&self) -> Option<String> {
        Some(self.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_group_from_fields() {
        let mut fields = NewDeviceGroup::form_fields();
        fields[0].value = " Warehouse scanners ".to_string();
        let group = NewDeviceGroup::from_fields(&fields).unwrap();
        assert_eq!(group.name, "Warehouse scanners");
        assert_eq!(group.description, "");

        let json = serde_json::to_value(&group).unwrap();
        assert_eq!(json["name"], "Warehouse scanners");
    }

    #[test]
    fn test_new_group_requires_name() {
        let fields = NewDeviceGroup::form_fields();
        assert!(NewDeviceGroup::from_fields(&fields).is_err());
    }
}
