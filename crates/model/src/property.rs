//! Property records, the details extension, and edit drafts.
//!
//! A property is two wire halves joined by id: the core record served with
//! the collection, and an acquisition-metadata extension fetched and patched
//! through its own endpoint. Drafts hold raw user input as strings and only
//! produce a typed payload once validation passes, so a rejected submission
//! never loses what the user typed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inventory annex classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
	#[default]
	#[serde(rename = "Annex A")]
	AnnexA,
	#[serde(rename = "Annex B")]
	AnnexB,
	#[serde(rename = "Annex C")]
	AnnexC,
}

impl Category {
	pub fn label(self) -> &'static str {
		match self {
			Category::AnnexA => "Annex A",
			Category::AnnexB => "Annex B",
			Category::AnnexC => "Annex C",
		}
	}

	/// Next classification in display order, wrapping. Used by the add/edit
	/// forms, which cycle the value instead of free-typing it.
	pub fn cycled(self) -> Self {
		match self {
			Category::AnnexA => Category::AnnexB,
			Category::AnnexB => Category::AnnexC,
			Category::AnnexC => Category::AnnexA,
		}
	}
}

/// Marker the server sets while a reassignment of this property awaits
/// review. Absence means no workflow is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReassignmentStatus {
	Pending,
}

/// Core property record as served by the collection endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
	pub id: i64,
	/// Human-assigned inventory number, unique across the system.
	pub property_no: String,
	pub description: String,
	pub quantity: u32,
	pub value: Decimal,
	pub serial_no: String,
	/// Older records predate annex classification; decode tolerantly.
	#[serde(default)]
	pub category: Category,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub qr_code: Option<String>,
	/// Display name of the current holder, if any.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub assigned_to: Option<String>,
	/// Derived by the server from the holder's department; never patched
	/// directly by the client.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub assigned_department: Option<String>,
	// Historical exception: this one field never moved to camelCase.
	#[serde(default, rename = "location_detail", skip_serializing_if = "Option::is_none")]
	pub location_detail: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub reassignment_status: Option<ReassignmentStatus>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_at: Option<DateTime<Utc>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub updated_at: Option<DateTime<Utc>>,
}

impl Property {
	pub fn is_assigned(&self) -> bool {
		self.assigned_to.is_some()
	}

	pub fn has_pending_reassignment(&self) -> bool {
		self.reassignment_status == Some(ReassignmentStatus::Pending)
	}

	/// Data-invariant violation: a pending reassignment always displaces an
	/// existing holder, so `pending` with no holder is server-side corruption
	/// worth flagging.
	pub fn pending_without_holder(&self) -> bool {
		self.has_pending_reassignment() && self.assigned_to.is_none()
	}
}

/// Acquisition/purchase metadata: the 1:1 extension half of a property.
///
/// Every field is optional and round-trips as entered; the client treats
/// dates here as opaque strings the user edits directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetails {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub article: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub old_property_no: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub unit_of_measure: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub acquisition_date: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub condition: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub remarks: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub branch: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub asset_type: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fund_cluster: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub po_no: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub invoice_no: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub invoice_date: Option<String>,
}

/// Both halves of a property as served by the details endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyWithDetails {
	#[serde(flatten)]
	pub property: Property,
	#[serde(default)]
	pub details: Option<PropertyDetails>,
}

/// Raw form input for adding or editing a property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyDraft {
	pub property_no: String,
	pub description: String,
	pub quantity: String,
	pub value: String,
	pub serial_no: String,
	pub category: Category,
}

/// Why a draft cannot be submitted yet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
	#[error("{0} is required")]
	Missing(&'static str),
	#[error("quantity must be a whole number")]
	BadQuantity,
	#[error("value must be an amount like 1250.00")]
	BadValue,
}

impl PropertyDraft {
	/// Seed an edit draft from the record currently on screen.
	pub fn from_property(property: &Property) -> Self {
		Self {
			property_no: property.property_no.clone(),
			description: property.description.clone(),
			quantity: property.quantity.to_string(),
			value: property.value.to_string(),
			serial_no: property.serial_no.clone(),
			category: property.category,
		}
	}

	/// Validate the draft into a wire payload, leaving the draft intact.
	pub fn validate(&self) -> Result<PropertyPayload, DraftError> {
		fn required<'a>(value: &'a str, name: &'static str) -> Result<&'a str, DraftError> {
			let trimmed = value.trim();
			if trimmed.is_empty() { Err(DraftError::Missing(name)) } else { Ok(trimmed) }
		}

		let property_no = required(&self.property_no, "property number")?.to_owned();
		let description = required(&self.description, "description")?.to_owned();
		let serial_no = required(&self.serial_no, "serial number")?.to_owned();
		let quantity = required(&self.quantity, "quantity")?
			.parse::<u32>()
			.map_err(|_| DraftError::BadQuantity)?;
		let value = required(&self.value, "value")?
			.parse::<Decimal>()
			.map_err(|_| DraftError::BadValue)?;

		Ok(PropertyPayload {
			property_no,
			description,
			quantity,
			value,
			serial_no,
			category: self.category,
			location_detail: None,
		})
	}
}

/// Validated property fields as sent to the add and update endpoints.
///
/// `location_detail` rides along only from the details screen, which edits
/// it together with the core fields; the table edit flow leaves it `None`
/// so the patch does not touch it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPayload {
	pub property_no: String,
	pub description: String,
	pub quantity: u32,
	pub value: Decimal,
	pub serial_no: String,
	pub category: Category,
	#[serde(default, rename = "location_detail", skip_serializing_if = "Option::is_none")]
	pub location_detail: Option<String>,
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	use super::*;

	fn wire_property(extra: &str) -> String {
		format!(
			r#"{{"id":41,"propertyNo":"2024-05-0041","description":"Lab oscilloscope",
			"quantity":1,"value":85000.0,"serialNo":"OSC-9917","category":"Annex B"{extra}}}"#
		)
	}

	#[test]
	fn decodes_wire_casing_and_location_exception() {
		let json = wire_property(
			r##","assignedTo":"A. Reyes","assignedDepartment":"Physics","location_detail":"Room 204""##,
		);
		let p: Property = serde_json::from_str(&json).unwrap();
		assert_eq!(p.property_no, "2024-05-0041");
		assert_eq!(p.category, Category::AnnexB);
		assert_eq!(p.assigned_department.as_deref(), Some("Physics"));
		assert_eq!(p.location_detail.as_deref(), Some("Room 204"));
	}

	#[test]
	fn missing_category_defaults_to_annex_a() {
		let json = r#"{"id":1,"propertyNo":"P-1","description":"Chair","quantity":4,
			"value":1200.5,"serialNo":"n/a"}"#;
		let p: Property = serde_json::from_str(json).unwrap();
		assert_eq!(p.category, Category::AnnexA);
		assert!(!p.is_assigned());
		assert!(!p.has_pending_reassignment());
	}

	#[test]
	fn pending_reassignment_invariant_helper() {
		let json = wire_property(r#","assignedTo":"A. Reyes","reassignmentStatus":"pending""#);
		let held: Property = serde_json::from_str(&json).unwrap();
		assert!(held.has_pending_reassignment());
		assert!(!held.pending_without_holder());

		let json = wire_property(r#","reassignmentStatus":"pending""#);
		let orphaned: Property = serde_json::from_str(&json).unwrap();
		assert!(orphaned.pending_without_holder());
	}

	#[test]
	fn draft_round_trips_a_property() {
		let json = wire_property("");
		let p: Property = serde_json::from_str(&json).unwrap();
		let payload = PropertyDraft::from_property(&p).validate().unwrap();
		assert_eq!(payload.property_no, p.property_no);
		assert_eq!(payload.quantity, p.quantity);
		assert_eq!(payload.value, p.value);
		assert_eq!(payload.category, p.category);
	}

	#[rstest]
	#[case("", "10", "99.5", DraftError::Missing("property number"))]
	#[case("P-1", "ten", "99.5", DraftError::BadQuantity)]
	#[case("P-1", "10", "a lot", DraftError::BadValue)]
	fn draft_validation_pinpoints_the_field(
		#[case] property_no: &str,
		#[case] quantity: &str,
		#[case] value: &str,
		#[case] expected: DraftError,
	) {
		let draft = PropertyDraft {
			property_no: property_no.into(),
			description: "Desk".into(),
			quantity: quantity.into(),
			value: value.into(),
			serial_no: "S-1".into(),
			category: Category::AnnexA,
		};
		assert_eq!(draft.validate().unwrap_err(), expected);
	}

	#[test]
	fn payload_serializes_camel_case() {
		let payload = PropertyPayload {
			property_no: "P-9".into(),
			description: "Projector".into(),
			quantity: 2,
			value: "15400.00".parse().unwrap(),
			serial_no: "PRJ-2".into(),
			category: Category::AnnexC,
			location_detail: None,
		};
		let json = serde_json::to_value(&payload).unwrap();
		assert_eq!(json["propertyNo"], "P-9");
		assert_eq!(json["serialNo"], "PRJ-2");
		assert_eq!(json["category"], "Annex C");
		assert!(json.get("location_detail").is_none());

		let payload = PropertyPayload { location_detail: Some("Room 204".into()), ..payload };
		let json = serde_json::to_value(&payload).unwrap();
		assert_eq!(json["location_detail"], "Room 204");
	}

	#[test]
	fn details_flatten_with_core_record() {
		let json = r#"{"id":5,"propertyNo":"P-5","description":"Server rack","quantity":1,
			"value":240000.0,"serialNo":"RK-05","location_detail":"DC-1",
			"details":{"article":"Rack","fundCluster":"101","poNo":"PO-772"}}"#;
		let with: PropertyWithDetails = serde_json::from_str(json).unwrap();
		assert_eq!(with.property.location_detail.as_deref(), Some("DC-1"));
		let details = with.details.unwrap();
		assert_eq!(details.fund_cluster.as_deref(), Some("101"));
		assert_eq!(details.invoice_no, None);
	}

	#[test]
	fn category_cycles_through_all_annexes() {
		assert_eq!(Category::AnnexA.cycled(), Category::AnnexB);
		assert_eq!(Category::AnnexB.cycled(), Category::AnnexC);
		assert_eq!(Category::AnnexC.cycled(), Category::AnnexA);
	}
}
