//! Full-record view: core fields plus acquisition metadata.
//!
//! The two halves live behind different endpoints but edit as one form;
//! saving issues both patches in parallel and refetches on success. Load
//! failures close the view, the caller falls back to the listing.

use qm_model::{DraftError, PropertyDetails, PropertyDraft, PropertyPayload, PropertyWithDetails};

/// Acquisition metadata as form text. Empty fields become absent on the
/// wire rather than empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailsForm {
	pub article: String,
	pub old_property_no: String,
	pub unit_of_measure: String,
	pub acquisition_date: String,
	pub condition: String,
	pub remarks: String,
	pub branch: String,
	pub asset_type: String,
	pub fund_cluster: String,
	pub po_no: String,
	pub invoice_no: String,
	pub invoice_date: String,
}

impl DetailsForm {
	pub const LABELS: [&'static str; 12] = [
		"Article",
		"Old property no.",
		"Unit of measure",
		"Acquisition date",
		"Condition",
		"Remarks",
		"Branch",
		"Asset type",
		"Fund cluster",
		"PO no.",
		"Invoice no.",
		"Invoice date",
	];

	pub fn seed(details: Option<&PropertyDetails>) -> Self {
		let Some(details) = details else {
			return Self::default();
		};
		let text = |field: &Option<String>| field.clone().unwrap_or_default();
		Self {
			article: text(&details.article),
			old_property_no: text(&details.old_property_no),
			unit_of_measure: text(&details.unit_of_measure),
			acquisition_date: text(&details.acquisition_date),
			condition: text(&details.condition),
			remarks: text(&details.remarks),
			branch: text(&details.branch),
			asset_type: text(&details.asset_type),
			fund_cluster: text(&details.fund_cluster),
			po_no: text(&details.po_no),
			invoice_no: text(&details.invoice_no),
			invoice_date: text(&details.invoice_date),
		}
	}

	pub fn field_mut(&mut self, index: usize) -> Option<&mut String> {
		[
			&mut self.article,
			&mut self.old_property_no,
			&mut self.unit_of_measure,
			&mut self.acquisition_date,
			&mut self.condition,
			&mut self.remarks,
			&mut self.branch,
			&mut self.asset_type,
			&mut self.fund_cluster,
			&mut self.po_no,
			&mut self.invoice_no,
			&mut self.invoice_date,
		]
		.into_iter()
		.nth(index)
	}

	pub fn field(&self, index: usize) -> Option<&str> {
		[
			&self.article,
			&self.old_property_no,
			&self.unit_of_measure,
			&self.acquisition_date,
			&self.condition,
			&self.remarks,
			&self.branch,
			&self.asset_type,
			&self.fund_cluster,
			&self.po_no,
			&self.invoice_no,
			&self.invoice_date,
		]
		.into_iter()
		.map(String::as_str)
		.nth(index)
	}

	pub fn into_payload(self) -> PropertyDetails {
		let opt = |value: String| {
			let trimmed = value.trim();
			if trimmed.is_empty() { None } else { Some(trimmed.to_owned()) }
		};
		PropertyDetails {
			article: opt(self.article),
			old_property_no: opt(self.old_property_no),
			unit_of_measure: opt(self.unit_of_measure),
			acquisition_date: opt(self.acquisition_date),
			condition: opt(self.condition),
			remarks: opt(self.remarks),
			branch: opt(self.branch),
			asset_type: opt(self.asset_type),
			fund_cluster: opt(self.fund_cluster),
			po_no: opt(self.po_no),
			invoice_no: opt(self.invoice_no),
			invoice_date: opt(self.invoice_date),
		}
	}
}

/// Draft for the combined edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailsDraft {
	pub core: PropertyDraft,
	pub form: DetailsForm,
	pub location: String,
}

impl DetailsDraft {
	pub fn seed(record: &PropertyWithDetails) -> Self {
		Self {
			core: PropertyDraft::from_property(&record.property),
			form: DetailsForm::seed(record.details.as_ref()),
			location: record.property.location_detail.clone().unwrap_or_default(),
		}
	}

	/// Validate into the two parallel patch bodies. The core patch carries
	/// the location since this form edits it alongside the core fields.
	pub fn build(&self) -> Result<(PropertyPayload, PropertyDetails), DraftError> {
		let mut payload = self.core.validate()?;
		payload.location_detail = Some(self.location.trim().to_owned());
		Ok((payload, self.form.clone().into_payload()))
	}
}

/// State of the details screen for one property.
#[derive(Debug)]
pub struct DetailsView {
	pub property_id: i64,
	generation: u64,
	record: Option<PropertyWithDetails>,
	draft: Option<DetailsDraft>,
}

impl DetailsView {
	pub fn open(property_id: i64) -> Self {
		Self { property_id, generation: 0, record: None, draft: None }
	}

	pub fn begin(&mut self) -> u64 {
		self.generation += 1;
		self.generation
	}

	/// Whether a fetch result belongs to this view and is still current.
	pub fn matches(&self, property_id: i64, generation: u64) -> bool {
		property_id == self.property_id && generation == self.generation
	}

	/// Apply a fetched record. False means the result was stale or for a
	/// different property and nothing changed.
	pub fn apply(&mut self, property_id: i64, generation: u64, record: PropertyWithDetails) -> bool {
		if !self.matches(property_id, generation) {
			return false;
		}
		self.record = Some(record);
		true
	}

	pub fn is_loading(&self) -> bool {
		self.record.is_none()
	}

	pub fn record(&self) -> Option<&PropertyWithDetails> {
		self.record.as_ref()
	}

	pub fn draft(&self) -> Option<&DetailsDraft> {
		self.draft.as_ref()
	}

	pub fn draft_mut(&mut self) -> Option<&mut DetailsDraft> {
		self.draft.as_mut()
	}

	pub fn is_editing(&self) -> bool {
		self.draft.is_some()
	}

	/// Seed the edit form from the loaded record.
	pub fn begin_edit(&mut self) -> bool {
		match (&self.record, &self.draft) {
			(Some(record), None) => {
				self.draft = Some(DetailsDraft::seed(record));
				true
			}
			_ => false,
		}
	}

	pub fn cancel_edit(&mut self) {
		self.draft = None;
	}

	/// Leave edit mode after a successful save; the refetch will show the
	/// authoritative values.
	pub fn finish_edit(&mut self) {
		self.draft = None;
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn record(details: bool) -> PropertyWithDetails {
		let details_json = if details {
			r#", "details": {"article": "Rack", "fundCluster": "101"}"#
		} else {
			""
		};
		serde_json::from_str(&format!(
			r#"{{"id": 5, "propertyNo": "P-5", "description": "Server rack",
			"quantity": 1, "value": 240000.0, "serialNo": "RK-05",
			"location_detail": "DC-1"{details_json}}}"#
		))
		.unwrap()
	}

	#[test]
	fn draft_seeds_both_halves_and_location() {
		let draft = DetailsDraft::seed(&record(true));
		assert_eq!(draft.core.property_no, "P-5");
		assert_eq!(draft.form.article, "Rack");
		assert_eq!(draft.form.fund_cluster, "101");
		assert_eq!(draft.form.invoice_no, "");
		assert_eq!(draft.location, "DC-1");
	}

	#[test]
	fn build_attaches_location_and_drops_blank_details() {
		let mut draft = DetailsDraft::seed(&record(true));
		draft.form.remarks = "   ".into();
		draft.location = " DC-2 ".into();

		let (payload, details) = draft.build().unwrap();
		assert_eq!(payload.location_detail.as_deref(), Some("DC-2"));
		assert_eq!(details.article.as_deref(), Some("Rack"));
		assert_eq!(details.remarks, None);
	}

	#[test]
	fn build_surfaces_core_validation_errors() {
		let mut draft = DetailsDraft::seed(&record(false));
		draft.core.quantity = "many".into();
		assert_eq!(draft.build().unwrap_err(), DraftError::BadQuantity);
	}

	#[test]
	fn form_field_indexing_matches_labels() {
		let mut form = DetailsForm::default();
		assert_eq!(DetailsForm::LABELS.len(), 12);
		*form.field_mut(6).unwrap() = "North".into();
		assert_eq!(form.branch, "North");
		assert_eq!(form.field(6), Some("North"));
		assert!(form.field_mut(12).is_none());
	}

	#[test]
	fn stale_or_mismatched_loads_are_ignored() {
		let mut view = DetailsView::open(5);
		let first = view.begin();
		let second = view.begin();

		assert!(!view.apply(5, first, record(true)));
		assert!(view.is_loading());
		assert!(!view.apply(6, second, record(true)));
		assert!(view.apply(5, second, record(true)));
		assert!(!view.is_loading());
	}

	#[test]
	fn edit_requires_a_loaded_record() {
		let mut view = DetailsView::open(5);
		assert!(!view.begin_edit());

		let generation = view.begin();
		view.apply(5, generation, record(true));
		assert!(view.begin_edit());
		assert!(!view.begin_edit());

		view.cancel_edit();
		assert!(!view.is_editing());
	}
}
