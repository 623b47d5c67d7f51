//! User accounts as reported by the identity and user-listing endpoints.

use serde::{Deserialize, Serialize};

use crate::role::Role;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	pub id: i64,
	pub name: String,
	pub email: String,
	pub role: Role,
	/// Department membership; the server derives assignment departments
	/// from it, the client only displays it.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub department: Option<String>,
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn decodes_identity_payload() {
		let user: User = serde_json::from_str(
			r#"{"id":7,"name":"R. Campos","email":"rc@example.edu","role":"property_custodian","department":"Engineering"}"#,
		)
		.unwrap();
		assert_eq!(user.role, Role::PropertyCustodian);
		assert_eq!(user.department.as_deref(), Some("Engineering"));
	}

	#[test]
	fn department_is_optional() {
		let user: User = serde_json::from_str(
			r#"{"id":1,"name":"Dev","email":"dev@example.edu","role":"developer"}"#,
		)
		.unwrap();
		assert_eq!(user.department, None);
	}
}
