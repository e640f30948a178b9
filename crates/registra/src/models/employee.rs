use serde::Deserialize;

use registra_core::records::NewEmployee;
use registra_core::serde::deserialize_optional_string;

use super::deserialize_optional_cell;

/// Request payload for creating an employee.
#[derive(Debug, Deserialize)]
pub struct CreateEmployee {
    #[serde(default)]
    pub office: String,
    #[serde(default)]
    pub fullname: String,
    #[serde(default, rename = "positionTitle")]
    pub position_title: String,
    #[serde(default, rename = "Initial")]
    pub initial: String,
    #[serde(default, rename = "sof", deserialize_with = "deserialize_optional_string")]
    pub fund_source: Option<String>,
}

impl CreateEmployee {
    pub fn into_new_employee(self) -> NewEmployee {
        NewEmployee {
            office: self.office,
            full_name: self.fullname,
            position_title: self.position_title,
            initial: self.initial,
            fund_source: self.fund_source.unwrap_or_default(),
        }
    }
}

/// Wrapper for parsed-spreadsheet upload bodies: `{ "fileContent": [...] }`.
#[derive(Debug, Deserialize)]
pub struct UploadRequest<T> {
    #[serde(rename = "fileContent")]
    pub file_content: Vec<T>,
}

/// One row of a parsed employee spreadsheet.
#[derive(Debug, Deserialize)]
pub struct EmployeeSheetRow {
    #[serde(default, rename = "Official Station", deserialize_with = "deserialize_optional_cell")]
    pub office: Option<String>,
    #[serde(default, rename = "Name", deserialize_with = "deserialize_optional_cell")]
    pub name: Option<String>,
    #[serde(default, rename = "Position", deserialize_with = "deserialize_optional_cell")]
    pub position: Option<String>,
    #[serde(default, rename = "Initial", deserialize_with = "deserialize_optional_cell")]
    pub initial: Option<String>,
    #[serde(default, rename = "sof", deserialize_with = "deserialize_optional_cell")]
    pub fund_source: Option<String>,
}

impl EmployeeSheetRow {
    pub fn into_new_employee(self) -> NewEmployee {
        NewEmployee {
            office: self.office.unwrap_or_default(),
            full_name: self.name.unwrap_or_default(),
            position_title: self.position.unwrap_or_default(),
            initial: self.initial.unwrap_or_default(),
            fund_source: self.fund_source.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_employee_wire_names() {
        let payload: CreateEmployee = serde_json::from_str(
            r#"{
                "office": "Division Office",
                "fullname": "Alice Brown",
                "positionTitle": "Teacher I",
                "Initial": "AB",
                "sof": ""
            }"#,
        )
        .unwrap();

        let employee = payload.into_new_employee();
        assert_eq!(employee.full_name, "Alice Brown");
        assert_eq!(employee.position_title, "Teacher I");
        assert_eq!(employee.initial, "AB");
        assert_eq!(employee.fund_source, "");
    }

    #[test]
    fn test_sheet_row_column_names() {
        let row: EmployeeSheetRow = serde_json::from_str(
            r#"{
                "Official Station": "Central ES",
                "Name": "Alice Brown",
                "Position": "Teacher I",
                "Initial": "AB"
            }"#,
        )
        .unwrap();

        let employee = row.into_new_employee();
        assert_eq!(employee.office, "Central ES");
        assert_eq!(employee.full_name, "Alice Brown");
        assert_eq!(employee.fund_source, "");
    }

    #[test]
    fn test_upload_request_shape() {
        let upload: UploadRequest<EmployeeSheetRow> =
            serde_json::from_str(r#"{"fileContent": [{"Name": "Alice Brown"}]}"#).unwrap();
        assert_eq!(upload.file_content.len(), 1);
    }
}
