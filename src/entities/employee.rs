//! Employee record, DTOs and mapping

use crate::core::entity::Entity;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Stored employee record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub age: u32,
    pub position: String,
    pub company_id: Uuid,
}

crate::impl_record!(Employee, {
    "Id" => id,
    "Name" => name,
    "Age" => age,
    "Position" => position,
    "CompanyId" => company_id,
});

impl Entity for Employee {
    fn resource_name() -> &'static str {
        "employees"
    }

    fn resource_name_singular() -> &'static str {
        "employee"
    }

    fn entity_type() -> &'static str {
        "Employee"
    }

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Employee {
    pub fn new(
        company_id: Uuid,
        name: impl Into<String>,
        age: u32,
        position: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            age,
            position: position.into(),
            company_id,
        }
    }

    /// Build a record from a validated creation DTO
    pub fn from_creation(company_id: Uuid, dto: EmployeeForCreationDto) -> Self {
        Self::new(
            company_id,
            dto.name.unwrap_or_default(),
            dto.age.unwrap_or_default(),
            dto.position.unwrap_or_default(),
        )
    }

    /// Copy the fields of a validated update DTO onto this record
    pub fn apply_update(&mut self, dto: EmployeeForUpdateDto) {
        if let Some(name) = dto.name {
            self.name = name;
        }
        if let Some(age) = dto.age {
            self.age = age;
        }
        if let Some(position) = dto.position {
            self.position = position;
        }
    }

    /// Update DTO holding the current values, the starting point of a patch
    pub fn to_update_dto(&self) -> EmployeeForUpdateDto {
        EmployeeForUpdateDto {
            name: Some(self.name.clone()),
            age: Some(self.age),
            position: Some(self.position.clone()),
        }
    }
}

/// Employee as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EmployeeDto {
    pub id: Uuid,
    pub name: String,
    pub age: u32,
    pub position: String,
}

crate::impl_record!(EmployeeDto, {
    "Id" => id,
    "Name" => name,
    "Age" => age,
    "Position" => position,
});

impl From<&Employee> for EmployeeDto {
    fn from(employee: &Employee) -> Self {
        Self {
            id: employee.id,
            name: employee.name.clone(),
            age: employee.age,
            position: employee.position.clone(),
        }
    }
}

impl From<Employee> for EmployeeDto {
    fn from(employee: Employee) -> Self {
        Self {
            id: employee.id,
            name: employee.name,
            age: employee.age,
            position: employee.position,
        }
    }
}

/// Payload for creating an employee
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeForCreationDto {
    #[validate(
        required(message = "Employee name is a required field."),
        length(max = 30, message = "Maximum length for the Name is 30 characters.")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "Age is a required field."),
        range(min = 18, message = "Age is required and it can't be lower than 18.")
    )]
    pub age: Option<u32>,

    #[validate(
        required(message = "Position is a required field."),
        length(max = 20, message = "Maximum length for the Position is 20 characters.")
    )]
    pub position: Option<String>,
}

/// Payload for replacing (PUT) or patching (PATCH) an employee
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeForUpdateDto {
    #[validate(
        required(message = "Employee name is a required field."),
        length(max = 30, message = "Maximum length for the Name is 30 characters.")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "Age is a required field."),
        range(min = 18, message = "Age is required and it can't be lower than 18.")
    )]
    pub age: Option<u32>,

    #[validate(
        required(message = "Position is a required field."),
        length(max = 20, message = "Maximum length for the Position is 20 characters.")
    )]
    pub position: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::Record;

    #[test]
    fn test_catalogs() {
        assert_eq!(
            Employee::catalog().names(),
            vec!["Id", "Name", "Age", "Position", "CompanyId"]
        );
        assert_eq!(
            EmployeeDto::catalog().names(),
            vec!["Id", "Name", "Age", "Position"]
        );
    }

    #[test]
    fn test_map_to_dto() {
        let employee = Employee::new(Uuid::new_v4(), "Sam Raiden", 26, "Software developer");
        let dto = EmployeeDto::from(&employee);
        assert_eq!(dto.id, employee.id);
        assert_eq!(dto.name, "Sam Raiden");
        assert_eq!(dto.age, 26);

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["Name"], "Sam Raiden");
        assert!(json.get("CompanyId").is_none());
    }

    #[test]
    fn test_creation_validation() {
        let dto = EmployeeForCreationDto {
            name: Some("Kane".to_string()),
            age: Some(17),
            position: None,
        };
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("age"));
        assert!(fields.contains_key("position"));
        assert!(!fields.contains_key("name"));
    }

    #[test]
    fn test_name_length_limit() {
        let dto = EmployeeForCreationDto {
            name: Some("x".repeat(31)),
            age: Some(30),
            position: Some("Dev".to_string()),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_from_creation_and_update() {
        let company_id = Uuid::new_v4();
        let mut employee = Employee::from_creation(
            company_id,
            EmployeeForCreationDto {
                name: Some("Jana".to_string()),
                age: Some(28),
                position: Some("Analyst".to_string()),
            },
        );
        assert_eq!(employee.company_id, company_id);

        let mut update = employee.to_update_dto();
        update.age = Some(29);
        employee.apply_update(update);
        assert_eq!(employee.age, 29);
        assert_eq!(employee.name, "Jana");
    }
}
