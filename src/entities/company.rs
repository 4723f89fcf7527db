//! Company record, DTOs and mapping

use super::employee::{Employee, EmployeeForCreationDto};
use crate::core::entity::Entity;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Stored company record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub country: String,
}

crate::impl_record!(Company, {
    "Id" => id,
    "Name" => name,
    "Address" => address,
    "Country" => country,
});

impl Entity for Company {
    fn resource_name() -> &'static str {
        "companies"
    }

    fn resource_name_singular() -> &'static str {
        "company"
    }

    fn entity_type() -> &'static str {
        "Company"
    }

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Company {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            address: address.into(),
            country: country.into(),
        }
    }

    /// Build a company and its initial employees from a validated DTO
    pub fn from_creation(dto: CompanyForCreationDto) -> (Self, Vec<Employee>) {
        let company = Self::new(
            dto.name.unwrap_or_default(),
            dto.address.unwrap_or_default(),
            dto.country.unwrap_or_default(),
        );
        let employees = dto
            .employees
            .into_iter()
            .map(|e| Employee::from_creation(company.id, e))
            .collect();

        (company, employees)
    }
}

/// Company as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompanyDto {
    pub id: Uuid,
    pub name: String,
    pub full_address: String,
}

crate::impl_record!(CompanyDto, {
    "Id" => id,
    "Name" => name,
    "FullAddress" => full_address,
});

impl From<&Company> for CompanyDto {
    fn from(company: &Company) -> Self {
        Self {
            id: company.id,
            name: company.name.clone(),
            full_address: format!("{} {}", company.address, company.country),
        }
    }
}

/// Payload for creating a company, optionally with employees
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanyForCreationDto {
    #[validate(
        required(message = "Company name is a required field."),
        length(max = 60, message = "Maximum length for the Name is 60 characters.")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "Company address is a required field."),
        length(max = 60, message = "Maximum length for the Address is 60 characters.")
    )]
    pub address: Option<String>,

    pub country: Option<String>,

    #[serde(default)]
    #[validate(nested)]
    pub employees: Vec<EmployeeForCreationDto>,
}
