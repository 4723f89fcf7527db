//! Domain records and their DTOs

pub mod company;
pub mod employee;
pub mod macros;

pub use company::{Company, CompanyDto, CompanyForCreationDto};
pub use employee::{Employee, EmployeeDto, EmployeeForCreationDto, EmployeeForUpdateDto};
