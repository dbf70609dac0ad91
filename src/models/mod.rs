//! Record types exposed by the service

pub mod address;
pub mod patient;

pub use address::{Address, address_schema};
pub use patient::{Patient, bmi, patient_schema};
