/// Request data model and validation.
pub mod model;
