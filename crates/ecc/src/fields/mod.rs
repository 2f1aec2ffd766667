pub mod descriptor;
pub mod field;
pub mod field_params;
