pub mod likert;
pub mod profile;
