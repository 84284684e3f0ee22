pub mod assessments;
pub mod health;
pub mod remote;
pub mod scales;
