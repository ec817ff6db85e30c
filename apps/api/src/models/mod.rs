pub mod job;
pub mod student;
