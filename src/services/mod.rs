pub mod lab_service;
pub mod views;

pub use lab_service::LabService;
pub use views::{Ack, LabDetail, LabSummary, ProfessorInfo, ResearcherInfo};
