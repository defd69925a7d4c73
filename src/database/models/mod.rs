pub mod lab;
pub mod subscription;
pub mod user;

pub use lab::{Lab, LabFields, LabSearch, LabWithMembers, LabWithProfessor, LabWithResearchers, NewLab, UpdateLab};
pub use subscription::Subscription;
pub use user::{User, UserWithLabs};
