pub mod fixture;
pub mod lab;
