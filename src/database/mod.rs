pub mod fixture;
pub mod memory;
pub mod models;
pub mod repository;

pub use fixture::{Fixture, FixtureError};
pub use memory::MemoryStore;
pub use repository::{
    LabRepository, RepositoryError, RepositoryResult, SubscriptionRepository, UserRepository,
};
