pub mod error;
pub mod memory;
pub mod models;
pub mod repository;
pub mod schema;

pub use error::{DbError, Result};
pub use memory::{MemoryEstablishmentRepository, MemoryPixRepository};
pub use repository::{
    EstablishmentRepository, NewEstablishment, PgEstablishmentRepository, PgPixRepository,
    PixRepository,
};
