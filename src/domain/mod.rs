//! Domain layer: models, DTOs and repository interfaces.

pub mod user;

pub use user::{
    CreateUserDto, GetUserDto, UpdateUserDto, User, UserRepositoryInterface, UserRole,
};

pub use crate::support::DomainError;

pub type DomainResult<T> = Result<T, DomainError>;
