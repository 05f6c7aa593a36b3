//! Shared types for the HTTP layer and list use cases.

mod pagination;
mod response;

pub use pagination::{Paginated, PaginationParams};
pub use response::{Created, MessageResponse};
