//! Value objects: validated, immutable primitives.

mod email;
mod level;
mod password;
mod role;

pub use email::Email;
pub use level::Level;
pub use password::Password;
pub use role::StaffRole;
