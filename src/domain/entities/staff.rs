use crate::domain::value_objects::StaffRole;

/// Marks a user as staff with a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewStaff {
    pub user_id: i32,
    pub role: StaffRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Staff {
    pub id: i32,
    pub user_id: i32,
    pub role: StaffRole,
}
