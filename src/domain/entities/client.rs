/// Marks a user as an ordinary customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewClient {
    pub user_id: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Client {
    pub id: i32,
    pub user_id: i32,
}
