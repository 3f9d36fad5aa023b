#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    Owner = 1,
    Admin = 2,
    Member = 3,
    System = 4,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Owner),
            2 => Some(Role::Admin),
            3 => Some(Role::Member),
            4 => Some(Role::System),
            _ => None,
        }
    }
}
