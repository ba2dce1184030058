/// Directory operation a caller is asking to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ReadProfile,
    ListUsers,
    /// `changes_role` is true whenever the request carries a role field at all
    UpdateProfile { changes_role: bool },
    DeleteUser,
}
