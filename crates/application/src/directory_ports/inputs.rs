/// Input payload for creating a user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateUserInput {
    /// Given name.
    pub name: String,
    /// Optional family name.
    pub last_name: Option<String>,
    /// Optional display name.
    pub display_name: Option<String>,
    /// Contact email.
    pub email: String,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Optional avatar URL.
    pub avatar: Option<String>,
    /// Optional postal address.
    pub address: Option<String>,
    /// Roles assigned to the new user.
    pub role_ids: Vec<String>,
}
