use sqlx::FromRow;

pub const ROLE_USER: &str = "USER";
pub const ROLE_ADMIN: &str = "ADMIN";

/// User row. `password` holds the argon2 hash; `token` is the opaque session
/// token and is present only while the user is logged in.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub username: String,
    pub password: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub token: Option<String>,
    pub role: String,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_role(role: &str) -> User {
        User {
            username: "test".to_string(),
            password: "hash".to_string(),
            name: "test".to_string(),
            email: "test@example.com".to_string(),
            phone: "0812345678".to_string(),
            address: None,
            token: None,
            role: role.to_string(),
        }
    }

    #[test]
    fn only_admin_role_is_admin() {
        assert!(user_with_role(ROLE_ADMIN).is_admin());
        assert!(!user_with_role(ROLE_USER).is_admin());
        assert!(!user_with_role("admin").is_admin());
    }
}
