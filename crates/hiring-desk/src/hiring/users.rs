use serde::{Deserialize, Serialize};

/// Directory user as served by `/auth/users/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDirectory {
    #[serde(default)]
    pub users: Vec<User>,
}

/// User projected for the interview panel picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewerUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl InterviewerUser {
    /// Users without an email cannot be invited and are dropped.
    pub fn from_user(user: &User) -> Option<Self> {
        let email = non_blank(user.email.as_deref())?;
        let full_name = format!(
            "{} {}",
            user.first_name.as_deref().unwrap_or(""),
            user.last_name.as_deref().unwrap_or("")
        )
        .trim()
        .to_string();
        let name = if full_name.is_empty() {
            email.to_string()
        } else {
            full_name
        };
        let role = non_blank(user.job_title.as_deref())
            .or_else(|| non_blank(user.department.as_deref()))
            .unwrap_or("Staff Member")
            .to_string();

        Some(Self {
            id: user.id.clone().unwrap_or_default(),
            name,
            email: email.to_string(),
            role,
        })
    }
}

pub fn interviewers_from_directory(directory: &UserDirectory) -> Vec<InterviewerUser> {
    directory
        .users
        .iter()
        .filter_map(InterviewerUser::from_user)
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projects_names_and_roles_with_fallbacks() {
        let directory = UserDirectory {
            users: vec![
                User {
                    id: Some("u1".to_string()),
                    email: Some("sarah.johnson@district.edu".to_string()),
                    first_name: Some("Sarah".to_string()),
                    last_name: Some("Johnson".to_string()),
                    job_title: Some("Principal".to_string()),
                    department: None,
                },
                User {
                    id: Some("u2".to_string()),
                    email: Some("ops@district.edu".to_string()),
                    department: Some("Operations".to_string()),
                    ..User::default()
                },
                User {
                    id: Some("u3".to_string()),
                    email: Some("sub@district.edu".to_string()),
                    first_name: Some("Casey".to_string()),
                    ..User::default()
                },
                User {
                    id: Some("u4".to_string()),
                    first_name: Some("No".to_string()),
                    last_name: Some("Email".to_string()),
                    ..User::default()
                },
            ],
        };

        let interviewers = interviewers_from_directory(&directory);
        assert_eq!(interviewers.len(), 3);
        assert_eq!(interviewers[0].name, "Sarah Johnson");
        assert_eq!(interviewers[0].role, "Principal");
        assert_eq!(interviewers[1].name, "ops@district.edu");
        assert_eq!(interviewers[1].role, "Operations");
        assert_eq!(interviewers[2].name, "Casey");
        assert_eq!(interviewers[2].role, "Staff Member");
    }
}
