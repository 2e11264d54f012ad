use std::sync::Arc;

use super::StoreState;
use crate::client::{ApiError, HiringBackend};
use crate::hiring::users::{interviewers_from_directory, InterviewerUser, User, UserDirectory};

#[derive(Debug)]
pub struct UsersStore<B> {
    backend: Arc<B>,
    pub state: StoreState<User>,
}

impl<B: HiringBackend> UsersStore<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            state: StoreState::default(),
        }
    }

    pub fn items(&self) -> &[User] {
        &self.state.items
    }

    pub async fn fetch(&mut self) -> Result<(), ApiError> {
        self.state.begin();
        let result = self
            .backend
            .list_users()
            .await
            .map(|directory| directory.users);
        self.state.replace_items("fetch users", result)
    }

    /// Users that can sit on an interview panel; anyone without an email is skipped.
    pub fn interviewers(&self) -> Vec<InterviewerUser> {
        interviewers_from_directory(&UserDirectory {
            users: self.state.items.clone(),
        })
    }
}
