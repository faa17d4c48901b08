//! User Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::UserRepositoryPort;
use crate::application::queries::GetUserInfo;
use crate::domain::user::{Review, User};

/// 用户资料
#[derive(Debug, Clone)]
pub struct UserInfo {
    pub user: User,
    pub categories: Vec<String>,
    pub following_num: u32,
    pub reviews: Vec<Review>,
}

/// GetUserInfo Handler
pub struct GetUserInfoHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
}

impl GetUserInfoHandler {
    pub fn new(user_repo: Arc<dyn UserRepositoryPort>) -> Self {
        Self { user_repo }
    }

    pub async fn handle(&self, query: GetUserInfo) -> Result<UserInfo, ApplicationError> {
        let user = self
            .user_repo
            .find_by_id(query.user_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("User", query.user_id))?;

        let categories = self.user_repo.find_categories(user.id).await?;
        let following_num = self.user_repo.count_following(user.id).await?;
        let reviews = self.user_repo.find_reviews(user.id).await?;

        Ok(UserInfo {
            user,
            categories,
            following_num,
            reviews,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::AuthType;
    use crate::infrastructure::memory::InMemoryUserRepository;
    use chrono::Utc;

    #[tokio::test]
    async fn test_get_user_info() {
        let users = Arc::new(InMemoryUserRepository::new());
        users.insert_user(User {
            id: 3,
            email: "traveler@example.com".to_string(),
            nickname: "traveler".to_string(),
            profile_img: Some("/images/p.png".to_string()),
            auth_type: AuthType::Google,
            introduction: Some("hello".to_string()),
        });
        users.set_categories(3, vec!["food".to_string(), "history".to_string()]);
        users.follow(3, 4);
        users.follow(3, 5);
        users.add_review(
            3,
            Review {
                id: 1,
                tour_id: 10,
                tour_title: "Busan food tour".to_string(),
                content: "great".to_string(),
                grade: 4.5,
                created_at: Utc::now(),
            },
        );

        let handler = GetUserInfoHandler::new(users);
        let info = handler.handle(GetUserInfo { user_id: 3 }).await.unwrap();
        assert_eq!(info.user.nickname, "traveler");
        assert_eq!(info.categories.len(), 2);
        assert_eq!(info.following_num, 2);
        assert_eq!(info.reviews.len(), 1);

        let err = handler.handle(GetUserInfo { user_id: 99 }).await.unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::NotFound { resource_type: "User", id: 99 }
        ));
    }
}
