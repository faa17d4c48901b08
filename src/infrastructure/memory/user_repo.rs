//! In-Memory User Repository

use async_trait::async_trait;
use dashmap::DashMap;
use std::cmp::Reverse;
use std::collections::BTreeSet;

use crate::application::ports::{RepositoryError, UserRepositoryPort};
use crate::domain::user::{Review, User, UserId};

/// 内存用户仓储
///
/// 用户与令牌由外部系统写入，这里提供写入方法以便装配测试数据
pub struct InMemoryUserRepository {
    users: DashMap<UserId, User>,
    tokens: DashMap<String, UserId>,
    categories: DashMap<UserId, Vec<String>>,
    follows: DashMap<UserId, BTreeSet<UserId>>,
    reviews: DashMap<UserId, Vec<Review>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            tokens: DashMap::new(),
            categories: DashMap::new(),
            follows: DashMap::new(),
            reviews: DashMap::new(),
        }
    }

    pub fn insert_user(&self, user: User) {
        self.users.insert(user.id, user);
    }

    pub fn issue_token(&self, token: impl Into<String>, user_id: UserId) {
        self.tokens.insert(token.into(), user_id);
    }

    pub fn set_categories(&self, user_id: UserId, categories: Vec<String>) {
        self.categories.insert(user_id, categories);
    }

    pub fn follow(&self, follower: UserId, followee: UserId) {
        self.follows.entry(follower).or_default().insert(followee);
    }

    pub fn add_review(&self, user_id: UserId, review: Review) {
        self.reviews.entry(user_id).or_default().push(review);
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepositoryPort for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<User>, RepositoryError> {
        let Some(user_id) = self.tokens.get(token).map(|id| *id) else {
            return Ok(None);
        };
        self.find_by_id(user_id).await
    }

    async fn find_categories(&self, id: UserId) -> Result<Vec<String>, RepositoryError> {
        Ok(self
            .categories
            .get(&id)
            .map(|c| c.clone())
            .unwrap_or_default())
    }

    async fn count_following(&self, id: UserId) -> Result<u32, RepositoryError> {
        Ok(self.follows.get(&id).map(|f| f.len() as u32).unwrap_or(0))
    }

    async fn find_reviews(&self, id: UserId) -> Result<Vec<Review>, RepositoryError> {
        let mut reviews = self
            .reviews
            .get(&id)
            .map(|r| r.clone())
            .unwrap_or_default();
        reviews.sort_by_key(|r| Reverse((r.created_at, r.id)));
        Ok(reviews)
    }
}
