//! Relationship showcase - One read endpoint per mapping pattern.
//!
//! Each demo reads the database through the relations declared on the
//! entities. When the rows a demo needs are missing it seeds them first.
//! Seeding is guarded by a Redis lock and re-checks after taking it, so
//! concurrent first requests insert the demo data once. A request that never
//! gets the lock re-reads instead and answers 409 if the rows are still
//! missing. Only an unreachable Redis lets seeding run unguarded.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{
    DEFAULT_LOCK_RETRIES, DEFAULT_LOCK_RETRY_DELAY_MS, DEFAULT_LOCK_TTL_SECONDS,
    DEMO_CATEGORIES, DEMO_LINKED_CATEGORIES, DEMO_LINKED_POSTS, DEMO_LIST_SIZE,
    DEMO_PARENT_COMMENT, DEMO_POSTS, DEMO_PROFILE_BIO, DEMO_PROFILE_LOCATION,
    DEMO_PROFILE_WEBSITE, DEMO_REPLIES, DEMO_USER_EMAIL, DEMO_USER_PASSWORD,
    DEMO_USER_USERNAME, LOCK_DEMO_SEED, MAX_PAGE_SIZE,
};
use crate::domain::{
    CategoryInPost, CommentWithReplies, DemoPost, DemoProfile, DemoUser, ManyToManyDemo,
    ManyToOneDemo, OneToManyDemo, OneToOneDemo, Password, PostWithAuthor, PostWithCategories,
    RelationshipKind, SelfReferentialDemo,
};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::entities::{PostModel, UserModel};
use crate::infra::repositories::{NewCategory, NewComment, NewPost, NewProfile, NewUser};
use crate::infra::{acquire_lock, KeyValueCache, LockError, LockGuard, UnitOfWork};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Relationship showcase trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RelationshipShowcase: Send + Sync {
    /// First user and all of their posts
    async fn one_to_many(&self) -> AppResult<OneToManyDemo>;

    /// A handful of posts, each with its author
    async fn many_to_one(&self) -> AppResult<ManyToOneDemo>;

    /// First user and their profile
    async fn one_to_one(&self) -> AppResult<OneToOneDemo>;

    /// Posts with their categories, and categories with post counts
    async fn many_to_many(&self) -> AppResult<ManyToManyDemo>;

    /// Top-level comments with their direct replies
    async fn self_referential(&self) -> AppResult<SelfReferentialDemo>;
}

/// Outcome of asking for the seeding lock.
enum SeedLock {
    Owned(LockGuard),
    /// Redis is unreachable, seeding goes ahead uncoordinated
    Unguarded,
    /// Another request kept the lock for the whole retry window
    Busy(LockError),
}

impl SeedLock {
    async fn release(self) {
        if let SeedLock::Owned(guard) = self {
            if let Err(e) = guard.release().await {
                tracing::warn!(error = %e, "Failed to release demo lock");
            }
        }
    }
}

/// Concrete implementation of RelationshipShowcase using Unit of Work.
pub struct ShowcaseManager<U: UnitOfWork> {
    uow: Arc<U>,
    cache: Arc<dyn KeyValueCache>,
}

impl<U: UnitOfWork> ShowcaseManager<U> {
    pub fn new(uow: Arc<U>, cache: Arc<dyn KeyValueCache>) -> Self {
        Self { uow, cache }
    }

    /// Take the seeding lock.
    ///
    /// A busy lock means another request is seeding; callers re-read instead
    /// of inserting. Only a cache failure lets seeding run without the lock.
    async fn seed_lock(&self) -> SeedLock {
        match acquire_lock(
            self.cache.clone(),
            LOCK_DEMO_SEED,
            DEFAULT_LOCK_TTL_SECONDS,
            DEFAULT_LOCK_RETRIES,
            DEFAULT_LOCK_RETRY_DELAY_MS,
        )
        .await
        {
            Ok(guard) => SeedLock::Owned(guard),
            Err(LockError::Cache(e)) => {
                tracing::warn!(error = %e, "Cache unavailable, seeding without demo lock");
                SeedLock::Unguarded
            }
            Err(held) => {
                tracing::info!("Demo data is being seeded by another request");
                SeedLock::Busy(held)
            }
        }
    }

    /// First user, creating the demo user and their posts when the table is empty.
    async fn demo_user(&self) -> AppResult<UserModel> {
        if let Some(user) = self.uow.users().first().await? {
            return Ok(user);
        }

        match self.seed_lock().await {
            SeedLock::Busy(held) => self
                .uow
                .users()
                .first()
                .await?
                .ok_or_else(|| AppError::from(held)),
            lock => {
                let seeded = self.seed_user().await;
                lock.release().await;
                seeded
            }
        }
    }

    async fn seed_user(&self) -> AppResult<UserModel> {
        if let Some(user) = self.uow.users().first().await? {
            return Ok(user);
        }

        let password = Password::new(DEMO_USER_PASSWORD)?;
        let user = self
            .uow
            .transaction_serializable(move |ctx| {
                Box::pin(async move {
                    let user = ctx
                        .insert(
                            NewUser {
                                email: DEMO_USER_EMAIL.to_string(),
                                username: DEMO_USER_USERNAME.to_string(),
                                hashed_password: password.into_string(),
                                is_active: true,
                            }
                            .into_active_model(),
                        )
                        .await?;

                    for (title, content) in DEMO_POSTS {
                        ctx.insert(
                            NewPost {
                                title: title.to_string(),
                                content: content.to_string(),
                                user_id: user.id,
                                is_published: false,
                            }
                            .into_active_model(),
                        )
                        .await?;
                    }

                    Ok(user)
                })
            })
            .await?;

        tracing::info!(user_id = user.id, "Seeded demo user with posts");
        Ok(user)
    }

    async fn ensure_categories(&self) -> AppResult<()> {
        if self.uow.categories().count().await? > 0 {
            return Ok(());
        }

        match self.seed_lock().await {
            SeedLock::Busy(held) => {
                if self.uow.categories().count().await? > 0 {
                    Ok(())
                } else {
                    Err(held.into())
                }
            }
            lock => {
                let seeded = self.seed_categories().await;
                lock.release().await;
                seeded
            }
        }
    }

    async fn seed_categories(&self) -> AppResult<()> {
        if self.uow.categories().count().await? > 0 {
            return Ok(());
        }

        self.uow
            .transaction(|ctx| {
                Box::pin(async move {
                    for (name, description) in DEMO_CATEGORIES {
                        ctx.insert(
                            NewCategory {
                                name: name.to_string(),
                                description: Some(description.to_string()),
                            }
                            .into_active_model(),
                        )
                        .await?;
                    }
                    Ok(())
                })
            })
            .await?;

        tracing::info!(count = DEMO_CATEGORIES.len(), "Seeded demo categories");
        Ok(())
    }

    /// Give each of the oldest posts without categories the first demo categories.
    async fn link_demo_categories(&self, posts: &[PostModel]) -> AppResult<()> {
        let mut categories = self
            .uow
            .categories()
            .list(PaginationParams::new(0, MAX_PAGE_SIZE))
            .await?;
        categories.sort_by_key(|c| c.id);
        categories.truncate(DEMO_LINKED_CATEGORIES);

        let linked = self.uow.posts().categories_for(posts).await?;
        for (post, existing) in posts.iter().zip(linked) {
            if !existing.is_empty() {
                continue;
            }
            for category in &categories {
                self.uow.posts().add_category(post.id, category.id).await?;
            }
            tracing::debug!(post_id = post.id, "Linked demo categories");
        }

        Ok(())
    }

    async fn seed_comments(&self, post_id: i32, user_id: i32) -> AppResult<()> {
        if self.uow.comments().count_for_post(post_id).await? > 0 {
            return Ok(());
        }

        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let parent = ctx
                        .insert(
                            NewComment {
                                content: DEMO_PARENT_COMMENT.to_string(),
                                user_id,
                                post_id,
                                parent_id: None,
                            }
                            .into_active_model(),
                        )
                        .await?;

                    for reply in DEMO_REPLIES {
                        ctx.insert(
                            NewComment {
                                content: reply.to_string(),
                                user_id,
                                post_id,
                                parent_id: Some(parent.id),
                            }
                            .into_active_model(),
                        )
                        .await?;
                    }
                    Ok(())
                })
            })
            .await?;

        tracing::info!(post_id, "Seeded demo comment thread");
        Ok(())
    }
}

#[async_trait]
impl<U: UnitOfWork> RelationshipShowcase for ShowcaseManager<U> {
    async fn one_to_many(&self) -> AppResult<OneToManyDemo> {
        let user = self.demo_user().await?;
        let posts = match self.uow.users().find_with_posts(user.id).await? {
            Some((_, posts)) => posts,
            None => Vec::new(),
        };

        Ok(OneToManyDemo {
            user: DemoUser::from(user),
            posts: posts.into_iter().map(DemoPost::from).collect(),
            relationship_type: RelationshipKind::OneToMany,
        })
    }

    async fn many_to_one(&self) -> AppResult<ManyToOneDemo> {
        let posts = self.uow.posts().oldest(DEMO_LIST_SIZE).await?;
        let authors = if posts.is_empty() {
            Vec::new()
        } else {
            self.uow.posts().authors_for(&posts).await?
        };

        Ok(ManyToOneDemo {
            posts: posts
                .into_iter()
                .zip(authors)
                .map(|(post, author)| PostWithAuthor::new(post, author))
                .collect(),
            relationship_type: RelationshipKind::ManyToOne,
        })
    }

    async fn one_to_one(&self) -> AppResult<OneToOneDemo> {
        let Some(user) = self.uow.users().first().await? else {
            return Ok(OneToOneDemo {
                message: Some("No user found".to_string()),
                user: None,
                profile: None,
                relationship_type: RelationshipKind::OneToOne,
            });
        };

        let profiles = self.uow.profiles();
        let profile = match profiles.profile_of(&user).await? {
            Some(profile) => profile,
            None => match self.seed_lock().await {
                SeedLock::Busy(held) => profiles
                    .profile_of(&user)
                    .await?
                    .ok_or_else(|| AppError::from(held))?,
                lock => {
                    let seeded = match profiles.profile_of(&user).await {
                        Ok(Some(profile)) => Ok(profile),
                        Ok(None) => {
                            profiles
                                .create(NewProfile {
                                    user_id: user.id,
                                    bio: Some(DEMO_PROFILE_BIO.to_string()),
                                    website: Some(DEMO_PROFILE_WEBSITE.to_string()),
                                    location: Some(DEMO_PROFILE_LOCATION.to_string()),
                                    avatar_url: None,
                                })
                                .await
                        }
                        Err(e) => Err(e),
                    };
                    lock.release().await;
                    seeded?
                }
            },
        };

        Ok(OneToOneDemo {
            message: None,
            user: Some(DemoUser::from(user)),
            profile: Some(DemoProfile::from(profile)),
            relationship_type: RelationshipKind::OneToOne,
        })
    }

    async fn many_to_many(&self) -> AppResult<ManyToManyDemo> {
        self.ensure_categories().await?;

        let posts = self.uow.posts().oldest(DEMO_LIST_SIZE).await?;
        if posts.is_empty() {
            return Ok(ManyToManyDemo {
                message: Some("No posts found".to_string()),
                posts: Vec::new(),
                categories: Vec::new(),
                relationship_type: RelationshipKind::ManyToMany,
            });
        }

        let linked = posts.len().min(DEMO_LINKED_POSTS as usize);
        self.link_demo_categories(&posts[..linked]).await?;

        let categories_per_post = self.uow.posts().categories_for(&posts).await?;
        let counts = self
            .uow
            .categories()
            .with_post_counts(PaginationParams::new(0, MAX_PAGE_SIZE))
            .await?;

        Ok(ManyToManyDemo {
            message: None,
            posts: posts
                .into_iter()
                .zip(categories_per_post)
                .map(|(post, categories)| PostWithCategories {
                    id: post.id,
                    title: post.title,
                    categories: categories.into_iter().map(CategoryInPost::from).collect(),
                })
                .collect(),
            categories: counts,
            relationship_type: RelationshipKind::ManyToMany,
        })
    }

    async fn self_referential(&self) -> AppResult<SelfReferentialDemo> {
        let empty = |message: &str| SelfReferentialDemo {
            message: Some(message.to_string()),
            comments: Vec::new(),
            relationship_type: RelationshipKind::SelfReferential,
        };

        let Some(post) = self.uow.posts().oldest(1).await?.into_iter().next() else {
            return Ok(empty("No posts found"));
        };

        if self.uow.comments().count_for_post(post.id).await? == 0 {
            let Some(user) = self.uow.users().first().await? else {
                return Ok(empty("No users found"));
            };

            match self.seed_lock().await {
                SeedLock::Busy(held) => {
                    if self.uow.comments().count_for_post(post.id).await? == 0 {
                        return Err(held.into());
                    }
                }
                lock => {
                    let seeded = self.seed_comments(post.id, user.id).await;
                    lock.release().await;
                    seeded?;
                }
            }
        }

        let threads = self.uow.comments().top_level_with_replies(None).await?;
        Ok(SelfReferentialDemo {
            message: None,
            comments: threads
                .into_iter()
                .map(|(comment, replies)| CommentWithReplies::new(comment, replies))
                .collect(),
            relationship_type: RelationshipKind::SelfReferential,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::{
        MockCategoryRepository, MockCommentRepository, MockPostRepository,
        MockProfileRepository, MockUserRepository,
    };
    use crate::infra::MockKeyValueCache;
    use crate::services::testing::{category, comment, post, profile, user, TestUnitOfWork};
    use crate::domain::CategoryWithPostCount;
    use mockall::predicate::eq;
    use sea_orm::{DbBackend, MockDatabase};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn unused_cache() -> Arc<dyn KeyValueCache> {
        Arc::new(MockKeyValueCache::new())
    }

    fn granting_cache() -> Arc<dyn KeyValueCache> {
        let mut cache = MockKeyValueCache::new();
        cache
            .expect_try_lock()
            .with(eq(LOCK_DEMO_SEED), eq(DEFAULT_LOCK_TTL_SECONDS))
            .times(1)
            .returning(|_, _| Ok(Some("token".to_string())));
        cache
            .expect_unlock()
            .with(eq(LOCK_DEMO_SEED), eq("token"))
            .times(1)
            .returning(|_, _| Ok(true));
        Arc::new(cache)
    }

    /// Another request holds the seeding lock for the whole retry window.
    fn held_cache() -> Arc<dyn KeyValueCache> {
        let mut cache = MockKeyValueCache::new();
        cache
            .expect_try_lock()
            .times(DEFAULT_LOCK_RETRIES as usize + 1)
            .returning(|_, _| Ok(None));
        cache.expect_unlock().never();
        Arc::new(cache)
    }

    #[tokio::test]
    async fn test_one_to_many_reads_existing_user() {
        let mut users = MockUserRepository::new();
        users
            .expect_first()
            .returning(|| Ok(Some(user(1, "alice"))));
        users
            .expect_find_with_posts()
            .with(eq(1))
            .returning(|id| Ok(Some((user(id, "alice"), vec![post(1, id), post(2, id)]))));

        let uow = TestUnitOfWork::default().with_users(users);
        let demo = ShowcaseManager::new(Arc::new(uow), unused_cache())
            .one_to_many()
            .await
            .unwrap();

        assert_eq!(demo.user.username, "alice");
        assert_eq!(demo.posts.len(), 2);
        assert_eq!(demo.relationship_type, RelationshipKind::OneToMany);
    }

    #[tokio::test]
    async fn test_one_to_many_seeds_under_lock() {
        let mut users = MockUserRepository::new();
        users.expect_first().times(2).returning(|| Ok(None));
        users
            .expect_find_with_posts()
            .with(eq(1))
            .returning(|id| Ok(Some((user(id, DEMO_USER_USERNAME), vec![post(1, id), post(2, id)]))));

        let db = MockDatabase::new(DbBackend::Postgres)
            .append_query_results([[user(1, DEMO_USER_USERNAME)]])
            .append_query_results([[post(1, 1)], [post(2, 1)]]);
        let uow = Arc::new(TestUnitOfWork::default().with_users(users).with_database(db));
        let demo = ShowcaseManager::new(uow.clone(), granting_cache())
            .one_to_many()
            .await
            .unwrap();

        assert_eq!(demo.user.username, DEMO_USER_USERNAME);
        assert_eq!(uow.isolation_levels(), vec!["serializable"]);

        let log = format!("{:?}", uow.transaction_log());
        assert!(log.contains(DEMO_USER_EMAIL));
        for (title, content) in DEMO_POSTS {
            assert!(log.contains(title));
            assert!(log.contains(content));
        }
        assert!(!log.contains(DEMO_USER_PASSWORD));
    }

    #[tokio::test]
    async fn test_one_to_many_busy_lock_does_not_seed() {
        let mut users = MockUserRepository::new();
        users.expect_first().times(2).returning(|| Ok(None));

        let uow = Arc::new(
            TestUnitOfWork::default()
                .with_users(users)
                .with_database(MockDatabase::new(DbBackend::Postgres)),
        );
        let result = ShowcaseManager::new(uow.clone(), held_cache())
            .one_to_many()
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert!(uow.isolation_levels().is_empty());
    }

    #[tokio::test]
    async fn test_one_to_many_busy_lock_reads_rows_seeded_by_holder() {
        let calls = AtomicUsize::new(0);
        let mut users = MockUserRepository::new();
        users.expect_first().times(2).returning(move || {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(None)
            } else {
                Ok(Some(user(1, DEMO_USER_USERNAME)))
            }
        });
        users
            .expect_find_with_posts()
            .with(eq(1))
            .returning(|id| Ok(Some((user(id, DEMO_USER_USERNAME), vec![post(1, id)]))));

        let uow = Arc::new(
            TestUnitOfWork::default()
                .with_users(users)
                .with_database(MockDatabase::new(DbBackend::Postgres)),
        );
        let demo = ShowcaseManager::new(uow.clone(), held_cache())
            .one_to_many()
            .await
            .unwrap();

        assert_eq!(demo.user.id, 1);
        assert!(uow.isolation_levels().is_empty());
    }

    #[tokio::test]
    async fn test_many_to_one_without_posts() {
        let mut posts = MockPostRepository::new();
        posts
            .expect_oldest()
            .with(eq(DEMO_LIST_SIZE))
            .returning(|_| Ok(Vec::new()));
        posts.expect_authors_for().never();

        let uow = TestUnitOfWork::default().with_posts(posts);
        let demo = ShowcaseManager::new(Arc::new(uow), unused_cache())
            .many_to_one()
            .await
            .unwrap();

        assert!(demo.posts.is_empty());
        assert_eq!(demo.relationship_type, RelationshipKind::ManyToOne);
    }

    #[tokio::test]
    async fn test_many_to_one_attaches_authors() {
        let mut posts = MockPostRepository::new();
        posts
            .expect_oldest()
            .returning(|_| Ok(vec![post(1, 1), post(2, 2)]));
        posts
            .expect_authors_for()
            .returning(|_| Ok(vec![Some(user(1, "alice")), Some(user(2, "bob"))]));

        let uow = TestUnitOfWork::default().with_posts(posts);
        let demo = ShowcaseManager::new(Arc::new(uow), unused_cache())
            .many_to_one()
            .await
            .unwrap();

        let authors: Vec<_> = demo
            .posts
            .iter()
            .map(|p| p.author.as_ref().unwrap().username.clone())
            .collect();
        assert_eq!(authors, vec!["alice", "bob"]);
    }

    #[tokio::test]
    async fn test_one_to_one_without_users() {
        let mut users = MockUserRepository::new();
        users.expect_first().returning(|| Ok(None));

        let uow = TestUnitOfWork::default().with_users(users);
        let demo = ShowcaseManager::new(Arc::new(uow), unused_cache())
            .one_to_one()
            .await
            .unwrap();

        assert_eq!(demo.message.as_deref(), Some("No user found"));
        assert!(demo.user.is_none());
    }

    #[tokio::test]
    async fn test_one_to_one_creates_demo_profile() {
        let mut users = MockUserRepository::new();
        users.expect_first().returning(|| Ok(Some(user(3, "carol"))));
        let mut profiles = MockProfileRepository::new();
        profiles.expect_profile_of().times(2).returning(|_| Ok(None));
        profiles
            .expect_create()
            .withf(|new| {
                new.user_id == 3 && new.location.as_deref() == Some(DEMO_PROFILE_LOCATION)
            })
            .times(1)
            .returning(|new| {
                let mut model = profile(1, new.user_id);
                model.bio = new.bio;
                model.location = new.location;
                Ok(model)
            });

        let uow = TestUnitOfWork::default()
            .with_users(users)
            .with_profiles(profiles);
        let demo = ShowcaseManager::new(Arc::new(uow), granting_cache())
            .one_to_one()
            .await
            .unwrap();

        let profile = demo.profile.unwrap();
        assert_eq!(profile.bio.as_deref(), Some(DEMO_PROFILE_BIO));
        assert_eq!(demo.user.unwrap().id, 3);
    }

    #[tokio::test]
    async fn test_one_to_one_seeds_without_redis() {
        let mut cache = MockKeyValueCache::new();
        cache
            .expect_try_lock()
            .returning(|_, _| Err(AppError::internal("redis down")));
        let mut users = MockUserRepository::new();
        users.expect_first().returning(|| Ok(Some(user(3, "carol"))));
        let mut profiles = MockProfileRepository::new();
        profiles.expect_profile_of().returning(|_| Ok(None));
        profiles
            .expect_create()
            .times(1)
            .returning(|new| Ok(profile(1, new.user_id)));

        let uow = TestUnitOfWork::default()
            .with_users(users)
            .with_profiles(profiles);
        let demo = ShowcaseManager::new(Arc::new(uow), Arc::new(cache))
            .one_to_one()
            .await
            .unwrap();

        assert!(demo.profile.is_some());
    }

    #[tokio::test]
    async fn test_many_to_many_links_first_categories_by_id() {
        let mut categories = MockCategoryRepository::new();
        categories.expect_count().returning(|| Ok(3));
        categories.expect_list().returning(|_| {
            Ok(vec![
                category(3, "Food"),
                category(1, "Technology"),
                category(2, "Travel"),
            ])
        });
        categories.expect_with_post_counts().returning(|_| {
            Ok(vec![CategoryWithPostCount {
                id: 1,
                name: "Technology".to_string(),
                description: None,
                created_at: category(1, "Technology").created_at,
                updated_at: None,
                post_count: 1,
            }])
        });

        let mut posts = MockPostRepository::new();
        posts
            .expect_oldest()
            .returning(|_| Ok(vec![post(1, 1), post(2, 1), post(3, 1)]));
        posts
            .expect_categories_for()
            .withf(|batch| batch.len() == 2)
            .times(1)
            .returning(|_| Ok(vec![vec![category(3, "Food")], Vec::new()]));
        posts
            .expect_add_category()
            .withf(|post_id, category_id| *post_id == 2 && (*category_id == 1 || *category_id == 2))
            .times(2)
            .returning(|_, _| Ok(true));
        posts
            .expect_categories_for()
            .withf(|batch| batch.len() == 3)
            .times(1)
            .returning(|_| {
                Ok(vec![
                    vec![category(3, "Food")],
                    vec![category(1, "Technology"), category(2, "Travel")],
                    Vec::new(),
                ])
            });

        let uow = TestUnitOfWork::default()
            .with_categories(categories)
            .with_posts(posts);
        let demo = ShowcaseManager::new(Arc::new(uow), unused_cache())
            .many_to_many()
            .await
            .unwrap();

        assert_eq!(demo.posts.len(), 3);
        assert_eq!(demo.posts[1].categories.len(), 2);
        assert_eq!(demo.categories[0].post_count, 1);
    }

    #[tokio::test]
    async fn test_many_to_many_seeds_categories() {
        let mut categories = MockCategoryRepository::new();
        categories.expect_count().times(2).returning(|| Ok(0));
        let mut posts = MockPostRepository::new();
        posts.expect_oldest().returning(|_| Ok(Vec::new()));

        let db = MockDatabase::new(DbBackend::Postgres).append_query_results([
            [category(1, "Technology")],
            [category(2, "Travel")],
            [category(3, "Food")],
        ]);
        let uow = Arc::new(
            TestUnitOfWork::default()
                .with_categories(categories)
                .with_posts(posts)
                .with_database(db),
        );
        let demo = ShowcaseManager::new(uow.clone(), granting_cache())
            .many_to_many()
            .await
            .unwrap();

        assert_eq!(demo.message.as_deref(), Some("No posts found"));
        assert_eq!(uow.isolation_levels(), vec!["read_committed"]);

        let log = format!("{:?}", uow.transaction_log());
        for (name, description) in DEMO_CATEGORIES {
            assert!(log.contains(name));
            assert!(log.contains(description));
        }
    }

    #[tokio::test]
    async fn test_many_to_many_without_posts() {
        let mut categories = MockCategoryRepository::new();
        categories.expect_count().returning(|| Ok(3));
        let mut posts = MockPostRepository::new();
        posts.expect_oldest().returning(|_| Ok(Vec::new()));

        let uow = TestUnitOfWork::default()
            .with_categories(categories)
            .with_posts(posts);
        let demo = ShowcaseManager::new(Arc::new(uow), unused_cache())
            .many_to_many()
            .await
            .unwrap();

        assert_eq!(demo.message.as_deref(), Some("No posts found"));
    }

    #[tokio::test]
    async fn test_self_referential_without_posts() {
        let mut posts = MockPostRepository::new();
        posts.expect_oldest().with(eq(1)).returning(|_| Ok(Vec::new()));

        let uow = TestUnitOfWork::default().with_posts(posts);
        let demo = ShowcaseManager::new(Arc::new(uow), unused_cache())
            .self_referential()
            .await
            .unwrap();

        assert_eq!(demo.message.as_deref(), Some("No posts found"));
        assert_eq!(demo.relationship_type, RelationshipKind::SelfReferential);
    }

    #[tokio::test]
    async fn test_self_referential_seeds_thread() {
        let mut posts = MockPostRepository::new();
        posts.expect_oldest().returning(|_| Ok(vec![post(7, 1)]));
        let mut users = MockUserRepository::new();
        users.expect_first().returning(|| Ok(Some(user(1, "alice"))));
        let mut comments = MockCommentRepository::new();
        comments
            .expect_count_for_post()
            .with(eq(7))
            .times(2)
            .returning(|_| Ok(0));
        comments.expect_top_level_with_replies().returning(|_| {
            Ok(vec![(
                comment(1, 7, None),
                vec![comment(2, 7, Some(1)), comment(3, 7, Some(1))],
            )])
        });

        let db = MockDatabase::new(DbBackend::Postgres)
            .append_query_results([[comment(1, 7, None)]])
            .append_query_results([[comment(2, 7, Some(1))], [comment(3, 7, Some(1))]]);
        let uow = Arc::new(
            TestUnitOfWork::default()
                .with_posts(posts)
                .with_users(users)
                .with_comments(comments)
                .with_database(db),
        );
        let demo = ShowcaseManager::new(uow.clone(), granting_cache())
            .self_referential()
            .await
            .unwrap();

        assert_eq!(demo.comments[0].replies.len(), 2);
        assert_eq!(uow.isolation_levels(), vec!["read_committed"]);

        let log = format!("{:?}", uow.transaction_log());
        assert!(log.contains(DEMO_PARENT_COMMENT));
        for reply in DEMO_REPLIES {
            assert!(log.contains(reply));
        }
    }

    #[tokio::test]
    async fn test_self_referential_existing_threads() {
        let mut posts = MockPostRepository::new();
        posts.expect_oldest().returning(|_| Ok(vec![post(1, 1)]));
        let mut comments = MockCommentRepository::new();
        comments.expect_count_for_post().returning(|_| Ok(3));
        comments
            .expect_top_level_with_replies()
            .with(eq(None))
            .returning(|_| {
                Ok(vec![(
                    comment(1, 1, None),
                    vec![comment(2, 1, Some(1)), comment(3, 1, Some(1))],
                )])
            });

        let uow = TestUnitOfWork::default()
            .with_posts(posts)
            .with_comments(comments);
        let demo = ShowcaseManager::new(Arc::new(uow), unused_cache())
            .self_referential()
            .await
            .unwrap();

        assert!(demo.message.is_none());
        assert_eq!(demo.comments.len(), 1);
        assert_eq!(demo.comments[0].replies.len(), 2);
    }
}
