//! 内存存储适配器
//!
//! 帖子与用户存放在按标识索引的并发表中，动态记录为追加写的列表。
//! 列表类查询按创建时间（相同则按标识）排序，保证分页稳定。
//!
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use quill_domain::entity::Entity;
use quill_domain::error::{DomainError, DomainResult};
use quill_domain::model::{ActivityEntry, Post, User};
use quill_domain::persist::{
    ActivityRepository, PaginatedResult, PostFilter, PostRepository, UserRepository,
};
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

/// 以实体标识为键的并发表
struct EntityTable<E: Entity> {
    rows: DashMap<E::Id, E>,
}

impl<E: Entity + Clone> EntityTable<E> {
    fn new() -> Self {
        Self {
            rows: DashMap::new(),
        }
    }

    fn insert(&self, entity: &E) -> DomainResult<()> {
        match self.rows.entry(entity.id().clone()) {
            Entry::Occupied(_) => Err(DomainError::Duplicate {
                entity: E::KIND,
                id: entity.id().to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(entity.clone());
                Ok(())
            }
        }
    }

    fn replace(&self, entity: &E) -> DomainResult<()> {
        match self.rows.get_mut(entity.id()) {
            Some(mut row) => {
                *row = entity.clone();
                Ok(())
            }
            None => Err(DomainError::not_found(format!("{} {}", E::KIND, entity.id()))),
        }
    }

    fn get(&self, id: &E::Id) -> Option<E> {
        self.rows.get(id).map(|row| row.value().clone())
    }

    fn remove(&self, id: &E::Id) -> Option<E> {
        self.rows.remove(id).map(|(_, row)| row)
    }

    /// 按创建时间排序的快照
    fn snapshot(&self) -> Vec<E>
    where
        E::Id: Ord,
    {
        let mut rows: Vec<E> = self.rows.iter().map(|r| r.value().clone()).collect();
        rows.sort_by(|a, b| {
            a.created_at()
                .cmp(b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        rows
    }
}

struct Tables {
    posts: EntityTable<Post>,
    users: EntityTable<User>,
    activity: RwLock<Vec<ActivityEntry>>,
}

/// 进程内存储，克隆后共享同一份数据
#[derive(Clone)]
pub struct InMemoryStore {
    tables: Arc<Tables>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(Tables {
                posts: EntityTable::new(),
                users: EntityTable::new(),
                activity: RwLock::new(Vec::new()),
            }),
        }
    }

    fn author_matches(&self, post: &Post, author: &str) -> bool {
        self.tables
            .users
            .get(&post.author_id())
            .is_some_and(|user| user.name().contains(author))
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn save(&self, post: &Post) -> DomainResult<()> {
        self.tables.posts.insert(post)
    }

    async fn update(&self, post: &Post) -> DomainResult<()> {
        self.tables.posts.replace(post)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Post>> {
        Ok(self.tables.posts.get(&id))
    }

    async fn find_all_by(&self, filter: &PostFilter) -> DomainResult<PaginatedResult<Post>> {
        let matching: Vec<Post> = self
            .tables
            .posts
            .snapshot()
            .into_iter()
            .filter(|p| filter.slug().is_none_or(|s| p.slug().contains(s)))
            .filter(|p| {
                filter
                    .text()
                    .is_none_or(|t| p.title().contains(t) || p.content().contains(t))
            })
            .filter(|p| filter.author().is_none_or(|a| self.author_matches(p, a)))
            .collect();

        Ok(PaginatedResult {
            total: matching.len() as u64,
            items: matching
                .into_iter()
                .skip(filter.offset())
                .take(filter.page_size() as usize)
                .collect(),
            page: filter.page(),
            page_size: filter.page_size(),
        })
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.tables
            .posts
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found(format!("{} {id}", Post::KIND)))
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn save(&self, user: &User) -> DomainResult<()> {
        self.tables.users.insert(user)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        Ok(self.tables.users.get(&id))
    }

    async fn find_by_provider_user_id_and_email(
        &self,
        provider_user_id: &str,
        email: &str,
    ) -> DomainResult<Option<User>> {
        Ok(self
            .tables
            .users
            .rows
            .iter()
            .find(|u| u.provider_user_id() == provider_user_id && u.email() == email)
            .map(|u| u.value().clone()))
    }
}

#[async_trait]
impl ActivityRepository for InMemoryStore {
    async fn append(&self, entry: ActivityEntry) -> DomainResult<()> {
        self.tables
            .activity
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
        Ok(())
    }

    async fn recent(&self, limit: usize) -> DomainResult<Vec<ActivityEntry>> {
        let activity = self
            .tables
            .activity
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        // 追加顺序即记录顺序，倒序即最新优先
        Ok(activity.iter().rev().take(limit).cloned().collect())
    }
}
