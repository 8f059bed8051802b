//! 单元测试用的内存仓储与记录型事件总线
use async_trait::async_trait;
use quill_domain::domain_event::{BusinessContext, DomainEvent};
use quill_domain::entity::Entity;
use quill_domain::error::{DomainError, DomainResult};
use quill_domain::eventing::{EventBus, SerializedEvent};
use quill_domain::model::{ActivityEntry, Post, User};
use quill_domain::persist::{
    ActivityRepository, PaginatedResult, PostFilter, PostRepository, UserRepository,
};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

#[derive(Default)]
pub(crate) struct RecordingEventBus {
    published: Mutex<Vec<(BusinessContext, SerializedEvent)>>,
    fail: AtomicBool,
}

impl RecordingEventBus {
    pub(crate) fn failing() -> Self {
        let bus = Self::default();
        bus.fail.store(true, Ordering::SeqCst);
        bus
    }

    pub(crate) fn published(&self) -> Vec<(BusinessContext, SerializedEvent)> {
        self.published.lock().unwrap().clone()
    }

    pub(crate) fn events_of<E: DomainEvent>(&self) -> Vec<E> {
        self.published()
            .iter()
            .filter(|(_, ev)| ev.event_type() == E::NAME)
            .map(|(_, ev)| ev.to_event::<E>().unwrap())
            .collect()
    }
}

#[async_trait]
impl EventBus for RecordingEventBus {
    async fn publish(&self, ctx: &BusinessContext, event: &SerializedEvent) -> DomainResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::event_bus("broker unavailable"));
        }
        self.published
            .lock()
            .unwrap()
            .push((ctx.clone(), event.clone()));
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct MemoryPosts {
    rows: Mutex<Vec<Post>>,
    fail_writes: AtomicBool,
    stale_reads: AtomicBool,
}

impl MemoryPosts {
    pub(crate) fn with(posts: impl IntoIterator<Item = Post>) -> Self {
        Self {
            rows: Mutex::new(posts.into_iter().collect()),
            fail_writes: AtomicBool::new(false),
            stale_reads: AtomicBool::new(false),
        }
    }

    /// 读取看不到已有行，写入仍检查重复：模拟并发投递的竞争窗口
    pub(crate) fn with_stale_reads(posts: impl IntoIterator<Item = Post>) -> Self {
        let repo = Self::with(posts);
        repo.stale_reads.store(true, Ordering::SeqCst);
        repo
    }

    pub(crate) fn failing_writes() -> Self {
        let repo = Self::default();
        repo.fail_writes.store(true, Ordering::SeqCst);
        repo
    }

    pub(crate) fn all(&self) -> Vec<Post> {
        self.rows.lock().unwrap().clone()
    }

    fn check_writable(&self) -> DomainResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::repository("disk full"));
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for MemoryPosts {
    async fn save(&self, post: &Post) -> DomainResult<()> {
        self.check_writable()?;
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|p| p.id() == post.id()) {
            return Err(DomainError::Duplicate {
                entity: Post::KIND,
                id: post.id().to_string(),
            });
        }
        rows.push(post.clone());
        Ok(())
    }

    async fn update(&self, post: &Post) -> DomainResult<()> {
        self.check_writable()?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|p| p.id() == post.id())
            .ok_or_else(|| DomainError::not_found(post.id().to_string()))?;
        *row = post.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Post>> {
        if self.stale_reads.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(self.rows.lock().unwrap().iter().find(|p| *p.id() == id).cloned())
    }

    async fn find_all_by(&self, filter: &PostFilter) -> DomainResult<PaginatedResult<Post>> {
        let rows = self.rows.lock().unwrap();
        let matching: Vec<Post> = rows
            .iter()
            .filter(|p| filter.slug().is_none_or(|s| p.slug().contains(s)))
            .cloned()
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
        self.check_writable()?;
        self.rows.lock().unwrap().retain(|p| *p.id() != id);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct MemoryUsers {
    rows: Mutex<Vec<User>>,
    fail_writes: AtomicBool,
    stale_reads: AtomicBool,
}

impl MemoryUsers {
    pub(crate) fn failing_writes() -> Self {
        let repo = Self::default();
        repo.fail_writes.store(true, Ordering::SeqCst);
        repo
    }

    pub(crate) fn with_stale_reads(users: impl IntoIterator<Item = User>) -> Self {
        let repo = Self {
            rows: Mutex::new(users.into_iter().collect()),
            ..Self::default()
        };
        repo.stale_reads.store(true, Ordering::SeqCst);
        repo
    }

    pub(crate) fn all(&self) -> Vec<User> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn save(&self, user: &User) -> DomainResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::repository("disk full"));
        }
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.id() == user.id()) {
            return Err(DomainError::Duplicate {
                entity: User::KIND,
                id: user.id().to_string(),
            });
        }
        rows.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        if self.stale_reads.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(self.rows.lock().unwrap().iter().find(|u| *u.id() == id).cloned())
    }

    async fn find_by_provider_user_id_and_email(
        &self,
        provider_user_id: &str,
        email: &str,
    ) -> DomainResult<Option<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.provider_user_id() == provider_user_id && u.email() == email)
            .cloned())
    }
}

#[derive(Default)]
pub(crate) struct MemoryActivity {
    rows: Mutex<Vec<ActivityEntry>>,
}

#[async_trait]
impl ActivityRepository for MemoryActivity {
    async fn append(&self, entry: ActivityEntry) -> DomainResult<()> {
        self.rows.lock().unwrap().push(entry);
        Ok(())
    }

    async fn recent(&self, limit: usize) -> DomainResult<Vec<ActivityEntry>> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.recorded_at().cmp(a.recorded_at()));
        rows.truncate(limit);
        Ok(rows)
    }
}
