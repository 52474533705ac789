use stargaze_core::pagination::NeoPaginator;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

pub const DEFAULT_MAX_SESSIONS: usize = 1024;

pub type SharedPaginator = Arc<Mutex<NeoPaginator>>;

/// In-memory NEO page instances, oldest evicted first once full.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<Sessions>>,
    capacity: usize,
}

#[derive(Debug, Default)]
struct Sessions {
    by_id: HashMap<Uuid, SharedPaginator>,
    order: VecDeque<Uuid>,
}

impl SessionStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Sessions::default())),
            capacity: capacity.max(1),
        }
    }

    pub async fn insert(&self, paginator: NeoPaginator) -> Uuid {
        let id = Uuid::new_v4();
        let mut sessions = self.inner.write().await;

        while sessions.order.len() >= self.capacity {
            let Some(oldest) = sessions.order.pop_front() else {
                break;
            };
            sessions.by_id.remove(&oldest);
            tracing::debug!(session = %oldest, "evicted neows session");
        }

        sessions
            .by_id
            .insert(id, Arc::new(Mutex::new(paginator)));
        sessions.order.push_back(id);
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<SharedPaginator> {
        self.inner.read().await.by_id.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.by_id.len()
    }
}
