//! 回调去重
//!
//! 飞书在回调失败或超时后会重投同一事件。处理前先登记事件 ID，有效期内的重复
//! 投递直接确认；处理失败时撤销登记，让重投可以再次处理。

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 超过这个数量时顺带清理过期记录
const PRUNE_THRESHOLD: usize = 1024;

/// 事件 ID 去重表，克隆后共享同一份数据
#[derive(Clone)]
pub struct EventDeduplicator {
    seen: Arc<DashMap<String, Instant>>,
    ttl: Duration,
}

impl EventDeduplicator {
    pub fn new(ttl: Duration) -> Self {
        Self {
            seen: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// 登记事件，返回 `false` 表示有效期内已登记过
    pub fn try_begin(&self, event_id: &str) -> bool {
        if self.seen.len() > PRUNE_THRESHOLD {
            self.seen.retain(|_, seen_at| seen_at.elapsed() < self.ttl);
        }

        match self.seen.entry(event_id.to_string()) {
            Entry::Occupied(mut entry) => {
                if entry.get().elapsed() < self.ttl {
                    return false;
                }
                entry.insert(Instant::now());
                true
            }
            Entry::Vacant(entry) => {
                entry.insert(Instant::now());
                true
            }
        }
    }

    /// 撤销登记
    pub fn forget(&self, event_id: &str) {
        self.seen.remove(event_id);
    }
}

impl Default for EventDeduplicator {
    fn default() -> Self {
        Self::new(Duration::from_secs(600))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_within_ttl_is_rejected() {
        let dedup = EventDeduplicator::new(Duration::from_secs(60));

        assert!(dedup.try_begin("ev_1"));
        assert!(!dedup.try_begin("ev_1"));
        assert!(dedup.try_begin("ev_2"));
    }

    #[test]
    fn test_forget_allows_redelivery() {
        let dedup = EventDeduplicator::new(Duration::from_secs(60));

        assert!(dedup.try_begin("ev_1"));
        dedup.forget("ev_1");
        assert!(dedup.try_begin("ev_1"));
    }

    #[test]
    fn test_expired_entry_is_accepted_again() {
        let dedup = EventDeduplicator::new(Duration::ZERO);

        assert!(dedup.try_begin("ev_1"));
        assert!(dedup.try_begin("ev_1"));
    }
}
