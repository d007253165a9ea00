//! 运维告警
//!
//! 分发器只依赖 [`Notifier`]，不依赖具体的机器人 SDK。

use tracing::warn;

/// 告警通知
///
/// 即发即弃，实现方不应阻塞调用方，也不向调用方返回失败。
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

impl<F> Notifier for F
where
    F: Fn(&str) + Send + Sync,
{
    fn notify(&self, message: &str) {
        self(message)
    }
}

/// 未配置告警接收人时，写入日志
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        warn!(target: "nomo::notify", "Notify ==> {}", message);
    }
}
