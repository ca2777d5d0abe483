use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// 搜索框默认防抖间隔
pub const SEARCH_DEBOUNCE_MS: u64 = 600;

/// 经典防抖：输入稳定 `delay` 之后才发出最新值
///
/// 新值到来时丢弃尚未发出的旧值并重新计时。默认第一个值同样要等待 `delay`，
/// 开启 `leading_edge` 后第一个值立即发出。
/// 必须在 tokio runtime 内调用 `push`；Drop 时取消挂起的定时器。
pub struct Debouncer<T> {
    delay: Duration,
    leading_edge: bool,
    primed: bool,
    pending: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration, tx: mpsc::UnboundedSender<T>) -> Self {
        Self {
            delay,
            leading_edge: false,
            primed: false,
            pending: None,
            tx,
        }
    }

    pub fn with_leading_edge(mut self, leading_edge: bool) -> Self {
        self.leading_edge = leading_edge;
        self
    }

    pub fn push(&mut self, value: T) {
        self.cancel();

        if self.leading_edge && !self.primed {
            self.primed = true;
            let _ = self.tx.send(value);
            return;
        }
        self.primed = true;

        let tx = self.tx.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(value);
        }));
    }

    /// 丢弃挂起值，立即发出给定值（回车提交搜索）
    pub fn flush(&mut self, value: T) {
        self.cancel();
        self.primed = true;
        let _ = self.tx.send(value);
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    const DELAY: Duration = Duration::from_millis(SEARCH_DEBOUNCE_MS);

    #[tokio::test(start_paused = true)]
    async fn burst_coalesces_to_last_value() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(DELAY, tx);

        debouncer.push("n".to_string());
        tokio::time::sleep(Duration::from_millis(200)).await;
        debouncer.push("ne".to_string());
        tokio::time::sleep(Duration::from_millis(400)).await;
        debouncer.push("neo".to_string());
        let last_push = Instant::now();

        assert_eq!(rx.recv().await.as_deref(), Some("neo"));
        assert!(last_push.elapsed() >= DELAY);

        tokio::time::sleep(DELAY * 2).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn first_value_is_delayed_by_default() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(DELAY, tx);
        let start = Instant::now();

        debouncer.push(1);
        tokio::time::sleep(DELAY - Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());

        assert_eq!(rx.recv().await, Some(1));
        assert!(start.elapsed() >= DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn leading_edge_emits_first_value_immediately() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(DELAY, tx).with_leading_edge(true);

        debouncer.push(1);
        assert_eq!(rx.try_recv().ok(), Some(1));

        debouncer.push(2);
        assert!(rx.try_recv().is_err());
        assert_eq!(rx.recv().await, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn flush_cancels_pending_value() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(DELAY, tx);

        debouncer.push("typing".to_string());
        debouncer.flush("submitted".to_string());
        assert_eq!(rx.try_recv().ok().as_deref(), Some("submitted"));

        tokio::time::sleep(DELAY * 2).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_pending_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        {
            let mut debouncer = Debouncer::new(DELAY, tx);
            debouncer.push(7);
            assert!(debouncer.is_pending());
        }
        tokio::time::sleep(DELAY * 2).await;
        // 发送端随 Debouncer 一起释放，通道关闭且没有值
        assert_eq!(rx.recv().await, None);
    }
}
