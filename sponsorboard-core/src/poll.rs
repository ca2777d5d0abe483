use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::endpoints::StatsSource;
use crate::model::stats::BriefStats;

/// 轮播汇总的默认刷新间隔
pub const BRIEF_STATS_INTERVAL: Duration = Duration::from_secs(15);

/// 汇总数据的周期刷新
///
/// 启动后立即请求一次，之后每轮在上一轮结束后再等待 `interval`，
/// 因此请求之间不会重叠。失败只记日志，下一轮照常调度。
pub struct StatsPoller;

impl StatsPoller {
    pub fn spawn<S: StatsSource>(
        source: S,
        interval: Duration,
        tx: mpsc::UnboundedSender<BriefStats>,
    ) -> PollHandle {
        let token = CancellationToken::new();
        let child = token.child_token();

        tokio::spawn(async move {
            loop {
                let result = tokio::select! {
                    biased;
                    _ = child.cancelled() => break,
                    result = source.fetch_brief_stats() => result,
                };

                match result {
                    Ok(stats) => {
                        if child.is_cancelled() || tx.send(stats).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!(error = %e, "brief stats fetch failed"),
                }

                tokio::select! {
                    biased;
                    _ = child.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
            }
            debug!("brief stats poller stopped");
        });

        PollHandle { token }
    }
}

/// 轮询句柄，cancel 或 drop 后不再发出任何请求或结果
pub struct PollHandle {
    token: CancellationToken,
}

impl PollHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
