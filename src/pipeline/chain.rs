//! Linear fallback over rasterization strategies.
//!
//! ## Why a chain instead of one backend?
//!
//! `pdftoppm` (poppler) is fast and ubiquitous on servers but not guaranteed
//! to be installed; pdfium always works once its shared library is present
//! but is slower to spin up. Trying the external tool first and falling back
//! to the library gives the best of both without the caller caring which one
//! actually ran.
//!
//! Each strategy is attempted exactly once per conversion — this is fallback,
//! not retry. A partially-successful strategy's output is discarded entirely
//! rather than spliced with another strategy's pages: mixing rendering
//! engines mid-document risks visually inconsistent output.
//!
//! ## Why spawn_blocking + timeout?
//!
//! Strategies block for the whole document (subprocess wait or pdfium calls),
//! so each attempt runs on tokio's blocking pool, bounded by
//! `tokio::time::timeout`. An external mechanism that hangs is treated as
//! `Failed` once the deadline passes instead of stalling the conversion
//! forever. The abandoned blocking task cannot be interrupted; strategies
//! that spawn child processes enforce their own kill-on-deadline internally
//! so the common hang case does not leak a process.

use crate::error::{FlipbookError, StrategyAttempt};
use crate::pipeline::strategy::{ExtractionResult, PageRasterizer, StrategyOutcome};
use crate::progress::ProgressCallback;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Tries strategies in a fixed, caller-configured priority order.
pub struct StrategyChain {
    strategies: Vec<Arc<dyn PageRasterizer>>,
    /// Upper bound per strategy attempt. `None` = unbounded.
    attempt_timeout: Option<Duration>,
    progress: Option<ProgressCallback>,
}

impl StrategyChain {
    /// Build a chain from an ordered strategy list.
    ///
    /// `attempt_timeout_secs = 0` disables the per-attempt bound.
    pub fn new(strategies: Vec<Arc<dyn PageRasterizer>>, attempt_timeout_secs: u64) -> Self {
        Self {
            strategies,
            attempt_timeout: (attempt_timeout_secs > 0)
                .then(|| Duration::from_secs(attempt_timeout_secs)),
            progress: None,
        }
    }

    /// Attach a progress event sink.
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Number of registered strategies.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Run strategies in order until one succeeds.
    ///
    /// Returns the first success untouched, along with the winning strategy's
    /// name. Fails only when every registered strategy has been attempted,
    /// aggregating each attempt's reason.
    pub async fn extract(
        &self,
        source: &Path,
        dpi: u32,
    ) -> Result<(ExtractionResult, String), FlipbookError> {
        if self.strategies.is_empty() {
            return Err(FlipbookError::InvalidConfig(
                "no rasterization strategies registered".into(),
            ));
        }

        let mut attempts: Vec<StrategyAttempt> = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            let name = strategy.name().to_string();
            debug!("Trying strategy '{}'", name);
            if let Some(ref cb) = self.progress {
                cb.on_strategy_start(&name);
            }

            match self.attempt(Arc::clone(strategy), source, dpi).await {
                StrategyOutcome::Success(result) => {
                    info!(
                        "Strategy '{}' extracted {} pages",
                        name,
                        result.page_count()
                    );
                    if let Some(ref cb) = self.progress {
                        cb.on_pages_extracted(&name, result.page_count());
                    }
                    return Ok((result, name));
                }
                StrategyOutcome::Unavailable(reason) => {
                    warn!("Strategy '{}' unavailable: {}", name, reason);
                    if let Some(ref cb) = self.progress {
                        cb.on_strategy_failed(&name, &reason);
                    }
                    attempts.push(StrategyAttempt {
                        strategy: name,
                        reason: format!("unavailable: {reason}"),
                    });
                }
                StrategyOutcome::Failed(reason) => {
                    warn!("Strategy '{}' failed: {}", name, reason);
                    if let Some(ref cb) = self.progress {
                        cb.on_strategy_failed(&name, &reason);
                    }
                    attempts.push(StrategyAttempt {
                        strategy: name,
                        reason,
                    });
                }
            }
        }

        Err(FlipbookError::AllStrategiesExhausted { attempts })
    }

    /// Run one attempt on the blocking pool, bounded by the attempt timeout.
    async fn attempt(
        &self,
        strategy: Arc<dyn PageRasterizer>,
        source: &Path,
        dpi: u32,
    ) -> StrategyOutcome {
        let path = source.to_path_buf();
        let task = tokio::task::spawn_blocking(move || strategy.extract(&path, dpi));

        let joined = match self.attempt_timeout {
            Some(limit) => match tokio::time::timeout(limit, task).await {
                Ok(joined) => joined,
                Err(_) => {
                    return StrategyOutcome::Failed(format!(
                        "timed out after {}s",
                        limit.as_secs()
                    ))
                }
            },
            None => task.await,
        };

        match joined {
            Ok(outcome) => outcome,
            Err(e) => StrategyOutcome::Failed(format!("strategy panicked: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::strategy::ExtractedPage;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted strategy that records how often it was invoked.
    struct Scripted {
        name: &'static str,
        calls: AtomicUsize,
        outcome: fn() -> StrategyOutcome,
    }

    impl Scripted {
        fn new(name: &'static str, outcome: fn() -> StrategyOutcome) -> Arc<Self> {
            Arc::new(Self {
                name,
                calls: AtomicUsize::new(0),
                outcome,
            })
        }
    }

    impl PageRasterizer for Scripted {
        fn name(&self) -> &str {
            self.name
        }

        fn extract(&self, _source: &Path, _dpi: u32) -> StrategyOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.outcome)()
        }
    }

    fn three_pages() -> StrategyOutcome {
        let pages = (1..=3)
            .map(|i| ExtractedPage::new(i, vec![0xFF, 0xD8, i as u8]))
            .collect();
        StrategyOutcome::Success(ExtractionResult::new(pages).unwrap())
    }

    #[tokio::test]
    async fn first_success_short_circuits() {
        let first = Scripted::new("first", three_pages);
        let second = Scripted::new("second", || StrategyOutcome::Failed("unused".into()));
        let chain = StrategyChain::new(
            vec![first.clone() as Arc<dyn PageRasterizer>, second.clone() as _],
            0,
        );

        let (result, winner) = chain.extract(Path::new("in.pdf"), 150).await.unwrap();
        assert_eq!(winner, "first");
        assert_eq!(result.page_count(), 3);
        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.calls.load(Ordering::SeqCst), 0, "no wasted work");
    }

    #[tokio::test]
    async fn unavailable_falls_through_to_next() {
        let first = Scripted::new("tool", || {
            StrategyOutcome::Unavailable("not installed".into())
        });
        let second = Scripted::new("library", three_pages);
        let chain = StrategyChain::new(vec![first as _, second.clone() as _], 0);

        let (result, winner) = chain.extract(Path::new("in.pdf"), 150).await.unwrap();
        assert_eq!(winner, "library");
        assert_eq!(result.page_count(), 3);
        assert_eq!(second.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhaustion_aggregates_all_reasons() {
        let first = Scripted::new("tool", || {
            StrategyOutcome::Unavailable("not installed".into())
        });
        let second = Scripted::new("library", || {
            StrategyOutcome::Failed("corrupt document".into())
        });
        let chain = StrategyChain::new(vec![first as _, second as _], 0);

        let err = chain.extract(Path::new("in.pdf"), 150).await.unwrap_err();
        match err {
            FlipbookError::AllStrategiesExhausted { attempts } => {
                assert_eq!(attempts.len(), 2);
                assert_eq!(attempts[0].strategy, "tool");
                assert!(attempts[0].reason.contains("not installed"));
                assert_eq!(attempts[1].strategy, "library");
                assert!(attempts[1].reason.contains("corrupt"));
            }
            other => panic!("expected AllStrategiesExhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn each_strategy_attempted_exactly_once() {
        let first = Scripted::new("a", || StrategyOutcome::Failed("boom".into()));
        let second = Scripted::new("b", || StrategyOutcome::Failed("boom".into()));
        let chain = StrategyChain::new(vec![first.clone() as _, second.clone() as _], 0);

        let _ = chain.extract(Path::new("in.pdf"), 150).await;
        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.calls.load(Ordering::SeqCst), 1);
    }

    /// A strategy that sleeps past the chain deadline.
    struct Sleeper;

    impl PageRasterizer for Sleeper {
        fn name(&self) -> &str {
            "sleeper"
        }

        fn extract(&self, _source: &Path, _dpi: u32) -> StrategyOutcome {
            std::thread::sleep(Duration::from_secs(2));
            three_pages()
        }
    }

    #[tokio::test]
    async fn hung_strategy_times_out_and_falls_back() {
        let rescue = Scripted::new("rescue", three_pages);
        let chain = StrategyChain::new(vec![Arc::new(Sleeper) as _, rescue as _], 1);

        let start = std::time::Instant::now();
        let (result, winner) = chain.extract(Path::new("in.pdf"), 150).await.unwrap();
        assert_eq!(winner, "rescue");
        assert_eq!(result.page_count(), 3);
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn empty_chain_is_a_config_error() {
        let chain = StrategyChain::new(vec![], 0);
        let err = chain.extract(Path::new("in.pdf"), 150).await.unwrap_err();
        assert!(matches!(err, FlipbookError::InvalidConfig(_)));
    }
}
