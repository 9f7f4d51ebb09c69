//! Maps "N seconds before the head block" to a block height.

use async_trait::async_trait;
use futures::future::try_join_all;

use crate::{config::HistoryStrategy, errors::CustomError, models::block::BlockPoint};

pub const ONE_DAY_SECS: u64 = 24 * 60 * 60;
pub const ONE_WEEK_SECS: u64 = 7 * ONE_DAY_SECS;

/// Read access to block headers.
#[async_trait]
pub trait BlockSource: Send + Sync {
    /// Head block, number and timestamp read from a single header.
    async fn latest_block(&self) -> Result<BlockPoint, CustomError>;

    async fn block_at(&self, number: u64) -> Result<BlockPoint, CustomError>;
}

#[derive(Clone, Copy, Debug)]
pub struct BlockTargeter {
    strategy: HistoryStrategy,
    nominal_block_time_secs: u64,
}

impl BlockTargeter {
    pub fn new(strategy: HistoryStrategy, nominal_block_time_secs: u64) -> Self {
        Self {
            strategy,
            nominal_block_time_secs: nominal_block_time_secs.max(1),
        }
    }

    /// For each offset, the height of the block approximately `offset` seconds
    /// older than `head`. Results never exceed `head.number` and clamp at genesis.
    pub async fn resolve<S>(
        &self,
        source: &S,
        head: BlockPoint,
        offsets_secs: &[u64],
    ) -> Result<Vec<u64>, CustomError>
    where
        S: BlockSource + ?Sized,
    {
        let targets = match self.strategy {
            HistoryStrategy::Estimate { sample_span } => {
                let secs_per_block = self.average_block_time(source, head, sample_span).await?;
                offsets_secs
                    .iter()
                    .map(|offset| {
                        let blocks_back = (*offset as f64 / secs_per_block).round() as u64;
                        head.number.saturating_sub(blocks_back)
                    })
                    .collect()
            }
            HistoryStrategy::Search => {
                try_join_all(
                    offsets_secs
                        .iter()
                        .map(|offset| search_block_before(source, head, *offset)),
                )
                .await?
            }
        };

        log::debug!(
            "Resolved block targets {:?} for offsets {:?} from head {}",
            targets,
            offsets_secs,
            head.number
        );
        Ok(targets)
    }

    async fn average_block_time<S>(
        &self,
        source: &S,
        head: BlockPoint,
        sample_span: u64,
    ) -> Result<f64, CustomError>
    where
        S: BlockSource + ?Sized,
    {
        let span = sample_span.min(head.number);
        if span == 0 {
            return Ok(self.nominal_block_time_secs as f64);
        }

        let sample = source.block_at(head.number - span).await?;
        let elapsed = head.timestamp.saturating_sub(sample.timestamp);
        if elapsed == 0 {
            return Ok(self.nominal_block_time_secs as f64);
        }

        Ok(elapsed as f64 / span as f64)
    }
}

/// Highest block whose timestamp is at or before `head.timestamp - offset_secs`.
async fn search_block_before<S>(
    source: &S,
    head: BlockPoint,
    offset_secs: u64,
) -> Result<u64, CustomError>
where
    S: BlockSource + ?Sized,
{
    let target = head.timestamp.saturating_sub(offset_secs);
    if offset_secs == 0 || head.number == 0 {
        return Ok(head.number);
    }

    if source.block_at(0).await?.timestamp > target {
        return Ok(0);
    }

    // invariant: timestamp(lo) <= target
    let (mut lo, mut hi) = (0u64, head.number);
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        if source.block_at(mid).await?.timestamp <= target {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }

    Ok(lo)
}
