use std::collections::HashSet;

use procura_cache::MultiSourceLoader;
use procura_core::{Partition, Status};
use serde::Serialize;

/// Per-status request counters for the dashboard tiles.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub pending: u64,
    pub approved: u64,
    pub done: u64,
    pub rejected: u64,
}

/// Aggregation outcome; `failed_partitions` flags degraded totals.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub stats: DashboardStats,
    pub failed_partitions: Vec<String>,
}

/// Count requests per status across the main sheet and both archives.
///
/// Main-sheet records are deduplicated by ID and only counted when their
/// status is one of the four tiles; partial completions have no tile.
/// Archive partitions contribute one count per record bearing an ID. A
/// partition that fails to load is skipped and reported, so the dashboard
/// can render what it has.
pub async fn collect_stats(loader: &MultiSourceLoader) -> StatsReport {
    let partitions = [Partition::main(), Partition::done(), Partition::rejected()];
    let mut results = loader.load(&partitions).await;

    let mut stats = DashboardStats::default();
    let mut failed = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    match results.remove(&Partition::main()) {
        Some(Ok(records)) => {
            for record in records.iter() {
                let Some(id) = record.id() else { continue };
                if seen.contains(id) {
                    continue;
                }
                let counter = match record.status() {
                    Some(Status::Pending) => &mut stats.pending,
                    Some(Status::Approved) => &mut stats.approved,
                    Some(Status::Done) => &mut stats.done,
                    Some(Status::Rejected) => &mut stats.rejected,
                    _ => continue,
                };
                *counter += 1;
                seen.insert(id.to_owned());
            }
        },
        Some(Err(e)) => {
            tracing::warn!(error = %e, "main partition unavailable for stats");
            failed.push(Partition::main().to_string());
        },
        None => {},
    }

    for (partition, counter) in
        [(Partition::done(), &mut stats.done), (Partition::rejected(), &mut stats.rejected)]
    {
        match results.remove(&partition) {
            Some(Ok(records)) => {
                *counter += records.iter().filter(|r| r.id().is_some()).count() as u64;
            },
            Some(Err(e)) => {
                tracing::warn!(partition = %partition, error = %e, "partition unavailable for stats");
                failed.push(partition.to_string());
            },
            None => {},
        }
    }

    StatsReport { stats, failed_partitions: failed }
}
