use crate::StatsMap;

/// Key of the status that counts as "not yet scraped".
pub const PENDING_STATUS: &str = "pending";

#[derive(Debug, Clone, PartialEq)]
pub struct StatusSummary {
    pub status: String,
    pub status_count: u64,
    /// Source-provided share, not recomputed.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub category: String,
    pub statuses: Vec<StatusSummary>,
    pub total_count: u64,
    pub pending_count: u64,
    pub non_pending_count: u64,
    /// Share of non-pending items in percent, 0 for an empty category.
    pub total_progress: f64,
}

/// Summarizes every category and orders them by total count, largest first.
///
/// Ties keep their document order.
pub fn aggregate(stats: &StatsMap) -> Vec<CategorySummary> {
    let mut summaries: Vec<CategorySummary> = stats
        .categories()
        .iter()
        .map(|category| {
            let total_count: u64 = category
                .statuses
                .iter()
                .map(|(_, count)| count.status_count)
                .fold(0, u64::saturating_add);
            let pending_count = category
                .statuses
                .iter()
                .find(|(status, _)| status == PENDING_STATUS)
                .map_or(0, |(_, count)| count.status_count);
            let non_pending_count = total_count.saturating_sub(pending_count);
            let total_progress = if total_count > 0 {
                non_pending_count as f64 / total_count as f64 * 100.0
            } else {
                0.0
            };

            CategorySummary {
                category: category.category.clone(),
                statuses: category
                    .statuses
                    .iter()
                    .map(|(status, count)| StatusSummary {
                        status: status.clone(),
                        status_count: count.status_count,
                        percentage: count.percentage,
                    })
                    .collect(),
                total_count,
                pending_count,
                non_pending_count,
                total_progress,
            }
        })
        .collect();

    // `sort_by` is stable.
    summaries.sort_by(|a, b| b.total_count.cmp(&a.total_count));
    summaries
}

/// Human label for a status key; unknown keys are shown as-is.
pub fn status_label(status: &str) -> &str {
    match status {
        "scraping_done" => "Scraping Done",
        "pending" => "Pending",
        "no_result" => "No Result",
        "invalid_search_results" => "Invalid Search Results",
        "category_not_match" => "Category Not Match",
        "processing" => "Processing",
        "error" => "Error",
        other => other,
    }
}
