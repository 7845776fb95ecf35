use trendscout_common::types::SearchOutcome;

/// Merge successful search outcomes into one labeled corpus for scoring.
///
/// Errored outcomes are skipped. Returns an empty string when nothing
/// survived; the orchestrator treats that as "nothing to score".
pub fn combine(outcomes: &[SearchOutcome]) -> String {
    let mut combined = String::new();

    for outcome in outcomes {
        if !outcome.succeeded() {
            continue;
        }
        combined.push_str(&format!(
            "\n\n--- Source: {} (Query: {}) ---\n",
            outcome.platform, outcome.query
        ));
        combined.push_str(&outcome.content);
        if !outcome.citations.is_empty() {
            combined.push_str("\nURLs: ");
            combined.push_str(&outcome.citations.join(", "));
        }
    }

    if combined.trim().is_empty() {
        return String::new();
    }
    combined
}
