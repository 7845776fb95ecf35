use trendscout_common::types::{Platform, SearchQuery};

/// System instruction for every search call: steer the answer service toward
/// specific, actionable trends rather than evergreen advice.
pub const SEARCH_SYSTEM_PROMPT: &str = "You are a trend research assistant. \
Find trending topics, discussions, and pain points relevant to B2B founders, \
coaches, and consultants. Focus on actionable, specific trends, not generic advice.";

/// Pre-built ICP-relevant search angles. Callers can pass their own query set
/// to the pipeline instead; this is the default, not a hardwired global.
pub fn default_queries() -> Vec<SearchQuery> {
    vec![
        SearchQuery::new(
            "What are B2B founders, coaches, and consultants discussing on Reddit this week? \
             Pain points, wins, and hot debates",
            Platform::Reddit,
        ),
        SearchQuery::new(
            "Trending LinkedIn discussions among founders, coaches, and consultants about \
             scaling, personal branding, and client acquisition",
            Platform::Linkedin,
        ),
        SearchQuery::new(
            "Hot takes on AI for business, AI automation for coaches and consultants on \
             social media this week",
            Platform::Twitter,
        ),
        SearchQuery::new(
            "Top pain points and challenges entrepreneurs and consultants are sharing on \
             Reddit right now",
            Platform::Reddit,
        ),
        SearchQuery::new(
            "Content marketing and personal branding trends for B2B service providers and \
             coaches in 2025-2026",
            Platform::Web,
        ),
    ]
}
