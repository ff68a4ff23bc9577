//! Read-only job, internship and company catalogue with in-memory filtering.

use std::time::Duration;

use tracing::debug;

use crate::models::listing::{Company, JobListing, JobType};

pub mod data;
pub mod handlers;

pub const DEFAULT_FEATURED_JOBS: usize = 3;
pub const DEFAULT_FEATURED_INTERNSHIPS: usize = 2;
pub const DEFAULT_FEATURED_COMPANIES: usize = 4;

/// Listing filters. Each absent dimension matches everything; present ones combine with AND.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    pub keywords: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
}

impl ListingFilter {
    pub fn new(
        keywords: Option<String>,
        location: Option<String>,
        job_type: Option<JobType>,
    ) -> Self {
        Self {
            keywords: keywords.filter(|k| !k.is_empty()).map(|k| k.to_lowercase()),
            location: location.filter(|l| !l.is_empty()).map(|l| l.to_lowercase()),
            job_type,
        }
    }

    pub fn matches(&self, listing: &JobListing) -> bool {
        let keyword_match = self.keywords.as_deref().map_or(true, |kw| {
            listing.title.to_lowercase().contains(kw)
                || listing.company.to_lowercase().contains(kw)
                || listing.description.to_lowercase().contains(kw)
                || listing
                    .skills
                    .iter()
                    .any(|skill| skill.to_lowercase().contains(kw))
        });
        let location_match = self
            .location
            .as_deref()
            .map_or(true, |loc| listing.location.to_lowercase().contains(loc));
        let type_match = self.job_type.map_or(true, |t| listing.job_type == t);

        keyword_match && location_match && type_match
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingScope {
    /// Everything except internships.
    Jobs,
    Internships,
    All,
}

impl ListingScope {
    fn includes(self, listing: &JobListing) -> bool {
        match self {
            ListingScope::Jobs => listing.job_type != JobType::Internship,
            ListingScope::Internships => listing.job_type == JobType::Internship,
            ListingScope::All => true,
        }
    }
}

pub struct ListingStore {
    listings: Vec<JobListing>,
    companies: Vec<Company>,
    /// Simulated network latency applied to every query.
    latency: Duration,
}

impl ListingStore {
    pub fn new(listings: Vec<JobListing>, latency: Duration) -> Self {
        let companies = data::COMPANIES
            .iter()
            .map(|(id, name, logo_url)| Company {
                id: id.to_string(),
                name: name.to_string(),
                logo_url: logo_url.to_string(),
                active_listings: listings.iter().filter(|l| l.company == *name).count(),
            })
            .collect();
        Self {
            listings,
            companies,
            latency,
        }
    }

    pub fn with_mock_data(latency: Duration) -> Self {
        Self::new(data::mock_listings(), latency)
    }

    /// Matching listings in catalogue order.
    pub async fn search(&self, scope: ListingScope, filter: &ListingFilter) -> Vec<JobListing> {
        self.simulate_latency().await;
        let results: Vec<JobListing> = self
            .listings
            .iter()
            .filter(|l| scope.includes(l) && filter.matches(l))
            .cloned()
            .collect();
        debug!(?scope, ?filter, count = results.len(), "Listing search");
        results
    }

    /// The first `limit` listings of the scope, unfiltered.
    pub async fn featured(&self, scope: ListingScope, limit: usize) -> Vec<JobListing> {
        self.simulate_latency().await;
        self.listings
            .iter()
            .filter(|l| scope.includes(l))
            .take(limit)
            .cloned()
            .collect()
    }

    pub async fn featured_companies(&self, limit: usize) -> Vec<Company> {
        self.simulate_latency().await;
        self.companies.iter().take(limit).cloned().collect()
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}
