//! Scholarship catalog.
//!
//! Listings are fetched once and then searched, filtered, sorted and
//! paginated locally.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};

use scholarly_client::ScholarlyClient;
use scholarly_types::{
    Id, NewScholarship, Review, Role, Scholarship, ScholarshipPatch, average_rating,
};

use crate::cache::{QueryCache, keys};
use crate::error::{DomainError, Result, RuleViolation};
use crate::identity::Actor;
use crate::services::fetch;

/// How many scholarships the landing page features.
pub const TOP_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    TotalFee,
    Deadline,
    PostDate,
    WorldRank,
}

impl std::str::FromStr for SortKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "fee" | "totalfee" => Ok(SortKey::TotalFee),
            "deadline" => Ok(SortKey::Deadline),
            "posted" | "postdate" => Ok(SortKey::PostDate),
            "rank" | "worldrank" => Ok(SortKey::WorldRank),
            other => Err(DomainError::InvalidInput(format!("unknown sort key: {}", other))),
        }
    }
}

/// Search, filter, sort and page over the catalog.
#[derive(Debug, Clone, Default)]
pub struct ScholarshipQuery {
    /// Matches scholarship name, university or degree, ignoring case.
    pub search: Option<String>,
    pub category: Option<String>,
    pub subject: Option<String>,
    pub country: Option<String>,
    pub sort: Option<SortKey>,
    pub descending: bool,
    /// 1-based.
    pub page: usize,
}

fn eq_ignore_case(filter: &Option<String>, value: &str) -> bool {
    filter
        .as_deref()
        .map(|f| f.trim().eq_ignore_ascii_case(value.trim()))
        .unwrap_or(true)
}

impl ScholarshipQuery {
    pub fn matches(&self, scholarship: &Scholarship) -> bool {
        let search_hit = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                [
                    &scholarship.scholarship_name,
                    &scholarship.university_name,
                    &scholarship.degree,
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
            }
        };

        search_hit
            && eq_ignore_case(&self.category, &scholarship.scholarship_category)
            && eq_ignore_case(&self.subject, &scholarship.subject_category)
            && eq_ignore_case(&self.country, &scholarship.university_country)
    }

    /// Filter and sort, then cut out the requested page.
    pub fn run(&self, scholarships: Vec<Scholarship>, page_size: usize) -> Page<Scholarship> {
        let mut hits: Vec<Scholarship> =
            scholarships.into_iter().filter(|s| self.matches(s)).collect();

        if let Some(key) = self.sort {
            hits.sort_by(|a, b| compare(key, a, b, self.descending));
        }

        Page::slice(hits, self.page.max(1), page_size)
    }
}

/// Missing values sort last in either direction.
fn compare_opt<T: Ord>(a: Option<T>, b: Option<T>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare(key: SortKey, a: &Scholarship, b: &Scholarship, descending: bool) -> Ordering {
    match key {
        SortKey::TotalFee => compare_opt(Some(a.total_fee()), Some(b.total_fee()), descending),
        SortKey::Deadline => {
            compare_opt(a.application_deadline, b.application_deadline, descending)
        }
        SortKey::PostDate => compare_opt(a.post_date, b.post_date, descending),
        SortKey::WorldRank => {
            compare_opt(a.university_world_rank, b.university_world_rank, descending)
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    fn slice(items: Vec<T>, page: usize, page_size: usize) -> Self {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let total_items = items.len();
        let total_pages = total_items.div_ceil(page_size).max(1);
        let items = items
            .into_iter()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .collect();
        Self {
            items,
            page,
            total_pages,
            total_items,
        }
    }
}

/// Lowest total fee first; equal fees show the most recently posted first.
pub fn top_scholarships(mut scholarships: Vec<Scholarship>, count: usize) -> Vec<Scholarship> {
    scholarships.sort_by(|a, b| {
        a.total_fee()
            .cmp(&b.total_fee())
            .then_with(|| compare_opt(a.post_date, b.post_date, true))
    });
    scholarships.truncate(count);
    scholarships
}

/// A scholarship with what reviewers said about it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScholarshipDetail {
    pub scholarship: Scholarship,
    pub reviews: Vec<Review>,
    pub average_rating: Option<f64>,
}

/// Catalog browsing and listing management.
pub struct CatalogService {
    client: ScholarlyClient,
    cache: Arc<QueryCache>,
    page_size: usize,
}

impl CatalogService {
    pub(crate) fn new(client: ScholarlyClient, cache: Arc<QueryCache>, page_size: usize) -> Self {
        Self {
            client,
            cache,
            page_size,
        }
    }

    pub async fn browse(&self, query: &ScholarshipQuery) -> Result<Page<Scholarship>> {
        let all = fetch::scholarships(&self.client, &self.cache).await?;
        Ok(query.run(all, self.page_size))
    }

    pub async fn top(&self) -> Result<Vec<Scholarship>> {
        let all = fetch::scholarships(&self.client, &self.cache).await?;
        Ok(top_scholarships(all, TOP_COUNT))
    }

    pub async fn detail(&self, id: &str) -> Result<ScholarshipDetail> {
        let listings = self.client.scholarships();
        let feedback = self.client.reviews();
        let (scholarship, reviews) =
            tokio::try_join!(listings.get(id), feedback.for_scholarship(id))?;
        let average_rating = average_rating(&reviews);
        Ok(ScholarshipDetail {
            scholarship,
            reviews,
            average_rating,
        })
    }

    #[instrument(skip(self, actor, scholarship), fields(by = %actor.email()))]
    pub async fn publish(&self, actor: &Actor, mut scholarship: NewScholarship) -> Result<Id> {
        actor.require(Role::Moderator)?;
        let missing: Vec<&'static str> = [
            ("scholarship name", &scholarship.scholarship_name),
            ("university name", &scholarship.university_name),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| label)
        .collect();
        if !missing.is_empty() {
            return Err(DomainError::Validation { missing });
        }
        scholarship.posted_by.get_or_insert_with(|| actor.email().to_string());
        scholarship.post_date.get_or_insert_with(scholarly_types::now);

        let inserted = self.client.scholarships().create(&scholarship).await?;
        self.cache.invalidate(keys::SCHOLARSHIPS);
        info!(scholarship = %inserted.inserted_id, "scholarship published");
        Ok(inserted.inserted_id)
    }

    pub async fn update(&self, actor: &Actor, id: &str, patch: &ScholarshipPatch) -> Result<()> {
        actor.require(Role::Moderator)?;
        if patch.is_empty() {
            return Ok(());
        }
        let ack = self.client.scholarships().update(id, patch).await?;
        if !ack.matched() {
            return Err(DomainError::NotFound(format!("scholarship {}", id)));
        }
        self.cache.invalidate(keys::SCHOLARSHIPS);
        Ok(())
    }

    pub async fn delete(&self, actor: &Actor, id: &str, confirmed: bool) -> Result<()> {
        actor.require(Role::Moderator)?;
        if !confirmed {
            return Err(RuleViolation::NotConfirmed.into());
        }
        self.client.scholarships().delete(id).await?;
        self.cache.invalidate(keys::SCHOLARSHIPS);
        info!(scholarship = id, by = %actor.email(), "scholarship deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn listing(id: &str, fee: u32, posted: &str, rank: Option<u32>) -> Scholarship {
        serde_json::from_value(json!({
            "_id": id,
            "scholarshipName": format!("Scholarship {id}"),
            "universityName": if id == "b" { "Harvard" } else { "Oxford" },
            "universityCountry": if id == "b" { "USA" } else { "UK" },
            "subjectCategory": "Engineering",
            "scholarshipCategory": if id == "c" { "Partial" } else { "Full fund" },
            "degree": "Masters",
            "applicationFees": fee,
            "serviceCharge": 0,
            "postDate": posted,
            "universityWorldRank": rank,
        }))
        .unwrap()
    }

    fn catalog() -> Vec<Scholarship> {
        vec![
            listing("a", 30, "2026-01-01T00:00:00Z", Some(5)),
            listing("b", 10, "2026-02-01T00:00:00Z", None),
            listing("c", 10, "2026-03-01T00:00:00Z", Some(1)),
            listing("d", 50, "2026-04-01T00:00:00Z", Some(9)),
        ]
    }

    fn ids(items: &[Scholarship]) -> Vec<&str> {
        items.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_top_prefers_low_fee_then_recent() {
        let top = top_scholarships(catalog(), 3);
        assert_eq!(ids(&top), ["c", "b", "a"]);
    }

    #[test]
    fn test_search_and_filters() {
        let query = ScholarshipQuery {
            search: Some("harv".into()),
            ..Default::default()
        };
        assert_eq!(ids(&query.run(catalog(), 10).items), ["b"]);

        let query = ScholarshipQuery {
            country: Some("uk".into()),
            category: Some("Full fund".into()),
            ..Default::default()
        };
        assert_eq!(ids(&query.run(catalog(), 10).items), ["a", "d"]);
    }

    #[test]
    fn test_sort_missing_rank_goes_last() {
        let query = ScholarshipQuery {
            sort: Some(SortKey::WorldRank),
            ..Default::default()
        };
        assert_eq!(ids(&query.run(catalog(), 10).items), ["c", "a", "d", "b"]);

        let query = ScholarshipQuery {
            sort: Some(SortKey::TotalFee),
            descending: true,
            ..Default::default()
        };
        assert_eq!(query.run(catalog(), 10).items[0].id, "d");
    }

    #[test]
    fn test_pagination() {
        let query = ScholarshipQuery {
            page: 2,
            ..Default::default()
        };
        let page = query.run(catalog(), 3);
        assert_eq!(ids(&page.items), ["d"]);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.total_items, 4);

        let empty = ScholarshipQuery::default().run(Vec::new(), 9);
        assert_eq!(empty.total_pages, 1);
        assert_eq!(empty.page, 1);
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let query = ScholarshipQuery {
            page: usize::MAX,
            ..Default::default()
        };
        let page = query.run(catalog(), 9);
        assert!(page.items.is_empty());
        assert_eq!(page.page, usize::MAX);
        assert_eq!(page.total_items, 4);

        let page = query.run(Vec::new(), 9);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_parse_sort_key() {
        assert_eq!("fee".parse::<SortKey>().unwrap(), SortKey::TotalFee);
        assert_eq!("world-rank".parse::<SortKey>().unwrap(), SortKey::WorldRank);
        assert!("price".parse::<SortKey>().is_err());
    }
}
