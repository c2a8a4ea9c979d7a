/// Fixed page size; matches the backend's default `limit`.
pub const PAGE_SIZE: u32 = 50;

/// Raw text of the filter fields as the user left them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterInputs {
    pub role: String,
    pub location: String,
    pub salary_min: String,
    pub source: String,
}

/// Canonical request descriptor for `GET /api/jobs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub page: u32,
    pub limit: u32,
    pub role: Option<String>,
    pub location: Option<String>,
    pub salary_min: Option<u64>,
    pub source: Option<String>,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: PAGE_SIZE,
            role: None,
            location: None,
            salary_min: None,
            source: None,
        }
    }
}

impl ListingQuery {
    /// Query-string pairs. Absent filters produce no entry at all.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("limit", self.limit.to_string())];
        if let Some(role) = &self.role {
            pairs.push(("role", role.clone()));
        }
        if let Some(location) = &self.location {
            pairs.push(("location", location.clone()));
        }
        if let Some(salary_min) = self.salary_min {
            pairs.push(("salary_min", salary_min.to_string()));
        }
        if let Some(source) = &self.source {
            pairs.push(("source", source.clone()));
        }
        pairs
    }
}

/// Builds the listing query for the given filters and page.
pub fn build_query(filters: &FilterInputs, page: u32) -> ListingQuery {
    ListingQuery {
        page: page.max(1),
        limit: PAGE_SIZE,
        role: non_empty(&filters.role),
        location: non_empty(&filters.location),
        salary_min: positive_number(&filters.salary_min),
        source: non_empty(&filters.source),
    }
}

/// Last reachable page for a result set; never below 1.
pub fn max_page(total: u64, limit: u32) -> u32 {
    let limit = u64::from(limit.max(1));
    let pages = total.div_ceil(limit).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn positive_number(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|value| *value > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_page_is_floored_at_one() {
        assert_eq!(max_page(0, 50), 1);
        assert_eq!(max_page(1, 50), 1);
        assert_eq!(max_page(50, 50), 1);
        assert_eq!(max_page(51, 50), 2);
        assert_eq!(max_page(10, 0), 10);
    }

    #[test]
    fn zero_and_garbage_salary_are_dropped() {
        for raw in ["0", "abc", "-5", " "] {
            let filters = FilterInputs {
                salary_min: raw.to_string(),
                ..FilterInputs::default()
            };
            assert_eq!(build_query(&filters, 1).salary_min, None, "input {raw:?}");
        }
    }

    #[test]
    fn page_zero_becomes_first_page() {
        assert_eq!(build_query(&FilterInputs::default(), 0).page, 1);
    }
}
