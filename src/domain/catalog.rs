use crate::models::Product;

/// Category value that lets every product through.
pub const ALL_CATEGORIES: &str = "All";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    /// Missing, blank, and `"All"` all mean no category restriction.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some(ALL_CATEGORIES) => CategoryFilter::All,
            Some(name) => CategoryFilter::Named(name.to_string()),
        }
    }

    pub fn matches(&self, category_name: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Named(name) => name == category_name,
        }
    }
}

/// Products whose name contains `query` (ignoring case) and whose category
/// passes `category`, in catalog order.
///
/// The iterator is lazy and `Clone`, so callers can walk it more than once.
pub fn filter<'a>(
    products: &'a [Product],
    query: &str,
    category: &'a CategoryFilter,
) -> impl Iterator<Item = &'a Product> + Clone + 'a {
    let needle = query.to_lowercase();
    products
        .iter()
        .filter(move |p| p.name.to_lowercase().contains(&needle) && category.matches(&p.category_name))
}
