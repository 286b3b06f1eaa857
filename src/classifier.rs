//! Column shape and semantic role detection.
//!
//! Shape comes from values: a column is [`ColumnKind::Numeric`] iff at
//! least one row holds a number for it. Role comes from the header text
//! alone, by case-insensitive substring match against keyword families.
//!
//! | Role | Keywords |
//! |------|----------|
//! | [`Sales`](ColumnRole::Sales) | sales, revenue, amount |
//! | [`Profit`](ColumnRole::Profit) | profit |
//! | [`Product`](ColumnRole::Product) | product, item, name |
//! | [`Region`](ColumnRole::Region) | region, state, city, zone, area |
//! | [`Date`](ColumnRole::Date) | date, time, month, year |
//! | [`Category`](ColumnRole::Category) | category |
//!
//! Families are tried in table order and the first match wins, so a
//! header holds at most one role. Matching is plain containment:
//! `"Salesperson"` is a sales column and `"Rename"` is a product column.
//!
//! The downstream rules do not all look for "the sales column" with the
//! same keywords. [`RoleColumns`] resolves each lookup separately, taking
//! the first header in source order that matches its keyword set.

use crate::dataset::Dataset;
use serde::Serialize;

const SALES_KEYWORDS: &[&str] = &["sales", "revenue", "amount"];
const SALES_OR_REVENUE_KEYWORDS: &[&str] = &["sales", "revenue"];
const SALES_EXACT_KEYWORDS: &[&str] = &["sales"];
const PROFIT_KEYWORDS: &[&str] = &["profit"];
const PRODUCT_KEYWORDS: &[&str] = &["product", "item", "name"];
const PRODUCT_OR_ITEM_KEYWORDS: &[&str] = &["product", "item"];
const GROUPING_KEYWORDS: &[&str] = &["product", "item", "category", "name"];
const REGION_KEYWORDS: &[&str] = &["region", "state", "city", "zone", "area"];
const DATE_KEYWORDS: &[&str] = &["date", "time", "month", "year"];
const CATEGORY_KEYWORDS: &[&str] = &["category"];

// ── Kind and role ─────────────────────────────────────────────────────

/// Value shape of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// At least one row holds a number.
    Numeric,
    /// No row holds a number.
    Categorical,
}

/// Semantic role inferred from a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnRole {
    Sales,
    Profit,
    Product,
    Region,
    Date,
    /// Generic grouping key.
    Category,
}

impl ColumnRole {
    /// All roles in match priority order.
    pub const ALL: [ColumnRole; 6] = [
        Self::Sales,
        Self::Profit,
        Self::Product,
        Self::Region,
        Self::Date,
        Self::Category,
    ];

    /// Header keywords that select this role.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Sales => SALES_KEYWORDS,
            Self::Profit => PROFIT_KEYWORDS,
            Self::Product => PRODUCT_KEYWORDS,
            Self::Region => REGION_KEYWORDS,
            Self::Date => DATE_KEYWORDS,
            Self::Category => CATEGORY_KEYWORDS,
        }
    }
}

impl std::fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sales => write!(f, "sales"),
            Self::Profit => write!(f, "profit"),
            Self::Product => write!(f, "product"),
            Self::Region => write!(f, "region"),
            Self::Date => write!(f, "date"),
            Self::Category => write!(f, "category"),
        }
    }
}

/// Returns `true` if the lower-cased header contains any keyword.
pub fn header_matches(header: &str, keywords: &[&str]) -> bool {
    let lower = header.to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}

/// Detects the role of a single header, first family in priority order.
///
/// ```
/// use tabular_insight::classifier::{detect_role, ColumnRole};
///
/// assert_eq!(detect_role("Total Revenue"), Some(ColumnRole::Sales));
/// assert_eq!(detect_role("Sales Region"), Some(ColumnRole::Sales));
/// assert_eq!(detect_role("Order Month"), Some(ColumnRole::Date));
/// assert_eq!(detect_role("Quantity"), None);
/// ```
pub fn detect_role(header: &str) -> Option<ColumnRole> {
    ColumnRole::ALL
        .into_iter()
        .find(|role| header_matches(header, role.keywords()))
}

/// Returns the first header (in source order) matching any keyword.
pub fn find_column<'a>(headers: &'a [String], keywords: &[&str]) -> Option<&'a str> {
    headers
        .iter()
        .find(|h| header_matches(h, keywords))
        .map(String::as_str)
}

// ── Column profile ────────────────────────────────────────────────────

/// Classification result for one header.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnProfile {
    /// Header text.
    pub name: String,
    /// Value shape.
    pub kind: ColumnKind,
    /// Semantic role, if any keyword family matched.
    pub role: Option<ColumnRole>,
}

impl ColumnProfile {
    /// Returns `true` for numeric columns.
    pub fn is_numeric(&self) -> bool {
        self.kind == ColumnKind::Numeric
    }
}

/// Classifies every header of the dataset, in header order.
///
/// ```
/// use tabular_insight::classifier::{classify_columns, ColumnKind, ColumnRole};
/// use tabular_insight::dataset::{Cell, Dataset};
///
/// let ds = Dataset::from_table(
///     &["Product", "Sales"],
///     vec![vec![Cell::from("A"), Cell::from(10.0)]],
/// )
/// .unwrap();
/// let cols = classify_columns(&ds);
/// assert_eq!(cols[0].kind, ColumnKind::Categorical);
/// assert_eq!(cols[1].role, Some(ColumnRole::Sales));
/// assert!(cols[1].is_numeric());
/// ```
pub fn classify_columns(ds: &Dataset) -> Vec<ColumnProfile> {
    ds.headers()
        .iter()
        .map(|name| ColumnProfile {
            name: name.clone(),
            kind: if ds.has_numeric(name) {
                ColumnKind::Numeric
            } else {
                ColumnKind::Categorical
            },
            role: detect_role(name),
        })
        .collect()
}

/// Names of the numeric columns, in header order.
pub fn numeric_columns(profiles: &[ColumnProfile]) -> Vec<&str> {
    profiles
        .iter()
        .filter(|p| p.is_numeric())
        .map(|p| p.name.as_str())
        .collect()
}

/// Names of the non-numeric columns, in header order.
pub fn categorical_columns(profiles: &[ColumnProfile]) -> Vec<&str> {
    profiles
        .iter()
        .filter(|p| !p.is_numeric())
        .map(|p| p.name.as_str())
        .collect()
}

// ── Resolved lookups ──────────────────────────────────────────────────

/// Header resolved for each role lookup used by the downstream rules.
///
/// | Field | Keywords | Consumers |
/// |-------|----------|-----------|
/// | `sales` | sales, revenue, amount | KPIs, aggregations, performers |
/// | `sales_or_revenue` | sales, revenue | trend, top performer, margin |
/// | `sales_exact` | sales | low-performer alert |
/// | `profit` | profit | KPIs, chart, margin |
/// | `product` | product, item, name | KPIs, performers |
/// | `product_or_item` | product, item | top performer |
/// | `grouping` | product, item, category, name | chart aggregation |
/// | `region` | region, state, city, zone, area | region aggregation |
/// | `date` | date, time, month, year | time-series aggregation |
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleColumns {
    pub sales: Option<String>,
    pub sales_or_revenue: Option<String>,
    pub sales_exact: Option<String>,
    pub profit: Option<String>,
    pub product: Option<String>,
    pub product_or_item: Option<String>,
    pub grouping: Option<String>,
    pub region: Option<String>,
    pub date: Option<String>,
}

impl RoleColumns {
    /// Resolves every lookup against the headers.
    ///
    /// ```
    /// use tabular_insight::classifier::RoleColumns;
    ///
    /// let headers: Vec<String> = ["Item Name", "Amount", "Profit"]
    ///     .iter().map(|s| s.to_string()).collect();
    /// let roles = RoleColumns::detect(&headers);
    /// assert_eq!(roles.sales.as_deref(), Some("Amount"));
    /// assert_eq!(roles.sales_or_revenue, None);
    /// assert_eq!(roles.product.as_deref(), Some("Item Name"));
    /// ```
    pub fn detect(headers: &[String]) -> Self {
        let find = |keywords: &[&str]| find_column(headers, keywords).map(str::to_string);
        Self {
            sales: find(SALES_KEYWORDS),
            sales_or_revenue: find(SALES_OR_REVENUE_KEYWORDS),
            sales_exact: find(SALES_EXACT_KEYWORDS),
            profit: find(PROFIT_KEYWORDS),
            product: find(PRODUCT_KEYWORDS),
            product_or_item: find(PRODUCT_OR_ITEM_KEYWORDS),
            grouping: find(GROUPING_KEYWORDS),
            region: find(REGION_KEYWORDS),
            date: find(DATE_KEYWORDS),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Cell;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn role_keywords_case_insensitive() {
        assert_eq!(detect_role("SALES"), Some(ColumnRole::Sales));
        assert_eq!(detect_role("net_profit"), Some(ColumnRole::Profit));
        assert_eq!(detect_role("ItemCode"), Some(ColumnRole::Product));
        assert_eq!(detect_role("Customer Name"), Some(ColumnRole::Product));
        assert_eq!(detect_role("Ship City"), Some(ColumnRole::Region));
        assert_eq!(detect_role("Timestamp"), Some(ColumnRole::Date));
        assert_eq!(detect_role("Category"), Some(ColumnRole::Category));
        assert_eq!(detect_role("Qty"), None);
    }

    #[test]
    fn one_role_per_header_in_priority_order() {
        // sales beats region, product beats category, profit beats date
        assert_eq!(detect_role("Sales Area"), Some(ColumnRole::Sales));
        assert_eq!(detect_role("Product Category"), Some(ColumnRole::Product));
        assert_eq!(detect_role("Profit Year"), Some(ColumnRole::Profit));
    }

    #[test]
    fn substring_matching_is_not_word_aware() {
        assert_eq!(detect_role("Salesperson"), Some(ColumnRole::Sales));
        assert_eq!(detect_role("Rename"), Some(ColumnRole::Product));
        assert_eq!(detect_role("Estate"), Some(ColumnRole::Region));
    }

    #[test]
    fn classify_mixed_column_is_numeric() {
        let ds = Dataset::from_table(
            &["Region", "Sales"],
            vec![
                vec!["East".into(), "n/a".into()],
                vec!["West".into(), 12.0.into()],
            ],
        )
        .unwrap();
        let cols = classify_columns(&ds);
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[0].kind, ColumnKind::Categorical);
        assert_eq!(cols[0].role, Some(ColumnRole::Region));
        assert_eq!(cols[1].kind, ColumnKind::Numeric);
        assert_eq!(numeric_columns(&cols), vec!["Sales"]);
        assert_eq!(categorical_columns(&cols), vec!["Region"]);
    }

    #[test]
    fn classify_numeric_text_is_categorical() {
        let ds = Dataset::from_table(&["Code"], vec![vec![Cell::from("42")]]).unwrap();
        assert_eq!(classify_columns(&ds)[0].kind, ColumnKind::Categorical);
    }

    #[test]
    fn classify_without_rows() {
        let ds = Dataset::new(headers(&["Sales"])).unwrap();
        let cols = classify_columns(&ds);
        assert_eq!(cols[0].kind, ColumnKind::Categorical);
        assert_eq!(cols[0].role, Some(ColumnRole::Sales));
    }

    #[test]
    fn find_first_header_wins() {
        let h = headers(&["Revenue", "Sales"]);
        assert_eq!(find_column(&h, SALES_KEYWORDS), Some("Revenue"));
        assert_eq!(find_column(&h, SALES_EXACT_KEYWORDS), Some("Sales"));
        assert_eq!(find_column(&h, PROFIT_KEYWORDS), None);
    }

    #[test]
    fn lookups_use_their_own_keyword_sets() {
        let roles = RoleColumns::detect(&headers(&[
            "Customer Name",
            "Category",
            "Product",
            "Amount",
            "Revenue",
            "Order Date",
            "State",
        ]));
        assert_eq!(roles.sales.as_deref(), Some("Amount"));
        assert_eq!(roles.sales_or_revenue.as_deref(), Some("Revenue"));
        assert_eq!(roles.sales_exact, None);
        assert_eq!(roles.product.as_deref(), Some("Customer Name"));
        assert_eq!(roles.product_or_item.as_deref(), Some("Product"));
        assert_eq!(roles.grouping.as_deref(), Some("Customer Name"));
        assert_eq!(roles.region.as_deref(), Some("State"));
        assert_eq!(roles.date.as_deref(), Some("Order Date"));
        assert_eq!(roles.profit, None);
    }

    #[test]
    fn no_headers_no_roles() {
        assert_eq!(RoleColumns::detect(&[]), RoleColumns::default());
    }
}
