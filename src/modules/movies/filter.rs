//! Listing query construction.
//!
//! One construction step turns the typed filter parameters into join
//! clauses, a conjunctive predicate list with positional bind parameters,
//! an ORDER BY restricted to an allow-list, and the page window. The paged
//! data query and the total-count query are derived from the same
//! [`MovieQuery`], so they can never disagree on which rows match.
//!
//! User input only ever reaches the database through bind parameters; the
//! SQL text itself is assembled exclusively from fixed fragments and the
//! allow-listed sort column.

use super::model::MovieFilterParams;

/// Sort columns permitted in the ORDER BY clause. Anything else silently
/// falls back to `id`.
const ALLOWED_SORT_COLUMNS: &[&str] = &["title", "rating", "release_year", "created_at", "id"];

const DEFAULT_SORT_COLUMN: &str = "id";

/// A value bound into the query at a positional placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
    Float(f64),
}

#[derive(Debug)]
pub struct MovieQuery {
    joins: String,
    conditions: String,
    params: Vec<SqlParam>,
    order_by: String,
    limit: i64,
    offset: i64,
    page: i64,
}

impl MovieQuery {
    pub fn from_filters(filters: &MovieFilterParams) -> Self {
        let mut joins = String::new();
        let mut conditions = String::from(" WHERE 1=1");
        let mut params: Vec<SqlParam> = Vec::new();

        if let Some(genre) = &filters.genre {
            joins.push_str(" INNER JOIN movie_genres mg ON mg.movie_id = m.id");
            joins.push_str(" INNER JOIN genres g ON g.id = mg.genre_id");
            params.push(SqlParam::Text(genre.clone()));
            let name_idx = params.len();
            params.push(SqlParam::Text(genre.clone()));
            conditions.push_str(&format!(
                " AND (g.name = ${} OR g.slug = ${})",
                name_idx,
                params.len()
            ));
        }

        if let Some(search) = &filters.search {
            let pattern = format!("%{}%", search);
            params.push(SqlParam::Text(pattern.clone()));
            let title_idx = params.len();
            params.push(SqlParam::Text(pattern));
            conditions.push_str(&format!(
                " AND (m.title ILIKE ${} OR m.description ILIKE ${})",
                title_idx,
                params.len()
            ));
        }

        if let Some(year) = filters.year {
            params.push(SqlParam::Int(year as i64));
            conditions.push_str(&format!(" AND m.release_year = ${}", params.len()));
        }

        if let Some(rating_min) = filters.rating_min {
            params.push(SqlParam::Float(rating_min));
            conditions.push_str(&format!(" AND m.rating >= ${}", params.len()));
        }

        if let Some(rating_max) = filters.rating_max {
            params.push(SqlParam::Float(rating_max));
            conditions.push_str(&format!(" AND m.rating <= ${}", params.len()));
        }

        if let Some(language) = &filters.language {
            params.push(SqlParam::Text(language.clone()));
            conditions.push_str(&format!(" AND m.language = ${}", params.len()));
        }

        let sort_column = match filters.sort.as_deref() {
            Some(column) if ALLOWED_SORT_COLUMNS.contains(&column) => column,
            _ => DEFAULT_SORT_COLUMN,
        };

        let sort_order = match filters.order.as_deref() {
            Some(order) if order.eq_ignore_ascii_case("ASC") => "ASC",
            _ => "DESC",
        };

        // Secondary id sort keeps equal-keyed rows in a stable order, so
        // consecutive pages stay disjoint.
        let order_by = if sort_column == "id" {
            format!(" ORDER BY m.id {}", sort_order)
        } else {
            format!(" ORDER BY m.{} {}, m.id DESC", sort_column, sort_order)
        };

        let limit = filters.pagination.limit();
        let page = filters.pagination.page();
        let offset = filters.pagination.offset();

        Self {
            joins,
            conditions,
            params,
            order_by,
            limit,
            offset,
            page,
        }
    }

    /// The paged data query. DISTINCT guards against row duplication from
    /// the genre join.
    pub fn data_sql(&self) -> String {
        format!(
            "SELECT DISTINCT m.* FROM movies m{}{}{} LIMIT {} OFFSET {}",
            self.joins, self.conditions, self.order_by, self.limit, self.offset
        )
    }

    /// The count query: identical joins, predicates, and bind values as
    /// [`data_sql`](Self::data_sql), with the window and projection swapped
    /// for a distinct id count.
    pub fn count_sql(&self) -> String {
        format!(
            "SELECT COUNT(DISTINCT m.id) FROM movies m{}{}",
            self.joins, self.conditions
        )
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn page(&self) -> i64 {
        self.page
    }
}
