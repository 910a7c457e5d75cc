//! Medication search query builder.
//!
//! Builds PostgreSQL queries with `$N` parameter placeholders. Every value
//! that reaches the database, whether it came from the request or from a
//! previous result set, travels as a bound parameter; the SQL text only ever
//! contains fixed table and column names.

use crate::types::FilterDimension;

use super::MedicationQuery;
use super::reconcile::{OptionRequest, Restriction};

/// A SQL fragment with associated parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFragment {
    /// The SQL string with $N placeholders.
    pub sql: String,
    /// The parameter values.
    pub params: Vec<SqlParam>,
}

/// A SQL parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// Text parameter.
    Text(String),
    /// Integer parameter (INT4).
    Integer(i32),
    /// Single precision parameter (REAL), the type of `similarity()`.
    Real(f32),
    /// Integer array parameter, used with `= ANY($N)`.
    IntegerArray(Vec<i32>),
    /// Text array parameter, used with `= ANY($N)`.
    TextArray(Vec<String>),
}

impl SqlParam {
    /// Creates a text parameter.
    pub fn text(s: &str) -> Self {
        SqlParam::Text(s.to_string())
    }
}

impl SqlFragment {
    /// Creates a new fragment with no parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Creates a fragment with parameters.
    pub fn with_params(sql: impl Into<String>, params: Vec<SqlParam>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Appends a parameter and returns its `$N` placeholder.
    fn bind(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        format!("${}", self.params.len())
    }
}

/// Columns of the phase-one projection, in order.
pub const BASE_COLUMNS: &str = "m.med_name, m.dosage, mf.manu_name, pf.form_name, ai.ain_name, c.cond_name, \
     m.condition_id, m.manu_id, pf.form_id, m.ain_id";

/// Joins from the product table to its reference tables. All are left joins:
/// a product without a manufacturer, condition or form is still a result.
pub const CATALOG_JOINS: &str = "FROM medicaments m \
     LEFT JOIN manufacturer mf ON m.manu_id = mf.manu_id \
     LEFT JOIN subforms sf ON m.subform_id = sf.subform_id \
     LEFT JOIN pharmaceutic_form pf ON sf.form_id = pf.form_id \
     LEFT JOIN active_ingredient ai ON m.ain_id = ai.ain_id \
     LEFT JOIN conditions c ON m.condition_id = c.cond_id";

/// PostgreSQL medication query builder.
pub struct MedicationQueryBuilder;

impl MedicationQueryBuilder {
    /// Builds the phase-one search query.
    ///
    /// With a search term, the projection gains `name_similarity` and
    /// `ingredient_similarity` and rows must exceed the threshold on either.
    pub fn build_search_query(query: &MedicationQuery) -> SqlFragment {
        let filters = &query.filters;
        let mut fragment = SqlFragment::new(String::new());
        let mut conditions = Vec::new();
        let mut projection = BASE_COLUMNS.to_string();

        if let Some(term) = filters.search_term() {
            let term = fragment.bind(SqlParam::text(term));
            let threshold = fragment.bind(SqlParam::Real(query.similarity_threshold.value()));
            projection.push_str(&format!(
                ", similarity(m.med_name, {term}) AS name_similarity, \
                 similarity(ai.ain_name, {term}) AS ingredient_similarity"
            ));
            conditions.push(format!(
                "(similarity(m.med_name, {term}) > {threshold} OR similarity(ai.ain_name, {term}) > {threshold})"
            ));
        }

        if let Some(id) = filters.condition {
            let p = fragment.bind(SqlParam::Integer(id));
            conditions.push(format!("m.condition_id = {p}"));
        }

        if let Some(id) = filters.manufacturer {
            let p = fragment.bind(SqlParam::Integer(id));
            conditions.push(format!("m.manu_id = {p}"));
        }

        if let Some(ref dosage) = filters.dosage {
            let p = fragment.bind(SqlParam::text(dosage));
            conditions.push(format!("m.dosage = {p}"));
        }

        if let Some(id) = filters.form {
            let p = fragment.bind(SqlParam::Integer(id));
            conditions.push(format!("pf.form_id = {p}"));
        }

        if let Some(id) = filters.active_ingredient {
            let p = fragment.bind(SqlParam::Integer(id));
            conditions.push(format!("m.ain_id = {p}"));
        }

        let mut sql = format!("SELECT {projection} {CATALOG_JOINS}");
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY m.med_name, m.dosage");

        fragment.sql = sql;
        fragment
    }

    /// Builds the phase-two lookup for one dimension.
    ///
    /// Id-keyed dimensions select `(id, name)` from their reference table;
    /// dosage selects distinct non-empty dosages from the product table.
    pub fn build_option_query(request: &OptionRequest) -> SqlFragment {
        let (select, key_column, order) = match request.dimension {
            FilterDimension::Condition => (
                "SELECT cond_id, cond_name FROM conditions",
                "cond_id",
                "cond_name, cond_id",
            ),
            FilterDimension::Manufacturer => (
                "SELECT manu_id, manu_name FROM manufacturer",
                "manu_id",
                "manu_name, manu_id",
            ),
            FilterDimension::Dosage => (
                "SELECT DISTINCT dosage FROM medicaments",
                "dosage",
                "dosage",
            ),
            FilterDimension::Form => (
                "SELECT form_id, form_name FROM pharmaceutic_form",
                "form_id",
                "form_name, form_id",
            ),
            FilterDimension::ActiveIngredient => (
                "SELECT ain_id, ain_name FROM active_ingredient",
                "ain_id",
                "ain_name, ain_id",
            ),
        };

        let mut fragment = SqlFragment::new(String::new());
        let mut conditions = Vec::new();

        if request.dimension == FilterDimension::Dosage {
            conditions.push("dosage IS NOT NULL AND dosage <> ''".to_string());
        }

        match &request.restriction {
            Restriction::Unrestricted => {}
            Restriction::Ids(ids) => {
                let p = fragment.bind(SqlParam::IntegerArray(ids.clone()));
                conditions.push(format!("{key_column} = ANY({p})"));
            }
            Restriction::Values(values) => {
                let p = fragment.bind(SqlParam::TextArray(values.clone()));
                conditions.push(format!("{key_column} = ANY({p})"));
            }
        }

        let mut sql = select.to_string();
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(&format!(" ORDER BY {order}"));

        fragment.sql = sql;
        fragment
    }

    /// Builds the query listing products of one active ingredient.
    pub fn build_ingredient_products_query(ingredient_name: &str) -> SqlFragment {
        SqlFragment::with_params(
            "SELECT m.med_name, m.dosage FROM medicaments m \
             JOIN active_ingredient ai ON m.ain_id = ai.ain_id \
             WHERE ai.ain_name = $1 ORDER BY m.med_name, m.dosage",
            vec![SqlParam::text(ingredient_name)],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SimilarityThreshold;
    use crate::types::{RawSearchParams, SearchFilters};

    fn query(filters: SearchFilters) -> MedicationQuery {
        MedicationQuery::new(filters)
    }

    #[test]
    fn test_no_filters_has_no_where_clause() {
        let fragment = MedicationQueryBuilder::build_search_query(&query(SearchFilters::new()));
        assert!(!fragment.sql.contains("WHERE"));
        assert!(!fragment.sql.contains("similarity"));
        assert!(fragment.params.is_empty());
        assert!(fragment.sql.ends_with("ORDER BY m.med_name, m.dosage"));
    }

    #[test]
    fn test_projection_always_includes_ids() {
        let fragment = MedicationQueryBuilder::build_search_query(&query(SearchFilters::new()));
        for column in ["m.condition_id", "m.manu_id", "pf.form_id", "m.ain_id"] {
            assert!(fragment.sql.contains(column), "missing {column}");
        }
    }

    #[test]
    fn test_all_joins_are_left_joins() {
        let fragment = MedicationQueryBuilder::build_search_query(&query(SearchFilters::new()));
        assert_eq!(fragment.sql.matches("LEFT JOIN").count(), 5);
        assert_eq!(fragment.sql.matches(" JOIN ").count(), 5);
    }

    #[test]
    fn test_search_term_adds_similarity() {
        let fragment = MedicationQueryBuilder::build_search_query(&query(
            SearchFilters::new().with_search("aspirin"),
        ));
        assert!(
            fragment
                .sql
                .contains("similarity(m.med_name, $1) AS name_similarity")
        );
        assert!(
            fragment
                .sql
                .contains("similarity(ai.ain_name, $1) AS ingredient_similarity")
        );
        assert!(fragment.sql.contains(
            "WHERE (similarity(m.med_name, $1) > $2 OR similarity(ai.ain_name, $1) > $2)"
        ));
        assert_eq!(
            fragment.params,
            vec![SqlParam::text("aspirin"), SqlParam::Real(0.3)]
        );
    }

    #[test]
    fn test_custom_threshold_is_bound() {
        let q = MedicationQuery::new(SearchFilters::new().with_search("x"))
            .with_threshold(SimilarityThreshold::new(0.5).unwrap());
        let fragment = MedicationQueryBuilder::build_search_query(&q);
        assert_eq!(fragment.params[1], SqlParam::Real(0.5));
    }

    #[test]
    fn test_filters_are_bound_in_order() {
        let filters = SearchFilters::new()
            .with_condition(5)
            .with_manufacturer(3)
            .with_dosage("500 mg")
            .with_form(2)
            .with_active_ingredient(9);
        let fragment = MedicationQueryBuilder::build_search_query(&query(filters));

        assert!(fragment.sql.contains(
            "WHERE m.condition_id = $1 AND m.manu_id = $2 AND m.dosage = $3 AND pf.form_id = $4 AND m.ain_id = $5"
        ));
        assert_eq!(
            fragment.params,
            vec![
                SqlParam::Integer(5),
                SqlParam::Integer(3),
                SqlParam::text("500 mg"),
                SqlParam::Integer(2),
                SqlParam::Integer(9),
            ]
        );
    }

    #[test]
    fn test_condition_only_with_empty_manufacturer() {
        let filters = SearchFilters::parse(&RawSearchParams {
            condition: Some("5".to_string()),
            manufacturer: Some(String::new()),
            ..Default::default()
        })
        .unwrap();
        let fragment = MedicationQueryBuilder::build_search_query(&query(filters));
        assert!(fragment.sql.contains("WHERE m.condition_id = $1 ORDER BY"));
        assert!(!fragment.sql.contains("m.manu_id = $"));
        assert_eq!(fragment.params, vec![SqlParam::Integer(5)]);
    }

    #[test]
    fn test_empty_and_absent_produce_identical_queries() {
        let absent = SearchFilters::parse(&RawSearchParams {
            search: Some("aspirin".to_string()),
            ..Default::default()
        })
        .unwrap();
        let empty = SearchFilters::parse(&RawSearchParams {
            search: Some("aspirin".to_string()),
            condition: Some(String::new()),
            manufacturer: Some(String::new()),
            dosage: Some(String::new()),
            form: Some(String::new()),
            active_ingredient: Some(String::new()),
        })
        .unwrap();
        assert_eq!(
            MedicationQueryBuilder::build_search_query(&query(absent)),
            MedicationQueryBuilder::build_search_query(&query(empty))
        );
    }

    #[test]
    fn test_user_input_never_reaches_sql_text() {
        let filters = SearchFilters::new()
            .with_search("'; DROP TABLE users; --")
            .with_dosage("1' OR '1'='1");
        let fragment = MedicationQueryBuilder::build_search_query(&query(filters));
        assert!(!fragment.sql.contains("DROP TABLE"));
        assert!(!fragment.sql.contains("'1'='1"));
    }

    #[test]
    fn test_unrestricted_option_query() {
        let fragment = MedicationQueryBuilder::build_option_query(&OptionRequest {
            dimension: FilterDimension::Manufacturer,
            restriction: Restriction::Unrestricted,
        });
        assert_eq!(
            fragment.sql,
            "SELECT manu_id, manu_name FROM manufacturer ORDER BY manu_name, manu_id"
        );
        assert!(fragment.params.is_empty());
    }

    #[test]
    fn test_restricted_option_query_binds_array() {
        let fragment = MedicationQueryBuilder::build_option_query(&OptionRequest {
            dimension: FilterDimension::Condition,
            restriction: Restriction::Ids(vec![1, 5]),
        });
        assert_eq!(
            fragment.sql,
            "SELECT cond_id, cond_name FROM conditions WHERE cond_id = ANY($1) ORDER BY cond_name, cond_id"
        );
        assert_eq!(fragment.params, vec![SqlParam::IntegerArray(vec![1, 5])]);
    }

    #[test]
    fn test_dosage_option_query() {
        let fragment = MedicationQueryBuilder::build_option_query(&OptionRequest {
            dimension: FilterDimension::Dosage,
            restriction: Restriction::Values(vec!["10 mg".to_string(), "5 mg".to_string()]),
        });
        assert_eq!(
            fragment.sql,
            "SELECT DISTINCT dosage FROM medicaments WHERE dosage IS NOT NULL AND dosage <> '' AND dosage = ANY($1) ORDER BY dosage"
        );
        assert_eq!(
            fragment.params,
            vec![SqlParam::TextArray(vec![
                "10 mg".to_string(),
                "5 mg".to_string()
            ])]
        );
    }

    #[test]
    fn test_ingredient_products_query() {
        let fragment = MedicationQueryBuilder::build_ingredient_products_query("fentanyl");
        assert!(fragment.sql.contains("WHERE ai.ain_name = $1"));
        assert_eq!(fragment.params, vec![SqlParam::text("fentanyl")]);
    }
}
