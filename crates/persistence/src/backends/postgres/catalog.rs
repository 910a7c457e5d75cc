//! Catalog queries against PostgreSQL.

use async_trait::async_trait;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

use super::PostgresBackend;
use super::backend::{BACKEND_NAME, pg_error};
use crate::core::{CatalogStore, ReferenceLookup};
use crate::error::{BackendError, StorageError, StorageResult};
use crate::search::{MedicationQuery, MedicationQueryBuilder, OptionRequest, SqlFragment, SqlParam};
use crate::types::{FilterDimension, FilterOption, MedicationRow, MedicationSummary};

type BoxedParam = Box<dyn ToSql + Sync + Send>;

fn bind_params(params: &[SqlParam]) -> Vec<BoxedParam> {
    params
        .iter()
        .map(|param| -> BoxedParam {
            match param {
                SqlParam::Text(s) => Box::new(s.clone()),
                SqlParam::Integer(i) => Box::new(*i),
                SqlParam::Real(f) => Box::new(*f),
                SqlParam::IntegerArray(ids) => Box::new(ids.clone()),
                SqlParam::TextArray(values) => Box::new(values.clone()),
            }
        })
        .collect()
}

fn decode_error(column: &str, error: tokio_postgres::Error) -> StorageError {
    StorageError::Backend(BackendError::SerializationError {
        message: format!("Failed to decode column {}: {}", column, error),
    })
}

fn decode_medication(row: &Row, with_similarity: bool) -> StorageResult<MedicationRow> {
    macro_rules! col {
        ($name:literal) => {
            row.try_get($name).map_err(|e| decode_error($name, e))?
        };
    }

    let mut medication = MedicationRow {
        med_name: col!("med_name"),
        dosage: col!("dosage"),
        manufacturer_name: col!("manu_name"),
        form_name: col!("form_name"),
        ingredient_name: col!("ain_name"),
        condition_name: col!("cond_name"),
        condition_id: col!("condition_id"),
        manufacturer_id: col!("manu_id"),
        form_id: col!("form_id"),
        ingredient_id: col!("ain_id"),
        name_similarity: None,
        ingredient_similarity: None,
    };

    if with_similarity {
        medication.name_similarity = col!("name_similarity");
        medication.ingredient_similarity = col!("ingredient_similarity");
    }

    Ok(medication)
}

impl PostgresBackend {
    async fn query_fragment(&self, fragment: &SqlFragment, context: &str) -> StorageResult<Vec<Row>> {
        let client = self.get_client().await?;

        let params = bind_params(&fragment.params);
        let param_refs: Vec<&(dyn ToSql + Sync)> = params
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect();

        tracing::debug!(sql = %fragment.sql, params = fragment.params.len(), "Executing query");

        client
            .query(fragment.sql.as_str(), &param_refs)
            .await
            .map_err(|e| pg_error(context, e))
    }
}

#[async_trait]
impl ReferenceLookup for PostgresBackend {
    async fn lookup_options(&self, request: &OptionRequest) -> StorageResult<Vec<FilterOption>> {
        let fragment = MedicationQueryBuilder::build_option_query(request);
        let rows = self
            .query_fragment(&fragment, "Failed to load filter options")
            .await?;

        rows.iter()
            .map(|row| {
                if request.dimension == FilterDimension::Dosage {
                    let dosage: String = row.try_get(0).map_err(|e| decode_error("dosage", e))?;
                    Ok(FilterOption::from_value(dosage))
                } else {
                    let id: i32 = row.try_get(0).map_err(|e| decode_error("id", e))?;
                    let name: Option<String> =
                        row.try_get(1).map_err(|e| decode_error("name", e))?;
                    Ok(FilterOption::from_reference(id, name))
                }
            })
            .collect()
    }
}

#[async_trait]
impl CatalogStore for PostgresBackend {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn find_medications(&self, query: &MedicationQuery) -> StorageResult<Vec<MedicationRow>> {
        let fragment = MedicationQueryBuilder::build_search_query(query);
        let rows = self
            .query_fragment(&fragment, "Failed to execute medication search")
            .await?;

        let with_similarity = query.filters.search_term().is_some();
        rows.iter()
            .map(|row| decode_medication(row, with_similarity))
            .collect()
    }

    async fn medications_by_ingredient(
        &self,
        ingredient_name: &str,
    ) -> StorageResult<Vec<MedicationSummary>> {
        let fragment = MedicationQueryBuilder::build_ingredient_products_query(ingredient_name);
        let rows = self
            .query_fragment(&fragment, "Failed to list ingredient products")
            .await?;

        rows.iter()
            .map(|row| {
                Ok(MedicationSummary {
                    med_name: row.try_get(0).map_err(|e| decode_error("med_name", e))?,
                    dosage: row.try_get(1).map_err(|e| decode_error("dosage", e))?,
                })
            })
            .collect()
    }

    async fn health_check(&self) -> StorageResult<()> {
        let client = self.get_client().await?;
        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| pg_error("Health check failed", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_params_preserves_order() {
        let params = bind_params(&[
            SqlParam::text("aspirin"),
            SqlParam::Real(0.3),
            SqlParam::Integer(5),
            SqlParam::IntegerArray(vec![1, 2]),
            SqlParam::TextArray(vec!["5 mg".to_string()]),
        ]);
        assert_eq!(params.len(), 5);
    }
}
