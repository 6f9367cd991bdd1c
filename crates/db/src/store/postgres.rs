//! PostgreSQL catalog store.
//!
//! SQL is assembled with [`sqlx::QueryBuilder`]. Identifiers (table and column
//! names) only ever come from an entity's static catalog; every user-supplied
//! value is bound as a parameter.

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use stainmanager_core::audit::AuditStamp;
use stainmanager_core::pagination::Page;
use stainmanager_core::query::{FilterOperator, FilterSpec, FilterValue, ListQuery, SortSpec};
use stainmanager_core::types::DbId;

use crate::entity::CatalogEntity;
use crate::models::ImageLocations;
use crate::store::CatalogStore;

/// Catalog store backed by one PostgreSQL table per entity.
pub struct PgCatalogStore<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> PgCatalogStore<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }
}

impl<E> Clone for PgCatalogStore<E> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

#[async_trait]
impl<E: CatalogEntity> CatalogStore<E> for PgCatalogStore<E> {
    async fn list(&self, is_active: bool) -> Result<Vec<E>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM {} WHERE is_active = $1 ORDER BY LOWER(name) COLLATE \"C\", id",
            E::COLUMNS,
            E::TABLE
        );
        sqlx::query_as::<_, E>(&query)
            .bind(is_active)
            .fetch_all(&self.pool)
            .await
    }

    async fn query(&self, query: &ListQuery) -> Result<Page<E>, sqlx::Error> {
        let mut count = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {}", E::TABLE));
        push_conditions(&mut count, query);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM {}", E::COLUMNS, E::TABLE));
        push_conditions(&mut select, query);
        push_order(&mut select, query.sort.as_ref());
        select
            .push(" LIMIT ")
            .push_bind(query.page.page_size())
            .push(" OFFSET ")
            .push_bind(query.page.offset());
        let items = select.build_query_as::<E>().fetch_all(&self.pool).await?;

        Ok(Page::new(items, query.page, total))
    }

    async fn find_by_id(
        &self,
        id: DbId,
        include_inactive: bool,
    ) -> Result<Option<E>, sqlx::Error> {
        let mut query = format!("SELECT {} FROM {} WHERE id = $1", E::COLUMNS, E::TABLE);
        if !include_inactive {
            query.push_str(" AND is_active = TRUE");
        }
        sqlx::query_as::<_, E>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn insert(&self, input: &E::Create, stamp: &AuditStamp) -> Result<E, sqlx::Error> {
        let columns = E::insert_columns(input);

        let mut builder = QueryBuilder::<Postgres>::new(format!("INSERT INTO {} (", E::TABLE));
        let mut names = builder.separated(", ");
        for (column, _) in &columns {
            names.push(*column);
        }
        names
            .push("created_by")
            .push("created_date_time")
            .push("updated_by")
            .push("updated_date_time");

        builder.push(") VALUES (");
        let mut values = builder.separated(", ");
        for (_, value) in columns {
            values.push_bind(value);
        }
        values
            .push_bind(stamp.actor.clone())
            .push_bind(stamp.at)
            .push_bind(stamp.actor.clone())
            .push_bind(stamp.at);
        builder.push(format!(") RETURNING {}", E::COLUMNS));

        builder.build_query_as::<E>().fetch_one(&self.pool).await
    }

    async fn update(
        &self,
        id: DbId,
        input: &E::Update,
        stamp: &AuditStamp,
    ) -> Result<Option<E>, sqlx::Error> {
        self.update_active_row(id, E::update_columns(input), stamp)
            .await
    }

    async fn update_image_locations(
        &self,
        id: DbId,
        images: &ImageLocations,
        stamp: &AuditStamp,
    ) -> Result<Option<E>, sqlx::Error> {
        self.update_active_row(id, images.columns(), stamp).await
    }

    async fn set_active(
        &self,
        id: DbId,
        active: bool,
        stamp: &AuditStamp,
    ) -> Result<Option<bool>, sqlx::Error> {
        let table = E::TABLE;
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "WITH target AS (SELECT id, is_active AS was_active FROM {table} WHERE id = "
        ));
        builder.push_bind(id);
        if !active {
            builder.push(" AND is_active = TRUE");
        }
        builder
            .push(format!(" FOR UPDATE) UPDATE {table} SET is_active = "))
            .push_bind(active)
            .push(", updated_by = ")
            .push_bind(stamp.actor.clone())
            .push(", updated_date_time = ")
            .push_bind(stamp.at)
            .push(format!(
                " FROM target WHERE {table}.id = target.id RETURNING target.was_active"
            ));

        let was_active: Option<bool> = builder
            .build_query_scalar::<bool>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(was_active.map(|was| was != active))
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }
}

impl<E: CatalogEntity> PgCatalogStore<E> {
    /// `UPDATE ... SET <columns>, <audit> WHERE id = $n AND is_active = TRUE`.
    async fn update_active_row(
        &self,
        id: DbId,
        columns: Vec<(&'static str, Option<String>)>,
        stamp: &AuditStamp,
    ) -> Result<Option<E>, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("UPDATE {} SET ", E::TABLE));
        let mut assignments = builder.separated(", ");
        for (column, value) in columns {
            assignments.push(format!("{column} = "));
            assignments.push_bind_unseparated(value);
        }
        assignments.push("updated_by = ");
        assignments.push_bind_unseparated(stamp.actor.clone());
        assignments.push("updated_date_time = ");
        assignments.push_bind_unseparated(stamp.at);

        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" AND is_active = TRUE")
            .push(format!(" RETURNING {}", E::COLUMNS));

        builder
            .build_query_as::<E>()
            .fetch_optional(&self.pool)
            .await
    }
}

// ---------------------------------------------------------------------------
// Query composition
// ---------------------------------------------------------------------------

fn push_conditions(builder: &mut QueryBuilder<'_, Postgres>, query: &ListQuery) {
    builder.push(" WHERE is_active = ").push_bind(query.is_active);

    if let Some(search) = &query.search {
        builder
            .push(" AND LOWER(name) LIKE LOWER(")
            .push_bind(format!("%{}%", escape_like(search)))
            .push(") ESCAPE '\\'");
    }

    for filter in &query.filters {
        builder.push(" AND ");
        push_filter(builder, filter);
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &FilterSpec) {
    let column = filter.field.name;
    match &filter.value {
        FilterValue::Text(value) => {
            let pattern = match filter.operator {
                FilterOperator::Contains => Some(format!("%{}%", escape_like(value))),
                FilterOperator::StartsWith => Some(format!("{}%", escape_like(value))),
                FilterOperator::EndsWith => Some(format!("%{}", escape_like(value))),
                _ => None,
            };
            match pattern {
                Some(pattern) => {
                    builder
                        .push(format!("LOWER({column}) LIKE LOWER("))
                        .push_bind(pattern)
                        .push(") ESCAPE '\\'");
                }
                None => {
                    builder
                        .push(format!("{column} {} ", comparison(filter.operator)))
                        .push_bind(value.clone());
                }
            }
        }
        FilterValue::Integer(value) => {
            builder
                .push(format!("{column} {} ", comparison(filter.operator)))
                .push_bind(*value);
        }
        FilterValue::Boolean(value) => {
            builder
                .push(format!("{column} {} ", comparison(filter.operator)))
                .push_bind(*value);
        }
        FilterValue::Timestamp(value) => {
            builder
                .push(format!("{column} {} ", comparison(filter.operator)))
                .push_bind(*value);
        }
    }
}

fn comparison(operator: FilterOperator) -> &'static str {
    match operator {
        FilterOperator::NotEq => "<>",
        FilterOperator::Gt => ">",
        FilterOperator::Gte => ">=",
        FilterOperator::Lt => "<",
        FilterOperator::Lte => "<=",
        _ => "=",
    }
}

fn push_order(builder: &mut QueryBuilder<'_, Postgres>, sort: Option<&SortSpec>) {
    let Some(sort) = sort else {
        builder.push(" ORDER BY LOWER(name) COLLATE \"C\", id");
        return;
    };
    let column = sort.field.name;
    let direction = sort.direction.as_sql();
    if sort.field.kind.is_text() {
        builder.push(format!(" ORDER BY LOWER({column}) COLLATE \"C\""));
    } else {
        builder.push(format!(" ORDER BY {column}"));
    }
    builder.push(format!(" {direction} NULLS LAST, id {direction}"));
}

/// Escape `LIKE` wildcards so user text matches literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
