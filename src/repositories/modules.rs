use sqlx::PgPool;

use crate::db::models::Module;

const MODULE_COLUMNS: &str = "id, course_id, title, order_index, created_at, updated_at";

pub(crate) struct CreateModule<'a> {
    pub(crate) course_id: i64,
    pub(crate) title: &'a str,
    pub(crate) order_index: i32,
    pub(crate) created_at: time::PrimitiveDateTime,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateModule<'_>) -> Result<Module, sqlx::Error> {
    sqlx::query_as::<_, Module>(&format!(
        "INSERT INTO modules (course_id, title, order_index, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5)
         RETURNING {MODULE_COLUMNS}",
    ))
    .bind(params.course_id)
    .bind(params.title)
    .bind(params.order_index)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    module_id: i64,
) -> Result<Option<Module>, sqlx::Error> {
    sqlx::query_as::<_, Module>(&format!("SELECT {MODULE_COLUMNS} FROM modules WHERE id = $1"))
        .bind(module_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list(pool: &PgPool, skip: i64, limit: i64) -> Result<Vec<Module>, sqlx::Error> {
    sqlx::query_as::<_, Module>(&format!(
        "SELECT {MODULE_COLUMNS} FROM modules ORDER BY id OFFSET $1 LIMIT $2",
    ))
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_course(
    pool: &PgPool,
    course_id: i64,
) -> Result<Vec<Module>, sqlx::Error> {
    sqlx::query_as::<_, Module>(&format!(
        "SELECT {MODULE_COLUMNS} FROM modules WHERE course_id = $1 ORDER BY order_index, id",
    ))
    .bind(course_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn update(pool: &PgPool, module: &Module) -> Result<Module, sqlx::Error> {
    sqlx::query_as::<_, Module>(&format!(
        "UPDATE modules SET course_id = $1, title = $2, order_index = $3, updated_at = $4
         WHERE id = $5
         RETURNING {MODULE_COLUMNS}",
    ))
    .bind(module.course_id)
    .bind(&module.title)
    .bind(module.order_index)
    .bind(module.updated_at)
    .bind(module.id)
    .fetch_one(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, module_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM modules WHERE id = $1")
        .bind(module_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
