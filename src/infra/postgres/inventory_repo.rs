use {crate::domain::error::PipelineError, sqlx::PgPool};

/// Decrement on-hand inventory for a purchased product. Never goes below
/// zero. Returns false when the product is not in the catalog; callers on
/// the ingestion path treat any failure here as a logged no-op.
pub async fn decrement_inventory(
    pool: &PgPool,
    product_id: &str,
    quantity: u32,
) -> Result<bool, PipelineError> {
    let result = sqlx::query(
        r#"
        UPDATE products
        SET inventory_quantity = GREATEST(inventory_quantity - $1, 0),
            updated_at = now()
        WHERE id = $2
        "#,
    )
    .bind(i32::try_from(quantity).unwrap_or(i32::MAX))
    .bind(product_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
