use {
    crate::domain::error::PipelineError,
    crate::domain::money::{Currency, MoneyAmount},
    crate::domain::order::{
        CustomerContact, NewOrder, NewOrderItem, Order, OrderItem, OrderStatus, PaymentStatus,
        ShippingAddress,
    },
    chrono::{DateTime, Utc},
    sqlx::PgPool,
    uuid::Uuid,
};

#[derive(Debug)]
pub enum OrderInsert {
    /// New order row inserted.
    Inserted,
    /// The checkout session was already ingested (redelivered webhook).
    AlreadyExists(Uuid),
}

/// Insert the order row, deduplicated on the checkout session id. A
/// conflicting insert is resolved to the existing row, and the caller treats
/// that as success, not as an error.
pub async fn insert_order(pool: &PgPool, order: &NewOrder) -> Result<OrderInsert, PipelineError> {
    let inserted: Option<Uuid> = sqlx::query_scalar(
        r#"
        INSERT INTO orders
            (id, checkout_session_id, payment_intent_id, customer_ref,
             status, payment_status,
             customer_name, customer_email, customer_phone,
             shipping_name, shipping_line1, shipping_line2, shipping_city,
             shipping_state, shipping_postal_code, shipping_country,
             subtotal_cents, shipping_cents, discount_cents, total_cents, currency)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18, $19, $20, $21)
        ON CONFLICT (checkout_session_id) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(order.id())
    .bind(order.checkout_session_id())
    .bind(order.payment_intent_id())
    .bind(order.customer_ref())
    .bind(order.status().as_str())
    .bind(order.payment_status().as_str())
    .bind(order.contact().name.as_deref())
    .bind(order.contact().email.as_deref())
    .bind(order.contact().phone.as_deref())
    .bind(order.shipping().name.as_deref())
    .bind(order.shipping().line1.as_deref())
    .bind(order.shipping().line2.as_deref())
    .bind(order.shipping().city.as_deref())
    .bind(order.shipping().state.as_deref())
    .bind(order.shipping().postal_code.as_deref())
    .bind(order.shipping().country.as_deref())
    .bind(order.subtotal().cents())
    .bind(order.shipping_cost().cents())
    .bind(order.discount().cents())
    .bind(order.total().cents())
    .bind(order.currency().as_str())
    .fetch_optional(pool)
    .await?;

    match inserted {
        Some(_) => Ok(OrderInsert::Inserted),
        None => {
            let existing: Uuid =
                sqlx::query_scalar("SELECT id FROM orders WHERE checkout_session_id = $1")
                    .bind(order.checkout_session_id())
                    .fetch_one(pool)
                    .await?;
            Ok(OrderInsert::AlreadyExists(existing))
        }
    }
}

/// Batch-insert the line-item snapshots. One transaction so a partial batch
/// never survives.
pub async fn insert_items(
    pool: &PgPool,
    order_id: Uuid,
    items: &[NewOrderItem],
) -> Result<(), PipelineError> {
    let mut tx = pool.begin().await?;

    for item in items {
        sqlx::query(
            r#"
            INSERT INTO order_items
                (id, order_id, product_id, variant_id, title, sku, image_url,
                 quantity, unit_price_cents, total_cents)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(order_id)
        .bind(item.product_id.as_deref())
        .bind(item.variant_id.as_deref())
        .bind(&item.title)
        .bind(item.sku.as_deref())
        .bind(item.image_url.as_deref())
        .bind(i64::from(item.quantity))
        .bind(item.unit_price.cents())
        .bind(item.total_price.cents())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

pub async fn link_subscription(
    pool: &PgPool,
    order_id: Uuid,
    subscription_id: Uuid,
) -> Result<(), PipelineError> {
    sqlx::query("UPDATE orders SET subscription_id = $1, updated_at = now() WHERE id = $2")
        .bind(subscription_id)
        .bind(order_id)
        .execute(pool)
        .await?;
    Ok(())
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    checkout_session_id: String,
    payment_intent_id: Option<String>,
    customer_ref: Option<String>,
    status: String,
    payment_status: String,
    customer_name: Option<String>,
    customer_email: Option<String>,
    customer_phone: Option<String>,
    shipping_name: Option<String>,
    shipping_line1: Option<String>,
    shipping_line2: Option<String>,
    shipping_city: Option<String>,
    shipping_state: Option<String>,
    shipping_postal_code: Option<String>,
    shipping_country: Option<String>,
    subtotal_cents: i64,
    shipping_cents: i64,
    discount_cents: i64,
    total_cents: i64,
    currency: String,
    subscription_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = PipelineError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Order {
            id: row.id,
            checkout_session_id: row.checkout_session_id,
            payment_intent_id: row.payment_intent_id,
            customer_ref: row.customer_ref,
            status: OrderStatus::try_from(row.status.as_str())?,
            payment_status: PaymentStatus::try_from(row.payment_status.as_str())?,
            contact: CustomerContact {
                name: row.customer_name,
                email: row.customer_email,
                phone: row.customer_phone,
            },
            shipping: ShippingAddress {
                name: row.shipping_name,
                line1: row.shipping_line1,
                line2: row.shipping_line2,
                city: row.shipping_city,
                state: row.shipping_state,
                postal_code: row.shipping_postal_code,
                country: row.shipping_country,
            },
            subtotal: MoneyAmount::new(row.subtotal_cents)?,
            shipping_cost: MoneyAmount::new(row.shipping_cents)?,
            discount: MoneyAmount::new(row.discount_cents)?,
            total: MoneyAmount::new(row.total_cents)?,
            currency: Currency::try_from(row.currency.as_str())?,
            subscription_id: row.subscription_id,
            created_at: row.created_at,
        })
    }
}

pub async fn find_order(pool: &PgPool, id: Uuid) -> Result<Option<Order>, PipelineError> {
    let row: Option<OrderRow> = sqlx::query_as(
        r#"
        SELECT id, checkout_session_id, payment_intent_id, customer_ref,
               status, payment_status,
               customer_name, customer_email, customer_phone,
               shipping_name, shipping_line1, shipping_line2, shipping_city,
               shipping_state, shipping_postal_code, shipping_country,
               subtotal_cents, shipping_cents, discount_cents, total_cents,
               currency, subscription_id, created_at
        FROM orders WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(Order::try_from).transpose()
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: Uuid,
    order_id: Uuid,
    product_id: Option<String>,
    variant_id: Option<String>,
    title: String,
    sku: Option<String>,
    image_url: Option<String>,
    quantity: i32,
    unit_price_cents: i64,
    total_cents: i64,
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = PipelineError;

    fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
        Ok(OrderItem {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            variant_id: row.variant_id,
            title: row.title,
            sku: row.sku,
            image_url: row.image_url,
            quantity: u32::try_from(row.quantity).map_err(|_| {
                PipelineError::Validation(format!("negative quantity on item {}", row.id))
            })?,
            unit_price: MoneyAmount::new(row.unit_price_cents)?,
            total_price: MoneyAmount::new(row.total_cents)?,
        })
    }
}

pub async fn list_items(pool: &PgPool, order_id: Uuid) -> Result<Vec<OrderItem>, PipelineError> {
    let rows: Vec<OrderItemRow> = sqlx::query_as(
        r#"
        SELECT id, order_id, product_id, variant_id, title, sku, image_url,
               quantity, unit_price_cents, total_cents
        FROM order_items WHERE order_id = $1
        ORDER BY created_at, id
        "#,
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(OrderItem::try_from).collect()
}
