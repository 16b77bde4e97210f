use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Select, Set, SqlErr,
};
use uuid::Uuid;

use super::{NewOrder, NewProduct, NewUser, Page, Store};
use crate::{
    entity::{
        orders::{self, ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
        products::{
            ActiveModel as ProductActive, Column as ProdCol, Entity as Products,
            Model as ProductModel,
        },
        sea_orm_active_enums::OrderStatus,
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    },
    error::{AppError, AppResult},
    models::{Order, Product, User},
    visibility::{OrderScope, ProductScope},
};

/// PostgreSQL-backed store. Uniqueness and restrict rules live in the schema;
/// violations surface as `AppError::Conflict`.
#[derive(Clone)]
pub struct SeaOrmStore {
    orm: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(orm: DatabaseConnection) -> Self {
        Self { orm }
    }
}

fn conflict_or(err: DbErr, message: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail))
        | Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            tracing::debug!(%detail, "constraint violation");
            AppError::Conflict(message.to_string())
        }
        _ => AppError::OrmError(err),
    }
}

fn product_condition(scope: ProductScope) -> Condition {
    match scope {
        ProductScope::OwnedBy(seller_id) => Condition::all().add(ProdCol::SellerId.eq(seller_id)),
        ProductScope::Active => Condition::all().add(ProdCol::IsActive.eq(true)),
    }
}

fn order_condition(scope: OrderScope) -> Condition {
    match scope {
        OrderScope::PlacedBy(buyer_id) => Condition::all().add(OrderCol::BuyerId.eq(buyer_id)),
        OrderScope::ForSeller(seller_id) => Condition::all().add(ProdCol::SellerId.eq(seller_id)),
    }
}

#[derive(Debug, FromQueryResult)]
struct OrderRow {
    id: i64,
    uuid: Uuid,
    product_id: i64,
    units: i32,
    status: OrderStatus,
    buyer_id: i64,
    created: sea_orm::prelude::DateTimeWithTimeZone,
    modified: Option<sea_orm::prelude::DateTimeWithTimeZone>,
    product_uuid: Uuid,
    seller_id: i64,
    buyer_uuid: Uuid,
}

// Orders joined with their product and buyer so public UUIDs come back in
// one round trip.
fn order_rows() -> Select<Orders> {
    Orders::find()
        .select_only()
        .columns([
            OrderCol::Id,
            OrderCol::Uuid,
            OrderCol::ProductId,
            OrderCol::Units,
            OrderCol::Status,
            OrderCol::BuyerId,
            OrderCol::Created,
            OrderCol::Modified,
        ])
        .column_as(ProdCol::Uuid, "product_uuid")
        .column_as(ProdCol::SellerId, "seller_id")
        .column_as(UserCol::Uuid, "buyer_uuid")
        .join(JoinType::InnerJoin, orders::Relation::Products.def())
        .join(JoinType::InnerJoin, orders::Relation::Users.def())
}

#[async_trait]
impl Store for SeaOrmStore {
    async fn insert_user(&self, new: NewUser) -> AppResult<User> {
        let user = UserActive {
            id: NotSet,
            uuid: Set(Uuid::new_v4()),
            username: Set(new.username),
            email: Set(new.email),
            first_name: Set(new.first_name),
            last_name: Set(new.last_name),
            password_hash: Set(new.password_hash),
            sex: Set(new.sex),
            role: Set(new.role),
            date_joined: NotSet,
        }
        .insert(&self.orm)
        .await
        .map_err(|e| conflict_or(e, "username already exists"))?;
        Ok(user_from_entity(user))
    }

    async fn find_user_by_uuid(&self, uuid: Uuid) -> AppResult<Option<User>> {
        let user = Users::find()
            .filter(UserCol::Uuid.eq(uuid))
            .one(&self.orm)
            .await?;
        Ok(user.map(user_from_entity))
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = Users::find()
            .filter(UserCol::Username.eq(username))
            .one(&self.orm)
            .await?;
        Ok(user.map(user_from_entity))
    }

    async fn delete_user(&self, uuid: Uuid) -> AppResult<()> {
        let result = Users::delete_many()
            .filter(UserCol::Uuid.eq(uuid))
            .exec(&self.orm)
            .await
            .map_err(|e| conflict_or(e, "user is still referenced"))?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn insert_product(&self, new: NewProduct) -> AppResult<Product> {
        let product = ProductActive {
            id: NotSet,
            uuid: Set(Uuid::new_v4()),
            name: Set(new.name),
            description: Set(new.description),
            price: Set(new.price),
            stock: Set(new.stock),
            is_active: Set(new.is_active),
            seller_id: Set(new.seller_id),
            created: NotSet,
        }
        .insert(&self.orm)
        .await
        .map_err(|e| conflict_or(e, "seller does not exist"))?;

        let seller = Users::find_by_id(product.seller_id)
            .one(&self.orm)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("product seller vanished")))?;
        Ok(product_from_entity(product, &seller))
    }

    async fn find_product(&self, uuid: Uuid) -> AppResult<Option<Product>> {
        let row = Products::find()
            .filter(ProdCol::Uuid.eq(uuid))
            .find_also_related(Users)
            .one(&self.orm)
            .await?;
        Ok(row.and_then(|(product, seller)| {
            seller.map(|seller| product_from_entity(product, &seller))
        }))
    }

    async fn list_products(
        &self,
        scope: ProductScope,
        page: Page,
    ) -> AppResult<(Vec<Product>, u64)> {
        let condition = product_condition(scope);
        let total = Products::find()
            .filter(condition.clone())
            .count(&self.orm)
            .await?;

        let items = Products::find()
            .filter(condition)
            .order_by_asc(ProdCol::Id)
            .find_also_related(Users)
            .limit(page.limit)
            .offset(page.offset)
            .all(&self.orm)
            .await?
            .into_iter()
            .filter_map(|(product, seller)| {
                seller.map(|seller| product_from_entity(product, &seller))
            })
            .collect();

        Ok((items, total))
    }

    async fn delete_product(&self, uuid: Uuid) -> AppResult<()> {
        let result = Products::delete_many()
            .filter(ProdCol::Uuid.eq(uuid))
            .exec(&self.orm)
            .await
            .map_err(|e| conflict_or(e, "product still has an order"))?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn insert_order(&self, new: NewOrder) -> AppResult<Order> {
        let order = OrderActive {
            id: NotSet,
            uuid: Set(Uuid::new_v4()),
            product_id: Set(new.product_id),
            units: Set(new.units),
            status: Set(new.status),
            buyer_id: Set(new.buyer_id),
            created: NotSet,
            modified: Set(None),
        }
        .insert(&self.orm)
        .await
        .map_err(|e| conflict_or(e, "product already has an order"))?;

        let row = order_rows()
            .filter(OrderCol::Id.eq(order.id))
            .into_model::<OrderRow>()
            .one(&self.orm)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("inserted order not found")))?;
        Ok(order_from_row(row))
    }

    async fn list_orders(
        &self,
        scope: OrderScope,
        status: Option<OrderStatus>,
        page: Page,
    ) -> AppResult<(Vec<Order>, u64)> {
        let mut condition = order_condition(scope);
        if let Some(status) = status {
            condition = condition.add(OrderCol::Status.eq(status));
        }

        let finder = order_rows().filter(condition);
        let total = finder.clone().count(&self.orm).await?;

        let items = finder
            .order_by_asc(OrderCol::Id)
            .limit(page.limit)
            .offset(page.offset)
            .into_model::<OrderRow>()
            .all(&self.orm)
            .await?
            .into_iter()
            .map(order_from_row)
            .collect();

        Ok((items, total))
    }
}

fn user_from_entity(model: UserModel) -> User {
    User {
        id: model.id,
        uuid: model.uuid,
        username: model.username,
        email: model.email,
        first_name: model.first_name,
        last_name: model.last_name,
        password_hash: model.password_hash,
        sex: model.sex,
        role: model.role,
        date_joined: model.date_joined.with_timezone(&Utc),
    }
}

fn product_from_entity(model: ProductModel, seller: &UserModel) -> Product {
    Product {
        id: model.id,
        uuid: model.uuid,
        name: model.name,
        description: model.description,
        price: model.price,
        stock: model.stock,
        is_active: model.is_active,
        seller_id: model.seller_id,
        seller: seller.uuid,
        created: model.created.with_timezone(&Utc),
    }
}

fn order_from_row(row: OrderRow) -> Order {
    Order {
        id: row.id,
        uuid: row.uuid,
        product_id: row.product_id,
        product: row.product_uuid,
        seller_id: row.seller_id,
        units: row.units,
        buyer_id: row.buyer_id,
        buyer: row.buyer_uuid,
        status: row.status,
        created: row.created.with_timezone(&Utc),
        modified: row.modified.map(|dt| dt.with_timezone(&Utc)),
    }
}
