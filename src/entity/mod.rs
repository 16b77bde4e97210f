pub mod orders;
pub mod products;
pub mod sea_orm_active_enums;
pub mod users;
