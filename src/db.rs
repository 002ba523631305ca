use rocket_db_pools::{Database, sqlx};

#[derive(Database)]
#[database("bulletin_db")]
pub struct BulletinDb(sqlx::PgPool);
