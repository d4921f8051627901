//! Database migrations for the Cardlend API.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2025_06_02_090000_create_companies;
mod m2025_06_02_090100_create_users;
mod m2025_06_02_090200_create_accounts;
mod m2025_06_02_090300_create_loans;
mod m2025_06_02_090400_create_cards;
mod m2025_06_02_090500_create_transactions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_06_02_090000_create_companies::Migration),
            Box::new(m2025_06_02_090100_create_users::Migration),
            Box::new(m2025_06_02_090200_create_accounts::Migration),
            Box::new(m2025_06_02_090300_create_loans::Migration),
            Box::new(m2025_06_02_090400_create_cards::Migration),
            Box::new(m2025_06_02_090500_create_transactions::Migration),
        ]
    }
}
