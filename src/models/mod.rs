//! # Data Models
//!
//! This module contains the SeaORM entity models for the Cardlend API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod account;
pub mod card;
pub mod company;
pub mod loan;
pub mod transaction;
pub mod user;

pub use account::Entity as Account;
pub use card::Entity as Card;
pub use company::Entity as Company;
pub use loan::Entity as Loan;
pub use transaction::Entity as Transaction;
pub use user::Entity as User;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "cardlend".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
