//! Monitored client (tenant) model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::{Record, Table};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub active: bool,
}

impl Client {
    pub const NAME: &'static str = "name";
    pub const ACTIVE: &'static str = "active";
}

impl Record for Client {
    const TABLE: Table = Table::Clients;
}
