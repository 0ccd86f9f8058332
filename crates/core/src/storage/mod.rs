pub mod ledger;
pub mod schema;
