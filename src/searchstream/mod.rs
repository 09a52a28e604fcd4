pub mod datasource;
pub mod record;
pub mod schema;
pub mod serialization;
