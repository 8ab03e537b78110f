pub mod query_handlers;
