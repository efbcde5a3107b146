pub mod site_cache;
pub mod sql;
