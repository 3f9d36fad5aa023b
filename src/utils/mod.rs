pub mod date_filters;
pub mod db_utils;
pub mod email_cache;
pub mod email_filter;
pub mod payment_day;
