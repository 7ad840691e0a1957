pub mod admin_cars;
pub mod admin_leads;
pub mod auth;
pub mod catalog;
pub mod leads;
pub mod wizard;
