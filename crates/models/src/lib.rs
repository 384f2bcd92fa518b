pub mod credentials;
pub mod db;
pub mod errors;
pub mod identity;
pub mod offering;
pub mod profile;
pub mod provider;
pub mod rating;
