pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod nav;

pub use config::{Config, DatabaseConfig, Driver};
pub use db::{ConnectionState, Database, DbError, Fetched, Params, Row, Statement, Value};
pub use error::AppError;
pub use nav::{render_sidebar, NavItem, Page, SIDEBAR};
