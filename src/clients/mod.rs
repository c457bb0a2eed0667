pub mod api_client;

pub use api_client::{ApiClient, INIT_DATA_HEADER};
