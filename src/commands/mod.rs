pub mod crawl;
pub mod extract;
pub mod init;
pub mod status;

pub use crawl::{crawl, CrawlOptions};
pub use extract::extract_page;
pub use init::init_config;
pub use status::show_status;
