pub mod airbnb;
pub mod amenities;
pub mod browser;
pub mod extract;
pub mod traits;
pub mod types;

pub use airbnb::AirbnbScraper;
pub use browser::BrowserSession;
pub use traits::ListingScraper;
