//! Clients for the external sources namehist aggregates.
//!
//! Every client implements one of two capability traits,
//! [`HistoryProvider`] or [`ProfileProvider`], takes its credentials and
//! timeouts at construction, and reports failures as a [`ProviderError`]
//! tagged with the provider name.

pub mod error;
pub mod lolarchiver;
pub mod memory_lol;
pub mod nitter;
pub mod traits;
pub mod twitter_api_io;
pub mod unavatar;
pub mod wayback;

mod http;

pub use error::ProviderError;
pub use lolarchiver::LolArchiverClient;
pub use memory_lol::MemoryLolClient;
pub use nitter::NitterScraper;
pub use traits::{HistoryProvider, HistoryQuery, ProfilePartial, ProfileProvider, ReportedName};
pub use twitter_api_io::TwitterApiIoClient;
pub use unavatar::UnavatarClient;
pub use wayback::WaybackClient;
