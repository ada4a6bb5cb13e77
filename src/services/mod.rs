pub mod captures;
pub mod chart_reader;
pub mod market;
pub mod ocr;
pub mod paginator;
pub mod session;
pub mod submission;
pub mod wallets;

pub use captures::CaptureDirProvider;
pub use chart_reader::{ChartTimeReader, ImageRegion, ImageRegionProvider, TextRecognizer};
pub use market::{MarketData, MarketDataClient};
pub use ocr::TesseractRecognizer;
pub use paginator::collect_trades;
pub use session::{FilterOutcome, Session};
pub use submission::{submit_wallets, SubmissionReport, WalletSink, WalletStoreClient};
pub use wallets::unique_addresses;
