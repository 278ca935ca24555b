//! Historical-imagery overlay proxy.
//!
//! Historical epochs are never cached locally. Each request is translated
//! into a WMS GetMap call against the authority that serves the epoch and
//! the rendered image is handed straight back.

mod epoch;
mod proxy;

pub use epoch::{WmsEpoch, EPOCHS};
pub use proxy::{WmsError, WmsGetMap, WmsProxy};
