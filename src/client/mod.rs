//! Client-side data access: typed storage backends, session handling, the
//! admin back office and the checkout callback.

pub mod admin;
pub mod data_client;
pub mod error;
pub mod fallback;
pub mod local;
pub mod local_storage;
pub mod payment;
pub mod remote;
pub mod session;
pub mod storage;

pub use admin::AdminConsole;
pub use data_client::DataClient;
pub use error::{ClientError, ClientResult};
pub use fallback::FallbackStore;
pub use local::LocalCacheStore;
pub use local_storage::{FileStorage, LocalStorage, MemoryStorage};
pub use payment::{complete_checkout, CheckoutRequest};
pub use remote::RemoteStore;
pub use session::{LocalSessionPort, Session, SessionContext, SessionPort};
pub use storage::{CacheMirror, SharedStorage, Storage};
