pub mod page;
pub mod protocol;
pub mod transport;

pub use page::{PageError, PageSnapshot, ACCOUNTS_SCRIPT_ID, GROUPS_SCRIPT_ID};
pub use protocol::GroupAction;
pub use transport::{endpoint_url, HttpTransport, MockTransport, Transport, TransportError};
