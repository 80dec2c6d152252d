pub mod get;
pub mod list;
pub mod mine;

pub use get::{GetHostelError, GetHostelQuery, HostelDetail};
pub use list::{ListHostelsError, ListHostelsQuery, ListHostelsResponse};
pub use mine::{ListMyHostelsError, ListMyHostelsQuery};
