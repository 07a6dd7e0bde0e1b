pub mod account;
pub mod response;

pub use account::{account_middleware, Account, ACCOUNT_HEADER};
pub use response::{ApiResponse, ApiResult};
