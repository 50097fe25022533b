pub mod util;
pub mod v1;
