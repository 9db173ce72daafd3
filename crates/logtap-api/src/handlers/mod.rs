mod files;
mod health;
mod logs;
mod parsed;

pub use files::*;
pub use health::*;
pub use logs::*;
pub use parsed::*;
