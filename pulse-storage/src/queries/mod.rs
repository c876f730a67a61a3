//! Raw SQL modules. String-typed at this layer; tag parsing and date
//! parsing happen in the crates above.

pub mod achievement_ops;
pub mod completion_ops;
pub mod streak_ops;
pub mod user_ops;
