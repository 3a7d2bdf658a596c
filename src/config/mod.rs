pub mod aliases;
pub mod columns;
pub mod settings;

pub use aliases::PlayerAliases;
pub use columns::Field;
pub use settings::AppConfig;
