//! Application layer for Database Maintenance

pub mod check;
pub mod seeder;

pub use check::DatabaseCheckService;
pub use seeder::TestUserSeeder;
