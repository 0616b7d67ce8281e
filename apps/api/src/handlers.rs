pub mod compliance;
pub mod components;
pub mod data;
pub mod devices;
pub mod health;
pub mod jobs;
pub mod master_password;
pub mod schedules;
pub mod worker;

#[cfg(test)]
mod tests;
