pub mod automation;
pub mod commission;
pub mod expense;
pub mod reports;
pub mod settings;
pub mod team_member;
pub mod team_payment;
