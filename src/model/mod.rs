pub mod company_expense;
pub mod company_settings;
pub mod partner_commission;
pub mod payable;
pub mod role;
pub mod team_member;
pub mod team_payment;
