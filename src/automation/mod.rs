pub mod overdue;
pub mod salary;
