//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities are the canonical collections of the group's books.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod disbursement;
pub mod executive;
pub mod group_expense;
pub mod loan;
pub mod member;
pub mod transaction;

// Re-export specific types to avoid conflicts
pub use disbursement::{
    Column as DisbursementColumn, Entity as Disbursement, Model as DisbursementModel,
};
pub use executive::{Column as ExecutiveColumn, Entity as Executive, Model as ExecutiveModel};
pub use group_expense::{
    Column as GroupExpenseColumn, Entity as GroupExpense, Model as GroupExpenseModel,
};
pub use loan::{Column as LoanColumn, Entity as Loan, Model as LoanModel};
pub use member::{Column as MemberColumn, Entity as Member, Model as MemberModel};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
