//! Read-only aggregate views for dashboards, reports, and statements.
//!
//! Nothing here computes anything the engines cannot; these are the
//! straightforward rollups the presentation layer shows, with date-range
//! filtering where the report calls for it.

use crate::{
    core::{disbursement, expense, ledger, loan, session::Session},
    entities::{
        Loan, Member, loan as loan_entity,
        loan::LoanStatus,
        member,
        member::MemberStatus,
        transaction,
        transaction::TransactionKind,
    },
    errors::Result,
};
use sea_orm::prelude::*;

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Default)]
pub struct DashboardStats {
    /// All registered members
    pub total_members: usize,
    /// Members currently active
    pub active_members: usize,
    /// Members currently dormant
    pub dormant_members: usize,
    /// Members currently inactive
    pub inactive_members: usize,
    /// Group-wide contribution total
    pub total_contributions: f64,
    /// Loans approved or disbursed
    pub active_loans: usize,
    /// Principal currently out with members
    pub disbursed_loan_total: f64,
    /// Disbursed loans past their due date
    pub overdue_loans: usize,
}

/// Computes the dashboard numbers at `now`.
pub async fn dashboard_stats(db: &DatabaseConnection, now: DateTimeUtc) -> Result<DashboardStats> {
    let members = Member::find().all(db).await?;
    let loans = Loan::find().all(db).await?;

    let count_status = |status: MemberStatus| members.iter().filter(|m| m.status == status).count();

    Ok(DashboardStats {
        total_members: members.len(),
        active_members: count_status(MemberStatus::Active),
        dormant_members: count_status(MemberStatus::Dormant),
        inactive_members: count_status(MemberStatus::Inactive),
        total_contributions: ledger::total_contributions(db).await?,
        active_loans: loans
            .iter()
            .filter(|l| matches!(l.status, LoanStatus::Approved | LoanStatus::Disbursed))
            .count(),
        disbursed_loan_total: loans
            .iter()
            .filter(|l| l.status == LoanStatus::Disbursed)
            .map(|l| l.amount)
            .sum(),
        overdue_loans: loans.iter().filter(|l| loan::is_overdue(l, now)).count(),
    })
}

/// Per-kind contribution breakdown for a financial report.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContributionBreakdown {
    /// Savings deposits
    pub deposits: f64,
    /// Petty cash contributions
    pub petty_cash: f64,
    /// Medical fund contributions
    pub medical: f64,
    /// Last-expense fund contributions
    pub last_expense: f64,
    /// Registration fees
    pub registration_fees: f64,
}

/// Money in and out over a date range.
#[derive(Debug, Clone, Default)]
pub struct FinancialReport {
    /// All non-withdrawal transaction amounts
    pub total_income: f64,
    /// Withdrawal total
    pub total_withdrawals: f64,
    /// Group operating expenses
    pub total_expenses: f64,
    /// Emergency-fund payouts disbursed in the range
    pub total_disbursements: f64,
    /// Income minus expenses, payouts, and withdrawals
    pub net_balance: f64,
    /// Contribution totals by kind
    pub breakdown: ContributionBreakdown,
}

/// Builds the financial report for `[start, end]`. Payouts count by their
/// disbursement date, not their request date.
pub async fn financial_report(
    db: &DatabaseConnection,
    start: DateTimeUtc,
    end: DateTimeUtc,
) -> Result<FinancialReport> {
    let transactions = ledger::transactions_between(db, start, end).await?;
    let expenses = expense::expenses_between(db, start, end).await?;
    let payouts = disbursement::disbursed_between(db, start, end).await?;

    let total_income: f64 = transactions
        .iter()
        .filter(|t| t.kind != TransactionKind::Withdrawal)
        .map(|t| t.amount)
        .sum();
    let total_withdrawals = ledger::total_for_kind(&transactions, TransactionKind::Withdrawal);
    let total_expenses = expense::total_expenses(&expenses);
    let total_disbursements: f64 = payouts.iter().map(|d| d.approved_amount).sum();

    Ok(FinancialReport {
        total_income,
        total_withdrawals,
        total_expenses,
        total_disbursements,
        net_balance: total_income - total_expenses - total_disbursements - total_withdrawals,
        breakdown: ContributionBreakdown {
            deposits: ledger::total_for_kind(&transactions, TransactionKind::Deposit),
            petty_cash: ledger::total_for_kind(&transactions, TransactionKind::PettyCash),
            medical: ledger::total_for_kind(&transactions, TransactionKind::Medical),
            last_expense: ledger::total_for_kind(&transactions, TransactionKind::LastExpense),
            registration_fees: ledger::total_for_kind(
                &transactions,
                TransactionKind::RegistrationFee,
            ),
        },
    })
}

/// One member's activity and rollup over a statement window.
#[derive(Debug, Clone)]
pub struct MemberStatement {
    /// The member the statement is for
    pub member: member::Model,
    /// The member's transactions within the window, newest first
    pub transactions: Vec<transaction::Model>,
    /// The member's loans, newest application first
    pub loans: Vec<loan_entity::Model>,
    /// Contribution total over the window, derived from the ledger
    pub total_contributed: f64,
    /// Withdrawal total over the window
    pub total_withdrawn: f64,
    /// Principal of loans currently disbursed
    pub total_borrowed: f64,
    /// Cumulative loan repayments
    pub total_repaid: f64,
}

/// Builds a member's statement for `[start, end]`. The transaction listing
/// and money rollups cover only the window; loans are listed in full since
/// their lifecycle spans windows.
///
/// Officers may view any statement; a member-role session only its own.
pub async fn member_statement(
    db: &DatabaseConnection,
    session: &Session,
    member_id: &str,
    start: DateTimeUtc,
    end: DateTimeUtc,
) -> Result<MemberStatement> {
    session.require_self_or_officer(member_id, "view another member's statement")?;

    let member = crate::core::member::require_member(db, member_id).await?;
    let transactions = ledger::member_transactions_between(db, member_id, start, end).await?;
    let loans = loan::loans_for_member(db, member_id).await?;

    let total_contributed = ledger::contribution_total(&transactions);
    let total_withdrawn = ledger::total_for_kind(&transactions, TransactionKind::Withdrawal);
    let total_borrowed = loans
        .iter()
        .filter(|l| l.status == LoanStatus::Disbursed)
        .map(|l| l.amount)
        .sum();
    let total_repaid = loans.iter().map(|l| l.total_repaid).sum();

    Ok(MemberStatement {
        member,
        transactions,
        loans,
        total_contributed,
        total_withdrawn,
        total_borrowed,
        total_repaid,
    })
}
