use crate::api::automation::{
    AutomationAction, AutomationQuery, AutomationResponse, AutomationResults,
};
use crate::api::commission::{CommissionListResponse, CommissionQuery, CreateCommission};
use crate::api::expense::{CreateExpense, ExpenseListResponse, ExpenseQuery};
use crate::api::reports::{PayableTotals, PeriodTotals, ReportQuery, SummaryResponse};
use crate::api::settings::UpdateSettings;
use crate::api::team_member::{CreateTeamMember, TeamMemberListResponse, TeamMemberQuery};
use crate::api::team_payment::{
    CreateTeamPayment, MarkPaid, TeamPaymentListResponse, TeamPaymentQuery,
};
use crate::model::company_expense::CompanyExpense;
use crate::model::company_settings::CompanySettings;
use crate::model::partner_commission::PartnerCommission;
use crate::model::payable::{BillingCycle, PaymentStatus, PaymentType};
use crate::model::team_member::{EmploymentType, MemberStatus, TeamMember};
use crate::model::team_payment::TeamPayment;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Domous OS API",
        version = "1.0.0",
        description = r#"
## Domous OS

Backend API for **Domous OS**, a business-management system for Brazilian
small and medium companies.

### 🔹 Key Features
- **Team Management**
  - Register team members with fixed or variable compensation
- **Payments, Commissions & Expenses**
  - Shared pending → paid / overdue lifecycle across all payables
- **Automation**
  - Monthly salary generation and overdue sweep, triggered manually or by
    an external scheduler
- **Reports**
  - Period summaries with prior-period comparison and recurring expense
    projection

### 🔐 Security
Most endpoints are protected using **JWT Bearer authentication** and are
scoped to the caller's company. The scheduler endpoint uses the
`X-Automation-Key` header instead.

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::team_member::create_team_member,
        crate::api::team_member::list_team_members,
        crate::api::team_member::get_team_member,
        crate::api::team_member::update_team_member,
        crate::api::team_member::delete_team_member,

        crate::api::team_payment::create_payment,
        crate::api::team_payment::list_payments,
        crate::api::team_payment::mark_payment_paid,

        crate::api::commission::create_commission,
        crate::api::commission::list_commissions,
        crate::api::commission::mark_commission_paid,

        crate::api::expense::create_expense,
        crate::api::expense::list_expenses,
        crate::api::expense::mark_expense_paid,

        crate::api::settings::get_settings,
        crate::api::settings::update_settings,

        crate::api::reports::summary,

        crate::api::automation::run_automation
    ),
    components(
        schemas(
            TeamMember,
            CreateTeamMember,
            TeamMemberQuery,
            TeamMemberListResponse,
            EmploymentType,
            MemberStatus,

            TeamPayment,
            CreateTeamPayment,
            TeamPaymentQuery,
            TeamPaymentListResponse,
            MarkPaid,
            PaymentStatus,
            PaymentType,
            BillingCycle,

            PartnerCommission,
            CreateCommission,
            CommissionQuery,
            CommissionListResponse,

            CompanyExpense,
            CreateExpense,
            ExpenseQuery,
            ExpenseListResponse,

            CompanySettings,
            UpdateSettings,

            ReportQuery,
            PayableTotals,
            PeriodTotals,
            SummaryResponse,

            AutomationAction,
            AutomationQuery,
            AutomationResults,
            AutomationResponse
        )
    ),
    tags(
        (name = "TeamMember", description = "Team member management APIs"),
        (name = "TeamPayment", description = "Team payment APIs"),
        (name = "Commission", description = "Partner commission APIs"),
        (name = "Expense", description = "Company expense APIs"),
        (name = "Settings", description = "Company settings APIs"),
        (name = "Reports", description = "Reporting APIs"),
        (name = "Automation", description = "Salary generation and overdue sweep APIs"),
    )
)]
pub struct ApiDoc;
