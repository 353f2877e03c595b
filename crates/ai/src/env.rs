//! Environment abstraction for the assistant.
//!
//! The server implements `AiEnvironment` with its service instances; tools and
//! the chat service only see these traits.

use chrono::NaiveDate;
use std::sync::Arc;

use pocketpilot_core::{
    accounts::AccountServiceTrait,
    ai::AiMemoryServiceTrait,
    bills::BillServiceTrait,
    budgets::BudgetServiceTrait,
    categories::CategoryServiceTrait,
    goals::GoalServiceTrait,
    insights::InsightsServiceTrait,
    transactions::TransactionServiceTrait,
    utils::time_utils,
};

use crate::providers::LlmConfig;

pub trait AiEnvironment: Send + Sync {
    /// Provider settings for the current process.
    fn llm_config(&self) -> LlmConfig;

    /// The date tools treat as "today".
    fn today(&self) -> NaiveDate {
        time_utils::today()
    }

    fn account_service(&self) -> Arc<dyn AccountServiceTrait>;

    fn category_service(&self) -> Arc<dyn CategoryServiceTrait>;

    fn transaction_service(&self) -> Arc<dyn TransactionServiceTrait>;

    fn bill_service(&self) -> Arc<dyn BillServiceTrait>;

    fn budget_service(&self) -> Arc<dyn BudgetServiceTrait>;

    fn goal_service(&self) -> Arc<dyn GoalServiceTrait>;

    fn insights_service(&self) -> Arc<dyn InsightsServiceTrait>;

    /// Remembered facts included in the chat preamble.
    fn memory_service(&self) -> Arc<dyn AiMemoryServiceTrait>;
}

#[cfg(test)]
pub mod test_env {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDateTime;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::RwLock;

    use pocketpilot_core::{
        accounts::{Account, AccountType, AccountUpdate, NetWorth, NewAccount},
        ai::{AiMemory, MemoryUpsert},
        bills::{
            Bill, BillCalendar, BillFrequency, BillPaymentResult, BillStatus, BillSummary,
            BillUpdate, BillWithStatus, NewBill, PayBillRequest,
        },
        budgets::{
            ApplyTemplateRequest, ApplyTemplateResult, Budget, BudgetPeriod, BudgetStatus,
            BudgetTemplate, BudgetUpdate, BudgetWithCategory, NewBudget, NewBudgetTemplate,
        },
        categories::{Category, CategoryType, CategoryUpdate, NewCategory},
        goals::{
            ContributionResult, Goal, GoalContribution, GoalUpdate, GoalWithProgress,
            NewContribution, NewGoal,
        },
        insights::{Forecast, PaydayPrediction, PaymentSchedule},
        transactions::{
            NewTransaction, Transaction, TransactionFilter, TransactionPage, TransactionType,
            TransactionUpdate, TransactionWithDetails,
        },
        Error as CoreError, Result as CoreResult,
    };

    pub const USER: &str = "user-1";

    pub fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn stamp() -> NaiveDateTime {
        today().and_hms_opt(9, 0, 0).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    pub struct MockAccountService {
        pub accounts: Vec<Account>,
        /// Makes `list_accounts` fail, as when the database is locked.
        pub unavailable: bool,
    }

    #[async_trait]
    impl AccountServiceTrait for MockAccountService {
        fn list_accounts(&self, user_id: &str, include_archived: bool) -> CoreResult<Vec<Account>> {
            if self.unavailable {
                return Err(CoreError::invalid("Accounts are unavailable"));
            }
            Ok(self
                .accounts
                .iter()
                .filter(|a| a.user_id == user_id && (include_archived || !a.is_archived))
                .cloned()
                .collect())
        }

        fn get_account(&self, user_id: &str, account_id: &str) -> CoreResult<Account> {
            self.accounts
                .iter()
                .find(|a| a.user_id == user_id && a.id == account_id)
                .cloned()
                .ok_or_else(|| CoreError::not_found("Account"))
        }

        async fn create_account(&self, _: &str, _: NewAccount) -> CoreResult<Account> {
            unimplemented!()
        }

        async fn update_account(&self, _: &str, _: &str, _: AccountUpdate) -> CoreResult<Account> {
            unimplemented!()
        }

        async fn archive_account(&self, _: &str, _: &str) -> CoreResult<Account> {
            unimplemented!()
        }

        fn get_net_worth(&self, user_id: &str) -> CoreResult<NetWorth> {
            Ok(NetWorth::from_accounts(&self.list_accounts(user_id, false)?))
        }
    }

    pub struct MockCategoryService {
        pub categories: Vec<Category>,
    }

    #[async_trait]
    impl CategoryServiceTrait for MockCategoryService {
        fn list_categories(
            &self,
            user_id: &str,
            category_type: Option<CategoryType>,
        ) -> CoreResult<Vec<Category>> {
            Ok(self
                .categories
                .iter()
                .filter(|c| c.user_id == user_id)
                .filter(|c| category_type.map_or(true, |t| c.category_type == t))
                .cloned()
                .collect())
        }

        fn get_category(&self, user_id: &str, category_id: &str) -> CoreResult<Category> {
            self.categories
                .iter()
                .find(|c| c.user_id == user_id && c.id == category_id)
                .cloned()
                .ok_or_else(|| CoreError::not_found("Category"))
        }

        async fn create_category(&self, _: &str, _: NewCategory) -> CoreResult<Category> {
            unimplemented!()
        }

        async fn update_category(&self, _: &str, _: &str, _: CategoryUpdate) -> CoreResult<Category> {
            unimplemented!()
        }

        async fn delete_category(&self, _: &str, _: &str) -> CoreResult<()> {
            unimplemented!()
        }

        async fn seed_default_categories(&self, _: &str) -> CoreResult<usize> {
            unimplemented!()
        }

        async fn resolve_or_create(&self, _: &str, _: &str) -> CoreResult<Category> {
            unimplemented!()
        }
    }

    /// Keeps created transactions so tests can inspect them.
    pub struct MockTransactionService {
        pub rows: RwLock<Vec<TransactionWithDetails>>,
        pub accounts: Vec<Account>,
        pub categories: Vec<Category>,
    }

    impl MockTransactionService {
        fn details(&self, transaction: Transaction) -> TransactionWithDetails {
            let account_name = self
                .accounts
                .iter()
                .find(|a| a.id == transaction.account_id)
                .map(|a| a.name.clone())
                .unwrap_or_default();
            let category = transaction
                .category_id
                .as_ref()
                .and_then(|id| self.categories.iter().find(|c| &c.id == id));
            TransactionWithDetails {
                account_name,
                category_name: category.map(|c| c.name.clone()),
                category_color: category.map(|c| c.color.clone()),
                tags: Vec::new(),
                transaction,
            }
        }

        pub fn seed(&self, new_transaction: NewTransaction) {
            let row = self.details(to_transaction(new_transaction));
            self.rows.write().unwrap().push(row);
        }
    }

    fn to_transaction(new_transaction: NewTransaction) -> Transaction {
        Transaction {
            id: format!("txn-{}", new_transaction.description.to_lowercase().replace(' ', "-")),
            user_id: USER.to_string(),
            account_id: new_transaction.account_id,
            category_id: new_transaction.category_id,
            amount: new_transaction.amount,
            transaction_type: new_transaction.transaction_type,
            description: new_transaction.description,
            merchant: new_transaction.merchant,
            date: new_transaction.date,
            notes: new_transaction.notes,
            recurring_id: new_transaction.recurring_id,
            created_at: stamp(),
            updated_at: stamp(),
        }
    }

    #[async_trait]
    impl TransactionServiceTrait for MockTransactionService {
        fn search_transactions(&self, _: &str, _: TransactionFilter) -> CoreResult<TransactionPage> {
            unimplemented!()
        }

        fn get_transaction(&self, _: &str, _: &str) -> CoreResult<TransactionWithDetails> {
            unimplemented!()
        }

        fn list_between(
            &self,
            user_id: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> CoreResult<Vec<TransactionWithDetails>> {
            Ok(self
                .rows
                .read()
                .unwrap()
                .iter()
                .filter(|r| r.transaction.user_id == user_id)
                .filter(|r| r.transaction.date >= start && r.transaction.date <= end)
                .cloned()
                .collect())
        }

        async fn create_transaction(
            &self,
            _user_id: &str,
            new_transaction: NewTransaction,
        ) -> CoreResult<TransactionWithDetails> {
            new_transaction.validate()?;
            let row = self.details(to_transaction(new_transaction));
            self.rows.write().unwrap().push(row.clone());
            Ok(row)
        }

        async fn update_transaction(
            &self,
            _: &str,
            _: &str,
            _: TransactionUpdate,
        ) -> CoreResult<TransactionWithDetails> {
            unimplemented!()
        }

        async fn delete_transaction(&self, _: &str, _: &str) -> CoreResult<()> {
            unimplemented!()
        }

        async fn bulk_delete(&self, _: &str, _: Vec<String>) -> CoreResult<usize> {
            unimplemented!()
        }
    }

    pub struct MockBillService {
        pub bills: Vec<BillWithStatus>,
        pub created: RwLock<Vec<NewBill>>,
    }

    #[async_trait]
    impl BillServiceTrait for MockBillService {
        fn list_bills(&self, _: &str, _: NaiveDate) -> CoreResult<Vec<BillWithStatus>> {
            Ok(self.bills.clone())
        }

        fn get_bill(&self, _: &str, _: &str, _: NaiveDate) -> CoreResult<BillWithStatus> {
            unimplemented!()
        }

        async fn create_bill(&self, user_id: &str, new_bill: NewBill) -> CoreResult<Bill> {
            new_bill.validate()?;
            self.created.write().unwrap().push(new_bill.clone());
            Ok(Bill {
                id: "bill-new".to_string(),
                user_id: user_id.to_string(),
                name: new_bill.name,
                amount: new_bill.amount,
                frequency: new_bill.frequency,
                next_due_date: new_bill.next_due_date,
                category_id: new_bill.category_id,
                account_id: new_bill.account_id,
                is_autopay: new_bill.is_autopay,
                reminder_days: new_bill.reminder_days,
                is_active: true,
                last_paid_date: None,
                current_streak: 0,
                longest_streak: 0,
                total_payments: 0,
                on_time_payments: 0,
                notes: new_bill.notes,
                created_at: stamp(),
                updated_at: stamp(),
            })
        }

        async fn update_bill(&self, _: &str, _: &str, _: BillUpdate) -> CoreResult<Bill> {
            unimplemented!()
        }

        async fn delete_bill(&self, _: &str, _: &str) -> CoreResult<()> {
            unimplemented!()
        }

        async fn pay_bill(
            &self,
            _: &str,
            _: &str,
            _: PayBillRequest,
            _: NaiveDate,
        ) -> CoreResult<BillPaymentResult> {
            unimplemented!()
        }

        fn get_bill_summary(&self, _: &str, _: NaiveDate) -> CoreResult<BillSummary> {
            unimplemented!()
        }

        fn get_calendar(&self, _: &str, _: &str, _: NaiveDate) -> CoreResult<BillCalendar> {
            unimplemented!()
        }
    }

    pub struct MockBudgetService {
        pub statuses: Vec<BudgetStatus>,
    }

    #[async_trait]
    impl BudgetServiceTrait for MockBudgetService {
        fn list_budgets(&self, _: &str) -> CoreResult<Vec<BudgetWithCategory>> {
            Ok(self.statuses.iter().map(|s| s.budget.clone()).collect())
        }

        async fn create_budget(&self, _: &str, _: NewBudget) -> CoreResult<Budget> {
            unimplemented!()
        }

        async fn update_budget(&self, _: &str, _: &str, _: BudgetUpdate) -> CoreResult<Budget> {
            unimplemented!()
        }

        async fn delete_budget(&self, _: &str, _: &str) -> CoreResult<()> {
            unimplemented!()
        }

        fn get_budget_status(&self, _: &str, _: NaiveDate) -> CoreResult<Vec<BudgetStatus>> {
            Ok(self.statuses.clone())
        }

        fn list_templates(&self, _: &str) -> CoreResult<Vec<BudgetTemplate>> {
            unimplemented!()
        }

        async fn create_template(&self, _: &str, _: NewBudgetTemplate) -> CoreResult<BudgetTemplate> {
            unimplemented!()
        }

        async fn delete_template(&self, _: &str, _: &str) -> CoreResult<()> {
            unimplemented!()
        }

        async fn apply_template(
            &self,
            _: &str,
            _: ApplyTemplateRequest,
            _: NaiveDate,
        ) -> CoreResult<ApplyTemplateResult> {
            unimplemented!()
        }
    }

    pub struct MockGoalService {
        pub goals: Vec<GoalWithProgress>,
    }

    #[async_trait]
    impl GoalServiceTrait for MockGoalService {
        fn list_goals(&self, _: &str, _: NaiveDate) -> CoreResult<Vec<GoalWithProgress>> {
            Ok(self.goals.clone())
        }

        fn get_goal(&self, _: &str, _: &str, _: NaiveDate) -> CoreResult<GoalWithProgress> {
            unimplemented!()
        }

        async fn create_goal(&self, _: &str, _: NewGoal) -> CoreResult<Goal> {
            unimplemented!()
        }

        async fn update_goal(&self, _: &str, _: &str, _: GoalUpdate) -> CoreResult<Goal> {
            unimplemented!()
        }

        async fn delete_goal(&self, _: &str, _: &str) -> CoreResult<()> {
            unimplemented!()
        }

        async fn add_contribution(
            &self,
            _: &str,
            _: &str,
            _: NewContribution,
            _: NaiveDate,
        ) -> CoreResult<ContributionResult> {
            unimplemented!()
        }

        fn list_contributions(&self, _: &str, _: &str) -> CoreResult<Vec<GoalContribution>> {
            unimplemented!()
        }

        async fn process_auto_contributions(
            &self,
            _: &str,
            _: NaiveDate,
        ) -> CoreResult<Vec<ContributionResult>> {
            unimplemented!()
        }
    }

    pub struct MockInsightsService {
        pub forecast: Forecast,
    }

    impl InsightsServiceTrait for MockInsightsService {
        fn get_payday_pattern(&self, _: &str, _: NaiveDate) -> CoreResult<Vec<PaydayPrediction>> {
            Ok(Vec::new())
        }

        fn get_payment_schedule(&self, _: &str, _: NaiveDate) -> CoreResult<PaymentSchedule> {
            unimplemented!()
        }

        fn get_forecast(&self, _: &str, _: NaiveDate) -> CoreResult<Forecast> {
            Ok(self.forecast.clone())
        }
    }

    pub struct MockMemoryService {
        pub memories: Vec<AiMemory>,
    }

    #[async_trait]
    impl AiMemoryServiceTrait for MockMemoryService {
        fn list_memories(&self, _: &str) -> CoreResult<Vec<AiMemory>> {
            Ok(self.memories.clone())
        }

        async fn upsert_memory(&self, _: &str, _: MemoryUpsert) -> CoreResult<AiMemory> {
            unimplemented!()
        }

        async fn delete_memory(&self, _: &str, _: &str) -> CoreResult<()> {
            unimplemented!()
        }
    }

    /// Environment with one checking account, a few categories and sample
    /// bills, budgets and goals.
    pub struct MockEnvironment {
        pub config: LlmConfig,
        pub accounts: Arc<MockAccountService>,
        pub categories: Arc<MockCategoryService>,
        pub transactions: Arc<MockTransactionService>,
        pub bills: Arc<MockBillService>,
        pub budgets: Arc<MockBudgetService>,
        pub goals: Arc<MockGoalService>,
        pub insights: Arc<MockInsightsService>,
        pub memories: Arc<MockMemoryService>,
    }

    fn account(id: &str, name: &str, archived: bool) -> Account {
        Account {
            id: id.to_string(),
            user_id: USER.to_string(),
            name: name.to_string(),
            account_type: AccountType::Checking,
            balance: dec!(2500),
            currency: "USD".to_string(),
            color: None,
            icon: None,
            is_archived: archived,
            created_at: stamp(),
            updated_at: stamp(),
        }
    }

    fn category(id: &str, name: &str, category_type: CategoryType) -> Category {
        Category {
            id: id.to_string(),
            user_id: USER.to_string(),
            name: name.to_string(),
            category_type,
            color: "#16a34a".to_string(),
            icon: None,
            parent_id: None,
            created_at: stamp(),
        }
    }

    fn bill(id: &str, name: &str, amount: Decimal, due: NaiveDate, status: BillStatus) -> BillWithStatus {
        BillWithStatus {
            bill: Bill {
                id: id.to_string(),
                user_id: USER.to_string(),
                name: name.to_string(),
                amount,
                frequency: BillFrequency::Monthly,
                next_due_date: due,
                category_id: None,
                account_id: None,
                is_autopay: false,
                reminder_days: 3,
                is_active: true,
                last_paid_date: None,
                current_streak: 0,
                longest_streak: 0,
                total_payments: 0,
                on_time_payments: 0,
                notes: None,
                created_at: stamp(),
                updated_at: stamp(),
            },
            status,
            days_until_due: (due - today()).num_days(),
            monthly_equivalent: amount,
            on_time_rate: None,
        }
    }

    fn budget_status(category: &str, amount: Decimal, spent: Decimal) -> BudgetStatus {
        let (period_start, period_end) = BudgetPeriod::Monthly.window(today());
        let percent_used = (spent / amount * Decimal::ONE_HUNDRED).round_dp(2);
        BudgetStatus {
            budget: BudgetWithCategory {
                budget: Budget {
                    id: format!("budget-{}", category.to_lowercase()),
                    user_id: USER.to_string(),
                    category_id: category.to_lowercase(),
                    amount,
                    period: BudgetPeriod::Monthly,
                    start_date: period_start,
                    alert_threshold: 80,
                    created_at: stamp(),
                    updated_at: stamp(),
                },
                category_name: category.to_string(),
                category_color: None,
            },
            period_start,
            period_end,
            spent,
            remaining: amount - spent,
            percent_used,
            is_over_budget: spent > amount,
            is_alert: percent_used >= Decimal::from(80),
        }
    }

    fn goal(name: &str, target: Decimal, current: Decimal) -> GoalWithProgress {
        GoalWithProgress::from_goal(
            Goal {
                id: format!("goal-{}", name.to_lowercase().replace(' ', "-")),
                user_id: USER.to_string(),
                name: name.to_string(),
                target_amount: target,
                current_amount: current,
                target_date: Some(d(2024, 12, 31)),
                color: None,
                icon: None,
                is_completed: current >= target,
                auto_contribute: false,
                contribution_amount: None,
                contribution_frequency: None,
                account_id: None,
                created_at: stamp(),
                updated_at: stamp(),
            },
            today(),
        )
    }

    impl MockEnvironment {
        pub fn new() -> Self {
            let accounts = vec![
                account("acc-old", "Old Checking", true),
                account("acc-main", "Everyday Checking", false),
            ];
            let categories = vec![
                category("groceries", "Groceries", CategoryType::Expense),
                category("dining", "Dining Out", CategoryType::Expense),
                category("salary", "Salary", CategoryType::Income),
            ];
            let transactions = MockTransactionService {
                rows: RwLock::new(Vec::new()),
                accounts: accounts.clone(),
                categories: categories.clone(),
            };
            let forecast = Forecast {
                month: "2024-06".to_string(),
                days_elapsed: 15,
                days_in_month: 30,
                spent_so_far: dec!(900),
                income_so_far: dec!(3000),
                daily_average: dec!(60),
                projected_spending: dec!(1800),
                remaining_bills: dec!(450),
                projected_net: dec!(750),
                total_budget: dec!(2000),
                budget_variance: Some(dec!(200)),
            };

            Self {
                config: LlmConfig::default(),
                accounts: Arc::new(MockAccountService {
                    accounts: accounts.clone(),
                    unavailable: false,
                }),
                categories: Arc::new(MockCategoryService {
                    categories: categories.clone(),
                }),
                transactions: Arc::new(transactions),
                bills: Arc::new(MockBillService {
                    bills: vec![
                        bill("bill-rent", "Rent", dec!(1200), d(2024, 7, 1), BillStatus::Upcoming),
                        bill("bill-phone", "Phone", dec!(45), d(2024, 6, 12), BillStatus::Overdue),
                        bill("bill-gym", "Gym", dec!(30), d(2024, 9, 1), BillStatus::Upcoming),
                    ],
                    created: RwLock::new(Vec::new()),
                }),
                budgets: Arc::new(MockBudgetService {
                    statuses: vec![
                        budget_status("Groceries", dec!(400), dec!(420)),
                        budget_status("Dining Out", dec!(200), dec!(90)),
                    ],
                }),
                goals: Arc::new(MockGoalService {
                    goals: vec![
                        goal("Emergency Fund", dec!(5000), dec!(2000)),
                        goal("Vacation", dec!(1000), dec!(1000)),
                    ],
                }),
                insights: Arc::new(MockInsightsService { forecast }),
                memories: Arc::new(MockMemoryService {
                    memories: vec![AiMemory {
                        id: "mem-1".to_string(),
                        user_id: USER.to_string(),
                        key: "payday".to_string(),
                        value: "Paid on the 1st".to_string(),
                        created_at: stamp(),
                        updated_at: stamp(),
                    }],
                }),
            }
        }

        pub fn with_transactions(self, rows: Vec<NewTransaction>) -> Self {
            for row in rows {
                self.transactions.seed(row);
            }
            self
        }
    }

    impl AiEnvironment for MockEnvironment {
        fn llm_config(&self) -> LlmConfig {
            self.config.clone()
        }

        fn today(&self) -> NaiveDate {
            today()
        }

        fn account_service(&self) -> Arc<dyn AccountServiceTrait> {
            self.accounts.clone()
        }

        fn category_service(&self) -> Arc<dyn CategoryServiceTrait> {
            self.categories.clone()
        }

        fn transaction_service(&self) -> Arc<dyn TransactionServiceTrait> {
            self.transactions.clone()
        }

        fn bill_service(&self) -> Arc<dyn BillServiceTrait> {
            self.bills.clone()
        }

        fn budget_service(&self) -> Arc<dyn BudgetServiceTrait> {
            self.budgets.clone()
        }

        fn goal_service(&self) -> Arc<dyn GoalServiceTrait> {
            self.goals.clone()
        }

        fn insights_service(&self) -> Arc<dyn InsightsServiceTrait> {
            self.insights.clone()
        }

        fn memory_service(&self) -> Arc<dyn AiMemoryServiceTrait> {
            self.memories.clone()
        }
    }

    /// Builds an expense row for seeding.
    pub fn expense(description: &str, category_id: Option<&str>, amount: Decimal, date: NaiveDate) -> NewTransaction {
        NewTransaction {
            account_id: "acc-main".to_string(),
            category_id: category_id.map(str::to_string),
            amount,
            transaction_type: TransactionType::Expense,
            description: description.to_string(),
            merchant: None,
            date,
            notes: None,
            tag_ids: Vec::new(),
            recurring_id: None,
        }
    }
}
