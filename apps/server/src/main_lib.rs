use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{ai_environment::ServerAiEnvironment, auth::AuthManager, config::Config};
use pocketpilot_ai::{ChatConfig, ChatService, LlmSummaryWriter};
use pocketpilot_core::{
    accounts::{AccountService, AccountServiceTrait},
    ai::{
        AiLearningRuleRepositoryTrait, AiMemoryRepositoryTrait, AiMemoryService,
        AiMemoryServiceTrait, LearningRuleService, LearningRuleServiceTrait, SummaryService,
        SummaryServiceTrait, SummaryWriterTrait, TemplateSummaryWriter,
    },
    bills::{BillService, BillServiceTrait},
    budgets::{BudgetService, BudgetServiceTrait},
    categories::{CategoryRepositoryTrait, CategoryService, CategoryServiceTrait},
    export::{ExportService, ExportServiceTrait},
    goals::{GoalService, GoalServiceTrait},
    insights::{InsightsService, InsightsServiceTrait},
    recurring::{RecurringService, RecurringServiceTrait},
    reports::{ReportService, ReportServiceTrait},
    tags::{TagService, TagServiceTrait},
    transactions::{TransactionService, TransactionServiceTrait},
    users::UserRepositoryTrait,
};
use pocketpilot_storage_sqlite::{
    accounts::AccountRepository,
    ai::{AiLearningRuleRepository, AiMemoryRepository, AiSummaryRepository},
    bills::BillRepository,
    budgets::{BudgetRepository, BudgetTemplateRepository},
    categories::CategoryRepository,
    db,
    goals::GoalRepository,
    recurring::RecurringRepository,
    tags::TagRepository,
    transactions::TransactionRepository,
    users::UserRepository,
};

pub struct AppState {
    pub user_repository: Arc<dyn UserRepositoryTrait>,
    pub account_service: Arc<dyn AccountServiceTrait>,
    pub category_service: Arc<dyn CategoryServiceTrait>,
    pub tag_service: Arc<dyn TagServiceTrait>,
    pub transaction_service: Arc<dyn TransactionServiceTrait>,
    pub budget_service: Arc<dyn BudgetServiceTrait>,
    pub bill_service: Arc<dyn BillServiceTrait>,
    pub goal_service: Arc<dyn GoalServiceTrait>,
    pub recurring_service: Arc<dyn RecurringServiceTrait>,
    pub insights_service: Arc<dyn InsightsServiceTrait>,
    pub report_service: Arc<dyn ReportServiceTrait>,
    pub export_service: Arc<dyn ExportServiceTrait>,
    pub memory_service: Arc<dyn AiMemoryServiceTrait>,
    pub rule_service: Arc<dyn LearningRuleServiceTrait>,
    pub summary_service: Arc<dyn SummaryServiceTrait>,
    pub ai_chat_service: Arc<ChatService<ServerAiEnvironment>>,
    pub auth: Arc<AuthManager>,
    pub db_path: String,
}

pub fn init_tracing() {
    let log_format = std::env::var("PP_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let result = if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .try_init()
    };
    if let Err(e) = result {
        eprintln!("Tracing already initialised: {e}");
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let user_repository = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let account_repository = Arc::new(AccountRepository::new(pool.clone(), writer.clone()));
    let category_repository = Arc::new(CategoryRepository::new(pool.clone(), writer.clone()));
    let tag_repository = Arc::new(TagRepository::new(pool.clone(), writer.clone()));
    let transaction_repository =
        Arc::new(TransactionRepository::new(pool.clone(), writer.clone()));
    let budget_repository = Arc::new(BudgetRepository::new(pool.clone(), writer.clone()));
    let template_repository =
        Arc::new(BudgetTemplateRepository::new(pool.clone(), writer.clone()));
    let bill_repository = Arc::new(BillRepository::new(pool.clone(), writer.clone()));
    let goal_repository = Arc::new(GoalRepository::new(pool.clone(), writer.clone()));
    let recurring_repository = Arc::new(RecurringRepository::new(pool.clone(), writer.clone()));
    let memory_repository: Arc<dyn AiMemoryRepositoryTrait> =
        Arc::new(AiMemoryRepository::new(pool.clone(), writer.clone()));
    let rule_repository: Arc<dyn AiLearningRuleRepositoryTrait> =
        Arc::new(AiLearningRuleRepository::new(pool.clone(), writer.clone()));
    let summary_repository = Arc::new(AiSummaryRepository::new(pool.clone(), writer.clone()));

    let account_service: Arc<dyn AccountServiceTrait> =
        Arc::new(AccountService::new(account_repository.clone()));
    let category_service: Arc<dyn CategoryServiceTrait> =
        Arc::new(CategoryService::new(category_repository.clone()));
    let tag_service: Arc<dyn TagServiceTrait> = Arc::new(TagService::new(tag_repository.clone()));
    let rule_service: Arc<dyn LearningRuleServiceTrait> = Arc::new(LearningRuleService::new(
        rule_repository,
        category_repository.clone() as Arc<dyn CategoryRepositoryTrait>,
    ));
    let transaction_service: Arc<dyn TransactionServiceTrait> = Arc::new(TransactionService::new(
        transaction_repository.clone(),
        tag_service.clone(),
        rule_service.clone(),
    ));
    let budget_service: Arc<dyn BudgetServiceTrait> = Arc::new(BudgetService::new(
        budget_repository.clone(),
        template_repository,
        transaction_repository.clone(),
        category_service.clone(),
    ));
    let bill_service: Arc<dyn BillServiceTrait> = Arc::new(BillService::new(
        bill_repository.clone(),
        account_repository.clone(),
        transaction_service.clone(),
    ));
    let goal_service: Arc<dyn GoalServiceTrait> =
        Arc::new(GoalService::new(goal_repository.clone()));
    let recurring_service: Arc<dyn RecurringServiceTrait> = Arc::new(RecurringService::new(
        recurring_repository.clone(),
        account_repository.clone(),
        transaction_repository.clone(),
    ));
    let insights_service: Arc<dyn InsightsServiceTrait> = Arc::new(InsightsService::new(
        transaction_repository.clone(),
        account_repository.clone(),
        bill_repository.clone(),
        budget_repository.clone(),
    ));
    let report_service: Arc<dyn ReportServiceTrait> = Arc::new(ReportService::new(
        transaction_repository.clone(),
        category_service.clone(),
    ));
    let export_service: Arc<dyn ExportServiceTrait> = Arc::new(ExportService::new(
        account_repository,
        category_repository,
        transaction_repository,
        budget_repository,
        bill_repository,
        goal_repository,
        recurring_repository,
        tag_repository,
    ));
    let memory_service: Arc<dyn AiMemoryServiceTrait> =
        Arc::new(AiMemoryService::new(memory_repository.clone()));

    // Summaries fall back to the template writer when no provider key is configured
    let summary_writer: Arc<dyn SummaryWriterTrait> = if config.llm.is_configured() {
        tracing::info!("LLM summaries enabled with model {}", config.llm.model());
        Arc::new(LlmSummaryWriter::new(config.llm.clone()))
    } else {
        Arc::new(TemplateSummaryWriter)
    };
    let summary_service: Arc<dyn SummaryServiceTrait> = Arc::new(SummaryService::new(
        summary_repository,
        memory_repository,
        report_service.clone(),
        summary_writer,
    ));

    let ai_environment = Arc::new(ServerAiEnvironment {
        llm: config.llm.clone(),
        account_service: account_service.clone(),
        category_service: category_service.clone(),
        transaction_service: transaction_service.clone(),
        bill_service: bill_service.clone(),
        budget_service: budget_service.clone(),
        goal_service: goal_service.clone(),
        insights_service: insights_service.clone(),
        memory_service: memory_service.clone(),
    });
    let ai_chat_service = Arc::new(ChatService::new(ai_environment, ChatConfig::default()));

    let auth = Arc::new(AuthManager::new(&config.jwt_secret, config.token_ttl));

    Ok(Arc::new(AppState {
        user_repository,
        account_service,
        category_service,
        tag_service,
        transaction_service,
        budget_service,
        bill_service,
        goal_service,
        recurring_service,
        insights_service,
        report_service,
        export_service,
        memory_service,
        rule_service,
        summary_service,
        ai_chat_service,
        auth,
        db_path,
    }))
}
