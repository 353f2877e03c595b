use crate::errors::Result;
use crate::goals::goals_model::{
    ContributionResult, Goal, GoalContribution, GoalUpdate, GoalWithProgress, NewContribution,
    NewGoal,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Trait for goal repository operations
#[async_trait]
pub trait GoalRepositoryTrait: Send + Sync {
    fn list(&self, user_id: &str) -> Result<Vec<Goal>>;
    fn get_by_id(&self, user_id: &str, goal_id: &str) -> Result<Goal>;
    async fn create(&self, user_id: &str, new_goal: NewGoal) -> Result<Goal>;
    async fn update(&self, user_id: &str, goal_id: &str, update: GoalUpdate) -> Result<Goal>;
    async fn delete(&self, user_id: &str, goal_id: &str) -> Result<usize>;
    /// Inserts the contribution and raises `current_amount` in one database
    /// transaction, marking the goal completed once it reaches the target.
    async fn add_contribution(
        &self,
        user_id: &str,
        goal_id: &str,
        amount: Decimal,
        date: NaiveDate,
        note: Option<String>,
    ) -> Result<(GoalContribution, Goal)>;
    /// Contributions newest first.
    fn list_contributions(&self, user_id: &str, goal_id: &str) -> Result<Vec<GoalContribution>>;
    fn last_contribution_date(&self, user_id: &str, goal_id: &str) -> Result<Option<NaiveDate>>;
}

/// Trait for goal service operations
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    fn list_goals(&self, user_id: &str, today: NaiveDate) -> Result<Vec<GoalWithProgress>>;
    fn get_goal(&self, user_id: &str, goal_id: &str, today: NaiveDate) -> Result<GoalWithProgress>;
    async fn create_goal(&self, user_id: &str, new_goal: NewGoal) -> Result<Goal>;
    async fn update_goal(&self, user_id: &str, goal_id: &str, update: GoalUpdate) -> Result<Goal>;
    async fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<()>;
    async fn add_contribution(
        &self,
        user_id: &str,
        goal_id: &str,
        contribution: NewContribution,
        today: NaiveDate,
    ) -> Result<ContributionResult>;
    fn list_contributions(&self, user_id: &str, goal_id: &str) -> Result<Vec<GoalContribution>>;
    /// Adds the scheduled contribution to every auto-contributing goal that is due.
    async fn process_auto_contributions(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<Vec<ContributionResult>>;
}
