use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::goals_model::{
    ContributionResult, Goal, GoalContribution, GoalUpdate, GoalWithProgress, NewContribution,
    NewGoal,
};
use super::goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
use crate::errors::{Error, Result};

const AUTO_CONTRIBUTION_NOTE: &str = "Automatic contribution";

pub struct GoalService {
    repository: Arc<dyn GoalRepositoryTrait>,
}

impl GoalService {
    pub fn new(repository: Arc<dyn GoalRepositoryTrait>) -> Self {
        Self { repository }
    }

    /// The amount due for `goal` on `today`, if its schedule says a contribution is owed.
    fn due_auto_contribution(&self, user_id: &str, goal: &Goal, today: NaiveDate) -> Result<Option<Decimal>> {
        if !goal.auto_contribute || goal.is_completed {
            return Ok(None);
        }
        let (Some(amount), Some(frequency)) = (goal.contribution_amount, goal.contribution_frequency)
        else {
            return Ok(None);
        };
        let due = match self.repository.last_contribution_date(user_id, &goal.id)? {
            Some(last) => frequency.next_after(last) <= today,
            None => true,
        };
        if !due {
            return Ok(None);
        }
        let remaining = goal.target_amount - goal.current_amount;
        let amount = amount.min(remaining);
        Ok((amount > Decimal::ZERO).then_some(amount))
    }
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    fn list_goals(&self, user_id: &str, today: NaiveDate) -> Result<Vec<GoalWithProgress>> {
        Ok(self
            .repository
            .list(user_id)?
            .into_iter()
            .map(|g| GoalWithProgress::from_goal(g, today))
            .collect())
    }

    fn get_goal(&self, user_id: &str, goal_id: &str, today: NaiveDate) -> Result<GoalWithProgress> {
        let goal = self.repository.get_by_id(user_id, goal_id)?;
        Ok(GoalWithProgress::from_goal(goal, today))
    }

    async fn create_goal(&self, user_id: &str, mut new_goal: NewGoal) -> Result<Goal> {
        new_goal.validate()?;
        new_goal.name = new_goal.name.trim().to_string();
        self.repository.create(user_id, new_goal).await
    }

    async fn update_goal(&self, user_id: &str, goal_id: &str, update: GoalUpdate) -> Result<Goal> {
        let existing = self.repository.get_by_id(user_id, goal_id)?;
        update.validate(&existing)?;
        self.repository.update(user_id, goal_id, update).await
    }

    async fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<()> {
        match self.repository.delete(user_id, goal_id).await? {
            0 => Err(Error::not_found("Goal")),
            _ => Ok(()),
        }
    }

    async fn add_contribution(
        &self,
        user_id: &str,
        goal_id: &str,
        contribution: NewContribution,
        today: NaiveDate,
    ) -> Result<ContributionResult> {
        contribution.validate()?;
        let (contribution, goal) = self
            .repository
            .add_contribution(
                user_id,
                goal_id,
                contribution.amount,
                contribution.date.unwrap_or(today),
                contribution.note,
            )
            .await?;
        if goal.is_completed {
            info!("Goal {} reached its target", goal.id);
        }
        Ok(ContributionResult {
            contribution,
            goal: GoalWithProgress::from_goal(goal, today),
        })
    }

    fn list_contributions(&self, user_id: &str, goal_id: &str) -> Result<Vec<GoalContribution>> {
        self.repository.get_by_id(user_id, goal_id)?;
        self.repository.list_contributions(user_id, goal_id)
    }

    async fn process_auto_contributions(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<Vec<ContributionResult>> {
        let mut results = Vec::new();
        for goal in self.repository.list(user_id)? {
            let Some(amount) = self.due_auto_contribution(user_id, &goal, today)? else {
                continue;
            };
            match self
                .repository
                .add_contribution(
                    user_id,
                    &goal.id,
                    amount,
                    today,
                    Some(AUTO_CONTRIBUTION_NOTE.to_string()),
                )
                .await
            {
                Ok((contribution, updated)) => results.push(ContributionResult {
                    contribution,
                    goal: GoalWithProgress::from_goal(updated, today),
                }),
                Err(e) => warn!("Auto-contribution to goal {} failed: {}", goal.id, e),
            }
        }
        debug!(
            "Processed {} auto-contributions for user {}",
            results.len(),
            user_id
        );
        Ok(results)
    }
}
