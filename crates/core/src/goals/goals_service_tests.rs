use crate::errors::{Error, Result};
use crate::goals::{
    ContributionFrequency, Goal, GoalContribution, GoalRepositoryTrait, GoalService,
    GoalServiceTrait, GoalUpdate, GoalWithProgress, NewContribution, NewGoal,
};
use crate::test_support::d;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockGoalRepository {
    goals: Mutex<Vec<Goal>>,
    contributions: Mutex<Vec<GoalContribution>>,
}

fn goal(id: &str, target: Decimal, current: Decimal) -> Goal {
    Goal {
        id: id.to_string(),
        user_id: "u1".to_string(),
        name: id.to_string(),
        target_amount: target,
        current_amount: current,
        target_date: None,
        color: None,
        icon: None,
        is_completed: false,
        auto_contribute: false,
        contribution_amount: None,
        contribution_frequency: None,
        account_id: None,
        created_at: d(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap(),
        updated_at: NaiveDateTime::default(),
    }
}

#[async_trait]
impl GoalRepositoryTrait for MockGoalRepository {
    fn list(&self, user_id: &str) -> Result<Vec<Goal>> {
        Ok(self
            .goals
            .lock()
            .unwrap()
            .iter()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect())
    }

    fn get_by_id(&self, user_id: &str, goal_id: &str) -> Result<Goal> {
        self.list(user_id)?
            .into_iter()
            .find(|g| g.id == goal_id)
            .ok_or_else(|| Error::not_found("Goal"))
    }

    async fn create(&self, _: &str, _: NewGoal) -> Result<Goal> {
        unimplemented!()
    }

    async fn update(&self, _: &str, _: &str, _: GoalUpdate) -> Result<Goal> {
        unimplemented!()
    }

    async fn delete(&self, _: &str, _: &str) -> Result<usize> {
        Ok(0)
    }

    async fn add_contribution(
        &self,
        user_id: &str,
        goal_id: &str,
        amount: Decimal,
        date: NaiveDate,
        note: Option<String>,
    ) -> Result<(GoalContribution, Goal)> {
        let mut goals = self.goals.lock().unwrap();
        let g = goals
            .iter_mut()
            .find(|g| g.user_id == user_id && g.id == goal_id)
            .ok_or_else(|| Error::not_found("Goal"))?;
        g.current_amount += amount;
        g.is_completed = g.current_amount >= g.target_amount;
        let mut contributions = self.contributions.lock().unwrap();
        let c = GoalContribution {
            id: format!("c{}", contributions.len() + 1),
            goal_id: goal_id.to_string(),
            user_id: user_id.to_string(),
            amount,
            date,
            note,
            created_at: NaiveDateTime::default(),
        };
        contributions.push(c.clone());
        Ok((c, g.clone()))
    }

    fn list_contributions(&self, _: &str, goal_id: &str) -> Result<Vec<GoalContribution>> {
        Ok(self
            .contributions
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.goal_id == goal_id)
            .cloned()
            .collect())
    }

    fn last_contribution_date(&self, _: &str, goal_id: &str) -> Result<Option<NaiveDate>> {
        Ok(self
            .contributions
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.goal_id == goal_id)
            .map(|c| c.date)
            .max())
    }
}

#[test]
fn test_progress_with_target_date() {
    let mut g = goal("car", dec!(12000), dec!(3000));
    g.target_date = Some(d(2024, 12, 1));
    let progress = GoalWithProgress::from_goal(g, d(2024, 6, 1));
    assert_eq!(progress.percent, dec!(25));
    assert_eq!(progress.remaining, dec!(9000));
    assert_eq!(progress.months_remaining, Some(6));
    assert_eq!(progress.monthly_needed, Some(dec!(1500)));
    // 152 of 335 days elapsed, so 45% would be expected by now
    assert!(!progress.is_on_track);
}

#[test]
fn test_progress_auto_contribution_keeps_goal_on_track() {
    let mut g = goal("trip", dec!(1200), dec!(0));
    g.target_date = Some(d(2024, 12, 1));
    g.auto_contribute = true;
    g.contribution_amount = Some(dec!(50));
    g.contribution_frequency = Some(ContributionFrequency::Weekly);
    // needs 200/month, weekly 50 ~ 216.5/month
    assert!(GoalWithProgress::from_goal(g, d(2024, 6, 1)).is_on_track);
}

#[test]
fn test_overdue_goal_is_off_track() {
    let mut g = goal("late", dec!(100), dec!(10));
    g.target_date = Some(d(2024, 5, 1));
    let progress = GoalWithProgress::from_goal(g, d(2024, 6, 1));
    assert!(!progress.is_on_track);
    assert_eq!(progress.monthly_needed, Some(dec!(90)));
}

#[tokio::test]
async fn test_contribution_completes_goal() {
    let repo = Arc::new(MockGoalRepository::default());
    repo.goals
        .lock()
        .unwrap()
        .push(goal("fund", dec!(1000), dec!(900)));
    let service = GoalService::new(repo);

    let result = service
        .add_contribution(
            "u1",
            "fund",
            NewContribution {
                amount: dec!(150),
                date: None,
                note: None,
            },
            d(2024, 6, 1),
        )
        .await
        .unwrap();
    assert!(result.goal.goal.is_completed);
    assert_eq!(result.goal.percent, dec!(100));
    assert_eq!(result.goal.remaining, Decimal::ZERO);
    assert_eq!(result.contribution.date, d(2024, 6, 1));
}

#[tokio::test]
async fn test_auto_contributions_follow_schedule() {
    let repo = Arc::new(MockGoalRepository::default());
    let mut auto = goal("house", dec!(10000), dec!(0));
    auto.auto_contribute = true;
    auto.contribution_amount = Some(dec!(250));
    auto.contribution_frequency = Some(ContributionFrequency::Monthly);
    repo.goals.lock().unwrap().push(auto);
    repo.goals
        .lock()
        .unwrap()
        .push(goal("manual", dec!(500), dec!(0)));
    let service = GoalService::new(repo.clone());

    let first = service
        .process_auto_contributions("u1", d(2024, 6, 15))
        .await
        .unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].goal.goal.current_amount, dec!(250));

    let too_soon = service
        .process_auto_contributions("u1", d(2024, 7, 14))
        .await
        .unwrap();
    assert!(too_soon.is_empty());

    let next = service
        .process_auto_contributions("u1", d(2024, 7, 15))
        .await
        .unwrap();
    assert_eq!(next.len(), 1);
    assert_eq!(service.list_contributions("u1", "house").unwrap().len(), 2);
}

#[tokio::test]
async fn test_auto_contribution_caps_at_remaining() {
    let repo = Arc::new(MockGoalRepository::default());
    let mut nearly = goal("tv", dec!(1000), dec!(980));
    nearly.auto_contribute = true;
    nearly.contribution_amount = Some(dec!(100));
    nearly.contribution_frequency = Some(ContributionFrequency::Weekly);
    repo.goals.lock().unwrap().push(nearly);
    let service = GoalService::new(repo);

    let results = service
        .process_auto_contributions("u1", d(2024, 6, 1))
        .await
        .unwrap();
    assert_eq!(results[0].contribution.amount, dec!(20));
    assert!(results[0].goal.goal.is_completed);
}

#[tokio::test]
async fn test_enabling_auto_contribute_requires_schedule() {
    let repo = Arc::new(MockGoalRepository::default());
    repo.goals
        .lock()
        .unwrap()
        .push(goal("fund", dec!(1000), dec!(0)));
    let service = GoalService::new(repo);
    let err = service
        .update_goal(
            "u1",
            "fund",
            GoalUpdate {
                auto_contribute: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}
