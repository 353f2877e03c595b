use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::dsl::max;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;
use std::sync::Arc;

use pocketpilot_core::goals::{Goal, GoalContribution, GoalRepositoryTrait, GoalUpdate, NewGoal};
use pocketpilot_core::Result;

use super::model::{GoalContributionDB, GoalDB};
use crate::accounts::load_account;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound};
use crate::schema::{goal_contributions, goals};
use crate::utils::{decimal_to_db, new_id, now};

pub struct GoalRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl GoalRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        GoalRepository { pool, writer }
    }
}

fn load_goal(conn: &mut SqliteConnection, user_id: &str, goal_id: &str) -> Result<GoalDB> {
    goals::table
        .filter(goals::id.eq(goal_id))
        .filter(goals::user_id.eq(user_id))
        .select(GoalDB::as_select())
        .first(conn)
        .or_not_found("Goal")
}

fn check_account(conn: &mut SqliteConnection, row: &GoalDB) -> Result<()> {
    if let Some(account_id) = &row.account_id {
        load_account(conn, &row.user_id, account_id)?;
    }
    Ok(())
}

#[async_trait]
impl GoalRepositoryTrait for GoalRepository {
    fn list(&self, user_id: &str) -> Result<Vec<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = goals::table
            .filter(goals::user_id.eq(user_id))
            .order((goals::is_completed.asc(), goals::created_at.asc()))
            .select(GoalDB::as_select())
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Goal::from).collect())
    }

    fn get_by_id(&self, user_id: &str, goal_id: &str) -> Result<Goal> {
        let mut conn = get_connection(&self.pool)?;
        load_goal(&mut conn, user_id, goal_id).map(Goal::from)
    }

    async fn create(&self, user_id: &str, new_goal: NewGoal) -> Result<Goal> {
        let row = GoalDB::from_new(user_id, new_goal);
        self.writer
            .exec(move |conn| -> Result<Goal> {
                check_account(conn, &row)?;
                diesel::insert_into(goals::table)
                    .values(&row)
                    .returning(GoalDB::as_returning())
                    .get_result(conn)
                    .into_core()
                    .map(Goal::from)
            })
            .await
    }

    async fn update(&self, user_id: &str, goal_id: &str, update: GoalUpdate) -> Result<Goal> {
        let user_id = user_id.to_string();
        let goal_id = goal_id.to_string();
        self.writer
            .exec(move |conn| -> Result<Goal> {
                let mut row = load_goal(conn, &user_id, &goal_id)?;
                row.apply(update);
                check_account(conn, &row)?;
                diesel::update(goals::table.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn delete(&self, user_id: &str, goal_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let goal_id = goal_id.to_string();
        self.writer
            .exec(move |conn| -> Result<usize> {
                diesel::delete(
                    goals::table
                        .filter(goals::id.eq(&goal_id))
                        .filter(goals::user_id.eq(&user_id)),
                )
                .execute(conn)
                .into_core()
            })
            .await
    }

    async fn add_contribution(
        &self,
        user_id: &str,
        goal_id: &str,
        amount: Decimal,
        date: NaiveDate,
        note: Option<String>,
    ) -> Result<(GoalContribution, Goal)> {
        let user_id = user_id.to_string();
        let goal_id = goal_id.to_string();
        self.writer
            .exec(move |conn| -> Result<(GoalContribution, Goal)> {
                let mut goal = load_goal(conn, &user_id, &goal_id)?;

                let contribution = diesel::insert_into(goal_contributions::table)
                    .values(&GoalContributionDB {
                        id: new_id(),
                        goal_id: goal.id.clone(),
                        user_id: user_id.clone(),
                        amount: decimal_to_db(amount),
                        date,
                        note,
                        created_at: now(),
                    })
                    .returning(GoalContributionDB::as_returning())
                    .get_result(conn)
                    .into_core()?;

                let current = goal.current() + amount;
                goal.set_current(current);
                diesel::update(goals::table.find(&goal.id))
                    .set((
                        goals::current_amount.eq(&goal.current_amount),
                        goals::is_completed.eq(goal.is_completed),
                        goals::updated_at.eq(goal.updated_at),
                    ))
                    .execute(conn)
                    .into_core()?;

                Ok((contribution.into(), goal.into()))
            })
            .await
    }

    fn list_contributions(&self, user_id: &str, goal_id: &str) -> Result<Vec<GoalContribution>> {
        let mut conn = get_connection(&self.pool)?;
        load_goal(&mut conn, user_id, goal_id)?;
        let rows = goal_contributions::table
            .filter(goal_contributions::goal_id.eq(goal_id))
            .order((
                goal_contributions::date.desc(),
                goal_contributions::created_at.desc(),
            ))
            .select(GoalContributionDB::as_select())
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(GoalContribution::from).collect())
    }

    fn last_contribution_date(&self, user_id: &str, goal_id: &str) -> Result<Option<NaiveDate>> {
        let mut conn = get_connection(&self.pool)?;
        goal_contributions::table
            .filter(goal_contributions::goal_id.eq(goal_id))
            .filter(goal_contributions::user_id.eq(user_id))
            .select(max(goal_contributions::date))
            .first::<Option<NaiveDate>>(&mut conn)
            .into_core()
    }
}
