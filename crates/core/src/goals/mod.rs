//! Goals module - savings targets, contributions and progress tracking.

mod goals_model;
mod goals_service;
mod goals_traits;

#[cfg(test)]
mod goals_service_tests;

pub use goals_model::{
    ContributionFrequency, ContributionResult, Goal, GoalContribution, GoalUpdate,
    GoalWithProgress, NewContribution, NewGoal,
};
pub use goals_service::GoalService;
pub use goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
