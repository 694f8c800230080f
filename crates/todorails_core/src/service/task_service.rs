//! Task use-case service.
//!
//! # Responsibility
//! - Provide CRUD entry points and derived views (pending, completed, due
//!   today) over `TaskRepository`.
//! - Enforce title uniqueness and existence checks before writes.
//!
//! # Invariants
//! - Service holds no state between calls.
//! - Title checks are early exits; the storage unique index is the real
//!   guard, and its violation maps to `ServiceError::Duplicate`.
//! - Derived views fetch every task and filter in memory. Fine for small
//!   working sets; push predicates into the repository if that changes.

use super::error::{EntityKind, ServiceError, ServiceResult};
use crate::model::task::{Task, TaskId};
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoError;
use chrono::{Local, NaiveDate};
use log::{info, warn};

/// Use-case service for task records.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists a new task and returns it with its assigned id.
    ///
    /// # Errors
    /// - `Validation` when the title is blank.
    /// - `Duplicate` when another task already uses the title.
    pub fn add_task(&self, task: &Task) -> ServiceResult<Task> {
        task.validate()?;

        if self.repo.find_by_title(&task.title).map_err(repo_err)?.is_some() {
            warn!("event=task_add module=service status=error error_code=duplicate_title");
            return Err(ServiceError::duplicate(EntityKind::Task, "title"));
        }

        let created = self.repo.save(task).map_err(repo_err)?;
        info!(
            "event=task_add module=service status=ok task_id={}",
            created.id.unwrap_or_default()
        );
        Ok(created)
    }

    pub fn get_task_by_id(&self, id: TaskId) -> ServiceResult<Task> {
        self.repo
            .find_by_id(id)
            .map_err(repo_err)?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Task, id))
    }

    pub fn get_task_by_title(&self, title: &str) -> ServiceResult<Task> {
        if title.trim().is_empty() {
            return Err(ServiceError::Validation(
                "title must not be blank".to_string(),
            ));
        }

        self.repo
            .find_by_title(title)
            .map_err(repo_err)?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Task, title))
    }

    /// Returns every task; an empty store yields an empty list.
    pub fn get_all_tasks(&self) -> ServiceResult<Vec<Task>> {
        self.repo.find_all().map_err(repo_err)
    }

    /// Overwrites the stored task sharing `task.title`.
    ///
    /// Title, description, completion flag and due date are copied onto the
    /// existing record, which keeps its id.
    pub fn update_task(&self, task: &Task) -> ServiceResult<Task> {
        task.validate()?;

        let Some(mut existing) = self.repo.find_by_title(&task.title).map_err(repo_err)? else {
            warn!("event=task_update module=service status=error error_code=not_found");
            return Err(ServiceError::not_found(EntityKind::Task, &task.title));
        };

        existing.title = task.title.clone();
        existing.description = task.description.clone();
        existing.completed = task.completed;
        existing.due_date = task.due_date;

        self.repo.save(&existing).map_err(repo_err)
    }

    /// Removes the stored task sharing `task.title`.
    pub fn delete_task(&self, task: &Task) -> ServiceResult<()> {
        task.validate()?;

        let Some(existing) = self.repo.find_by_title(&task.title).map_err(repo_err)? else {
            warn!("event=task_delete module=service status=error error_code=not_found");
            return Err(ServiceError::not_found(EntityKind::Task, &task.title));
        };

        self.repo.delete(&existing).map_err(repo_err)?;
        info!(
            "event=task_delete module=service status=ok task_id={}",
            existing.id.unwrap_or_default()
        );
        Ok(())
    }

    pub fn get_pending_tasks(&self) -> ServiceResult<Vec<Task>> {
        self.filter_tasks(Task::is_pending)
    }

    pub fn get_completed_tasks(&self) -> ServiceResult<Vec<Task>> {
        self.filter_tasks(|task| task.completed)
    }

    /// Returns pending tasks due on the local calendar date at call time.
    pub fn get_today_tasks(&self) -> ServiceResult<Vec<Task>> {
        self.get_tasks_due_on(Local::now().date_naive())
    }

    /// Returns pending tasks due on `date`.
    pub fn get_tasks_due_on(&self, date: NaiveDate) -> ServiceResult<Vec<Task>> {
        self.filter_tasks(|task| task.is_due_on(date))
    }

    fn filter_tasks(&self, predicate: impl Fn(&Task) -> bool) -> ServiceResult<Vec<Task>> {
        let tasks = self.get_all_tasks()?;
        Ok(tasks.into_iter().filter(|task| predicate(task)).collect())
    }
}

fn repo_err(err: RepoError) -> ServiceError {
    ServiceError::from_repo(EntityKind::Task, err)
}
