/*
 * Responsibility
 * - jobs の in-memory 保存 (連番 id)
 * - filter (title / minSalary / hasEquity) を適用した一覧
 */
use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq)]
pub struct JobRow {
    pub id: i64,
    pub title: String,
    pub salary: Option<i64>,
    pub equity: Option<f64>,
    pub company_handle: String,
}

#[derive(Debug)]
pub struct NewJob {
    pub title: String,
    pub salary: Option<i64>,
    pub equity: Option<f64>,
    pub company_handle: String,
}

/// Partial update; the outer `None` leaves the field unchanged, `Some(None)` clears it.
#[derive(Debug, Default)]
pub struct JobChanges {
    pub title: Option<String>,
    pub salary: Option<Option<i64>>,
    pub equity: Option<Option<f64>>,
}

#[derive(Debug, Default, Clone)]
pub struct JobFilter {
    /// Case-insensitive substring match.
    pub title: Option<String>,
    pub min_salary: Option<i64>,
    /// `true` keeps only jobs with non-zero equity; `false` applies no filter.
    pub has_equity: bool,
}

impl JobFilter {
    fn matches(&self, job: &JobRow) -> bool {
        if let Some(title) = &self.title
            && !job.title.to_lowercase().contains(&title.to_lowercase())
        {
            return false;
        }
        if let Some(min) = self.min_salary
            && job.salary.is_none_or(|s| s < min)
        {
            return false;
        }
        if self.has_equity && job.equity.is_none_or(|e| e <= 0.0) {
            return false;
        }
        true
    }
}

#[derive(Debug, Default)]
struct JobStore {
    next_id: i64,
    jobs: BTreeMap<i64, JobRow>,
}

#[derive(Clone, Debug, Default)]
pub struct JobRepo {
    store: Arc<RwLock<JobStore>>,
}

impl JobRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, job: NewJob) -> JobRow {
        let mut store = self.store.write().await;
        store.next_id += 1;
        let row = JobRow {
            id: store.next_id,
            title: job.title,
            salary: job.salary,
            equity: job.equity,
            company_handle: job.company_handle,
        };
        store.jobs.insert(row.id, row.clone());
        row
    }

    /// Ordered by title, then id.
    pub async fn list(&self, filter: &JobFilter) -> Vec<JobRow> {
        let store = self.store.read().await;
        let mut rows: Vec<JobRow> = store
            .jobs
            .values()
            .filter(|job| filter.matches(job))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        rows
    }

    pub async fn get(&self, id: i64) -> Option<JobRow> {
        self.store.read().await.jobs.get(&id).cloned()
    }

    pub async fn update(&self, id: i64, changes: JobChanges) -> Option<JobRow> {
        let mut store = self.store.write().await;
        let row = store.jobs.get_mut(&id)?;

        if let Some(title) = changes.title {
            row.title = title;
        }
        if let Some(salary) = changes.salary {
            row.salary = salary;
        }
        if let Some(equity) = changes.equity {
            row.equity = equity;
        }

        Some(row.clone())
    }

    pub async fn delete(&self, id: i64) -> bool {
        self.store.write().await.jobs.remove(&id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> JobRepo {
        let repo = JobRepo::new();
        for (title, salary, equity) in [
            ("Engineer", Some(120_000), Some(0.05)),
            ("Accountant", Some(80_000), Some(0.0)),
            ("Senior Engineer", None, None),
        ] {
            repo.create(NewJob {
                title: title.to_string(),
                salary,
                equity,
                company_handle: "c1".to_string(),
            })
            .await;
        }
        repo
    }

    fn titles(rows: &[JobRow]) -> Vec<&str> {
        rows.iter().map(|j| j.title.as_str()).collect()
    }

    #[tokio::test]
    async fn ids_are_sequential() {
        let repo = seeded().await;
        let ids: Vec<_> = repo
            .list(&JobFilter::default())
            .await
            .into_iter()
            .map(|j| j.id)
            .collect();
        assert_eq!(ids, [2, 1, 3]);
    }

    #[tokio::test]
    async fn title_filter_is_case_insensitive() {
        let repo = seeded().await;
        let filter = JobFilter {
            title: Some("engineer".to_string()),
            ..Default::default()
        };
        assert_eq!(
            titles(&repo.list(&filter).await),
            ["Engineer", "Senior Engineer"]
        );
    }

    #[tokio::test]
    async fn min_salary_excludes_missing_salary() {
        let repo = seeded().await;
        let filter = JobFilter {
            min_salary: Some(100_000),
            ..Default::default()
        };
        assert_eq!(titles(&repo.list(&filter).await), ["Engineer"]);
    }

    #[tokio::test]
    async fn has_equity_keeps_only_positive_equity() {
        let repo = seeded().await;
        let filter = JobFilter {
            has_equity: true,
            ..Default::default()
        };
        assert_eq!(titles(&repo.list(&filter).await), ["Engineer"]);

        // false means "no filter", not "no equity"
        assert_eq!(repo.list(&JobFilter::default()).await.len(), 3);
    }

    #[tokio::test]
    async fn update_can_clear_optional_fields() {
        let repo = seeded().await;
        let updated = repo
            .update(
                1,
                JobChanges {
                    salary: Some(None),
                    ..Default::default()
                },
            )
            .await
            .expect("job exists");

        assert_eq!(updated.salary, None);
        assert_eq!(updated.equity, Some(0.05));
        assert_eq!(updated.title, "Engineer");
    }

    #[tokio::test]
    async fn delete_then_get_is_none() {
        let repo = seeded().await;
        assert!(repo.delete(1).await);
        assert!(!repo.delete(1).await);
        assert!(repo.get(1).await.is_none());
    }
}
