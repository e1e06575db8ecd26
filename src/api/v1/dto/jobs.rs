/*
 * Responsibility
 * - Jobs の request/response DTO と一覧 filter の query
 * - hasEquity=false は「filter なし」として扱う (equity == 0 を要求しない)
 */
use serde::{Deserialize, Serialize};

use crate::api::v1::dto::double_option;
use crate::repos::job_repo::{JobChanges, JobFilter, JobRow, NewJob};

fn validate_salary(salary: Option<i64>) -> Result<(), String> {
    match salary {
        Some(s) if s < 0 => Err("salary must be >= 0".to_string()),
        _ => Ok(()),
    }
}

fn validate_equity(equity: Option<f64>) -> Result<(), String> {
    match equity {
        Some(e) if !(0.0..=1.0).contains(&e) => Err("equity must be between 0 and 1".to_string()),
        _ => Ok(()),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateJobRequest {
    pub title: String,
    pub salary: Option<i64>,
    pub equity: Option<f64>,
    pub company_handle: String,
}

impl CreateJobRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is required".to_string());
        }
        if self.company_handle.trim().is_empty() {
            return Err("companyHandle is required".to_string());
        }
        validate_salary(self.salary)?;
        validate_equity(self.equity)
    }
}

impl From<CreateJobRequest> for NewJob {
    fn from(req: CreateJobRequest) -> Self {
        Self {
            title: req.title,
            salary: req.salary,
            equity: req.equity,
            company_handle: req.company_handle,
        }
    }
}

/// `id` and `companyHandle` cannot be changed.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub salary: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub equity: Option<Option<f64>>,
}

impl UpdateJobRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.is_none() && self.salary.is_none() && self.equity.is_none() {
            return Err("at least one field is required".to_string());
        }
        if let Some(title) = &self.title
            && title.trim().is_empty()
        {
            return Err("title cannot be empty".to_string());
        }
        validate_salary(self.salary.flatten())?;
        validate_equity(self.equity.flatten())
    }
}

impl From<UpdateJobRequest> for JobChanges {
    fn from(req: UpdateJobRequest) -> Self {
        Self {
            title: req.title,
            salary: req.salary,
            equity: req.equity,
        }
    }
}

/// Raw query string values; parsed by [`JobFilterQuery::into_filter`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobFilterQuery {
    pub title: Option<String>,
    pub min_salary: Option<String>,
    pub has_equity: Option<String>,
}

impl JobFilterQuery {
    pub fn into_filter(self) -> Result<JobFilter, String> {
        let title = self.title.filter(|t| !t.trim().is_empty());

        let min_salary = match self.min_salary {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(n) if n >= 0 => Some(n),
                _ => return Err("minSalary must be a non-negative integer".to_string()),
            },
            None => None,
        };

        let has_equity = match self.has_equity.as_deref() {
            None | Some("false") => false,
            Some("true") => true,
            Some(_) => return Err("hasEquity must be true or false".to_string()),
        };

        Ok(JobFilter {
            title,
            min_salary,
            has_equity,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub id: i64,
    pub title: String,
    pub salary: Option<i64>,
    pub equity: Option<f64>,
    pub company_handle: String,
}

impl From<JobRow> for JobResponse {
    fn from(row: JobRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            salary: row.salary,
            equity: row.equity,
            company_handle: row.company_handle,
        }
    }
}
