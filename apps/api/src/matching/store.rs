//! Reads the job and student records the match engine scores.

use std::future::Future;

use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::JobRow;
use crate::models::student::StudentRow;

/// Rows fetched per round trip during a full scan.
const SCAN_PAGE_SIZE: i64 = 500;

pub async fn fetch_job(pool: &PgPool, job_id: Uuid) -> Result<JobRow, AppError> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}

pub async fn fetch_student(pool: &PgPool, student_id: Uuid) -> Result<StudentRow, AppError> {
    sqlx::query_as::<_, StudentRow>("SELECT * FROM students WHERE id = $1")
        .bind(student_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Student {student_id} not found")))
}

/// Runs `fetch_page(limit, offset)` until a short page comes back.
async fn collect_pages<T, F, Fut>(page_size: i64, mut fetch_page: F) -> Result<Vec<T>, AppError>
where
    F: FnMut(i64, i64) -> Fut,
    Fut: Future<Output = Result<Vec<T>, sqlx::Error>>,
{
    let mut rows = Vec::new();
    let mut offset = 0;
    loop {
        let page = fetch_page(page_size, offset).await?;
        let fetched = page.len() as i64;
        rows.extend(page);
        if fetched < page_size {
            break;
        }
        offset += fetched;
    }
    debug!(rows = rows.len(), "scan complete");
    Ok(rows)
}

/// Every open job, newest first.
pub async fn fetch_open_jobs(pool: &PgPool) -> Result<Vec<JobRow>, AppError> {
    collect_pages(SCAN_PAGE_SIZE, |limit, offset| {
        sqlx::query_as::<_, JobRow>(
            "SELECT * FROM jobs WHERE status = 'open' \
             ORDER BY created_at DESC, id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
    })
    .await
}

/// Every registered student, newest first.
pub async fn fetch_students(pool: &PgPool) -> Result<Vec<StudentRow>, AppError> {
    collect_pages(SCAN_PAGE_SIZE, |limit, offset| {
        sqlx::query_as::<_, StudentRow>(
            "SELECT * FROM students ORDER BY created_at DESC, id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn page_of(total: i64, limit: i64, offset: i64) -> Result<Vec<i64>, sqlx::Error> {
        Ok((offset..total.min(offset + limit)).collect())
    }

    #[tokio::test]
    async fn test_scan_reads_past_first_page() {
        let calls = AtomicUsize::new(0);
        let rows = collect_pages(500, |limit, offset| {
            calls.fetch_add(1, Ordering::SeqCst);
            page_of(1_234, limit, offset)
        })
        .await
        .unwrap();

        assert_eq!(rows.len(), 1_234);
        assert_eq!(rows.last(), Some(&1_233));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exact_multiple_needs_one_empty_page() {
        let calls = AtomicUsize::new(0);
        let rows = collect_pages(10, |limit, offset| {
            calls.fetch_add(1, Ordering::SeqCst);
            page_of(20, limit, offset)
        })
        .await
        .unwrap();

        assert_eq!(rows.len(), 20);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_page_error_propagates() {
        let result: Result<Vec<i64>, AppError> =
            collect_pages(10, |_, _| async { Err(sqlx::Error::RowNotFound) }).await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }
}
