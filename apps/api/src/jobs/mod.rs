//! Job postings: appended to a `;`-delimited CSV file, newest row wins.

pub mod handlers;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::info;

const DELIMITER: u8 = b';';

#[derive(Debug, Error)]
pub enum JobError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV writer error: {0}")]
    Writer(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub description: String,
    pub details: String,
}

impl JobPosting {
    /// The position screened against until another posting is registered.
    pub fn default_posting() -> Self {
        Self {
            title: "Full Stack Developer".to_string(),
            description: "We are looking for a Full Stack Developer to join our technology team, \
                working on strategic projects focused on scalable, data-driven solutions. \
                You will build, maintain and evolve robust web applications and collaborate \
                with multidisciplinary teams to deliver continuous value to the business."
                .to_string(),
            details: "\
Activities:
- Build and maintain web applications in modern environments, using back-end and front-end technologies.
- Work with product, UX and data teams to understand needs and propose solutions.
- Create APIs, integrations and interactive dashboards.
- Ensure good practices in version control, testing and documentation.
- Take part in code reviews, deploys and continuous improvement of the application architecture.
Requirements:
- Solid knowledge of Python, JavaScript and SQL.
- Hands-on experience with frameworks such as React, Node.js and Django.
- Familiarity with version control using Git.
- Experience with cloud services such as AWS and Google Cloud Platform.
- Ability to work in a team, with good communication and a collaborative profile.
Nice to have:
- Knowledge of Power BI or other data visualization tools.
- Previous experience in agile environments (Scrum, Kanban).
- Personal projects, open source contributions or an available technical portfolio.
- Cloud certifications or certifications in software engineering."
                .to_string(),
        }
    }
}

/// Renders a posting as the `{job}` text of the screening prompt.
pub fn format_job_details(job: &JobPosting) -> String {
    format!(
        "**Job: {}**\n\n**Job description:**\n{}\n\n**Full details:**\n{}",
        job.title.trim(),
        job.description.trim(),
        job.details.trim()
    )
}

#[derive(Clone)]
pub struct JobBoard {
    path: PathBuf,
}

impl JobBoard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one posting. The header row is written only when the file is new.
    pub async fn append(&self, job: &JobPosting) -> Result<(), JobError> {
        let is_new = !tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| self.io_err(e))?;

        let mut writer = csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(is_new)
            .from_writer(Vec::new());
        writer.serialize(job)?;
        let row = writer
            .into_inner()
            .map_err(|e| JobError::Writer(e.to_string()))?;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.io_err(e))?;
        file.write_all(&row).await.map_err(|e| self.io_err(e))?;
        file.flush().await.map_err(|e| self.io_err(e))?;

        info!("Registered job posting '{}'", job.title);
        Ok(())
    }

    /// Every posting in insertion order. A missing file has none.
    pub async fn all(&self) -> Result<Vec<JobPosting>, JobError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_err(e)),
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(true)
            .from_reader(bytes.as_slice());
        let jobs = reader.deserialize().collect::<Result<Vec<JobPosting>, _>>()?;
        Ok(jobs)
    }

    /// The most recently appended posting.
    pub async fn latest(&self) -> Result<Option<JobPosting>, JobError> {
        Ok(self.all().await?.pop())
    }

    /// Writes `job` when the board has no postings yet. Returns whether it was written.
    pub async fn seed(&self, job: &JobPosting) -> Result<bool, JobError> {
        if self.latest().await?.is_some() {
            return Ok(false);
        }
        self.append(job).await?;
        Ok(true)
    }

    fn io_err(&self, source: std::io::Error) -> JobError {
        JobError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(title: &str) -> JobPosting {
        JobPosting {
            title: title.to_string(),
            description: "Build things; ship them".to_string(),
            details: "Line one\nLine two with \"quotes\"".to_string(),
        }
    }

    #[tokio::test]
    async fn test_append_writes_header_once_and_latest_is_last_row() {
        let dir = tempfile::tempdir().unwrap();
        let board = JobBoard::new(dir.path().join("jobs.csv"));

        board.append(&posting("Backend Engineer")).await.unwrap();
        board.append(&posting("Data Engineer")).await.unwrap();

        let raw = tokio::fs::read_to_string(board.path()).await.unwrap();
        assert!(raw.starts_with("title;description;details\n"));
        assert_eq!(raw.matches("title;description;details").count(), 1);

        let all = board.all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1], posting("Data Engineer"));
        assert_eq!(board.latest().await.unwrap().unwrap().title, "Data Engineer");
    }

    #[tokio::test]
    async fn test_missing_file_has_no_postings() {
        let dir = tempfile::tempdir().unwrap();
        let board = JobBoard::new(dir.path().join("jobs.csv"));
        assert!(board.latest().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_seed_only_writes_into_an_empty_board() {
        let dir = tempfile::tempdir().unwrap();
        let board = JobBoard::new(dir.path().join("jobs.csv"));

        assert!(board.seed(&JobPosting::default_posting()).await.unwrap());
        assert!(!board.seed(&posting("Other")).await.unwrap());
        assert_eq!(board.all().await.unwrap().len(), 1);
    }

    #[test]
    fn test_format_job_details() {
        let text = format_job_details(&JobPosting {
            title: " QA Analyst ".to_string(),
            description: "Test everything.\n".to_string(),
            details: "\n- Selenium".to_string(),
        });
        assert_eq!(
            text,
            "**Job: QA Analyst**\n\n**Job description:**\nTest everything.\n\n**Full details:**\n- Selenium"
        );
    }
}
