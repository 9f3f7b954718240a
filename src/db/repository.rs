use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use tokio_rusqlite::Connection;

use crate::error::Result;
use crate::models::{NewResource, Resource, ResourceFilter, StoredCategory};

use super::schema::SCHEMA;

/// Owns the single long-lived connection. Clones share it, so every task
/// talks to the same database handle and SQLite serialises the writes.
#[derive(Clone)]
pub struct Repository {
    conn: Connection,
}

impl Repository {
    pub async fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path).await?;
        tracing::debug!("Opened resource database at {}", db_path.display());
        Self::init(conn).await
    }

    #[cfg(test)]
    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().await?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    pub async fn insert_resource(&self, resource: NewResource) -> Result<i64> {
        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO resources (title, category, url, description) VALUES (?1, ?2, ?3, ?4)",
                    params![
                        resource.title,
                        resource.category.label(),
                        resource.url,
                        resource.description,
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;
        Ok(id)
    }

    pub async fn list_resources(&self, filter: ResourceFilter) -> Result<Vec<Resource>> {
        let category = filter.category.map(|c| c.label());
        let pattern = filter.search_term().map(like_pattern);

        let resources = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT id, title, category, url, description, created_at
                       FROM resources
                       WHERE (?1 IS NULL OR category = ?1)
                         AND (?2 IS NULL
                              OR title LIKE ?2 ESCAPE '\'
                              OR description LIKE ?2 ESCAPE '\')
                       ORDER BY created_at DESC, id DESC"#,
                )?;
                let resources = stmt
                    .query_map(params![category, pattern], resource_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(resources)
            })
            .await?;
        Ok(resources)
    }

    /// Removes every resource with exactly this title. Titles are not unique,
    /// so this can remove several rows.
    pub async fn delete_resources_by_title(&self, title: &str) -> Result<usize> {
        let title = title.to_string();
        let deleted = self
            .conn
            .call(move |conn| {
                let deleted = conn.execute("DELETE FROM resources WHERE title = ?1", params![title])?;
                Ok(deleted)
            })
            .await?;
        Ok(deleted)
    }

    pub async fn delete_resource(&self, id: i64) -> Result<bool> {
        let deleted = self
            .conn
            .call(move |conn| {
                let deleted = conn.execute("DELETE FROM resources WHERE id = ?1", params![id])?;
                Ok(deleted > 0)
            })
            .await?;
        Ok(deleted)
    }

    pub async fn count_resources(&self) -> Result<i64> {
        let count = self
            .conn
            .call(|conn| {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM resources", [], |row| row.get(0))?;
                Ok(count)
            })
            .await?;
        Ok(count)
    }
}

/// `%term%` with LIKE wildcards escaped so the term matches literally.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // SQLite strftime output, with or without fractional seconds
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    None
}

fn resource_from_row(row: &Row) -> rusqlite::Result<Resource> {
    let category = StoredCategory::from(row.get::<_, String>(2)?);
    if let StoredCategory::Unrecognised(label) = &category {
        tracing::warn!("Resource has unrecognised category {:?}", label);
    }

    Ok(Resource {
        id: row.get(0)?,
        title: row.get(1)?,
        category,
        url: row.get(3)?,
        description: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        created_at: row
            .get::<_, String>(5)
            .ok()
            .and_then(|s| parse_datetime(&s))
            .unwrap_or_else(Utc::now),
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio_test::assert_ok;

    use super::*;
    use crate::models::Category;

    fn new(title: &str, category: Category, description: &str) -> NewResource {
        NewResource::new(title, category, "", description)
    }

    #[tokio::test]
    async fn insert_then_list_returns_the_record() {
        let repo = Repository::open_in_memory().await.unwrap();
        let id = repo
            .insert_resource(NewResource::new(
                "MIT 18.01",
                Category::VideoLectures,
                "https://ocw.mit.edu/18-01",
                "Single variable calculus",
            ))
            .await
            .unwrap();

        let all = repo.list_resources(ResourceFilter::default()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, id);
        assert_eq!(all[0].title, "MIT 18.01");
        assert_eq!(all[0].category, Category::VideoLectures);
        assert_eq!(all[0].url.as_deref(), Some("https://ocw.mit.edu/18-01"));
        assert_eq!(all[0].description, "Single variable calculus");
    }

    #[tokio::test]
    async fn lists_most_recent_first() {
        let repo = Repository::open_in_memory().await.unwrap();
        for title in ["first", "second", "third"] {
            repo.insert_resource(new(title, Category::Other, "x")).await.unwrap();
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let all = repo.list_resources(ResourceFilter::default()).await.unwrap();
        let titles: Vec<_> = all.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["third", "second", "first"]);
        assert!(all.windows(2).all(|w| w[0].created_at > w[1].created_at));
    }

    #[tokio::test]
    async fn same_timestamp_falls_back_to_insertion_order() {
        let repo = Repository::open_in_memory().await.unwrap();
        repo.conn
            .call(|conn| {
                conn.execute_batch(
                    r#"INSERT INTO resources (title, category, description, created_at)
                       VALUES ('a', 'Other', '', '2026-01-01 10:00:00.000');
                       INSERT INTO resources (title, category, description, created_at)
                       VALUES ('b', 'Other', '', '2026-01-01 10:00:00.000');"#,
                )?;
                Ok(())
            })
            .await
            .unwrap();

        let all = repo.list_resources(ResourceFilter::default()).await.unwrap();
        let titles: Vec<_> = all.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["b", "a"]);
    }

    #[tokio::test]
    async fn filters_by_category() {
        let repo = Repository::open_in_memory().await.unwrap();
        repo.insert_resource(new("Derivatives", Category::StudyNotes, "ch1")).await.unwrap();
        repo.insert_resource(new("2023 Final", Category::PastPapers, "exam")).await.unwrap();
        repo.insert_resource(new("Integrals", Category::StudyNotes, "ch2")).await.unwrap();

        let notes = repo
            .list_resources(ResourceFilter::new(Some(Category::StudyNotes), None))
            .await
            .unwrap();
        assert_eq!(notes.len(), 2);
        assert!(notes.iter().all(|r| r.category == Category::StudyNotes));

        let all = repo.list_resources(ResourceFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn search_matches_title_or_description() {
        let repo = Repository::open_in_memory().await.unwrap();
        repo.insert_resource(new("Linear Algebra", Category::ReferenceMaterials, "matrices"))
            .await
            .unwrap();
        repo.insert_resource(new("Problem set 3", Category::PracticeProblems, "eigen values and matrices"))
            .await
            .unwrap();
        repo.insert_resource(new("Organic chemistry", Category::StudyNotes, "alkanes"))
            .await
            .unwrap();

        let hits = repo
            .list_resources(ResourceFilter::new(None, Some("matrices")))
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);

        let hits = repo
            .list_resources(ResourceFilter::new(None, Some("Organic")))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Organic chemistry");

        let hits = repo
            .list_resources(ResourceFilter::new(None, Some("")))
            .await
            .unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[tokio::test]
    async fn category_and_search_are_conjoined() {
        let repo = Repository::open_in_memory().await.unwrap();
        repo.insert_resource(new("Calculus lecture", Category::VideoLectures, "limits"))
            .await
            .unwrap();
        repo.insert_resource(new("Calculus drills", Category::PracticeProblems, "limits"))
            .await
            .unwrap();
        repo.insert_resource(new("Physics drills", Category::PracticeProblems, "kinematics"))
            .await
            .unwrap();

        let hits = repo
            .list_resources(ResourceFilter::new(Some(Category::PracticeProblems), Some("limits")))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Calculus drills");
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let repo = Repository::open_in_memory().await.unwrap();
        repo.insert_resource(new("100% coverage", Category::Other, "")).await.unwrap();
        repo.insert_resource(new("1000 coverage", Category::Other, "")).await.unwrap();
        repo.insert_resource(new("snake_case", Category::Other, "")).await.unwrap();
        repo.insert_resource(new("snakeXcase", Category::Other, "")).await.unwrap();

        let hits = repo
            .list_resources(ResourceFilter::new(None, Some("0%")))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "100% coverage");

        let hits = repo
            .list_resources(ResourceFilter::new(None, Some("e_c")))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "snake_case");
    }

    #[tokio::test]
    async fn delete_by_title_removes_every_match_and_nothing_else() {
        let repo = Repository::open_in_memory().await.unwrap();
        repo.insert_resource(new("Dup", Category::Other, "one")).await.unwrap();
        repo.insert_resource(new("Dup", Category::Other, "two")).await.unwrap();
        repo.insert_resource(new("Keep", Category::Other, "three")).await.unwrap();

        assert_eq!(repo.delete_resources_by_title("Dup").await.unwrap(), 2);
        assert_eq!(repo.delete_resources_by_title("Dup").await.unwrap(), 0);

        let all = repo.list_resources(ResourceFilter::default()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Keep");
    }

    #[tokio::test]
    async fn ids_are_never_reused() {
        let repo = Repository::open_in_memory().await.unwrap();
        let first = repo.insert_resource(new("a", Category::Other, "")).await.unwrap();
        let second = repo.insert_resource(new("b", Category::Other, "")).await.unwrap();
        assert!(repo.delete_resource(second).await.unwrap());
        assert!(!repo.delete_resource(second).await.unwrap());

        let third = repo.insert_resource(new("c", Category::Other, "")).await.unwrap();
        assert!(first < second && second < third);
    }

    #[tokio::test]
    async fn reopening_keeps_existing_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("resourcelib.db");

        {
            let repo = assert_ok!(Repository::open(&path).await);
            repo.insert_resource(new("Persisted", Category::PastPapers, "")).await.unwrap();
        }

        let repo = assert_ok!(Repository::open(&path).await);
        assert_eq!(repo.count_resources().await.unwrap(), 1);
        let all = repo.list_resources(ResourceFilter::default()).await.unwrap();
        assert_eq!(all[0].title, "Persisted");
    }

    #[tokio::test]
    async fn concurrent_writers_share_one_connection() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::open(dir.path().join("shared.db")).await.unwrap();

        let mut handles = Vec::new();
        for worker in 0..8 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                for n in 0..5 {
                    let title = format!("worker {worker} item {n}");
                    repo.insert_resource(new(&title, Category::Other, "")).await.unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let all = repo.list_resources(ResourceFilter::default()).await.unwrap();
        assert_eq!(all.len(), 40);
        let mut ids: Vec<_> = all.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 40);
    }

    #[tokio::test]
    async fn unrecognised_category_keeps_its_label() {
        let repo = Repository::open_in_memory().await.unwrap();
        repo.insert_resource(new("Misc", Category::Other, "")).await.unwrap();
        repo.conn
            .call(|conn| {
                conn.execute(
                    "INSERT INTO resources (title, category, description) VALUES ('x', 'Podcasts', NULL)",
                    [],
                )?;
                Ok(())
            })
            .await
            .unwrap();

        let all = repo.list_resources(ResourceFilter::default()).await.unwrap();
        let podcast = all.iter().find(|r| r.title == "x").unwrap();
        assert_eq!(podcast.category, StoredCategory::Unrecognised("Podcasts".to_string()));
        assert_eq!(podcast.category.label(), "Podcasts");
        assert_eq!(podcast.description, "");

        // Every row listed under a category displays that category
        let others = repo
            .list_resources(ResourceFilter::new(Some(Category::Other), None))
            .await
            .unwrap();
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].title, "Misc");
        assert!(others.iter().all(|r| r.category == Category::Other));
    }

    #[tokio::test]
    async fn whitespace_search_is_a_real_term() {
        let repo = Repository::open_in_memory().await.unwrap();
        repo.insert_resource(new("Calculus Notes", Category::StudyNotes, "")).await.unwrap();
        repo.insert_resource(new("Calculus", Category::StudyNotes, "")).await.unwrap();

        let hits = repo
            .list_resources(ResourceFilter::new(None, Some(" ")))
            .await
            .unwrap();
        let titles: Vec<_> = hits.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["Calculus Notes"]);
    }

    #[test]
    fn parses_sqlite_timestamps() {
        assert!(parse_datetime("2026-01-11 12:34:56.789").is_some());
        assert!(parse_datetime("2026-01-11 12:34:56").is_some());
        assert!(parse_datetime("2026-01-11T12:34:56+00:00").is_some());
        assert!(parse_datetime("yesterday").is_none());
    }
}
