//! SQLite Tour Repository

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection};
use std::collections::BTreeSet;

use super::DbPool;
use crate::application::ports::{
    Page, PageRequest, RepositoryError, TourMutation, TourRepositoryPort, TourSearchCriteria,
    TourUpdateError, UpdatedTour,
};
use crate::domain::tour::{
    Course, Courses, MemberRange, NewTour, Schedule, Tour, TourContent, TourId, TourStatus,
};

const TOUR_COLUMNS: &str = "id, author_id, title, content, region, start_date, end_date, \
     min_member, max_member, price, link, status, created_at, updated_at";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite Tour Repository
pub struct SqliteTourRepository {
    pool: DbPool,
}

impl SqliteTourRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn db_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::DatabaseError(e.to_string())
}

fn serialization_error(e: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::SerializationError(e.to_string())
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(serialization_error)?
        .with_timezone(&Utc))
}

fn parse_date(value: &str) -> Result<NaiveDate, RepositoryError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(serialization_error)
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// LIKE 模式转义（`\` 作为转义符）
fn like_pattern(keyword: &str) -> String {
    let escaped = keyword
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[derive(FromRow)]
struct TourRow {
    id: i64,
    author_id: i64,
    title: String,
    content: String,
    region: String,
    start_date: String,
    end_date: String,
    min_member: i64,
    max_member: i64,
    price: i64,
    link: Option<String>,
    status: String,
    created_at: String,
    updated_at: String,
}

#[derive(FromRow)]
struct CourseRow {
    title: String,
    content: String,
    image_url: Option<String>,
}

/// Tour 子表数据
#[derive(Default)]
struct TourChildren {
    categories: Vec<String>,
    courses: Vec<Course>,
    image_urls: Vec<String>,
    reserved_user_ids: BTreeSet<i64>,
    wished_user_ids: BTreeSet<i64>,
}

impl TourRow {
    fn into_tour(self, children: TourChildren) -> Result<Tour, RepositoryError> {
        let schedule = Schedule::new(parse_date(&self.start_date)?, parse_date(&self.end_date)?)
            .map_err(serialization_error)?;
        let members = MemberRange::new(self.min_member as u32, self.max_member as u32)
            .map_err(serialization_error)?;
        let courses = Courses::new(children.courses).map_err(serialization_error)?;
        let status = TourStatus::from_str(&self.status).ok_or_else(|| {
            RepositoryError::SerializationError(format!("unknown tour status: {}", self.status))
        })?;

        let content = TourContent {
            title: self.title,
            content: self.content,
            region: self.region,
            categories: children.categories,
            schedule,
            members,
            price: self.price as u32,
            courses,
            image_urls: children.image_urls,
        };

        Ok(Tour::restore(
            self.id,
            self.author_id,
            content,
            self.link,
            status,
            children.reserved_user_ids,
            children.wished_user_ids,
            parse_timestamp(&self.created_at)?,
            parse_timestamp(&self.updated_at)?,
        ))
    }
}

/// 读取单个 Tour 的所有子表
async fn load_children(
    conn: &mut SqliteConnection,
    tour_id: TourId,
) -> Result<TourChildren, sqlx::Error> {
    let categories: Vec<String> = sqlx::query_scalar(
        "SELECT category FROM tour_categories WHERE tour_id = ? ORDER BY sequence",
    )
    .bind(tour_id)
    .fetch_all(&mut *conn)
    .await?;

    let courses: Vec<CourseRow> = sqlx::query_as(
        "SELECT title, content, image_url FROM tour_courses WHERE tour_id = ? ORDER BY sequence",
    )
    .bind(tour_id)
    .fetch_all(&mut *conn)
    .await?;

    let image_urls: Vec<String> =
        sqlx::query_scalar("SELECT url FROM tour_images WHERE tour_id = ? ORDER BY sequence")
            .bind(tour_id)
            .fetch_all(&mut *conn)
            .await?;

    let reserved: Vec<i64> =
        sqlx::query_scalar("SELECT user_id FROM tour_reservations WHERE tour_id = ?")
            .bind(tour_id)
            .fetch_all(&mut *conn)
            .await?;

    let wished: Vec<i64> = sqlx::query_scalar("SELECT user_id FROM tour_wishes WHERE tour_id = ?")
        .bind(tour_id)
        .fetch_all(&mut *conn)
        .await?;

    Ok(TourChildren {
        categories,
        courses: courses
            .into_iter()
            .map(|c| Course {
                title: c.title,
                content: c.content,
                image_url: c.image_url,
            })
            .collect(),
        image_urls,
        reserved_user_ids: reserved.into_iter().collect(),
        wished_user_ids: wished.into_iter().collect(),
    })
}

/// 写入 Tour 内容相关子表（调用方负责先清空）
async fn write_content_children(
    conn: &mut SqliteConnection,
    tour_id: TourId,
    content: &TourContent,
) -> Result<(), sqlx::Error> {
    for (sequence, category) in content.categories.iter().enumerate() {
        sqlx::query("INSERT INTO tour_categories (tour_id, sequence, category) VALUES (?, ?, ?)")
            .bind(tour_id)
            .bind(sequence as i64)
            .bind(category)
            .execute(&mut *conn)
            .await?;
    }

    for (sequence, course) in content.courses.as_slice().iter().enumerate() {
        sqlx::query(
            "INSERT INTO tour_courses (tour_id, sequence, title, content, image_url) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(tour_id)
        .bind(sequence as i64)
        .bind(&course.title)
        .bind(&course.content)
        .bind(&course.image_url)
        .execute(&mut *conn)
        .await?;
    }

    for (sequence, url) in content.image_urls.iter().enumerate() {
        sqlx::query("INSERT INTO tour_images (tour_id, sequence, url) VALUES (?, ?, ?)")
            .bind(tour_id)
            .bind(sequence as i64)
            .bind(url)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

/// 覆盖写入已存在的 Tour 及其全部子表
async fn write_tour(conn: &mut SqliteConnection, tour: &Tour) -> Result<(), sqlx::Error> {
    let content = tour.content();

    sqlx::query(
        r#"
        UPDATE tours SET
            title = ?, content = ?, region = ?, start_date = ?, end_date = ?,
            min_member = ?, max_member = ?, price = ?, link = ?, status = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&content.title)
    .bind(&content.content)
    .bind(&content.region)
    .bind(format_date(content.schedule.start()))
    .bind(format_date(content.schedule.end()))
    .bind(i64::from(content.members.min()))
    .bind(i64::from(content.members.max()))
    .bind(i64::from(content.price))
    .bind(tour.link())
    .bind(tour.status().as_str())
    .bind(tour.updated_at().to_rfc3339())
    .bind(tour.id())
    .execute(&mut *conn)
    .await?;

    for table in [
        "tour_categories",
        "tour_courses",
        "tour_images",
        "tour_reservations",
        "tour_wishes",
    ] {
        sqlx::query(&format!("DELETE FROM {} WHERE tour_id = ?", table))
            .bind(tour.id())
            .execute(&mut *conn)
            .await?;
    }

    write_content_children(&mut *conn, tour.id(), content).await?;

    for user_id in tour.reserved_user_ids() {
        sqlx::query("INSERT INTO tour_reservations (tour_id, user_id) VALUES (?, ?)")
            .bind(tour.id())
            .bind(*user_id)
            .execute(&mut *conn)
            .await?;
    }
    for user_id in tour.wished_user_ids() {
        sqlx::query("INSERT INTO tour_wishes (tour_id, user_id) VALUES (?, ?)")
            .bind(tour.id())
            .bind(*user_id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

impl SqliteTourRepository {
    /// 将查询到的行组装为聚合
    async fn assemble(&self, rows: Vec<TourRow>) -> Result<Vec<Tour>, RepositoryError> {
        let mut conn = self.pool.acquire().await.map_err(db_error)?;
        let mut tours = Vec::with_capacity(rows.len());
        for row in rows {
            let children = load_children(&mut conn, row.id).await.map_err(db_error)?;
            tours.push(row.into_tour(children)?);
        }
        Ok(tours)
    }
}

#[async_trait]
impl TourRepositoryPort for SqliteTourRepository {
    async fn insert(&self, tour: &NewTour) -> Result<Tour, RepositoryError> {
        let content = tour.content();
        let created_at = tour.created_at().to_rfc3339();

        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let result = sqlx::query(
            r#"
            INSERT INTO tours (author_id, title, content, region, start_date, end_date,
                               min_member, max_member, price, link, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, NULL, ?, ?, ?)
            "#,
        )
        .bind(tour.author_id())
        .bind(&content.title)
        .bind(&content.content)
        .bind(&content.region)
        .bind(format_date(content.schedule.start()))
        .bind(format_date(content.schedule.end()))
        .bind(i64::from(content.members.min()))
        .bind(i64::from(content.members.max()))
        .bind(i64::from(content.price))
        .bind(TourStatus::Active.as_str())
        .bind(&created_at)
        .bind(&created_at)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        let tour_id = result.last_insert_rowid();
        write_content_children(&mut tx, tour_id, content)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        Ok(Tour::from_new(tour_id, tour.clone()))
    }

    async fn update_with(
        &self,
        id: TourId,
        mutation: TourMutation,
    ) -> Result<UpdatedTour, TourUpdateError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        // 首条语句为写操作，取得写锁后再读取，提交前其他写入者无法修改该 Tour
        let locked = sqlx::query("UPDATE tours SET updated_at = updated_at WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        if locked.rows_affected() == 0 {
            return Err(TourUpdateError::NotFound(id));
        }

        let row: TourRow =
            sqlx::query_as(&format!("SELECT {} FROM tours WHERE id = ?", TOUR_COLUMNS))
                .bind(id)
                .fetch_one(&mut *tx)
                .await
                .map_err(db_error)?;
        let children = load_children(&mut tx, id).await.map_err(db_error)?;
        let mut tour = row.into_tour(children)?;

        let changed = mutation(&mut tour)?;
        if changed {
            write_tour(&mut tx, &tour).await.map_err(db_error)?;
            tx.commit().await.map_err(db_error)?;
        } else {
            tx.rollback().await.map_err(db_error)?;
        }

        Ok(UpdatedTour { tour, changed })
    }

    async fn find_by_id(&self, id: TourId) -> Result<Option<Tour>, RepositoryError> {
        let row: Option<TourRow> =
            sqlx::query_as(&format!("SELECT {} FROM tours WHERE id = ?", TOUR_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        match row {
            Some(row) => Ok(self.assemble(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_page(&self, page: PageRequest) -> Result<Page<Tour>, RepositoryError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tours")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        let rows: Vec<TourRow> = sqlx::query_as(&format!(
            "SELECT {} FROM tours ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
            TOUR_COLUMNS
        ))
        .bind(i64::from(page.size))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(Page {
            items: self.assemble(rows).await?,
            request: page,
            total_elements: total as u64,
        })
    }

    async fn search(
        &self,
        criteria: &TourSearchCriteria,
        page: PageRequest,
    ) -> Result<Vec<Tour>, RepositoryError> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM tours WHERE status != 'terminated'",
            TOUR_COLUMNS
        ));

        if let Some(keyword) = criteria
            .keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
        {
            let pattern = like_pattern(keyword);
            builder
                .push(" AND (LOWER(title) LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR LOWER(content) LIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\')");
        }
        if let Some(region) = &criteria.region {
            builder.push(" AND region = ").push_bind(region.clone());
        }
        if let Some(category) = &criteria.category {
            builder
                .push(" AND EXISTS (SELECT 1 FROM tour_categories tc WHERE tc.tour_id = tours.id AND tc.category = ")
                .push_bind(category.clone())
                .push(")");
        }
        if let Some(start) = criteria.start_date {
            builder.push(" AND start_date >= ").push_bind(format_date(start));
        }
        if let Some(end) = criteria.end_date {
            builder.push(" AND end_date <= ").push_bind(format_date(end));
        }

        builder
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(i64::from(page.size))
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);

        let rows: Vec<TourRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        self.assemble(rows).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::tour_mutation;
    use crate::domain::tour::TourError;
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};
    use std::sync::Arc;

    async fn repo() -> SqliteTourRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteTourRepository::new(pool)
    }

    fn new_tour(title: &str, region: &str, start: (i32, u32, u32), categories: &[&str]) -> NewTour {
        let day = NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap();
        NewTour::new(
            1,
            TourContent {
                title: title.to_string(),
                content: "a day out".to_string(),
                region: region.to_string(),
                categories: categories.iter().map(|c| c.to_string()).collect(),
                schedule: Schedule::new(day, day).unwrap(),
                members: MemberRange::new(1, 2).unwrap(),
                price: 30000,
                courses: Courses::new(vec![
                    Course {
                        title: "first".to_string(),
                        content: "meet".to_string(),
                        image_url: None,
                    },
                    Course {
                        title: "second".to_string(),
                        content: "lunch".to_string(),
                        image_url: Some("/images/lunch.png".to_string()),
                    },
                ])
                .unwrap(),
                image_urls: vec!["/images/cover.png".to_string()],
            },
        )
        .unwrap()
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_Off"), "%50\\%\\_off%");
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = repo().await;
        let inserted = repo
            .insert(&new_tour("Oryukdo skywalk", "busan", (2024, 6, 1), &["sea"]))
            .await
            .unwrap();
        assert_eq!(inserted.id(), 1);

        let found = repo.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(found.content().title, "Oryukdo skywalk");
        assert_eq!(found.content().courses.len(), 2);
        assert_eq!(found.content().courses.as_slice()[1].title, "second");
        assert_eq!(found.content().image_urls, vec!["/images/cover.png".to_string()]);
        assert_eq!(found.content().categories, vec!["sea".to_string()]);
        assert_eq!(found.status(), TourStatus::Active);

        assert!(repo.find_by_id(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_persists_relations_and_status() {
        let repo = repo().await;
        let tour = repo
            .insert(&new_tour("Songdo cable car", "busan", (2024, 6, 1), &[]))
            .await
            .unwrap();

        let updated = repo
            .update_with(
                tour.id(),
                tour_mutation(|t| {
                    t.reserve(2)?;
                    t.reserve(3)?;
                    t.toggle_wish(4)?;
                    t.update_link(1, "https://live.example/songdo")?;
                    Ok(true)
                }),
            )
            .await
            .unwrap();
        assert!(updated.changed);

        let found = repo.find_by_id(tour.id()).await.unwrap().unwrap();
        assert_eq!(found.status(), TourStatus::Reserved);
        assert_eq!(found.reserved_user_ids().len(), 2);
        assert!(found.is_wished_by(4));
        assert_eq!(found.link(), Some("https://live.example/songdo"));

        repo.update_with(tour.id(), tour_mutation(|t| Ok(t.cancel_reservation(2))))
            .await
            .unwrap();
        let found = repo.find_by_id(tour.id()).await.unwrap().unwrap();
        assert_eq!(found.status(), TourStatus::Active);
        assert_eq!(found.reserved_user_ids().len(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_tour() {
        let repo = repo().await;
        assert!(matches!(
            repo.update_with(9, tour_mutation(|_| Ok(true))).await,
            Err(TourUpdateError::NotFound(9))
        ));
    }

    #[tokio::test]
    async fn test_rejected_update_writes_nothing() {
        let repo = repo().await;
        let tour = repo
            .insert(&new_tour("Taejongdae", "busan", (2024, 6, 1), &[]))
            .await
            .unwrap();

        let result = repo
            .update_with(
                tour.id(),
                tour_mutation(|t| {
                    t.toggle_wish(2)?;
                    t.terminate(2)?;
                    Ok(true)
                }),
            )
            .await;
        assert!(matches!(
            result,
            Err(TourUpdateError::Rejected(TourError::NotAuthor))
        ));

        let found = repo.find_by_id(tour.id()).await.unwrap().unwrap();
        assert!(found.wished_user_ids().is_empty());
        assert_eq!(found.status(), TourStatus::Active);
    }

    #[tokio::test]
    async fn test_categories_keep_submitted_order() {
        let repo = repo().await;
        let tour = repo
            .insert(&new_tour(
                "Beomeosa",
                "busan",
                (2024, 6, 1),
                &["temple", "sea", "temple"],
            ))
            .await
            .unwrap();
        assert_eq!(tour.content().categories, vec!["temple", "sea"]);

        let found = repo.find_by_id(tour.id()).await.unwrap().unwrap();
        assert_eq!(found.content().categories, tour.content().categories);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_on_file_db_are_serialized() {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_pool(&DatabaseConfig::new(dir.path().join("tours.db")))
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        let repo = Arc::new(SqliteTourRepository::new(pool));

        for round in 0..5 {
            let tour = repo
                .insert(&new_tour(&format!("round {}", round), "busan", (2024, 6, 1), &[]))
                .await
                .unwrap();
            let tour_id = tour.id();

            // 每个用户同时预约并加入心愿，容量为 2
            let mut tasks = Vec::new();
            for user_id in 2..12 {
                let reserve_repo = repo.clone();
                tasks.push(tokio::spawn(async move {
                    reserve_repo
                        .update_with(
                            tour_id,
                            tour_mutation(move |t| t.reserve(user_id).map(|_| true)),
                        )
                        .await
                        .is_ok()
                }));
                let wish_repo = repo.clone();
                tasks.push(tokio::spawn(async move {
                    wish_repo
                        .update_with(
                            tour_id,
                            tour_mutation(move |t| t.toggle_wish(user_id).map(|_| true)),
                        )
                        .await
                        .is_ok()
                }));
            }

            let mut accepted = 0;
            for task in tasks {
                if task.await.unwrap() {
                    accepted += 1;
                }
            }

            let found = repo.find_by_id(tour_id).await.unwrap().unwrap();
            assert_eq!(accepted, 2 + 10, "round {}", round);
            assert_eq!(found.reserved_user_ids().len(), 2, "round {}", round);
            assert_eq!(found.wished_user_ids().len(), 10, "round {}", round);
            assert_eq!(found.status(), TourStatus::Reserved);
        }
    }

    #[tokio::test]
    async fn test_find_page_newest_first() {
        let repo = repo().await;
        for i in 0..8 {
            repo.insert(&new_tour(&format!("tour {}", i), "busan", (2024, 6, 1), &[]))
                .await
                .unwrap();
        }

        let page = repo.find_page(PageRequest::new(1, 6)).await.unwrap();
        assert_eq!(page.total_elements, 8);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].content().title, "tour 1");
        assert!(page.is_last());
    }

    #[tokio::test]
    async fn test_search_filters() {
        let repo = repo().await;
        repo.insert(&new_tour("Haeundae Sunset", "busan", (2024, 6, 1), &["sea"]))
            .await
            .unwrap();
        repo.insert(&new_tour("Bukchon walk", "seoul", (2024, 6, 5), &["history"]))
            .await
            .unwrap();
        let ended = repo
            .insert(&new_tour("Sunset cruise", "busan", (2024, 6, 9), &["sea"]))
            .await
            .unwrap();
        repo.update_with(ended.id(), tour_mutation(|t| t.terminate(1).map(|_| true)))
            .await
            .unwrap();

        let by_keyword = TourSearchCriteria {
            keyword: Some("sunset".to_string()),
            ..Default::default()
        };
        let found = repo.search(&by_keyword, PageRequest::new(0, 18)).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].content().title, "Haeundae Sunset");

        let by_category = TourSearchCriteria {
            category: Some("history".to_string()),
            ..Default::default()
        };
        let found = repo.search(&by_category, PageRequest::new(0, 18)).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].content().region, "seoul");

        let by_dates = TourSearchCriteria {
            start_date: NaiveDate::from_ymd_opt(2024, 6, 2),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 30),
            ..Default::default()
        };
        let found = repo.search(&by_dates, PageRequest::new(0, 18)).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].content().title, "Bukchon walk");
    }
}
